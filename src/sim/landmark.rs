//! Pose landmarks and the render surface they are projected onto

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// One detected body point, normalized to the camera frame
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Landmark {
    /// 0..1, left to right
    pub x: f32,
    /// 0..1, top to bottom
    pub y: f32,
    /// Detector confidence 0..1
    pub visibility: f32,
}

impl Landmark {
    pub const fn new(x: f32, y: f32, visibility: f32) -> Self {
        Self { x, y, visibility }
    }
}

/// Pixel dimensions of the render surface
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Canvas {
    pub width: f32,
    pub height: f32,
}

impl Canvas {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Project a normalized landmark into screen space
    #[inline]
    pub fn to_screen(&self, landmark: &Landmark) -> Vec2 {
        Vec2::new(landmark.x * self.width, landmark.y * self.height)
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new(1280.0, 720.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_screen() {
        let canvas = Canvas::new(1000.0, 500.0);
        let p = canvas.to_screen(&Landmark::new(0.25, 0.5, 1.0));
        assert_eq!(p, Vec2::new(250.0, 250.0));
    }
}
