//! Fruit and catch effect entities

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::landmark::Canvas;
use crate::consts::*;
use crate::settings::Direction;

/// Fruit icon variants (cosmetic only)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FruitKind {
    Banana,
    Orange,
}

/// A falling (or rising) fruit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fruit {
    pub id: u32,
    pub kind: FruitKind,
    pub pos: Vec2,
    pub radius: f32,
    pub direction: Direction,
    /// Vertical pixels per tick
    pub speed: f32,
    /// Horizontal pixels per tick (diagonal fruit only)
    pub drift: f32,
}

impl Fruit {
    /// Spawn a fruit at the entry edge for `direction`
    pub fn spawn<R: Rng>(
        id: u32,
        rng: &mut R,
        canvas: Canvas,
        speed_mult: f32,
        direction: Direction,
    ) -> Self {
        let kind = if rng.random_bool(0.5) {
            FruitKind::Banana
        } else {
            FruitKind::Orange
        };

        // Whole-pixel column in [margin, width - margin)
        let lo = PLAY_MARGIN as i32;
        let hi = (canvas.width - PLAY_MARGIN).floor() as i32;
        let x = if hi > lo {
            rng.random_range(lo..hi) as f32
        } else {
            canvas.width / 2.0
        };
        let y = match direction {
            Direction::Up => canvas.height + PLAY_MARGIN,
            Direction::Down | Direction::Diagonal => -PLAY_MARGIN,
        };

        let speed = rng.random_range(BASE_SPEED_MIN..BASE_SPEED_MAX) * speed_mult;
        let drift = if direction == Direction::Diagonal {
            let sign = if rng.random_bool(0.5) { -1.0 } else { 1.0 };
            sign * speed * DIAGONAL_DRIFT_FACTOR
        } else {
            0.0
        };

        Self {
            id,
            kind,
            pos: Vec2::new(x, y),
            radius: FRUIT_RADIUS,
            direction,
            speed,
            drift,
        }
    }

    /// Advance one tick
    pub fn update(&mut self, canvas: Canvas) {
        match self.direction {
            Direction::Down => self.pos.y += self.speed,
            Direction::Up => self.pos.y -= self.speed,
            Direction::Diagonal => {
                self.pos.y += self.speed;
                self.pos.x += self.drift;
                // Bounce off the side walls
                if self.pos.x < 0.0 || self.pos.x > canvas.width {
                    self.drift = -self.drift;
                }
            }
        }
    }

    /// True once the fruit is past its exit edge
    pub fn has_exited(&self, canvas: Canvas) -> bool {
        match self.direction {
            Direction::Up => self.pos.y < -PLAY_MARGIN,
            Direction::Down | Direction::Diagonal => self.pos.y > canvas.height + PLAY_MARGIN,
        }
    }
}

/// Expanding ring drawn where a fruit was caught
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Effect {
    pub pos: Vec2,
    pub radius: f32,
}

impl Effect {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            radius: EFFECT_START_RADIUS,
        }
    }

    pub fn update(&mut self) {
        self.radius += EFFECT_GROWTH;
    }

    pub fn is_expired(&self) -> bool {
        self.radius > EFFECT_MAX_RADIUS
    }
}
