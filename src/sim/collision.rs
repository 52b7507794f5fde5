//! Catch detection between body landmarks and fruit
//!
//! Five landmarks can catch fruit. They are checked in a fixed priority order
//! (head, wrists, feet) and the first one in reach wins, so a fruit touched by
//! several body parts at once still scores exactly once.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::Fruit;
use super::landmark::{Canvas, Landmark};
use crate::consts::{CATCH_DISTANCE, VISIBILITY_THRESHOLD};

/// Body parts that can catch fruit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyPart {
    Head,
    LeftWrist,
    RightWrist,
    LeftFoot,
    RightFoot,
}

impl BodyPart {
    pub fn as_str(&self) -> &'static str {
        match self {
            BodyPart::Head => "head",
            BodyPart::LeftWrist => "left_wrist",
            BodyPart::RightWrist => "right_wrist",
            BodyPart::LeftFoot => "left_foot",
            BodyPart::RightFoot => "right_foot",
        }
    }
}

/// A scoring landmark: where to find it in the pose frame and what it is worth
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InteractionPoint {
    pub part: BodyPart,
    /// Index into the detector's landmark array
    pub landmark_index: usize,
    pub points: u32,
}

/// Interaction points in priority order
pub const INTERACTION_POINTS: [InteractionPoint; 5] = [
    InteractionPoint {
        part: BodyPart::Head,
        landmark_index: 0,
        points: 3,
    },
    InteractionPoint {
        part: BodyPart::LeftWrist,
        landmark_index: 15,
        points: 1,
    },
    InteractionPoint {
        part: BodyPart::RightWrist,
        landmark_index: 16,
        points: 1,
    },
    InteractionPoint {
        part: BodyPart::LeftFoot,
        landmark_index: 31,
        points: 2,
    },
    InteractionPoint {
        part: BodyPart::RightFoot,
        landmark_index: 32,
        points: 2,
    },
];

/// An interaction point located on screen for the current frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyPoint {
    pub part: BodyPart,
    pub pos: Vec2,
    pub points: u32,
}

/// Result of a catch check
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Catch {
    pub fruit_id: u32,
    pub part: BodyPart,
    pub points: u32,
    /// Fruit position at the moment of the catch
    pub pos: Vec2,
}

/// Confidently detected interaction points in screen space, in priority order.
///
/// Landmarks missing from a short frame or at or below the visibility
/// threshold are skipped.
pub fn visible_points(landmarks: &[Landmark], canvas: Canvas) -> Vec<BodyPoint> {
    INTERACTION_POINTS
        .iter()
        .filter_map(|ip| {
            let lm = landmarks.get(ip.landmark_index)?;
            (lm.visibility > VISIBILITY_THRESHOLD).then(|| BodyPoint {
                part: ip.part,
                pos: canvas.to_screen(lm),
                points: ip.points,
            })
        })
        .collect()
}

/// Whether a body point is close enough to grab a fruit
#[inline]
pub fn in_reach(point: Vec2, fruit: &Fruit) -> bool {
    point.distance(fruit.pos) < CATCH_DISTANCE + fruit.radius
}

/// Check one fruit against the body; the highest priority point in reach catches it
pub fn resolve_catch(fruit: &Fruit, body: &[BodyPoint]) -> Option<Catch> {
    body.iter().find(|bp| in_reach(bp.pos, fruit)).map(|bp| Catch {
        fruit_id: fruit.id,
        part: bp.part,
        points: bp.points,
        pos: fruit.pos,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::FRUIT_RADIUS;
    use crate::settings::Direction;
    use crate::sim::entity::FruitKind;
    use proptest::prelude::*;

    const CANVAS: Canvas = Canvas::new(1000.0, 1000.0);

    fn fruit_at(x: f32, y: f32) -> Fruit {
        Fruit {
            id: 42,
            kind: FruitKind::Orange,
            pos: Vec2::new(x, y),
            radius: FRUIT_RADIUS,
            direction: Direction::Down,
            speed: 5.0,
            drift: 0.0,
        }
    }

    /// 33-landmark frame with every point hidden
    fn empty_frame() -> Vec<Landmark> {
        vec![Landmark::new(0.0, 0.0, 0.0); 33]
    }

    #[test]
    fn test_visible_points_filters_and_orders() {
        let mut frame = empty_frame();
        frame[32] = Landmark::new(0.1, 0.2, 0.9);
        frame[0] = Landmark::new(0.5, 0.5, 0.51);
        frame[15] = Landmark::new(0.3, 0.3, 0.5); // not above threshold

        let points = visible_points(&frame, CANVAS);
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].part, BodyPart::Head);
        assert_eq!(points[0].pos, Vec2::new(500.0, 500.0));
        assert_eq!(points[1].part, BodyPart::RightFoot);
        assert_eq!(points[1].points, 2);
    }

    #[test]
    fn test_short_frame_ignores_missing_indices() {
        let frame = vec![Landmark::new(0.5, 0.5, 1.0); 16];
        let parts: Vec<_> = visible_points(&frame, CANVAS).iter().map(|p| p.part).collect();
        assert_eq!(parts, vec![BodyPart::Head, BodyPart::LeftWrist]);
        assert!(visible_points(&[], CANVAS).is_empty());
    }

    #[test]
    fn test_reach_boundary() {
        let fruit = fruit_at(100.0, 100.0);
        // Reach is 50 + 30 = 80, strictly less than
        assert!(in_reach(Vec2::new(179.9, 100.0), &fruit));
        assert!(!in_reach(Vec2::new(180.0, 100.0), &fruit));
    }

    #[test]
    fn test_head_takes_priority() {
        let mut frame = empty_frame();
        // Both wrists and the head overlap the fruit
        frame[15] = Landmark::new(0.5, 0.5, 1.0);
        frame[16] = Landmark::new(0.5, 0.5, 1.0);
        frame[0] = Landmark::new(0.52, 0.5, 1.0);
        let body = visible_points(&frame, CANVAS);

        let catch = resolve_catch(&fruit_at(500.0, 500.0), &body).unwrap();
        assert_eq!(catch.part, BodyPart::Head);
        assert_eq!(catch.points, 3);
        assert_eq!(catch.fruit_id, 42);
        assert_eq!(catch.pos, Vec2::new(500.0, 500.0));
    }

    #[test]
    fn test_wrist_before_foot() {
        let mut frame = empty_frame();
        frame[31] = Landmark::new(0.5, 0.5, 1.0);
        frame[16] = Landmark::new(0.5, 0.55, 1.0);
        let body = visible_points(&frame, CANVAS);
        let catch = resolve_catch(&fruit_at(500.0, 500.0), &body).unwrap();
        assert_eq!(catch.part, BodyPart::RightWrist);
        assert_eq!(catch.points, 1);
    }

    #[test]
    fn test_no_catch_out_of_reach() {
        let mut frame = empty_frame();
        frame[0] = Landmark::new(0.9, 0.9, 1.0);
        let body = visible_points(&frame, CANVAS);
        assert!(resolve_catch(&fruit_at(100.0, 100.0), &body).is_none());
    }

    proptest! {
        #[test]
        fn prop_catch_awards_first_point_in_reach(
            coords in proptest::collection::vec((0.0f32..1.0, 0.0f32..1.0, 0.0f32..1.0), 33),
            fx in 0.0f32..1000.0,
            fy in 0.0f32..1000.0,
        ) {
            let frame: Vec<Landmark> = coords
                .iter()
                .map(|&(x, y, v)| Landmark::new(x, y, v))
                .collect();
            let fruit = fruit_at(fx, fy);
            let body = visible_points(&frame, CANVAS);

            let expected = INTERACTION_POINTS.iter().find(|ip| {
                let lm = frame[ip.landmark_index];
                lm.visibility > 0.5 && in_reach(CANVAS.to_screen(&lm), &fruit)
            });

            match (resolve_catch(&fruit, &body), expected) {
                (Some(catch), Some(ip)) => {
                    prop_assert_eq!(catch.part, ip.part);
                    prop_assert_eq!(catch.points, ip.points);
                }
                (None, None) => {}
                (got, want) => prop_assert!(false, "got {:?}, want {:?}", got, want),
            }
        }
    }
}
