//! Per-frame simulation tick
//!
//! One tick runs for every frame the pose detector delivers. Only the PLAYING
//! screen simulates; the other screens just poll the scheduled stage advance.

use super::collision::{resolve_catch, visible_points};
use super::entity::Effect;
use super::landmark::{Canvas, Landmark};
use super::state::{Episode, Screen, Session};
use super::transition::{SideEffect, end_episode, start_game};
use crate::consts::LOW_TIME_THRESHOLD;

/// Inputs for a single tick
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput<'a> {
    /// Detected landmarks, None when nobody was found this frame
    pub landmarks: Option<&'a [Landmark]>,
    /// Current render surface size
    pub canvas: Canvas,
}

/// Countdown shown on the HUD (whole seconds)
pub fn countdown(time_left: f64) -> u32 {
    time_left.max(0.0).floor() as u32
}

/// Whether the countdown should be drawn as running out
pub fn is_low_time(time_left: f64) -> bool {
    time_left <= LOW_TIME_THRESHOLD
}

/// Advance the session by one frame at clock time `now` (seconds)
pub fn tick(session: &mut Session, input: &TickInput, now: f64) -> Vec<SideEffect> {
    let mut out = Vec::new();

    if session.take_due_advance(now) {
        log::info!("Advancing to stage {}", session.current_stage + 1);
        out.extend(start_game(session, true, now));
    }

    let canvas = input.canvas;
    session.body = input
        .landmarks
        .map(|lm| visible_points(lm, canvas))
        .unwrap_or_default();

    if session.screen() != Screen::Playing {
        return out;
    }

    let remaining = session.episode.remaining(now);
    session.episode.time_left = remaining;
    if remaining <= 0.0 {
        out.extend(end_episode(session, now));
        return out;
    }

    if session.episode.spawn_due(now) {
        session.spawn_fruit(canvas, now);
    }

    let body = &session.body;
    let Episode {
        fruits,
        effects,
        score,
        ..
    } = &mut session.episode;

    fruits.retain_mut(|fruit| {
        fruit.update(canvas);
        if let Some(catch) = resolve_catch(fruit, body) {
            *score += catch.points;
            effects.push(Effect::new(catch.pos));
            log::debug!(
                "Fruit {} caught by {} (+{})",
                catch.fruit_id,
                catch.part.as_str(),
                catch.points
            );
            return false;
        }
        !fruit.has_exited(canvas)
    });

    effects.retain_mut(|effect| {
        effect.update();
        !effect.is_expired()
    });

    out
}
