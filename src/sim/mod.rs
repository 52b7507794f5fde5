//! Session simulation module
//!
//! All gameplay logic lives here. This module must stay free of I/O:
//! - Clock time is passed in by the caller
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - Audio and telemetry are returned as `SideEffect`s, never called

pub mod collision;
pub mod entity;
pub mod input;
pub mod landmark;
pub mod state;
pub mod tick;
pub mod transition;

pub use collision::{BodyPart, BodyPoint, Catch, INTERACTION_POINTS, resolve_catch, visible_points};
pub use entity::{Effect, Fruit, FruitKind};
pub use input::{Action, InputError, expected_keys, parse_key};
pub use landmark::{Canvas, Landmark};
pub use state::{Episode, GameResult, Mode, ScheduledAdvance, Screen, Session};
pub use tick::{TickInput, countdown, is_low_time, tick};
pub use transition::{SideEffect, apply_action, end_episode, handle_key, start_game};
