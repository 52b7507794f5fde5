//! Fruit Catch - a pose-tracked arcade catching game
//!
//! Core modules:
//! - `sim`: Session simulation (entities, collisions, screen state machine)
//! - `game`: Session driver wiring the simulation to audio and telemetry
//! - `settings`: Free-mode options and story stage configuration
//! - `telemetry`: Structured gameplay events and sinks
//! - `audio`: Background music collaborator
//! - `view`: Serializable frame snapshot for the renderer

pub mod audio;
pub mod game;
pub mod highscores;
pub mod settings;
pub mod sim;
pub mod telemetry;
pub mod view;

pub use game::Game;
pub use highscores::HighScores;
pub use settings::{Direction, Settings, SettingsError};

/// Game configuration constants
pub mod consts {
    /// Fruit collision radius (pixels)
    pub const FRUIT_RADIUS: f32 = 30.0;
    /// Extra reach added to the fruit radius when testing a catch
    pub const CATCH_DISTANCE: f32 = 50.0;
    /// Horizontal inset for spawn positions, and vertical offset of spawn/exit rows
    pub const PLAY_MARGIN: f32 = 50.0;

    /// Base fruit speed range (pixels per tick), scaled by the speed multiplier
    pub const BASE_SPEED_MIN: f32 = 5.0;
    pub const BASE_SPEED_MAX: f32 = 10.0;
    /// Diagonal drift as a fraction of vertical speed
    pub const DIAGONAL_DRIFT_FACTOR: f32 = 0.5;

    /// Catch ring defaults
    pub const EFFECT_START_RADIUS: f32 = 10.0;
    pub const EFFECT_GROWTH: f32 = 5.0;
    pub const EFFECT_MAX_RADIUS: f32 = 50.0;

    /// Landmarks below this confidence never score
    pub const VISIBILITY_THRESHOLD: f32 = 0.5;

    /// Story mode has exactly this many stages
    pub const STAGE_COUNT: usize = 5;
    /// Index of the final story stage
    pub const FINAL_STAGE: usize = STAGE_COUNT - 1;
    /// Best possible points per spawned fruit (head catch)
    pub const MAX_POINTS_PER_SPAWN: f64 = 3.0;
    /// Share of the best possible score required to clear a stage
    pub const TARGET_EFFICIENCY: f64 = 0.60;
    /// Delay before a cleared stage rolls into the next one (seconds)
    pub const STAGE_CLEAR_DELAY: f64 = 3.0;

    /// Countdown turns red at or below this many seconds
    pub const LOW_TIME_THRESHOLD: f64 = 10.0;
}

/// Score needed to clear a story stage.
///
/// `duration / spawn_rate` fruits fall during the stage; clearing requires
/// 60% of what catching every one of them with the head would earn.
#[inline]
pub fn target_score(duration: f64, spawn_rate: f64) -> u32 {
    if spawn_rate <= 0.0 {
        return 0;
    }
    let total_drops = duration / spawn_rate;
    (total_drops * consts::MAX_POINTS_PER_SPAWN * consts::TARGET_EFFICIENCY).floor() as u32
}
