//! Game settings
//!
//! Free-mode option cycles and the five story stage configurations. Loaded from
//! JSON when a settings file is supplied, defaults otherwise.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{STAGE_CLEAR_DELAY, STAGE_COUNT};
use crate::sim::Canvas;

/// Fruit travel direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Direction {
    #[default]
    Down,
    Diagonal,
    Up,
}

impl Direction {
    pub const ALL: [Direction; 3] = [Direction::Down, Direction::Diagonal, Direction::Up];

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Down => "Down",
            Direction::Diagonal => "Diagonal",
            Direction::Up => "Up",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "down" => Some(Direction::Down),
            "diagonal" | "diag" => Some(Direction::Diagonal),
            "up" => Some(Direction::Up),
            _ => None,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which of the four per-screen options a numeric key edits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OptionSlot {
    Duration,
    SpawnRate,
    SpeedMult,
    Direction,
}

impl OptionSlot {
    /// Map the `1`-`4` keys to a slot
    pub fn from_digit(c: char) -> Option<Self> {
        match c {
            '1' => Some(OptionSlot::Duration),
            '2' => Some(OptionSlot::SpawnRate),
            '3' => Some(OptionSlot::SpeedMult),
            '4' => Some(OptionSlot::Direction),
            _ => None,
        }
    }
}

/// A fixed list of values with a selected index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionCycle<T> {
    pub options: Vec<T>,
    pub index: usize,
}

impl<T: Copy + Default> OptionCycle<T> {
    pub fn new(options: Vec<T>, index: usize) -> Self {
        Self { options, index }
    }

    /// Currently selected value (falls back to the first entry on a bad index)
    pub fn current(&self) -> T {
        self.options
            .get(self.index)
            .or_else(|| self.options.first())
            .copied()
            .unwrap_or_default()
    }

    /// Select the next value, wrapping at the end of the list
    pub fn advance(&mut self) {
        if !self.options.is_empty() {
            self.index = (self.index + 1) % self.options.len();
        }
    }

    fn is_valid(&self) -> bool {
        self.index < self.options.len()
    }
}

/// Value following `current` in `options`, wrapping. Unknown values restart the list.
pub fn next_option<T: Copy + PartialEq>(options: &[T], current: T) -> T {
    if options.is_empty() {
        return current;
    }
    let next = options
        .iter()
        .position(|o| *o == current)
        .map(|i| (i + 1) % options.len())
        .unwrap_or(0);
    options[next]
}

/// Free mode options, each cycled independently from the settings screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FreeSettings {
    /// Game duration (seconds)
    pub duration: OptionCycle<u32>,
    /// Seconds between spawns
    pub spawn_rate: OptionCycle<f64>,
    /// Fall speed multiplier
    pub speed_mult: OptionCycle<f32>,
    pub direction: OptionCycle<Direction>,
}

impl Default for FreeSettings {
    fn default() -> Self {
        Self {
            duration: OptionCycle::new(vec![30, 60, 90, 120], 1),
            spawn_rate: OptionCycle::new(vec![1.5, 1.0, 0.5, 0.3], 1),
            speed_mult: OptionCycle::new(vec![0.5, 1.0, 1.5, 2.0], 1),
            direction: OptionCycle::new(Direction::ALL.to_vec(), 0),
        }
    }
}

impl FreeSettings {
    pub fn cycle(&mut self, slot: OptionSlot) {
        match slot {
            OptionSlot::Duration => self.duration.advance(),
            OptionSlot::SpawnRate => self.spawn_rate.advance(),
            OptionSlot::SpeedMult => self.speed_mult.advance(),
            OptionSlot::Direction => self.direction.advance(),
        }
    }

    /// Parameters an episode started with these options would use
    pub fn selected(&self) -> StageConfig {
        StageConfig {
            duration: self.duration.current(),
            spawn_rate: self.spawn_rate.current(),
            speed_mult: self.speed_mult.current(),
            direction: self.direction.current(),
        }
    }

    /// Settings screen rows, numbered as the keys that cycle them
    pub fn rows(&self) -> Vec<String> {
        vec![
            format!("1. Game Duration (s): {}", self.duration.current()),
            format!("2. Spawn Rate (s): {}", self.spawn_rate.current()),
            format!("3. Fall Speed: {}", self.speed_mult.current()),
            format!("4. Direction: {}", self.direction.current()),
        ]
    }
}

/// Parameters of one episode
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct StageConfig {
    /// Seconds
    pub duration: u32,
    /// Seconds between spawns
    pub spawn_rate: f64,
    pub speed_mult: f32,
    pub direction: Direction,
}

impl StageConfig {
    pub const fn new(
        duration: u32,
        spawn_rate: f64,
        speed_mult: f32,
        direction: Direction,
    ) -> Self {
        Self {
            duration,
            spawn_rate,
            speed_mult,
            direction,
        }
    }

    /// Target score for a story episode with these parameters
    pub fn target_score(&self) -> u32 {
        crate::target_score(self.duration as f64, self.spawn_rate)
    }
}

/// Values each story stage field may take
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryOptions {
    pub duration: Vec<u32>,
    pub spawn_rate: Vec<f64>,
    pub speed_mult: Vec<f32>,
    pub direction: Vec<Direction>,
}

impl Default for StoryOptions {
    fn default() -> Self {
        Self {
            duration: vec![30, 45, 60, 90, 120],
            spawn_rate: vec![2.0, 1.5, 1.0, 0.5, 0.3],
            speed_mult: vec![0.5, 1.0, 1.5, 2.0, 3.0],
            direction: Direction::ALL.to_vec(),
        }
    }
}

/// The five story stages, easiest first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryConfig {
    pub stages: [StageConfig; STAGE_COUNT],
    #[serde(default)]
    pub options: StoryOptions,
}

impl Default for StoryConfig {
    fn default() -> Self {
        Self {
            stages: [
                StageConfig::new(30, 1.5, 0.5, Direction::Down),
                StageConfig::new(45, 1.0, 1.0, Direction::Down),
                StageConfig::new(60, 1.0, 1.5, Direction::Diagonal),
                StageConfig::new(60, 0.5, 1.5, Direction::Diagonal),
                StageConfig::new(90, 0.3, 2.0, Direction::Up),
            ],
            options: StoryOptions::default(),
        }
    }
}

impl StoryConfig {
    /// Stage config, clamped into range
    pub fn stage(&self, index: usize) -> &StageConfig {
        debug_assert!(index < STAGE_COUNT, "stage index {index} out of range");
        &self.stages[index.min(STAGE_COUNT - 1)]
    }

    /// Advance one field of a stage to its next allowed value
    pub fn cycle(&mut self, index: usize, slot: OptionSlot) {
        debug_assert!(index < STAGE_COUNT, "stage index {index} out of range");
        let opts = &self.options;
        let cfg = &mut self.stages[index.min(STAGE_COUNT - 1)];
        match slot {
            OptionSlot::Duration => cfg.duration = next_option(&opts.duration, cfg.duration),
            OptionSlot::SpawnRate => cfg.spawn_rate = next_option(&opts.spawn_rate, cfg.spawn_rate),
            OptionSlot::SpeedMult => cfg.speed_mult = next_option(&opts.speed_mult, cfg.speed_mult),
            OptionSlot::Direction => cfg.direction = next_option(&opts.direction, cfg.direction),
        }
    }

    /// Story config screen rows for one stage
    pub fn rows(&self, index: usize) -> Vec<String> {
        let cfg = self.stage(index);
        vec![
            format!("1. Duration: {}s", cfg.duration),
            format!("2. Spawn Rate: {}s", cfg.spawn_rate),
            format!("3. Speed Mult: {}x", cfg.speed_mult),
            format!("4. Direction: {}", cfg.direction),
        ]
    }
}

/// Errors loading or validating settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid settings: {0}")]
    Invalid(String),
}

/// Complete game configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub free: FreeSettings,
    pub story: StoryConfig,
    /// Seed for fruit spawning
    pub seed: u64,
    /// Seconds the stage clear screen is shown before the next stage starts
    pub stage_clear_delay: f64,
    /// Play area size used until the first frame reports one
    pub canvas: Canvas,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            free: FreeSettings::default(),
            story: StoryConfig::default(),
            seed: 0x5eed_f001,
            stage_clear_delay: STAGE_CLEAR_DELAY,
            canvas: Canvas::default(),
        }
    }
}

impl Settings {
    /// Parse and validate settings from JSON
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Reject configurations the simulation cannot run
    pub fn validate(&self) -> Result<(), SettingsError> {
        let free = &self.free;
        if !free.duration.is_valid()
            || !free.spawn_rate.is_valid()
            || !free.speed_mult.is_valid()
            || !free.direction.is_valid()
        {
            return Err(SettingsError::Invalid(
                "free option index out of range".to_string(),
            ));
        }
        check_positive("free duration", free.duration.options.iter().map(|&d| d as f64))?;
        check_positive("free spawn rate", free.spawn_rate.options.iter().copied())?;
        check_positive("free speed", free.speed_mult.options.iter().map(|&s| s as f64))?;

        let opts = &self.story.options;
        if opts.duration.is_empty()
            || opts.spawn_rate.is_empty()
            || opts.speed_mult.is_empty()
            || opts.direction.is_empty()
        {
            return Err(SettingsError::Invalid("empty story option list".to_string()));
        }
        check_positive("story duration", opts.duration.iter().map(|&d| d as f64))?;
        check_positive("story spawn rate", opts.spawn_rate.iter().copied())?;
        check_positive("story speed", opts.speed_mult.iter().map(|&s| s as f64))?;

        for (i, stage) in self.story.stages.iter().enumerate() {
            if stage.duration == 0 || stage.spawn_rate <= 0.0 || stage.speed_mult <= 0.0 {
                return Err(SettingsError::Invalid(format!(
                    "stage {} has a non-positive duration, spawn rate or speed",
                    i + 1
                )));
            }
        }

        if !(self.stage_clear_delay >= 0.0) {
            return Err(SettingsError::Invalid(
                "stage_clear_delay must be >= 0".to_string(),
            ));
        }
        if !(self.canvas.width > 0.0 && self.canvas.height > 0.0) {
            return Err(SettingsError::Invalid("canvas must have a positive size".to_string()));
        }
        Ok(())
    }
}

fn check_positive(what: &str, mut values: impl Iterator<Item = f64>) -> Result<(), SettingsError> {
    if values.any(|v| !(v > 0.0)) {
        return Err(SettingsError::Invalid(format!("{what} options must be positive")));
    }
    Ok(())
}
