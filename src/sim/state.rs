//! Session state and core simulation types
//!
//! One `Session` exists per playthrough. It is mutated only by the input
//! handler (`transition`) and the frame handler (`tick`).

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::BodyPoint;
use super::entity::{Effect, Fruit};
use super::landmark::Canvas;
use crate::consts::FINAL_STAGE;
use crate::settings::{FreeSettings, Settings, StageConfig, StoryConfig};

/// Current screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Screen {
    /// Title screen, mode selection
    #[serde(rename = "START")]
    Start,
    /// Free mode option editor
    #[serde(rename = "SETTINGS")]
    Settings,
    /// Story stage editor
    #[serde(rename = "STORY_CONFIG")]
    StoryConfig,
    /// Episode in progress
    #[serde(rename = "PLAYING")]
    Playing,
    /// Episode ended (free mode, story failure or full clear)
    #[serde(rename = "GAMEOVER")]
    GameOver,
    /// Story stage cleared, next stage starts shortly
    #[serde(rename = "STAGE_CLEAR")]
    StageClear,
}

impl Screen {
    pub const ALL: [Screen; 6] = [
        Screen::Start,
        Screen::Settings,
        Screen::StoryConfig,
        Screen::Playing,
        Screen::GameOver,
        Screen::StageClear,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Screen::Start => "START",
            Screen::Settings => "SETTINGS",
            Screen::StoryConfig => "STORY_CONFIG",
            Screen::Playing => "PLAYING",
            Screen::GameOver => "GAMEOVER",
            Screen::StageClear => "STAGE_CLEAR",
        }
    }
}

/// Game mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Mode {
    /// Single episode with the free settings
    #[default]
    Free,
    /// Five stages with target scores
    Story,
}

impl Mode {
    pub fn toggled(self) -> Self {
        match self {
            Mode::Free => Mode::Story,
            Mode::Story => Mode::Free,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Free => "FREE",
            Mode::Story => "STORY",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "FREE" => Some(Mode::Free),
            "STORY" => Some(Mode::Story),
            _ => None,
        }
    }
}

/// How the last episode ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameResult {
    /// Free mode timeout
    Free,
    /// Story stage cleared (not the last one)
    StageCleared,
    /// Final story stage cleared
    AllCleared,
    /// Story stage target missed
    Failed,
}

/// Runtime state of one episode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    pub score: u32,
    /// Clock time the episode started (seconds)
    pub started_at: f64,
    /// Duration, spawn interval, speed and direction in effect
    pub params: StageConfig,
    /// 0 in free mode
    pub target_score: u32,
    /// Active fruit in spawn order
    pub fruits: Vec<Fruit>,
    /// Active catch rings
    pub effects: Vec<Effect>,
    /// None until the first fruit of the episode spawns
    pub last_spawn_at: Option<f64>,
    /// Seconds left as of the last tick
    pub time_left: f64,
}

impl Episode {
    pub fn new(params: StageConfig, target_score: u32, now: f64) -> Self {
        Self {
            score: 0,
            started_at: now,
            params,
            target_score,
            fruits: Vec::new(),
            effects: Vec::new(),
            last_spawn_at: None,
            time_left: params.duration as f64,
        }
    }

    /// Seconds remaining at `now`, never negative
    pub fn remaining(&self, now: f64) -> f64 {
        let elapsed = now - self.started_at;
        (self.params.duration as f64 - elapsed).max(0.0)
    }

    /// Whether a new fruit is due at `now`
    pub fn spawn_due(&self, now: f64) -> bool {
        match self.last_spawn_at {
            None => true,
            Some(last) => now - last > self.params.spawn_rate,
        }
    }
}

impl Default for Episode {
    fn default() -> Self {
        Self::new(StageConfig::default(), 0, 0.0)
    }
}

/// Deferred STAGE_CLEAR -> PLAYING transition
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduledAdvance {
    pub fire_at: f64,
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct Session {
    screen: Screen,
    pub mode: Mode,
    pub free: FreeSettings,
    pub story: StoryConfig,
    /// Story stage being played or edited (0-based)
    pub current_stage: usize,
    /// Failed attempts at the current stage/run
    pub retry_count: u32,
    pub episode: Episode,
    /// Outcome of the last finished episode
    pub result: Option<GameResult>,
    /// Seconds between a stage clear and the next stage
    pub stage_clear_delay: f64,
    /// Interaction points seen in the most recent frame
    pub body: Vec<BodyPoint>,
    pending_advance: Option<ScheduledAdvance>,
    rng: Pcg32,
    next_id: u32,
}

impl Session {
    pub fn new(settings: &Settings) -> Self {
        Self {
            screen: Screen::Start,
            mode: Mode::Free,
            free: settings.free.clone(),
            story: settings.story.clone(),
            current_stage: 0,
            retry_count: 0,
            episode: Episode::default(),
            result: None,
            stage_clear_delay: settings.stage_clear_delay,
            body: Vec::new(),
            pending_advance: None,
            rng: Pcg32::seed_from_u64(settings.seed),
            next_id: 1,
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// Switch screens. Leaving STAGE_CLEAR cancels the pending stage advance.
    pub(crate) fn set_screen(&mut self, screen: Screen) {
        if self.screen == screen {
            return;
        }
        if self.screen == Screen::StageClear && self.pending_advance.take().is_some() {
            log::debug!("Cancelled pending stage advance");
        }
        log::info!("Screen {} -> {}", self.screen.as_str(), screen.as_str());
        self.screen = screen;
    }

    /// Story stage index, clamped into range
    pub fn stage_index(&self) -> usize {
        debug_assert!(
            self.current_stage <= FINAL_STAGE,
            "stage index {} out of range",
            self.current_stage
        );
        self.current_stage.min(FINAL_STAGE)
    }

    pub fn pending_advance(&self) -> Option<ScheduledAdvance> {
        self.pending_advance
    }

    pub(crate) fn schedule_advance(&mut self, fire_at: f64) {
        self.pending_advance = Some(ScheduledAdvance { fire_at });
    }

    /// Consume the pending advance if it is due at `now`
    pub(crate) fn take_due_advance(&mut self, now: f64) -> bool {
        match self.pending_advance {
            Some(task) if self.screen == Screen::StageClear && now >= task.fire_at => {
                self.pending_advance = None;
                true
            }
            _ => false,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Spawn one fruit with the episode's speed and direction
    pub fn spawn_fruit(&mut self, canvas: Canvas, now: f64) {
        let id = self.next_entity_id();
        let params = self.episode.params;
        let fruit = Fruit::spawn(id, &mut self.rng, canvas, params.speed_mult, params.direction);
        log::debug!("Spawned fruit {} at ({}, {})", id, fruit.pos.x, fruit.pos.y);
        self.episode.fruits.push(fruit);
        self.episode.last_spawn_at = Some(now);
    }
}
