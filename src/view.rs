//! Render snapshot
//!
//! `FrameView` is everything the rendering collaborator needs to draw one
//! frame: which screen is up, its text, and the entities to overlay on the
//! camera image. It is plain data and serializes to JSON for hosts that render
//! outside Rust.

use glam::Vec2;
use serde::Serialize;

use crate::consts::STAGE_COUNT;
use crate::highscores::HighScores;
use crate::sim::{
    BodyPart, BodyPoint, Canvas, Effect, Fruit, GameResult, Mode, Screen, Session, countdown,
    is_low_time,
};

/// Radius of the interaction point markers (pixels)
pub const MARKER_RADIUS: f32 = 15.0;

/// In-game heads-up display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hud {
    pub score: u32,
    /// Whole seconds remaining
    pub time_left: u32,
    /// Countdown should be highlighted
    pub low_time: bool,
    /// "Stage: n/5", story mode only
    pub stage: Option<String>,
    /// Story mode only
    pub target: Option<u32>,
}

impl Hud {
    /// HUD text lines in display order
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!("Time: {}", self.time_left),
            format!("Score: {}", self.score),
        ];
        lines.extend(self.stage.clone());
        if let Some(target) = self.target {
            lines.push(format!("Target: {target}"));
        }
        lines
    }
}

/// Interaction point marker for the skeleton overlay
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Marker {
    pub part: BodyPart,
    pub pos: Vec2,
    pub color: &'static str,
}

impl Marker {
    fn from_point(point: &BodyPoint) -> Self {
        let color = match point.part {
            BodyPart::Head => "blue",
            BodyPart::LeftWrist | BodyPart::RightWrist => "lime",
            BodyPart::LeftFoot | BodyPart::RightFoot => "red",
        };
        Self {
            part: point.part,
            pos: point.pos,
            color,
        }
    }
}

/// Everything drawn for one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameView {
    pub screen: Screen,
    pub mode: Mode,
    pub canvas: Canvas,
    /// Title screen mode line, e.g. "MODE: FREE"
    pub mode_label: Option<String>,
    pub hud: Option<Hud>,
    /// Heading of the result screens
    pub banner: Option<String>,
    /// Lines under the banner
    pub details: Vec<String>,
    /// "< Stage n >" on the story editor
    pub stage_selector: Option<String>,
    /// Option listing on the editor screens
    pub rows: Vec<String>,
    /// Leaderboard on the game over screen
    pub leaderboard: Vec<String>,
    pub fruits: Vec<Fruit>,
    pub effects: Vec<Effect>,
    /// Only populated while playing
    pub markers: Vec<Marker>,
}

impl FrameView {
    pub fn capture(session: &Session, high_scores: &HighScores, canvas: Canvas) -> Self {
        let screen = session.screen();
        let episode = &session.episode;
        let mut view = Self {
            screen,
            mode: session.mode,
            canvas,
            mode_label: None,
            hud: None,
            banner: None,
            details: Vec::new(),
            stage_selector: None,
            rows: Vec::new(),
            leaderboard: Vec::new(),
            fruits: episode.fruits.clone(),
            effects: episode.effects.clone(),
            markers: Vec::new(),
        };

        match screen {
            Screen::Start => {
                view.mode_label = Some(format!("MODE: {}", session.mode.as_str()));
            }
            Screen::Settings => {
                view.rows = session.free.rows();
            }
            Screen::StoryConfig => {
                let stage = session.stage_index();
                view.stage_selector = Some(format!("< Stage {} >", stage + 1));
                view.rows = session.story.rows(stage);
            }
            Screen::Playing => {
                let story = session.mode == Mode::Story;
                view.hud = Some(Hud {
                    score: episode.score,
                    time_left: countdown(episode.time_left),
                    low_time: is_low_time(episode.time_left),
                    stage: story
                        .then(|| format!("Stage: {}/{}", session.stage_index() + 1, STAGE_COUNT)),
                    target: story.then_some(episode.target_score),
                });
                view.markers = session.body.iter().map(Marker::from_point).collect();
            }
            Screen::GameOver => {
                view.banner = Some(
                    match session.result {
                        Some(GameResult::AllCleared) => "ALL STAGES CLEARED!",
                        Some(GameResult::Failed) => "STAGE FAILED...",
                        _ => "GAME OVER",
                    }
                    .to_string(),
                );
                view.details.push(format!("Final Score: {}", episode.score));
                if session.result == Some(GameResult::Failed) {
                    view.details.push(format!("Target was: {}", episode.target_score));
                }
                view.leaderboard = high_scores.rows();
            }
            Screen::StageClear => {
                // current_stage already points at the next stage
                view.banner = Some(format!("STAGE {} CLEARED!", session.current_stage));
            }
        }

        view
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
