//! Screen state machine
//!
//! `apply_action` is the transition function: it mutates the session for one
//! validated action and returns the side effects for the driver to carry out.
//! Nothing here touches audio or telemetry directly.

use super::input::{Action, parse_key};
use super::state::{Episode, GameResult, Mode, Screen, Session};
use crate::consts::FINAL_STAGE;
use crate::telemetry::TelemetryEvent;

/// Work the driver performs on behalf of the state machine
#[derive(Debug, Clone, PartialEq)]
pub enum SideEffect {
    /// Restart background music from the beginning
    PlayMusic,
    StopMusic,
    Telemetry(TelemetryEvent),
    /// An episode timed out with this score
    EpisodeFinished {
        mode: Mode,
        /// 1-based story stage, None in free mode
        stage: Option<usize>,
        score: u32,
    },
}

/// Validate a raw key and apply it.
///
/// Unrecognized keys produce a single `erroneous_input` event and leave the
/// session untouched.
pub fn handle_key(session: &mut Session, raw_key: &str, now: f64) -> Vec<SideEffect> {
    let screen = session.screen();
    match parse_key(screen, raw_key) {
        Ok(action) => {
            let mut effects = vec![SideEffect::Telemetry(TelemetryEvent::KeyPress {
                key: raw_key.to_lowercase(),
                state: screen,
            })];
            effects.extend(apply_action(session, action, now));
            effects
        }
        Err(err) => {
            log::debug!("Unexpected key {:?} on {}", err.key, screen.as_str());
            vec![SideEffect::Telemetry(TelemetryEvent::from(&err))]
        }
    }
}

/// The editor screen for a mode
pub fn config_screen(mode: Mode) -> Screen {
    match mode {
        Mode::Free => Screen::Settings,
        Mode::Story => Screen::StoryConfig,
    }
}

/// Apply one action to the session
pub fn apply_action(session: &mut Session, action: Action, now: f64) -> Vec<SideEffect> {
    let screen = session.screen();
    match (screen, action) {
        (Screen::Playing, Action::Quit) => {
            session.episode.fruits.clear();
            session.episode.effects.clear();
            session.set_screen(Screen::Start);
            vec![SideEffect::StopMusic]
        }
        (_, Action::Quit) => {
            session.set_screen(Screen::Start);
            Vec::new()
        }

        (Screen::Start, Action::Start) => start_game(session, false, now),
        (Screen::Start, Action::ToggleMode) => {
            session.mode = session.mode.toggled();
            log::info!("Mode: {}", session.mode.as_str());
            Vec::new()
        }
        (Screen::Start | Screen::GameOver, Action::Configure) => {
            session.set_screen(config_screen(session.mode));
            Vec::new()
        }

        (Screen::Settings | Screen::StoryConfig, Action::Back | Action::TogglePane) => {
            session.set_screen(Screen::Start);
            Vec::new()
        }
        (Screen::Settings, Action::Cycle(slot)) => {
            session.free.cycle(slot);
            Vec::new()
        }
        (Screen::StoryConfig, Action::Cycle(slot)) => {
            let stage = session.stage_index();
            session.story.cycle(stage, slot);
            Vec::new()
        }
        (Screen::StoryConfig, Action::PrevStage) => {
            session.current_stage = session.current_stage.saturating_sub(1);
            Vec::new()
        }
        (Screen::StoryConfig, Action::NextStage) => {
            session.current_stage = (session.current_stage + 1).min(FINAL_STAGE);
            Vec::new()
        }

        (Screen::GameOver, Action::Retry) => retry(session, now),

        (screen, action) => {
            log::debug!("Ignored {:?} on {}", action, screen.as_str());
            Vec::new()
        }
    }
}

/// Begin an episode.
///
/// A fresh start from the title screen resets the retry count, and in story
/// mode the stage. `restart` keeps both (stage advance or retry).
pub fn start_game(session: &mut Session, restart: bool, now: f64) -> Vec<SideEffect> {
    if !restart && session.screen() == Screen::Start {
        session.retry_count = 0;
        if session.mode == Mode::Story {
            session.current_stage = 0;
        }
    }

    let (params, target) = match session.mode {
        Mode::Free => (session.free.selected(), 0),
        Mode::Story => {
            let cfg = *session.story.stage(session.stage_index());
            (cfg, cfg.target_score())
        }
    };

    session.episode = Episode::new(params, target, now);
    session.result = None;
    session.set_screen(Screen::Playing);
    log::info!(
        "Episode start: mode={} stage={} duration={}s spawn={}s speed={}x dir={} target={}",
        session.mode.as_str(),
        session.current_stage + 1,
        params.duration,
        params.spawn_rate,
        params.speed_mult,
        params.direction,
        target
    );
    vec![SideEffect::PlayMusic]
}

/// Replay from the game over screen
pub fn retry(session: &mut Session, now: f64) -> Vec<SideEffect> {
    if session.result == Some(GameResult::AllCleared) {
        // Completed story: start a new run from stage 1
        session.current_stage = 0;
        session.retry_count = 0;
    } else {
        session.retry_count += 1;
    }
    start_game(session, true, now)
}

/// End-of-episode policy, run when the clock reaches zero
pub fn end_episode(session: &mut Session, now: f64) -> Vec<SideEffect> {
    let score = session.episode.score;
    let target = session.episode.target_score;
    let stage = session.stage_index();
    let retry_count = session.retry_count;

    let mut effects = vec![
        SideEffect::StopMusic,
        SideEffect::EpisodeFinished {
            mode: session.mode,
            stage: (session.mode == Mode::Story).then_some(stage + 1),
            score,
        },
    ];

    let event = match session.mode {
        Mode::Free => {
            session.result = Some(GameResult::Free);
            session.set_screen(Screen::GameOver);
            TelemetryEvent::GameOver {
                mode: Mode::Free,
                result: None,
                score,
                duration: Some(session.episode.params.duration),
                stage: None,
                final_stage: None,
                target: None,
                retry_count,
            }
        }
        Mode::Story if score >= target && stage < FINAL_STAGE => {
            session.retry_count = 0;
            session.current_stage = stage + 1;
            session.result = Some(GameResult::StageCleared);
            session.set_screen(Screen::StageClear);
            session.schedule_advance(now + session.stage_clear_delay);
            log::info!("Stage {} cleared ({score}/{target})", stage + 1);
            TelemetryEvent::StageClear {
                mode: Mode::Story,
                stage: stage + 1,
                score,
                target,
                retry_count,
            }
        }
        Mode::Story if score >= target => {
            session.result = Some(GameResult::AllCleared);
            session.set_screen(Screen::GameOver);
            log::info!("All stages cleared ({score})");
            TelemetryEvent::GameOver {
                mode: Mode::Story,
                result: Some(GameResult::AllCleared),
                score,
                duration: None,
                stage: None,
                final_stage: Some(stage + 1),
                target: None,
                retry_count,
            }
        }
        Mode::Story => {
            session.result = Some(GameResult::Failed);
            session.set_screen(Screen::GameOver);
            log::info!("Stage {} failed ({score}/{target})", stage + 1);
            TelemetryEvent::GameOver {
                mode: Mode::Story,
                result: Some(GameResult::Failed),
                score,
                duration: None,
                stage: Some(stage + 1),
                final_stage: None,
                target: Some(target),
                retry_count,
            }
        }
    };

    effects.push(SideEffect::Telemetry(event));
    effects
}
