//! Game driver
//!
//! Owns the session and the host-side collaborators. The simulation returns
//! side effects as data; this is the only place they are carried out.

use crate::audio::AudioManager;
use crate::highscores::HighScores;
use crate::settings::Settings;
use crate::sim::{Canvas, Landmark, Session, SideEffect, TickInput, handle_key, tick};
use crate::telemetry::{NullSink, TelemetrySink};
use crate::view::FrameView;

/// One running game instance
pub struct Game {
    session: Session,
    audio: AudioManager,
    telemetry: Box<dyn TelemetrySink>,
    high_scores: HighScores,
    canvas: Canvas,
    /// Leaderboard rank of the last finished episode
    last_rank: Option<usize>,
}

impl Game {
    pub fn new(
        settings: &Settings,
        audio: AudioManager,
        telemetry: Box<dyn TelemetrySink>,
    ) -> Self {
        log::info!("Game initialized with seed: {}", settings.seed);
        Self {
            session: Session::new(settings),
            audio,
            telemetry,
            high_scores: HighScores::new(),
            canvas: settings.canvas,
            last_rank: None,
        }
    }

    /// Game with no audio and telemetry discarded
    pub fn headless(settings: &Settings) -> Self {
        Self::new(settings, AudioManager::disabled(), Box::new(NullSink))
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn high_scores(&self) -> &HighScores {
        &self.high_scores
    }

    pub fn audio(&self) -> &AudioManager {
        &self.audio
    }

    pub fn audio_mut(&mut self) -> &mut AudioManager {
        &mut self.audio
    }

    /// Leaderboard rank of the last finished episode, if it placed
    pub fn last_rank(&self) -> Option<usize> {
        self.last_rank
    }

    /// Handle a key event at clock time `now`
    pub fn handle_key(&mut self, key: &str, now: f64) {
        let effects = handle_key(&mut self.session, key, now);
        self.dispatch(effects, now);
    }

    /// Handle one pose-detector frame. `landmarks` is None when nobody was
    /// detected.
    pub fn on_frame(&mut self, landmarks: Option<&[Landmark]>, canvas: Canvas, now: f64) {
        self.canvas = canvas;
        let input = TickInput { landmarks, canvas };
        let effects = tick(&mut self.session, &input, now);
        self.dispatch(effects, now);
    }

    /// Snapshot of everything the renderer draws this frame
    pub fn view(&self) -> FrameView {
        FrameView::capture(&self.session, &self.high_scores, self.canvas)
    }

    fn dispatch(&mut self, effects: Vec<SideEffect>, now: f64) {
        for effect in effects {
            match effect {
                SideEffect::PlayMusic => self.audio.start_music(),
                SideEffect::StopMusic => self.audio.stop_music(),
                SideEffect::Telemetry(event) => self.telemetry.send(&event),
                SideEffect::EpisodeFinished { mode, stage, score } => {
                    self.last_rank = self.high_scores.add_score(score, mode, stage, now);
                    if let Some(rank) = self.last_rank {
                        log::info!("New high score #{rank}: {score}");
                    }
                }
            }
        }
    }
}
