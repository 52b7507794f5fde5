//! Background music
//!
//! The game only needs a looping track that restarts with each episode and
//! pauses when it ends. Playback itself belongs to the host (browser audio
//! element, native mixer); failures there are logged and otherwise ignored.

use thiserror::Error;

/// Errors a music backend may report
#[derive(Debug, Error)]
pub enum AudioError {
    /// Host refused playback (e.g. autoplay policy before a user gesture)
    #[error("playback blocked: {0}")]
    Blocked(String),
    #[error("audio device unavailable")]
    Unavailable,
    #[error("audio backend error: {0}")]
    Backend(String),
}

/// Host playback backend for the music track
pub trait MusicPlayer {
    /// Seek to the start and play
    fn play_from_start(&mut self) -> Result<(), AudioError>;
    fn pause(&mut self);
}

/// Backend that plays nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NullPlayer;

impl MusicPlayer for NullPlayer {
    fn play_from_start(&mut self) -> Result<(), AudioError> {
        Ok(())
    }

    fn pause(&mut self) {}
}

/// Audio manager for the game
pub struct AudioManager {
    player: Option<Box<dyn MusicPlayer>>,
    muted: bool,
    playing: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::disabled()
    }
}

impl AudioManager {
    pub fn new(player: Box<dyn MusicPlayer>) -> Self {
        Self {
            player: Some(player),
            muted: false,
            playing: false,
        }
    }

    /// Manager without a backend - every call is a no-op
    pub fn disabled() -> Self {
        Self {
            player: None,
            muted: false,
            playing: false,
        }
    }

    /// Mute/unmute music. Muting pauses a playing track.
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        if muted {
            self.stop_music();
        }
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Whether the last start request succeeded and has not been stopped
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Restart the track from the beginning
    pub fn start_music(&mut self) {
        if self.muted {
            return;
        }
        let Some(player) = self.player.as_mut() else {
            return;
        };
        match player.play_from_start() {
            Ok(()) => self.playing = true,
            Err(e) => {
                self.playing = false;
                log::warn!("Music playback failed: {e}");
            }
        }
    }

    pub fn stop_music(&mut self) {
        if let Some(player) = self.player.as_mut() {
            player.pause();
        }
        self.playing = false;
    }
}
