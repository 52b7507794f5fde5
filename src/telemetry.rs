//! Gameplay telemetry
//!
//! Structured events describing misinputs and episode outcomes. Delivery is
//! best effort: sinks never report failures back to the game.

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::sim::{GameResult, InputError, Mode, Screen};

/// A telemetry event, serialized with a `type` tag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TelemetryEvent {
    /// A key with no meaning on the current screen
    ErroneousInput {
        key: String,
        state: Screen,
        expected: Vec<String>,
        description: String,
    },
    /// A recognized key press
    KeyPress { key: String, state: Screen },
    /// An episode ended on the game over screen
    GameOver {
        mode: Mode,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        result: Option<GameResult>,
        score: u32,
        /// Free mode duration (seconds)
        #[serde(default, skip_serializing_if = "Option::is_none")]
        duration: Option<u32>,
        /// 1-based story stage that was failed
        #[serde(default, skip_serializing_if = "Option::is_none")]
        stage: Option<usize>,
        /// 1-based story stage that completed the run
        #[serde(default, rename = "finalStage", skip_serializing_if = "Option::is_none")]
        final_stage: Option<usize>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        target: Option<u32>,
        #[serde(rename = "retryCount")]
        retry_count: u32,
    },
    /// A story stage was cleared and the next one is coming
    StageClear {
        mode: Mode,
        /// 1-based stage that was cleared
        stage: usize,
        score: u32,
        target: u32,
        #[serde(rename = "retryCount")]
        retry_count: u32,
    },
}

impl From<&InputError> for TelemetryEvent {
    fn from(err: &InputError) -> Self {
        TelemetryEvent::ErroneousInput {
            key: err.key.clone(),
            state: err.screen,
            expected: err.expected.iter().map(|k| k.to_string()).collect(),
            description: InputError::DESCRIPTION.to_string(),
        }
    }
}

impl TelemetryEvent {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Receiver for telemetry events
pub trait TelemetrySink {
    fn send(&mut self, event: &TelemetryEvent);
}

/// Discards every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl TelemetrySink for NullSink {
    fn send(&mut self, _event: &TelemetryEvent) {}
}

/// Writes each event as a JSON line to the `telemetry` log target
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl TelemetrySink for LogSink {
    fn send(&mut self, event: &TelemetryEvent) {
        match event.to_json() {
            Ok(json) => log::info!(target: "telemetry", "{json}"),
            Err(e) => log::warn!("Dropped telemetry event: {e}"),
        }
    }
}

/// Keeps events in memory; clones share the same buffer
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    events: Rc<RefCell<Vec<TelemetryEvent>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything received so far
    pub fn events(&self) -> Vec<TelemetryEvent> {
        self.events.borrow().clone()
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }
}

impl TelemetrySink for MemorySink {
    fn send(&mut self, event: &TelemetryEvent) {
        self.events.borrow_mut().push(event.clone());
    }
}
