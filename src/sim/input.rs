//! Keyboard input validation
//!
//! Each screen recognizes a fixed set of keys. Anything else is an input error
//! which is reported but never changes state.

use serde::{Deserialize, Serialize};

use super::state::Screen;
use crate::settings::OptionSlot;

/// A validated user action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Start an episode from the title screen
    Start,
    /// Open the settings screen for the current mode
    Configure,
    /// Flip between free and story mode
    ToggleMode,
    /// Leave an editor screen
    Back,
    /// Leave an editor screen via the pane key
    TogglePane,
    /// Cycle one option on an editor screen
    Cycle(OptionSlot),
    PrevStage,
    NextStage,
    /// Replay after a game over
    Retry,
    /// Return to the title screen
    Quit,
}

const START_KEYS: &[&str] = &["s", "p", "m", "q", "escape"];
const SETTINGS_KEYS: &[&str] = &["1", "2", "3", "4", "b", "p", "q", "escape"];
const STORY_CONFIG_KEYS: &[&str] = &[
    "1", "2", "3", "4", "b", "p", ",", ".", "<", ">", "q", "escape",
];
const PLAYING_KEYS: &[&str] = &["q", "escape"];
const GAME_OVER_KEYS: &[&str] = &["r", "p", "q", "escape"];
const STAGE_CLEAR_KEYS: &[&str] = &["q", "escape"];

/// Keys recognized on a screen
pub fn expected_keys(screen: Screen) -> &'static [&'static str] {
    match screen {
        Screen::Start => START_KEYS,
        Screen::Settings => SETTINGS_KEYS,
        Screen::StoryConfig => STORY_CONFIG_KEYS,
        Screen::Playing => PLAYING_KEYS,
        Screen::GameOver => GAME_OVER_KEYS,
        Screen::StageClear => STAGE_CLEAR_KEYS,
    }
}

/// A key that means nothing on the current screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputError {
    /// Normalized (lowercase) key
    pub key: String,
    pub screen: Screen,
    pub expected: &'static [&'static str],
}

impl InputError {
    pub const DESCRIPTION: &'static str = "User pressed unexpected key.";
}

/// Normalize a raw key identifier (keys are case-insensitive)
pub fn normalize_key(raw: &str) -> String {
    raw.to_lowercase()
}

/// Map a raw key to an action on `screen`
pub fn parse_key(screen: Screen, raw: &str) -> Result<Action, InputError> {
    let key = normalize_key(raw);
    let action = match (screen, key.as_str()) {
        (_, "q" | "escape") => Some(Action::Quit),
        (Screen::Start, "s") => Some(Action::Start),
        (Screen::Start, "p") => Some(Action::Configure),
        (Screen::Start, "m") => Some(Action::ToggleMode),
        (Screen::Settings | Screen::StoryConfig, "b") => Some(Action::Back),
        (Screen::Settings | Screen::StoryConfig, "p") => Some(Action::TogglePane),
        (Screen::Settings | Screen::StoryConfig, k) => single_char(k)
            .and_then(OptionSlot::from_digit)
            .map(Action::Cycle)
            .or_else(|| match (screen, k) {
                (Screen::StoryConfig, "," | "<") => Some(Action::PrevStage),
                (Screen::StoryConfig, "." | ">") => Some(Action::NextStage),
                _ => None,
            }),
        (Screen::GameOver, "r") => Some(Action::Retry),
        (Screen::GameOver, "p") => Some(Action::Configure),
        _ => None,
    };

    action.ok_or_else(|| InputError {
        key,
        screen,
        expected: expected_keys(screen),
    })
}

fn single_char(s: &str) -> Option<char> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_keys() {
        assert_eq!(parse_key(Screen::Start, "S"), Ok(Action::Start));
        assert_eq!(parse_key(Screen::Start, "p"), Ok(Action::Configure));
        assert_eq!(parse_key(Screen::Start, "M"), Ok(Action::ToggleMode));
        assert_eq!(parse_key(Screen::Start, "Escape"), Ok(Action::Quit));
    }

    #[test]
    fn test_editor_keys() {
        assert_eq!(
            parse_key(Screen::Settings, "3"),
            Ok(Action::Cycle(OptionSlot::SpeedMult))
        );
        assert_eq!(parse_key(Screen::Settings, "b"), Ok(Action::Back));
        assert!(parse_key(Screen::Settings, ",").is_err());
        assert!(parse_key(Screen::Settings, "5").is_err());
        assert_eq!(parse_key(Screen::StoryConfig, "<"), Ok(Action::PrevStage));
        assert_eq!(parse_key(Screen::StoryConfig, "."), Ok(Action::NextStage));
        assert_eq!(parse_key(Screen::StoryConfig, "P"), Ok(Action::TogglePane));
    }

    #[test]
    fn test_invalid_key_reports_expected() {
        let err = parse_key(Screen::Playing, "S").unwrap_err();
        assert_eq!(err.key, "s");
        assert_eq!(err.screen, Screen::Playing);
        assert_eq!(err.expected, &["q", "escape"]);

        let err = parse_key(Screen::GameOver, "s").unwrap_err();
        assert_eq!(err.expected, &["r", "p", "q", "escape"]);
    }

    #[test]
    fn test_expected_keys_match_parser() {
        // Every listed key parses, and the lists are the only keys that do
        let probe = [
            "s", "p", "m", "q", "escape", "1", "2", "3", "4", "5", "b", ",", ".", "<", ">", "r",
            "x", " ", "enter", "11",
        ];
        for screen in Screen::ALL {
            for key in probe {
                let listed = expected_keys(screen).contains(&key);
                assert_eq!(
                    parse_key(screen, key).is_ok(),
                    listed,
                    "{key:?} on {screen:?}"
                );
            }
        }
    }
}
