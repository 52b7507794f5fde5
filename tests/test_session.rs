use fruit_catch::audio::AudioManager;
use fruit_catch::sim::*;
use fruit_catch::telemetry::{MemorySink, TelemetryEvent};
use fruit_catch::{Game, Settings};

use serde_json::json;

const FPS: f64 = 30.0;
const CANVAS: Canvas = Canvas::new(1280.0, 720.0);

fn recording_game() -> (Game, MemorySink) {
    let sink = MemorySink::new();
    let game = Game::new(
        &Settings::default(),
        AudioManager::disabled(),
        Box::new(sink.clone()),
    );
    (game, sink)
}

fn story_session() -> Session {
    let mut s = Session::new(&Settings::default());
    handle_key(&mut s, "m", 0.0);
    handle_key(&mut s, "s", 0.0);
    assert_eq!(s.screen(), Screen::Playing);
    s
}

fn telemetry(effects: &[SideEffect]) -> Vec<TelemetryEvent> {
    effects
        .iter()
        .filter_map(|e| match e {
            SideEffect::Telemetry(ev) => Some(ev.clone()),
            _ => None,
        })
        .collect()
}

fn idle() -> TickInput<'static> {
    TickInput {
        landmarks: None,
        canvas: CANVAS,
    }
}

/// Head-only pose over the oldest fruit on screen
fn head_over_oldest(game: &Game) -> Option<Vec<Landmark>> {
    let fruit = game.session().episode.fruits.first()?;
    let mut pose = vec![Landmark::default(); 33];
    pose[0] = Landmark::new(fruit.pos.x / CANVAS.width, fruit.pos.y / CANVAS.height, 0.9);
    Some(pose)
}

// ── free mode ─────────────────────────────────────────────────────────────────

#[test]
fn free_timeout_without_catches() {
    let (mut game, sink) = recording_game();
    // 30 s duration, 1.5 s spawn interval
    for key in ["p", "1", "1", "1", "2", "2", "2", "b", "s"] {
        game.handle_key(key, 0.0);
    }
    assert_eq!(game.session().screen(), Screen::Playing);
    assert_eq!(game.session().episode.params.duration, 30);
    assert_eq!(game.session().episode.params.spawn_rate, 1.5);

    let mut frame = 0u32;
    while game.session().screen() == Screen::Playing {
        game.on_frame(None, CANVAS, frame as f64 / FPS);
        frame += 1;
        assert!(frame <= 30 * 31, "episode never ended");
    }
    assert_eq!(game.session().screen(), Screen::GameOver);
    assert_eq!(game.session().result, Some(GameResult::Free));

    let game_overs: Vec<_> = sink
        .events()
        .into_iter()
        .filter(|e| matches!(e, TelemetryEvent::GameOver { .. }))
        .collect();
    assert_eq!(game_overs.len(), 1);
    let value: serde_json::Value =
        serde_json::from_str(&game_overs[0].to_json().unwrap()).unwrap();
    assert_eq!(
        value,
        json!({
            "type": "game_over",
            "mode": "FREE",
            "score": 0,
            "duration": 30,
            "retryCount": 0,
        })
    );
    assert!(game.high_scores().is_empty());
}

#[test]
fn free_catches_reach_leaderboard() {
    let (mut game, _sink) = recording_game();
    game.handle_key("s", 0.0);
    let mut frame = 0u32;
    while game.session().screen() == Screen::Playing {
        let pose = head_over_oldest(&game);
        game.on_frame(pose.as_deref(), CANVAS, frame as f64 / FPS);
        frame += 1;
    }
    let score = game.session().episode.score;
    assert!(score > 0);
    // Head catches are worth 3
    assert_eq!(score % 3, 0);
    assert_eq!(game.high_scores().top_score(), Some(score));
    assert_eq!(game.last_rank(), Some(1));
}

// ── story mode ────────────────────────────────────────────────────────────────

#[test]
fn story_stage_one_clear() {
    let mut s = story_session();
    assert_eq!(s.episode.target_score, 36);
    s.episode.score = 40;

    let effects = tick(&mut s, &idle(), 30.0);
    assert_eq!(s.screen(), Screen::StageClear);
    assert_eq!(s.current_stage, 1);
    assert_eq!(s.retry_count, 0);

    let events = telemetry(&effects);
    assert_eq!(events.len(), 1);
    let value: serde_json::Value = serde_json::from_str(&events[0].to_json().unwrap()).unwrap();
    assert_eq!(
        value,
        json!({
            "type": "stage_clear",
            "mode": "STORY",
            "stage": 1,
            "score": 40,
            "target": 36,
            "retryCount": 0,
        })
    );

    // Next stage starts after the delay
    tick(&mut s, &idle(), 33.0);
    assert_eq!(s.screen(), Screen::Playing);
    assert_eq!(s.episode.params, s.story.stages[1]);
}

#[test]
fn story_failure_and_retry_counting() {
    let mut s = story_session();
    let effects = tick(&mut s, &idle(), 30.0);
    assert_eq!(s.screen(), Screen::GameOver);
    assert_eq!(s.result, Some(GameResult::Failed));
    assert_eq!(
        telemetry(&effects),
        vec![TelemetryEvent::GameOver {
            mode: Mode::Story,
            result: Some(GameResult::Failed),
            score: 0,
            duration: None,
            stage: Some(1),
            final_stage: None,
            target: Some(36),
            retry_count: 0,
        }]
    );

    handle_key(&mut s, "r", 31.0);
    assert_eq!(s.retry_count, 1);
    assert_eq!(s.current_stage, 0);
    let effects = tick(&mut s, &idle(), 61.0);
    match &telemetry(&effects)[0] {
        TelemetryEvent::GameOver { retry_count, .. } => assert_eq!(*retry_count, 1),
        other => panic!("unexpected event {other:?}"),
    }

    handle_key(&mut s, "r", 62.0);
    assert_eq!(s.retry_count, 2);
}

#[test]
fn synthetic_player_clears_first_stage() {
    let (mut game, sink) = recording_game();
    game.handle_key("m", 0.0);
    game.handle_key("s", 0.0);
    let mut frame = 0u32;
    while game.session().screen() == Screen::Playing {
        let pose = head_over_oldest(&game);
        game.on_frame(pose.as_deref(), CANVAS, frame as f64 / FPS);
        frame += 1;
    }
    assert_eq!(game.session().screen(), Screen::StageClear);
    let cleared = sink
        .events()
        .into_iter()
        .find(|e| matches!(e, TelemetryEvent::StageClear { .. }));
    match cleared {
        Some(TelemetryEvent::StageClear {
            stage,
            score,
            target,
            ..
        }) => {
            assert_eq!(stage, 1);
            assert_eq!(target, 36);
            assert!(score >= target);
        }
        other => panic!("expected stage_clear, got {other:?}"),
    }
    assert_eq!(
        game.view().banner.as_deref(),
        Some("STAGE 1 CLEARED!")
    );
}

#[test]
fn leaving_stage_clear_cancels_advance() {
    let mut s = story_session();
    s.episode.score = 40;
    tick(&mut s, &idle(), 30.0);
    assert!(s.pending_advance().is_some());

    handle_key(&mut s, "Escape", 31.0);
    assert_eq!(s.screen(), Screen::Start);
    assert!(s.pending_advance().is_none());

    let effects = tick(&mut s, &idle(), 40.0);
    assert!(effects.is_empty());
    assert_eq!(s.screen(), Screen::Start);
}

// ── input handling ────────────────────────────────────────────────────────────

#[test]
fn quit_at_start_is_idempotent() {
    let mut s = Session::new(&Settings::default());
    for _ in 0..3 {
        let effects = handle_key(&mut s, "q", 0.0);
        assert_eq!(s.screen(), Screen::Start);
        assert!(!effects.contains(&SideEffect::StopMusic));
    }
    assert_eq!(s.mode, Mode::Free);
    assert_eq!(s.retry_count, 0);
}

#[test]
fn unexpected_key_while_playing() {
    let (mut game, sink) = recording_game();
    game.handle_key("s", 0.0);
    sink.clear();

    game.handle_key("x", 1.0);
    assert_eq!(game.session().screen(), Screen::Playing);
    let value: serde_json::Value =
        serde_json::from_str(&sink.events()[0].to_json().unwrap()).unwrap();
    assert_eq!(
        value,
        json!({
            "type": "erroneous_input",
            "key": "x",
            "state": "PLAYING",
            "expected": ["q", "escape"],
            "description": "User pressed unexpected key.",
        })
    );
    assert_eq!(sink.events().len(), 1);
}

#[test]
fn every_screen_rejects_unknown_keys() {
    let mut s = Session::new(&Settings::default());
    for screen in Screen::ALL {
        let err = parse_key(screen, "z").unwrap_err();
        assert_eq!(err.expected, expected_keys(screen));
    }
    let before = s.clone();
    let effects = handle_key(&mut s, "z", 0.0);
    assert_eq!(effects.len(), 1);
    assert_eq!(s.screen(), before.screen());
    assert_eq!(s.mode, before.mode);
    assert_eq!(s.free, before.free);
}
