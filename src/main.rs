//! Fruit Catch entry point
//!
//! The pose detector and renderer live in the host page. Natively this runs a
//! scripted headless session: a synthetic player whose head follows the oldest
//! fruit on screen, driven by a fixed 30 FPS clock.

#[cfg(not(target_arch = "wasm32"))]
use fruit_catch::{
    Game, Settings,
    audio::AudioManager,
    sim::{Canvas, Landmark, Screen},
    telemetry::LogSink,
};

#[cfg(not(target_arch = "wasm32"))]
const FPS: f64 = 30.0;

/// Frames before a scripted phase gives up (10 minutes of game time)
#[cfg(not(target_arch = "wasm32"))]
const MAX_FRAMES: u64 = 30 * 600;

/// Landmark count of a full pose frame
#[cfg(not(target_arch = "wasm32"))]
const POSE_LANDMARKS: usize = 33;

/// Fixed-step clock
#[cfg(not(target_arch = "wasm32"))]
#[derive(Default)]
struct Clock {
    frame: u64,
}

#[cfg(not(target_arch = "wasm32"))]
impl Clock {
    fn now(&self) -> f64 {
        self.frame as f64 / FPS
    }
}

/// Pose with only the head visible, placed over the oldest fruit
#[cfg(not(target_arch = "wasm32"))]
fn synthetic_pose(game: &Game, canvas: Canvas) -> Option<Vec<Landmark>> {
    let fruit = game.session().episode.fruits.first()?;
    let mut pose = vec![Landmark::default(); POSE_LANDMARKS];
    pose[0] = Landmark::new(fruit.pos.x / canvas.width, fruit.pos.y / canvas.height, 0.99);
    Some(pose)
}

/// Feed frames until `done` holds, returning whether it did
#[cfg(not(target_arch = "wasm32"))]
fn run_until(
    game: &mut Game,
    clock: &mut Clock,
    canvas: Canvas,
    done: impl Fn(&Game) -> bool,
) -> bool {
    for _ in 0..MAX_FRAMES {
        if done(game) {
            return true;
        }
        let pose = synthetic_pose(game, canvas);
        game.on_frame(pose.as_deref(), canvas, clock.now());
        clock.frame += 1;
    }
    done(game)
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Fruit Catch (headless) starting...");

    let settings = match std::env::args().nth(1) {
        Some(path) => Settings::load(&path).unwrap_or_else(|e| {
            log::warn!("Failed to load settings from {path}: {e}; using defaults");
            Settings::default()
        }),
        None => Settings::default(),
    };
    let canvas = settings.canvas;
    let mut game = Game::new(&settings, AudioManager::disabled(), Box::new(LogSink));
    let mut clock = Clock::default();

    // Free mode with the selected options
    game.handle_key("s", clock.now());
    if !run_until(&mut game, &mut clock, canvas, |g| {
        g.session().screen() == Screen::GameOver
    }) {
        log::error!("Free episode did not finish");
        return;
    }
    println!("Free mode score: {}", game.session().episode.score);

    // Story mode from stage 1; stages advance on their own
    game.handle_key("q", clock.now());
    game.handle_key("m", clock.now());
    game.handle_key("s", clock.now());
    if !run_until(&mut game, &mut clock, canvas, |g| {
        g.session().screen() == Screen::GameOver
    }) {
        log::error!("Story run did not finish");
        return;
    }
    let view = game.view();
    if let Some(banner) = &view.banner {
        println!("{banner}");
    }
    for line in &view.details {
        println!("{line}");
    }

    println!("\nHigh scores:");
    for row in game.high_scores().rows() {
        println!("  {row}");
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The host page drives `fruit_catch::Game` directly
}
