//! Space Jumper headless entry point
//!
//! Runs the threaded game loop with the autopilot for a fixed time, logging
//! progress and persisting the best score to the local leaderboard file.

use std::env;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use anyhow::Context;

use space_jumper::highscores::unix_time_ms;
use space_jumper::platform::SystemClock;
use space_jumper::renderer::{JsonLinesRenderer, LogRenderer, Renderer};
use space_jumper::{GameLoop, LocalScoreStore, ScoreKeeper, Settings};

const SETTINGS_ENV: &str = "SPACE_JUMPER_SETTINGS";
const DEFAULT_SETTINGS_FILE: &str = "space_jumper_settings.json";

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Space Jumper (headless) starting...");

    let settings_path = env::var_os(SETTINGS_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS_FILE));
    let settings = Settings::load(&settings_path);

    let seed = settings.seed.unwrap_or_else(unix_time_ms);
    log::info!(
        "Seed {} | {}x{} @ {} Hz | autopilot {}",
        seed,
        settings.screen_width,
        settings.screen_height,
        settings.tick_rate_hz,
        settings.autopilot
    );
    if !settings.autopilot {
        log::warn!("Autopilot is off and there is no pointer input; the game will wait on the title");
    }

    let renderer: Box<dyn Renderer> = match &settings.trace_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("creating trace file {}", path.display()))?;
            log::info!("Tracing snapshots to {}", path.display());
            Box::new(JsonLinesRenderer::new(BufWriter::new(file)))
        }
        // Status line every five seconds of play
        None => Box::new(LogRenderer::new(settings.tick_rate_hz as u64 * 5)),
    };

    let keeper = ScoreKeeper::spawn(Box::new(LocalScoreStore::new(&settings.score_file)));
    let game = GameLoop::new(&settings, seed, renderer, Box::new(SystemClock::new()))
        .with_persistence(keeper);

    let handle = game.start().context("starting game loop")?;
    thread::sleep(Duration::from_secs(settings.demo_seconds));
    let game = handle.pause()?;

    let state = game.finish();
    log::info!(
        "Finished after {} ticks: score {}, best {}",
        state.time_ticks,
        state.score.current,
        state.score.best
    );
    Ok(())
}
