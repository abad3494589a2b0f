//! Lingo Leap entry point
//!
//! Runs a headless autoplay session: levels are played back to back through
//! the fixed stepper and every outcome is logged.
//!
//! Usage: `lingo-leap [seed] [seconds] [settings.json]`

use std::env;
use std::error::Error;
use std::path::PathBuf;

use lingo_leap::consts::SIM_DT;
use lingo_leap::persistence::JsonFileStore;
use lingo_leap::sim::{FixedStepper, GameEvent, GameSession, RunPhase, TickInput};
use lingo_leap::{LevelCatalog, Settings, VocabularyPool};

const DEFAULT_SEED: u64 = 12345;
const DEFAULT_SECONDS: f32 = 120.0;
const DEFAULT_SAVE_PATH: &str = "lingo_leap_save.json";

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(err) = run() {
        log::error!("{err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let mut args = env::args().skip(1);
    let seed = match args.next() {
        Some(arg) => arg.parse::<u64>()?,
        None => DEFAULT_SEED,
    };
    let seconds = match args.next() {
        Some(arg) => arg.parse::<f32>()?,
        None => DEFAULT_SECONDS,
    };
    let settings = match args.next() {
        Some(path) => Settings::load(&PathBuf::from(path))?,
        None => Settings::default(),
    };

    let save_path = env::var("LINGO_LEAP_SAVE").unwrap_or_else(|_| DEFAULT_SAVE_PATH.into());
    let store = JsonFileStore::open(&save_path)?;
    let snapshot = store.snapshot().clone();
    log::info!(
        "Lingo Leap starting (seed {seed}, {seconds}s, save {save_path}, {} coins)",
        snapshot.progress.total_coins
    );

    let mut session = GameSession::new(
        settings,
        LevelCatalog::default(),
        Box::new(VocabularyPool::starter()),
        snapshot,
        store,
        seed,
    );

    let mut stepper = FixedStepper::new();
    let mut input = TickInput {
        autoplay: true,
        ..Default::default()
    };
    let frames = (seconds / SIM_DT).ceil() as u64;
    let mut runs = 0u32;
    let mut levels_cleared = 0u32;

    for _ in 0..frames {
        match session.phase() {
            RunPhase::Menu => {
                let level_id = session.level_id();
                if !session.select_level(level_id) {
                    session.select_level(lingo_leap::level::BASE_LEVEL_ID);
                }
            }
            RunPhase::Start | RunPhase::GameOver | RunPhase::LevelComplete => {
                session.start_run()?;
                runs += 1;
            }
            RunPhase::Playing => {
                stepper.advance(&mut session, &mut input, SIM_DT);
            }
        }

        for event in session.drain_events() {
            match event.event {
                GameEvent::LevelComplete {
                    level_id,
                    unlocked: Some(next),
                    ..
                } => {
                    levels_cleared += 1;
                    log::info!("Level {level_id} cleared, level {next} unlocked");
                }
                GameEvent::LevelComplete { .. } => levels_cleared += 1,
                GameEvent::GenerationFailed { error } => {
                    log::warn!("Run {}: {error}", event.run_id);
                }
                _ => {}
            }
        }
    }

    let best = session.high_scores().top_score().unwrap_or(0);
    println!(
        "{runs} runs, {levels_cleared} levels cleared, best score {best}, {} coins",
        session.progress().total_coins
    );
    Ok(())
}
