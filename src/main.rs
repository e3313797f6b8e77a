//! Infinite Bounce entry point
//!
//! Runs rounds headless against the built-in world with the demo player,
//! then reports the session and records it on the leaderboard.

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use clap::Parser;

use infinite_bounce::consts::{MAX_SUBSTEPS, SIM_DT};
use infinite_bounce::highscores::HighScoreEntry;
use infinite_bounce::sim::{RoundState, Session, TickInput, tick};
use infinite_bounce::{HighScores, Settings, Tuning};

/// Host frame length; the simulation substeps at `SIM_DT` inside it
const FRAME_DT: f32 = 1.0 / 60.0;

#[derive(Parser, Debug)]
#[command(about = "Run Infinite Bounce headless with the demo player", version)]
struct Args {
    /// Run seed (overrides the settings file)
    #[arg(long)]
    seed: Option<u64>,
    /// Simulated seconds to run
    #[arg(long, default_value_t = 60.0)]
    seconds: f32,
    /// Tuning overrides (JSON)
    #[arg(long)]
    tuning: Option<PathBuf>,
    #[arg(long, default_value = "settings.json")]
    settings: PathBuf,
    #[arg(long, default_value = "highscores.json")]
    highscores: PathBuf,
    /// Disable the demo player; nothing gets launched
    #[arg(long)]
    no_idle: bool,
    /// Print the final snapshot as JSON
    #[arg(long)]
    json: bool,
}

fn since_epoch() -> std::time::Duration {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let tuning = match &args.tuning {
        Some(path) => Tuning::load(path)
            .with_context(|| format!("loading tuning from {}", path.display()))?,
        None => Tuning::default(),
    };
    let settings = Settings::load_or_default(&args.settings);
    let seed = args
        .seed
        .or(settings.seed)
        .unwrap_or_else(|| since_epoch().as_nanos() as u64);

    let mut session = Session::new(tuning, seed);
    session.world.set_volume(settings.effective_volume());
    let input = TickInput {
        press: None,
        idle_mode: settings.idle_mode && !args.no_idle,
    };

    let frames = (args.seconds.max(0.0) / FRAME_DT).round() as u64;
    let mut accumulator = 0.0;
    let mut last_state = session.state();
    let mut sounds_played = 0usize;

    for _ in 0..frames {
        accumulator += FRAME_DT;
        let mut substeps = 0;
        while accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            sounds_played += tick(&mut session, &input, SIM_DT).len();
            accumulator -= SIM_DT;
            substeps += 1;
        }

        let state = session.state();
        if state != last_state {
            if state == RoundState::Waiting {
                log::info!(
                    "Ready for ball {} (score {})",
                    session.round.balls_launched() + 1,
                    session.round.score().total
                );
            }
            last_state = state;
        }
    }

    let snapshot = session.snapshot();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        println!(
            "Seed {}: {} waves, {} balls, score {} ({} sounds)",
            snapshot.seed, snapshot.wave, snapshot.balls_launched, snapshot.score.total, sounds_played
        );
    }

    let mut highscores = HighScores::load(&args.highscores);
    let entry = HighScoreEntry {
        score: snapshot.score.total,
        waves: snapshot.wave,
        balls: snapshot.balls_launched,
        timestamp: since_epoch().as_secs(),
    };
    if let Some(rank) = highscores.add_score(entry) {
        highscores
            .save(&args.highscores)
            .with_context(|| format!("saving high scores to {}", args.highscores.display()))?;
        if !args.json {
            println!("New high score! Rank #{}", rank);
        }
    }

    Ok(())
}
