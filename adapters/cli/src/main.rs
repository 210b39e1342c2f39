#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Headless runner that plays Neon Onslaught with a scripted autopilot.
//!
//! The runner drives a full session (spawning, loot, persistence) at a fixed
//! frame rate, stores checkpoints and high scores in a JSON file and prints a
//! summary once the run ends or the frame budget runs out.

mod autopilot;
mod config;
mod logging;
mod store;

use std::{fmt, path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use glam::Vec2;
use log::{info, warn};
use neon_onslaught_core::{HighScore, Rgb, RunStats, SessionState};
use neon_onslaught_session::{PresentationSink, Session, SessionConfig, SoundId};

use autopilot::Autopilot;
use config::RunConfig;
use store::FileStore;

/// Plays Neon Onslaught headlessly with a scripted autopilot.
#[derive(Parser, Debug)]
#[command(name = "neon-onslaught", version, about, long_about = None)]
struct Args {
    /// TOML run configuration
    #[arg(long)]
    config: Option<PathBuf>,
    /// Seed for every random stream of the run
    #[arg(long)]
    seed: Option<u64>,
    /// Maximum number of frames to simulate
    #[arg(long)]
    frames: Option<u64>,
    /// JSON file holding checkpoints and high scores
    #[arg(long)]
    save_file: Option<PathBuf>,
    /// Resume the stored checkpoint instead of starting at wave one
    #[arg(long = "continue")]
    resume: bool,
    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn run_config(&self) -> Result<RunConfig> {
        let mut config = match &self.config {
            Some(path) => RunConfig::load(path)?,
            None => RunConfig::default(),
        };
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(frames) = self.frames {
            config.max_frames = frames;
        }
        if let Some(save_file) = &self.save_file {
            config.save_file = save_file.clone();
        }
        config.validate()?;
        Ok(config)
    }
}

/// Counts presentation requests so the summary can report them.
#[derive(Debug, Default)]
struct Tally {
    shots: u64,
    explosions: u64,
    damage_numbers: u64,
}

impl PresentationSink for Tally {
    fn play(&mut self, sound: SoundId) {
        if sound == SoundId::Shoot {
            self.shots += 1;
        }
    }

    fn spawn_explosion(&mut self, _position: Vec2, _color: Rgb, _count: u32) {
        self.explosions += 1;
    }

    fn spawn_damage_number(&mut self, _position: Vec2, _amount: f32) {
        self.damage_numbers += 1;
    }
}

struct Summary {
    state: SessionState,
    stats: RunStats,
    highest_combo: u32,
    high_score: HighScore,
    frames: u64,
    simulated: Duration,
    shots: u64,
    hits: u64,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "result:        {}", self.state.name())?;
        writeln!(f, "wave:          {}", self.stats.wave)?;
        writeln!(f, "kills:         {}", self.stats.kills)?;
        writeln!(f, "coins:         {}", self.stats.coins)?;
        writeln!(
            f,
            "upgrades:      {} health, {} damage",
            self.stats.health_upgrades, self.stats.damage_upgrades
        )?;
        writeln!(f, "best combo:    {}", self.highest_combo)?;
        writeln!(f, "shots / hits:  {} / {}", self.shots, self.hits)?;
        writeln!(
            f,
            "simulated:     {:.1}s over {} frames",
            self.simulated.as_secs_f32(),
            self.frames
        )?;
        write!(
            f,
            "high score:    wave {} ({} kills)",
            self.high_score.wave, self.high_score.kills
        )
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.verbose);
    let config = args.run_config()?;

    let store = FileStore::open(&config.save_file)
        .with_context(|| format!("failed to open save file {}", config.save_file.display()))?;
    info!("using save file {}", store.path().display());

    let mut session = Session::new(SessionConfig::new(config.seed), store, Tally::default());
    if args.resume && !session.continue_saved() {
        warn!("no checkpoint to continue; starting a new run");
    }
    if session.state() == SessionState::Title {
        session.new_game();
    }

    let autopilot = Autopilot::new(config.autopilot);
    let dt = config.frame_duration();
    let mut frames = 0;
    while frames < config.max_frames {
        if matches!(
            session.state(),
            SessionState::GameOver | SessionState::Victory
        ) {
            break;
        }
        let input = autopilot.next_input(&session);
        session.tick(&input, dt);
        frames += 1;
    }

    let tally = session.sink();
    let summary = Summary {
        state: session.state(),
        stats: session.stats(),
        highest_combo: session.combo().highest,
        high_score: session.high_score(),
        frames,
        simulated: dt * u32::try_from(frames).unwrap_or(u32::MAX),
        shots: tally.shots,
        hits: tally.damage_numbers,
    };
    info!("{} explosions rendered", tally.explosions);
    println!("{summary}");
    Ok(())
}
