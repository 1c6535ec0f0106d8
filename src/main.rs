//! Dino Runner headless driver
//!
//! Runs the simulation with the built-in autopilot, logs what happens and
//! keeps a local leaderboard. Rendering front ends embed `GameSession`
//! directly; this binary exists for demos, balance checks and soak runs.

use std::path::PathBuf;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use clap::Parser;

use dino_runner::consts::DEFAULT_SEED;
use dino_runner::sim::{GameEvent, GamePhase, ObstacleKind};
use dino_runner::{FrameAccumulator, GameSession, HighScores, Tuning};

#[derive(Parser, Debug)]
#[command(
    name = "dino-runner",
    version,
    about = "Headless dinosaur runner driven by the autopilot"
)]
struct Args {
    /// RNG seed (defaults to a fixed seed for reproducible runs)
    #[arg(long)]
    seed: Option<u64>,

    /// Tick limit per session; the run is abandoned when reached
    #[arg(long, default_value_t = 6000)]
    ticks: u64,

    /// Number of sessions to play back to back
    #[arg(long, default_value_t = 1)]
    sessions: u32,

    /// Tuning JSON file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Leaderboard JSON file (read and updated)
    #[arg(long)]
    scores: Option<PathBuf>,

    /// Pace ticks against the wall clock instead of running flat out
    #[arg(long)]
    realtime: bool,

    /// Print the final snapshot as JSON
    #[arg(long)]
    dump: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let tuning = match &args.config {
        Some(path) => Tuning::load(path)
            .with_context(|| format!("loading tuning from {}", path.display()))?,
        None => Tuning::default(),
    };
    let seed = args.seed.unwrap_or(DEFAULT_SEED);

    let mut scores = args
        .scores
        .as_ref()
        .map(HighScores::load)
        .unwrap_or_default();
    if let Some(best) = scores.top_score() {
        log::info!("Best score so far: {}", best);
    }

    let mut session = GameSession::with_tuning(seed, tuning).context("invalid tuning")?;
    session.set_autopilot(true);
    log::info!("Dino Runner (headless) starting with seed {}", seed);

    for n in 0..args.sessions {
        let started = if n == 0 {
            session.start()
        } else {
            session.restart() || session.start()
        };
        if !started {
            anyhow::bail!("could not start session {} from {:?}", n + 1, session.phase());
        }

        let final_score = run_session(&mut session, args.ticks, args.realtime);
        report_events(&mut session);

        match final_score {
            Some(score) => {
                let cause = match session.final_cause() {
                    Some(ObstacleKind::Aerial) => "kissed by a pterodactyl",
                    _ => "eaten by uncle cactus",
                };
                match scores.add_score(score, session.speed(), unix_now()) {
                    Some(rank) => {
                        println!("Session {}: {cause}, score {score} (rank #{rank})", n + 1)
                    }
                    None => println!("Session {}: {cause}, score {score}", n + 1),
                }
            }
            None => {
                println!(
                    "Session {}: survived {} ticks at speed {:.2}",
                    n + 1,
                    session.score(),
                    session.speed()
                );
                session.return_to_menu();
            }
        }
    }

    if let Some(path) = &args.scores {
        scores
            .save(path)
            .with_context(|| format!("saving high scores to {}", path.display()))?;
    }

    if args.dump {
        let json = serde_json::to_string_pretty(&session.snapshot())
            .context("serializing snapshot")?;
        println!("{json}");
    }

    Ok(())
}

/// Tick until game over or the limit; returns the final score on game over
fn run_session(session: &mut GameSession, limit: u64, realtime: bool) -> Option<u64> {
    let step = session.tuning().tick_duration();

    if !realtime {
        for _ in 0..limit {
            if let Some(score) = session.tick_fixed() {
                return Some(score);
            }
        }
        return None;
    }

    let mut accumulator = FrameAccumulator::new(step);
    let mut last = Instant::now();
    while session.phase() == GamePhase::Playing && session.score() < limit {
        std::thread::sleep(step);
        let now = Instant::now();
        let steps = accumulator.advance(now - last);
        last = now;
        for _ in 0..steps {
            if let Some(score) = session.tick(accumulator.step()) {
                return Some(score);
            }
        }
    }
    None
}

fn report_events(session: &mut GameSession) {
    let mut spawned = 0u32;
    let mut jumps = 0u32;
    for event in session.take_events() {
        match event {
            GameEvent::ObstacleSpawned { .. } => spawned += 1,
            GameEvent::Jumped => jumps += 1,
            GameEvent::SpeedIncreased { speed } => log::trace!("speed -> {:.3}", speed),
            GameEvent::AerialUnlocked => log::debug!("aerial obstacles unlocked"),
            GameEvent::GameOver { final_score, cause } => {
                log::debug!("final score {} ({:?})", final_score, cause)
            }
            GameEvent::SessionStarted => {}
        }
    }
    log::info!("{} obstacles spawned, {} jumps", spawned, jumps);
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::ZERO)
        .as_secs()
}
