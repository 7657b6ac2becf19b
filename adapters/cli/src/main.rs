#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Grid Rush experience.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use grid_rush_cli::high_scores::HighScoreTable;
use grid_rush_cli::session::{GameSession, SessionConfig};
use grid_rush_core::Phase;
use grid_rush_world::query;

/// Headless Grid Rush session runner.
#[derive(Debug, Parser)]
#[command(name = "grid-rush", version, about)]
struct Args {
    /// Number of cell columns in the field (minimum 2).
    #[arg(long, default_value_t = 18, value_parser = clap::value_parser!(u32).range(2..))]
    columns: u32,

    /// Number of cell rows in the field (minimum 1).
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u32).range(1..))]
    rows: u32,

    /// Seed for defender placement and steering; random when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Maximum number of frames to simulate.
    #[arg(long, default_value_t = 36_000)]
    frames: u64,

    /// Name recorded against the final score.
    #[arg(long, default_value = "runner")]
    name: String,

    /// Path of the JSON high-score table.
    #[arg(long, default_value = "grid-rush-scores.json")]
    high_scores: PathBuf,

    /// Print the field every N frames; 0 disables tracing.
    #[arg(long, default_value_t = 0)]
    trace_every: u64,
}

/// Entry point for the Grid Rush command-line interface.
fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    let seed = args.seed.unwrap_or_else(rand::random);

    let mut session = GameSession::new(SessionConfig {
        seed,
        columns: args.columns,
        rows: args.rows,
        ..SessionConfig::default()
    });
    println!("{}", query::welcome_banner(session.world()));
    println!("seed {seed}");

    let trace_every = args.trace_every;
    let mut frame = 0_u64;
    let summary = session.run(args.frames, |session, _events| {
        frame += 1;
        if trace_every != 0 && frame % trace_every == 0 {
            println!("{}\n", session.scene().to_ascii());
        }
    });

    println!("{}\n", session.scene().to_ascii());
    println!(
        "finished after {} frames: score {}, level {}, captures {}",
        summary.frames, summary.score, summary.level, summary.captures
    );
    if summary.phase != Phase::GameOver {
        println!("frame budget exhausted before game over");
    }

    let mut table = HighScoreTable::load(&args.high_scores);
    if table.record(&args.name, summary.score) {
        table
            .save(&args.high_scores)
            .with_context(|| format!("saving {}", args.high_scores.display()))?;
        println!("recorded {} with score {}", args.name, summary.score);
    }
    for (rank, entry) in table.entries().iter().enumerate() {
        println!("{:>2}. {:<16} {}", rank + 1, entry.name, entry.score);
    }

    Ok(())
}
