//! HEXFALL CLI - Command-line interface
//!
//! Commands:
//! - solve: Play problems with one or more strategies and print solutions
//! - score: Replay a command string and report its score

mod output;
mod score_cmd;
mod solve_cmd;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hexfall")]
#[command(about = "HEXFALL hex-grid falling-block solver")]
#[command(version)]
struct Cli {
    /// Log per-move decisions to stderr
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve problems and print a JSON array of solutions
    Solve(solve_cmd::SolveArgs),
    /// Score a command string against one problem seed
    Score(score_cmd::ScoreArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.debug);

    match cli.command {
        Commands::Solve(args) => solve_cmd::run(args),
        Commands::Score(args) => score_cmd::run(args),
    }
}

/// Logs go to stderr; stdout carries only JSON
fn init_logging(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
