//! Score command - replay a command string on one seed
//!
//! ## Architecture
//!
//! - Level 1: run() - load, replay, report
//! - Level 2: replay() - the session on a replay strategy

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use hexfall_core::{Game, PhraseBook, Problem};
use hexfall_search::{ReplayStrategy, Session, SessionReport};

#[derive(Args)]
pub struct ScoreArgs {
    /// Problem JSON file
    #[arg(short = 'f', long = "file", value_name = "FILE")]
    pub file: PathBuf,

    /// Source seed to replay against
    #[arg(long)]
    pub seed: u64,

    /// Commands to replay
    #[arg(long, value_name = "CMDS")]
    pub commands: String,

    /// Phrase of power (repeatable); replaces the stock phrases
    #[arg(short = 'p', long = "phrase", value_name = "PHRASE")]
    pub phrases: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ScoreOutput {
    problem_id: u64,
    #[serde(flatten)]
    session: SessionReport,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

pub fn run(args: ScoreArgs) -> Result<()> {
    let problem = Problem::load(&args.file)
        .with_context(|| format!("Failed to load problem: {}", args.file.display()))?;

    let phrases = if args.phrases.is_empty() {
        PhraseBook::default()
    } else {
        PhraseBook::new(&args.phrases).context("Invalid phrase of power")?
    };
    let game = problem
        .game(args.seed, Arc::new(phrases))
        .with_context(|| format!("Cannot start problem {} with seed {}", problem.id, args.seed))?;

    let report = replay(game, &args.commands);
    let output = ScoreOutput {
        problem_id: problem.id,
        session: report,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

// ============================================================================
// LEVEL 2 - REPLAY
// ============================================================================

fn replay(game: Game, commands: &str) -> SessionReport {
    let mut strategy = ReplayStrategy::new(game, commands);
    Session::new().run("replay", &mut strategy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hexfall_search::StopReason;

    const PROBLEM: &str = r#"{
        "id": 5,
        "units": [{"members": [{"x": 0, "y": 0}], "pivot": {"x": 0, "y": 0}}],
        "width": 1,
        "height": 4,
        "filled": [],
        "sourceLength": 1,
        "sourceSeeds": [0]
    }"#;

    #[test]
    fn test_replay_scores_column() {
        let problem = Problem::from_json(PROBLEM).unwrap();
        let game = problem.game(0, Arc::new(PhraseBook::default())).unwrap();
        let report = replay(game, "lala");
        assert!(report.done);
        assert_eq!(report.stop, StopReason::Done);
        // One cell locked and its row cleared
        assert_eq!(report.score, 101);
    }

    #[test]
    fn test_rejected_command_stops_replay() {
        let problem = Problem::from_json(PROBLEM).unwrap();
        let game = problem.game(0, Arc::new(PhraseBook::default())).unwrap();
        let report = replay(game, "d");
        assert!(!report.done);
        assert!(matches!(report.stop, StopReason::Error(_)));
    }
}
