//! Solve command - play every seed of every problem and print solutions
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: build_config(), load_problems(), solve_all(), print_entries()
//! - Level 3: solve_seed() - every strategy on one seed, best kept
//! - Level 4: time limit and pool helpers

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;

use hexfall_core::{games_from_problem, Game, PhraseBook, Problem};
use hexfall_search::{Player, SearchConfig, Session, SessionReport, StrategyKind};

use crate::output::OutputEntry;

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct SolveArgs {
    /// Problem JSON file (repeatable)
    #[arg(short = 'f', long = "file", value_name = "FILE", required = true)]
    pub files: Vec<PathBuf>,

    /// Phrase of power (repeatable); replaces the stock phrases
    #[arg(short = 'p', long = "phrase", value_name = "PHRASE")]
    pub phrases: Vec<String>,

    /// Strategy to run (repeatable); the best final score wins
    #[arg(long = "ai", value_name = "NAME", default_value = "lookahead")]
    pub strategies: Vec<StrategyKind>,

    /// Time limit in seconds for the whole run
    #[arg(short = 't', long = "time", value_name = "SECS")]
    pub time: Option<u64>,

    /// Worker threads (defaults to all cores)
    #[arg(short = 'c', long = "cores")]
    pub cores: Option<usize>,

    /// Only solve this source seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Tag for every output record
    #[arg(long)]
    pub tag: Option<String>,

    /// Command string for the replay strategy
    #[arg(long, value_name = "CMDS")]
    pub repeat: Option<String>,

    /// Search configuration JSON file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Score tree depth
    #[arg(long)]
    pub depth: Option<u32>,
}

/// One seed to solve
struct Job {
    problem_id: u64,
    seed: u64,
    game: Game,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run solve command
///
/// This function reads like a table of contents:
/// 1. Merge configuration and phrases
/// 2. Load problems and start one game per seed
/// 3. Solve all seeds in parallel
/// 4. Print the JSON array
pub fn run(args: SolveArgs) -> Result<()> {
    let deadline = args.time.map(|secs| Instant::now() + time_limit(secs));
    let config = build_config(&args)?;
    let phrases = build_phrases(&args)?;

    let jobs = load_problems(&args, phrases)?;
    tracing::info!(
        "Solving {} seeds with {} strategies",
        jobs.len(),
        args.strategies.len()
    );

    let pool = build_pool(args.cores)?;
    let entries = pool.install(|| solve_all(jobs, &args, &config, deadline))?;

    print_entries(&entries)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Config file first, then flags on top
fn build_config(args: &SolveArgs) -> Result<SearchConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config: {}", path.display()))?;
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config: {}", path.display()))?
        }
        None => SearchConfig::default(),
    };

    if let Some(depth) = args.depth {
        config = config.with_tree_depth(depth);
    }
    if let Some(commands) = &args.repeat {
        config = config.with_replay(commands.clone());
    }
    if args.strategies.contains(&StrategyKind::Replay) && config.replay.is_empty() {
        bail!("the replay strategy needs --repeat or a replay string in --config");
    }
    Ok(config)
}

fn build_phrases(args: &SolveArgs) -> Result<Arc<PhraseBook>> {
    if args.phrases.is_empty() {
        return Ok(Arc::new(PhraseBook::default()));
    }
    let book = PhraseBook::new(&args.phrases).context("Invalid phrase of power")?;
    Ok(Arc::new(book))
}

/// Every (problem, seed) game that could be started
fn load_problems(args: &SolveArgs, phrases: Arc<PhraseBook>) -> Result<Vec<Job>> {
    let mut jobs = Vec::new();
    for path in &args.files {
        let problem = Problem::load(path)
            .with_context(|| format!("Failed to load problem: {}", path.display()))?;

        for (seed, game) in games_from_problem(&problem, Arc::clone(&phrases)) {
            if args.seed.is_some_and(|only| only != seed) {
                continue;
            }
            match game {
                Ok(game) => jobs.push(Job {
                    problem_id: problem.id,
                    seed,
                    game,
                }),
                Err(err) => tracing::warn!(problem = problem.id, seed, "skipping seed: {err}"),
            }
        }
    }
    Ok(jobs)
}

fn solve_all(
    jobs: Vec<Job>,
    args: &SolveArgs,
    config: &SearchConfig,
    deadline: Option<Instant>,
) -> Result<Vec<OutputEntry>> {
    let pb = ProgressBar::new(jobs.len() as u64);
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} seeds")?
            .progress_chars("=>-"),
    );

    let entries: Vec<OutputEntry> = jobs
        .into_par_iter()
        .filter_map(|job| {
            let entry = solve_seed(job, args, config, deadline);
            pb.inc(1);
            entry
        })
        .collect();

    pb.finish_and_clear();
    Ok(entries)
}

fn print_entries(entries: &[OutputEntry]) -> Result<()> {
    let json = serde_json::to_string_pretty(entries).context("Failed to serialize solutions")?;
    println!("{}", json);
    Ok(())
}

// ============================================================================
// LEVEL 3 - PER SEED
// ============================================================================

/// Run each requested strategy on a fork of the seed's game and keep the
/// best final score
fn solve_seed(
    job: Job,
    args: &SolveArgs,
    config: &SearchConfig,
    deadline: Option<Instant>,
) -> Option<OutputEntry> {
    let seeded = config.clone().with_seed(config.seed.unwrap_or(job.seed));
    let mut session = Session::new();
    if let Some(deadline) = deadline {
        session = session.with_deadline(deadline);
    }

    let best = args
        .strategies
        .iter()
        .map(|&kind| {
            let mut player = Player::new(kind, job.game.fork(), &seeded);
            session.run(kind.name(), &mut player)
        })
        .fold(None, |best: Option<SessionReport>, report| match best {
            Some(current) if current.final_score >= report.final_score => Some(current),
            _ => Some(report),
        })?;

    tracing::info!(
        problem = job.problem_id,
        seed = job.seed,
        strategy = %best.strategy,
        score = best.final_score,
        "best solution"
    );
    Some(OutputEntry::new(
        job.problem_id,
        job.seed,
        args.tag.as_deref(),
        best.final_score,
        best.final_commands,
    ))
}

// ============================================================================
// LEVEL 4 - HELPERS
// ============================================================================

/// Leave headroom: five seconds on long limits, a tenth on short ones
fn time_limit(secs: u64) -> Duration {
    if secs > 10 {
        Duration::from_secs(secs - 5)
    } else {
        Duration::from_secs(secs).mul_f64(0.9)
    }
}

fn build_pool(cores: Option<usize>) -> Result<rayon::ThreadPool> {
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(cores) = cores {
        if cores == 0 {
            bail!("--cores must be at least 1");
        }
        builder = builder.num_threads(cores);
    }
    builder.build().context("Failed to build worker pool")
}
