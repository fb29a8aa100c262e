//! Session driver
//!
//! Runs a strategy step by step until the game ends, the strategy gives up,
//! or a step or time budget runs out.
//!
//! ## Architecture
//! - Level 1: Session::run() - the step loop
//! - Level 2: stop handling per error kind
//! - Level 3: SessionReport - what happened, for logging and output

use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::{SearchError, Strategy};

/// Why a session stopped
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "reason", content = "detail")]
pub enum StopReason {
    Done,
    NoLegalMove,
    /// Tree rebuilds kept coming back empty
    Exhausted,
    Error(String),
    MaxSteps,
    Deadline,
}

#[derive(Clone, Debug, Serialize)]
pub struct SessionReport {
    pub strategy: String,
    pub seed: u64,
    pub steps: usize,
    pub done: bool,
    pub stop: StopReason,
    pub score: i64,
    pub final_score: i64,
    pub commands: String,
    pub final_commands: String,
}

#[derive(Clone, Debug)]
pub struct Session {
    max_steps: Option<usize>,
    deadline: Option<Instant>,
    max_rebuilds: usize,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            max_steps: None,
            deadline: None,
            max_rebuilds: 3,
        }
    }
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_steps(mut self, steps: usize) -> Self {
        self.max_steps = Some(steps);
        self
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_time_limit(self, limit: Duration) -> Self {
        self.with_deadline(Instant::now() + limit)
    }

    /// Consecutive retryable failures tolerated before giving up
    pub fn with_max_rebuilds(mut self, rebuilds: usize) -> Self {
        self.max_rebuilds = rebuilds;
        self
    }

    // ========================================================================
    // LEVEL 1: Step loop
    // ========================================================================

    pub fn run<S: Strategy>(&self, name: &str, strategy: &mut S) -> SessionReport {
        let mut steps = 0;
        let mut rebuilds = 0;

        let stop = loop {
            if strategy.current_game().is_done() {
                break StopReason::Done;
            }
            if self.max_steps.is_some_and(|max| steps >= max) {
                break StopReason::MaxSteps;
            }
            if self.deadline.is_some_and(|deadline| Instant::now() >= deadline) {
                break StopReason::Deadline;
            }

            match strategy.next() {
                Ok(done) => {
                    steps += 1;
                    rebuilds = 0;
                    if done {
                        break StopReason::Done;
                    }
                }
                Err(err) => match self.on_error(err, &mut rebuilds) {
                    Some(reason) => break reason,
                    None => continue,
                },
            }
        };

        if matches!(stop, StopReason::Exhausted | StopReason::Error(_)) {
            warn!(strategy = name, stop = ?stop, "strategy gave up");
        }
        let report = Self::report(name, strategy, steps, stop);
        info!(
            strategy = name,
            seed = report.seed,
            steps = report.steps,
            score = report.final_score,
            stop = ?report.stop,
            "session finished"
        );
        report
    }

    // ========================================================================
    // LEVEL 2: Error handling
    // ========================================================================

    /// None to keep stepping, otherwise why to stop
    fn on_error(&self, err: SearchError, rebuilds: &mut usize) -> Option<StopReason> {
        if !err.is_retryable() {
            return Some(StopReason::Error(err.to_string()));
        }
        *rebuilds += 1;
        if *rebuilds <= self.max_rebuilds {
            debug!(rebuilds = *rebuilds, "retrying after {err}");
            return None;
        }
        match err {
            SearchError::NoLegalMove => Some(StopReason::NoLegalMove),
            _ => Some(StopReason::Exhausted),
        }
    }

    // ========================================================================
    // LEVEL 3: Reporting
    // ========================================================================

    fn report<S: Strategy>(name: &str, strategy: &S, steps: usize, stop: StopReason) -> SessionReport {
        let game = strategy.current_game();
        SessionReport {
            strategy: name.to_string(),
            seed: game.seed(),
            steps,
            done: game.is_done(),
            stop,
            score: game.score(),
            final_score: game.final_score(),
            commands: game.commands(),
            final_commands: game.final_commands(),
        }
    }
}
