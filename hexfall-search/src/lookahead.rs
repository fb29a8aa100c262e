//! Parallel one-ply lookahead
//!
//! Each decision forks the game six times, applies one direction per fork in
//! parallel, and keeps the best fork as the new canonical game.

use rayon::prelude::*;
use tracing::debug;

use hexfall_core::{Direction, Game, GameError, UpdateOutcome};

use crate::{SearchError, Strategy};

/// One fork with one direction applied
#[derive(Clone, Debug)]
pub struct Attempt {
    pub direction: Direction,
    pub game: Game,
    pub result: Result<UpdateOutcome, GameError>,
}

impl Attempt {
    fn run(game: &Game, direction: Direction) -> Self {
        let mut game = game.fork();
        let result = game.apply(direction);
        Self {
            direction,
            game,
            result,
        }
    }
}

/// Index of the best successful attempt.
///
/// A game that keeps going beats one that ends; then the higher score wins;
/// ties go to the earliest attempt.
pub fn select_best(attempts: &[Attempt]) -> Option<usize> {
    let mut best: Option<(usize, bool, i64)> = None;
    for (i, attempt) in attempts.iter().enumerate() {
        let Ok(outcome) = attempt.result else {
            continue;
        };
        let score = attempt.game.score();
        let better = match best {
            None => true,
            Some((_, best_done, best_score)) => {
                (best_done && !outcome.done)
                    || (best_done == outcome.done && score > best_score)
            }
        };
        if better {
            best = Some((i, outcome.done, score));
        }
    }
    best.map(|(i, _, _)| i)
}

pub struct LookaheadStrategy {
    game: Game,
}

impl LookaheadStrategy {
    pub fn new(game: Game) -> Self {
        Self { game }
    }

    /// Apply every direction to its own fork, in parallel, keeping
    /// enumeration order
    pub fn attempts(&self) -> Vec<Attempt> {
        Direction::ALL
            .par_iter()
            .map(|&direction| Attempt::run(&self.game, direction))
            .collect()
    }
}

impl Strategy for LookaheadStrategy {
    fn next(&mut self) -> Result<bool, SearchError> {
        let mut attempts = self.attempts();

        match select_best(&attempts) {
            Some(index) => {
                let chosen = attempts.swap_remove(index);
                debug!(direction = %chosen.direction, score = chosen.game.score(), "lookahead move");
                let done = chosen.game.is_done();
                self.game = chosen.game;
                Ok(done)
            }
            None => {
                // Every fork was rejected and left unchanged
                if !attempts.is_empty() {
                    self.game = attempts.swap_remove(0).game;
                }
                Err(SearchError::NoLegalMove)
            }
        }
    }

    fn current_game(&self) -> &Game {
        &self.game
    }

    fn into_game(self) -> Game {
        self.game
    }
}
