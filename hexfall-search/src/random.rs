//! Random permutation strategy
//!
//! Tries the six directions in random order, each spelled with a random
//! alias, and keeps the first one the game accepts.

use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use hexfall_core::{command, Direction, Game};

use crate::{create_rng, SearchError, Strategy};

/// Hands out each direction once, in random order
#[derive(Clone, Debug)]
pub struct MovePermuter {
    remaining: Vec<Direction>,
}

impl MovePermuter {
    pub fn new() -> Self {
        Self {
            remaining: Direction::ALL.to_vec(),
        }
    }

    /// Next direction and a random spelling of it; None once all are used
    pub fn next<R: Rng>(&mut self, rng: &mut R) -> Option<(Direction, u8)> {
        if self.remaining.is_empty() {
            return None;
        }
        let direction = self.remaining.swap_remove(rng.gen_range(0..self.remaining.len()));
        let byte = *command::aliases(direction).choose(rng)?;
        Some((direction, byte))
    }
}

impl Default for MovePermuter {
    fn default() -> Self {
        Self::new()
    }
}

pub struct RandomStrategy {
    game: Game,
    rng: ChaCha8Rng,
}

impl RandomStrategy {
    pub fn new(game: Game, seed: Option<u64>) -> Self {
        Self {
            game,
            rng: create_rng(seed),
        }
    }
}

impl Strategy for RandomStrategy {
    fn next(&mut self) -> Result<bool, SearchError> {
        let mut moves = MovePermuter::new();
        while let Some((direction, byte)) = moves.next(&mut self.rng) {
            match self.game.update(byte) {
                Ok(outcome) => return Ok(outcome.done),
                Err(err) => debug!(%direction, %err, "random move rejected"),
            }
        }
        Err(SearchError::NoLegalMove)
    }

    fn current_game(&self) -> &Game {
        &self.game
    }

    fn into_game(self) -> Game {
        self.game
    }
}
