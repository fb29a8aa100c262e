//! Problem descriptions - board, unit templates and seeds

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::cell::Cell;
use crate::error::ProblemError;
use crate::game::Game;
use crate::phrase::PhraseBook;
use crate::unit::Unit;

/// One input problem, as published in JSON
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Problem {
    pub id: u64,
    pub units: Vec<Unit>,
    pub width: i32,
    pub height: i32,
    #[serde(default)]
    pub filled: Vec<Cell>,
    pub source_length: u32,
    pub source_seeds: Vec<u64>,
}

impl Problem {
    /// Parse and validate a problem
    pub fn from_json(json: &str) -> Result<Self, ProblemError> {
        let problem: Problem = serde_json::from_str(json)?;
        problem.validate()?;
        Ok(problem)
    }

    /// Load from a JSON file
    pub fn load(path: &Path) -> Result<Self, ProblemError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn validate(&self) -> Result<(), ProblemError> {
        if self.units.is_empty() {
            return Err(ProblemError::NoUnits);
        }
        for (index, unit) in self.units.iter().enumerate() {
            unit.validate()
                .map_err(|source| ProblemError::BadUnit { index, source })?;
        }
        // Checks dimensions and filled cells
        self.board()?;
        Ok(())
    }

    /// The starting board
    pub fn board(&self) -> Result<Board, ProblemError> {
        Board::new(self.width, self.height, &self.filled)
    }

    /// Start the game for one seed
    pub fn game(&self, seed: u64, phrases: Arc<PhraseBook>) -> Result<Game, ProblemError> {
        Game::new(
            self.board()?,
            Arc::new(self.units.clone()),
            phrases,
            seed,
            self.source_length,
        )
    }
}

/// One game per seed, in seed order. The templates are shared between all of
/// them; a seed whose game cannot start yields its error.
pub fn games_from_problem(
    problem: &Problem,
    phrases: Arc<PhraseBook>,
) -> Vec<(u64, Result<Game, ProblemError>)> {
    let templates = Arc::new(problem.units.clone());
    problem
        .source_seeds
        .iter()
        .map(|&seed| {
            let game = problem.board().and_then(|board| {
                Game::new(
                    board,
                    Arc::clone(&templates),
                    Arc::clone(&phrases),
                    seed,
                    problem.source_length,
                )
            });
            (seed, game)
        })
        .collect()
}
