//! Error types for the game engine

use thiserror::Error;

use crate::cell::Cell;

/// A rejected update. The game is left exactly as it was.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("unknown command byte {0:#04x}")]
    UnknownCommand(u8),

    #[error("move returns the unit to a position it already occupied")]
    RevisitedPosition,

    #[error("game is already over")]
    GameOver,
}

/// A malformed unit template
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum UnitError {
    #[error("unit has no members")]
    Empty,

    #[error("member {0} appears more than once")]
    DuplicateMember(Cell),
}

/// Problems with an input problem or phrase list
#[derive(Debug, Error)]
pub enum ProblemError {
    #[error("failed to read problem: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse problem JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("board dimensions {width}x{height} must be positive")]
    BadDimensions { width: i32, height: i32 },

    #[error("filled cell {cell} lies outside the {width}x{height} board")]
    FilledOutOfBounds { cell: Cell, width: i32, height: i32 },

    #[error("problem has no unit templates")]
    NoUnits,

    #[error("unit {index} is invalid: {source}")]
    BadUnit { index: usize, source: UnitError },

    #[error("no unit can be placed at the start of the game for seed {seed}")]
    NoSpawn { seed: u64 },

    #[error("phrase {phrase:?} contains {byte:#04x}, which is not a command")]
    BadPhrase { phrase: String, byte: u8 },
}
