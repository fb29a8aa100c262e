//! Search errors

use thiserror::Error;

use hexfall_core::GameError;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SearchError {
    /// Every candidate move errors
    #[error("no legal move from the current position")]
    NoLegalMove,

    /// The committed tree ran out of plies; build a new one
    #[error("search tree exhausted")]
    TreeExhausted,

    #[error(transparent)]
    Game(#[from] GameError),
}

impl SearchError {
    /// Worth calling `next()` again; the strategy rebuilds its search state
    pub fn is_retryable(&self) -> bool {
        matches!(self, SearchError::TreeExhausted | SearchError::NoLegalMove)
    }
}
