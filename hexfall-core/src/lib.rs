//! HEXFALL Core - Game engine
//!
//! This crate provides the deterministic simulation for HEXFALL:
//! - Hex geometry (odd-r offset cells, cube-space rotation)
//! - Board occupancy and row clearing
//! - Units, the command alphabet and phrases of power
//! - The unit-sequence generator
//! - Game state, scoring and problem loading

pub mod board;
pub mod cell;
pub mod command;
pub mod error;
pub mod game;
pub mod lcg;
pub mod phrase;
pub mod problem;
pub mod unit;

// Re-exports for convenient access
pub use board::Board;
pub use cell::{Cell, CubeCell, Direction};
pub use command::Command;
pub use error::{GameError, ProblemError, UnitError};
pub use game::{Game, UpdateOutcome};
pub use lcg::Lcg;
pub use phrase::{count_overlapping, Phrase, PhraseBook, DEFAULT_PHRASES};
pub use problem::{games_from_problem, Problem};
pub use unit::Unit;
