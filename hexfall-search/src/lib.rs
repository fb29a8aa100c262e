//! HEXFALL Search - strategies that play a game to completion
//!
//! Every strategy owns its canonical [`Game`] and explores forked copies:
//! - Random permutation of the six directions
//! - Parallel one-ply lookahead
//! - Depth-bounded score tree
//! - Monte-Carlo rollouts with weighted direction draws
//! - Phrase trees and phrase rollouts
//! - Replay of a fixed command string
//!
//! [`Session`] drives any of them until the game ends or a budget runs out.

pub mod chant;
pub mod config;
pub mod error;
pub mod lookahead;
pub mod player;
pub mod random;
pub mod replay;
pub mod rollout;
pub mod session;
pub mod tree;

use hexfall_core::Game;

pub use chant::{ChantRolloutStrategy, ChanterStrategy};
pub use config::{ChantConfig, DirectionWeights, RolloutConfig, SearchConfig, TreeConfig};
pub use error::SearchError;
pub use lookahead::LookaheadStrategy;
pub use player::{Player, StrategyKind};
pub use random::RandomStrategy;
pub use replay::ReplayStrategy;
pub use rollout::MonteCarloStrategy;
pub use session::{Session, SessionReport, StopReason};
pub use tree::TreeStrategy;

/// A move-choosing strategy.
///
/// `next` commits at most one command to the canonical game and reports
/// whether the game is finished.
pub trait Strategy {
    fn next(&mut self) -> Result<bool, SearchError>;

    /// The canonical game. It may be replaced by a fork after `next`.
    fn current_game(&self) -> &Game;

    fn into_game(self) -> Game
    where
        Self: Sized;
}

/// How a speculative branch ended up
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Still playing
    Live,
    /// The move ended the game
    GameOver,
    /// The move was rejected
    Invalid,
}

impl Outcome {
    pub fn is_dead(self) -> bool {
        self != Outcome::Live
    }
}

/// Index of the best of a node's children, given as (outcome, score) pairs.
///
/// Live children compete on score with ties to the earliest. When none is
/// live, the first that ends the game is preferred over a rejected one.
pub(crate) fn best_index(children: impl Iterator<Item = (Outcome, f64)>) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    let mut first_game_over = None;
    let mut any = false;

    for (i, (outcome, score)) in children.enumerate() {
        any = true;
        match outcome {
            Outcome::Live => {
                if best.map_or(true, |(_, s)| score > s) {
                    best = Some((i, score));
                }
            }
            Outcome::GameOver => {
                first_game_over.get_or_insert(i);
            }
            Outcome::Invalid => {}
        }
    }

    best.map(|(i, _)| i)
        .or(first_game_over)
        .or(if any { Some(0) } else { None })
}

pub(crate) fn create_rng(seed: Option<u64>) -> rand_chacha::ChaCha8Rng {
    use rand::SeedableRng;

    match seed {
        Some(s) => rand_chacha::ChaCha8Rng::seed_from_u64(s),
        None => rand_chacha::ChaCha8Rng::from_entropy(),
    }
}
