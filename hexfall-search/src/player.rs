//! Strategy selection by name
//!
//! [`StrategyKind`] is what a command line names; [`Player`] is the
//! constructed strategy behind one enum so callers need no boxing.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use hexfall_core::Game;

use crate::chant::{ChantRolloutStrategy, ChanterStrategy};
use crate::config::SearchConfig;
use crate::lookahead::LookaheadStrategy;
use crate::random::RandomStrategy;
use crate::replay::ReplayStrategy;
use crate::rollout::MonteCarloStrategy;
use crate::tree::TreeStrategy;
use crate::{SearchError, Strategy};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyKind {
    Random,
    Lookahead,
    Tree,
    #[serde(rename = "montecarlo")]
    MonteCarlo,
    Chanter,
    ChantRollout,
    Replay,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 7] = [
        StrategyKind::Random,
        StrategyKind::Lookahead,
        StrategyKind::Tree,
        StrategyKind::MonteCarlo,
        StrategyKind::Chanter,
        StrategyKind::ChantRollout,
        StrategyKind::Replay,
    ];

    pub fn name(self) -> &'static str {
        match self {
            StrategyKind::Random => "random",
            StrategyKind::Lookahead => "lookahead",
            StrategyKind::Tree => "tree",
            StrategyKind::MonteCarlo => "montecarlo",
            StrategyKind::Chanter => "chanter",
            StrategyKind::ChantRollout => "chant-rollout",
            StrategyKind::Replay => "replay",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StrategyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        StrategyKind::ALL
            .into_iter()
            .find(|kind| kind.name() == lowered)
            .ok_or_else(|| {
                let known: Vec<&str> = StrategyKind::ALL.iter().map(|k| k.name()).collect();
                format!("unknown strategy '{}', expected one of: {}", s, known.join(", "))
            })
    }
}

/// Any strategy, chosen at runtime
pub enum Player {
    Random(RandomStrategy),
    Lookahead(LookaheadStrategy),
    Tree(TreeStrategy),
    MonteCarlo(MonteCarloStrategy),
    Chanter(ChanterStrategy),
    ChantRollout(ChantRolloutStrategy),
    Replay(ReplayStrategy),
}

impl Player {
    pub fn new(kind: StrategyKind, game: Game, config: &SearchConfig) -> Self {
        match kind {
            StrategyKind::Random => Player::Random(RandomStrategy::new(game, config.seed)),
            StrategyKind::Lookahead => Player::Lookahead(LookaheadStrategy::new(game)),
            StrategyKind::Tree => Player::Tree(TreeStrategy::new(game, config.tree.clone())),
            StrategyKind::MonteCarlo => {
                Player::MonteCarlo(MonteCarloStrategy::new(game, config.rollout.clone(), config.seed))
            }
            StrategyKind::Chanter => Player::Chanter(ChanterStrategy::new(game, config.chant.clone())),
            StrategyKind::ChantRollout => {
                Player::ChantRollout(ChantRolloutStrategy::new(game, config.chant.clone(), config.seed))
            }
            StrategyKind::Replay => Player::Replay(ReplayStrategy::new(game, &config.replay)),
        }
    }

    pub fn kind(&self) -> StrategyKind {
        match self {
            Player::Random(_) => StrategyKind::Random,
            Player::Lookahead(_) => StrategyKind::Lookahead,
            Player::Tree(_) => StrategyKind::Tree,
            Player::MonteCarlo(_) => StrategyKind::MonteCarlo,
            Player::Chanter(_) => StrategyKind::Chanter,
            Player::ChantRollout(_) => StrategyKind::ChantRollout,
            Player::Replay(_) => StrategyKind::Replay,
        }
    }

    pub fn name(&self) -> &'static str {
        self.kind().name()
    }
}

impl Strategy for Player {
    fn next(&mut self) -> Result<bool, SearchError> {
        match self {
            Player::Random(s) => s.next(),
            Player::Lookahead(s) => s.next(),
            Player::Tree(s) => s.next(),
            Player::MonteCarlo(s) => s.next(),
            Player::Chanter(s) => s.next(),
            Player::ChantRollout(s) => s.next(),
            Player::Replay(s) => s.next(),
        }
    }

    fn current_game(&self) -> &Game {
        match self {
            Player::Random(s) => s.current_game(),
            Player::Lookahead(s) => s.current_game(),
            Player::Tree(s) => s.current_game(),
            Player::MonteCarlo(s) => s.current_game(),
            Player::Chanter(s) => s.current_game(),
            Player::ChantRollout(s) => s.current_game(),
            Player::Replay(s) => s.current_game(),
        }
    }

    fn into_game(self) -> Game {
        match self {
            Player::Random(s) => s.into_game(),
            Player::Lookahead(s) => s.into_game(),
            Player::Tree(s) => s.into_game(),
            Player::MonteCarlo(s) => s.into_game(),
            Player::Chanter(s) => s.into_game(),
            Player::ChantRollout(s) => s.into_game(),
            Player::Replay(s) => s.into_game(),
        }
    }
}
