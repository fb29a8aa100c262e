//! Phrase-driven strategies
//!
//! Instead of single directions these search over whole phrases of power.
//! A chosen phrase is queued and then played out one command per step.
//!
//! ## Architecture
//! - Level 2: ChanterStrategy / ChantRolloutStrategy - queue the next phrase
//! - Level 3: ChantBuilder (exhaustive) and phrase probes (sampled)
//! - Level 4: play_phrase - one phrase on one fork

use std::collections::VecDeque;

use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use hexfall_core::Game;

use crate::config::ChantConfig;
use crate::{best_index, create_rng, Outcome, SearchError, Strategy};

// ============================================================================
// PHRASE PLAYBACK (Level 4)
// ============================================================================

/// Bytes of phrase `index` in the game's phrase book
fn phrase_bytes(game: &Game, index: usize) -> Vec<u8> {
    game.phrases()
        .get(index)
        .map(|p| p.text().as_bytes().to_vec())
        .unwrap_or_default()
}

/// Play phrase `index` on `game`. Stops at the first rejected byte or at the
/// end of the game.
pub fn play_phrase(game: &mut Game, index: usize) -> Outcome {
    for byte in phrase_bytes(game, index) {
        match game.update(byte) {
            Err(_) => return Outcome::Invalid,
            Ok(update) if update.done => return Outcome::GameOver,
            Ok(_) => {}
        }
    }
    Outcome::Live
}

// ============================================================================
// PHRASE TREE (Level 3)
// ============================================================================

#[derive(Clone, Debug)]
pub struct ChantNode {
    /// None only for the root
    pub phrase: Option<usize>,
    pub game: Game,
    pub score: f64,
    pub outcome: Outcome,
    pub children: Vec<ChantNode>,
}

impl ChantNode {
    pub fn best_child(&self) -> Option<&ChantNode> {
        best_index(self.children.iter().map(|c| (c.outcome, c.score))).map(|i| &self.children[i])
    }
}

pub struct ChantBuilder<'a> {
    config: &'a ChantConfig,
    nodes_built: usize,
}

impl<'a> ChantBuilder<'a> {
    pub fn new(config: &'a ChantConfig) -> Self {
        Self {
            config,
            nodes_built: 0,
        }
    }

    pub fn nodes_built(&self) -> usize {
        self.nodes_built
    }

    /// Every phrase sequence `config.depth` phrases long
    pub fn build_root(&mut self, game: &Game) -> ChantNode {
        let depth = self.config.depth.max(1);
        let children: Vec<ChantNode> = (0..game.phrases().len())
            .map(|index| self.build(index, game, depth - 1))
            .collect();

        let mut root = ChantNode {
            phrase: None,
            game: game.fork(),
            score: self.config.dead_penalty,
            outcome: Outcome::Live,
            children,
        };
        if let Some(best) = root.best_child() {
            root.score = best.score;
        }
        if root.children.is_empty() || root.children.iter().all(|c| c.outcome == Outcome::Invalid) {
            root.outcome = Outcome::Invalid;
        }
        root
    }

    fn build(&mut self, index: usize, parent: &Game, remaining: u32) -> ChantNode {
        self.nodes_built += 1;

        let mut game = parent.fork();
        let outcome = play_phrase(&mut game, index);
        let mut node = ChantNode {
            phrase: Some(index),
            game,
            score: self.config.dead_penalty,
            outcome,
            children: Vec::new(),
        };
        if outcome.is_dead() {
            return node;
        }

        let own = node.game.score() as f64;
        if remaining == 0 {
            node.score = own;
            return node;
        }

        node.children = (0..parent.phrases().len())
            .map(|next| self.build(next, &node.game, remaining - 1))
            .collect();
        let best = node.best_child().map(|c| c.score).unwrap_or(self.config.dead_penalty);
        node.score = own + best;
        node
    }
}

// ============================================================================
// STRATEGIES (Level 2)
// ============================================================================

/// Pop the next queued byte and play it; the queue is dropped when the
/// game ends or rejects the byte
fn play_queued(game: &mut Game, queue: &mut VecDeque<u8>) -> Result<bool, SearchError> {
    let byte = queue.pop_front().ok_or(SearchError::NoLegalMove)?;
    match game.update(byte) {
        Ok(update) => {
            if update.done {
                queue.clear();
            }
            Ok(update.done)
        }
        Err(err) => {
            queue.clear();
            Err(err.into())
        }
    }
}

/// Exhaustive phrase tree, rebuilt each time the queued phrase runs out
pub struct ChanterStrategy {
    game: Game,
    config: ChantConfig,
    queue: VecDeque<u8>,
}

impl ChanterStrategy {
    pub fn new(game: Game, config: ChantConfig) -> Self {
        Self {
            game,
            config,
            queue: VecDeque::new(),
        }
    }

    fn choose_phrase(&self) -> Result<usize, SearchError> {
        let mut builder = ChantBuilder::new(&self.config);
        let root = builder.build_root(&self.game);
        if root.outcome.is_dead() {
            return Err(SearchError::NoLegalMove);
        }
        let best = root.best_child().ok_or(SearchError::TreeExhausted)?;
        if best.outcome == Outcome::Invalid {
            return Err(SearchError::NoLegalMove);
        }
        debug!(nodes = builder.nodes_built(), score = best.score, "built phrase tree");
        best.phrase.ok_or(SearchError::NoLegalMove)
    }
}

impl Strategy for ChanterStrategy {
    fn next(&mut self) -> Result<bool, SearchError> {
        if self.queue.is_empty() {
            let index = self.choose_phrase()?;
            self.queue.extend(phrase_bytes(&self.game, index));
            debug!(phrase = index, "chanting");
        }
        play_queued(&mut self.game, &mut self.queue)
    }

    fn current_game(&self) -> &Game {
        &self.game
    }

    fn into_game(self) -> Game {
        self.game
    }
}

/// Samples a few phrases and scores each with a random phrase continuation
pub struct ChantRolloutStrategy {
    game: Game,
    config: ChantConfig,
    rng: ChaCha8Rng,
    queue: VecDeque<u8>,
}

impl ChantRolloutStrategy {
    pub fn new(game: Game, config: ChantConfig, seed: Option<u64>) -> Self {
        Self {
            game,
            config,
            rng: create_rng(seed),
            queue: VecDeque::new(),
        }
    }

    /// Play phrase `index` on `game` then keep going with random phrases for
    /// `depth` more. Returns whether this phrase died and its score.
    fn probe(&mut self, game: &mut Game, index: usize, depth: u32) -> (bool, f64) {
        for byte in phrase_bytes(game, index) {
            let unit_before = game.unit().clone();
            match game.update(byte) {
                Err(_) => return (true, game.score() as f64 + self.config.dead_penalty),
                Ok(update) if update.done => {
                    return (true, game.score() as f64 + self.config.dead_penalty);
                }
                Ok(update)
                    if update.locked
                        && game.board().gap_below_any(&unit_before, self.config.gap_depth) =>
                {
                    return (false, game.score() as f64);
                }
                Ok(_) => {}
            }
        }

        let mut score = game.score() as f64;
        let count = game.phrases().len();
        if depth == 0 || count == 0 {
            return (false, score);
        }

        for _ in 0..self.config.retries.max(1) {
            let next = self.rng.gen_range(0..count);
            let mut fork = game.fork();
            let (dead, continued) = self.probe(&mut fork, next, depth - 1);
            score = continued;
            if !dead {
                break;
            }
        }
        (false, score)
    }

    fn choose_phrase(&mut self) -> Result<usize, SearchError> {
        let indices: Vec<usize> = (0..self.game.phrases().len()).collect();
        let candidates: Vec<usize> = indices
            .choose_multiple(&mut self.rng, self.config.width.max(1))
            .copied()
            .collect();

        let mut best: Option<(usize, f64)> = None;
        for index in candidates {
            let mut fork = self.game.fork();
            let (dead, score) = self.probe(&mut fork, index, self.config.rollout_depth);
            if !dead && best.map_or(true, |(_, s)| score > s) {
                best = Some((index, score));
            }
        }

        let (index, score) = best.ok_or(SearchError::NoLegalMove)?;
        debug!(phrase = index, score, "chant rollout choice");
        Ok(index)
    }
}

impl Strategy for ChantRolloutStrategy {
    fn next(&mut self) -> Result<bool, SearchError> {
        if self.queue.is_empty() {
            let index = self.choose_phrase()?;
            self.queue.extend(phrase_bytes(&self.game, index));
        }
        play_queued(&mut self.game, &mut self.queue)
    }

    fn current_game(&self) -> &Game {
        &self.game
    }

    fn into_game(self) -> Game {
        self.game
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::fixtures;
    use hexfall_core::{Board, PhraseBook};

    /// A wide open board and two short phrases
    fn open_game(phrases: &[&str]) -> Game {
        Game::new(
            Board::new(9, 9, &[]).unwrap(),
            Arc::new(vec![fixtures::single_cell()]),
            Arc::new(PhraseBook::new(phrases).unwrap()),
            0,
            4,
        )
        .unwrap()
    }

    fn small() -> ChantConfig {
        ChantConfig {
            depth: 2,
            rollout_depth: 2,
            retries: 5,
            width: 2,
            ..ChantConfig::default()
        }
    }

    #[test]
    fn test_play_phrase_outcomes() {
        let mut game = open_game(&["ei!"]);
        assert_eq!(play_phrase(&mut game, 0), Outcome::Live);
        assert_eq!(game.commands(), "ei!");

        // A single cell cannot rotate back onto itself
        let mut game = open_game(&["dd"]);
        assert_eq!(play_phrase(&mut game, 0), Outcome::Invalid);
    }

    #[test]
    fn test_tree_covers_every_sequence() {
        let config = small();
        let mut builder = ChantBuilder::new(&config);
        let root = builder.build_root(&open_game(&["ei!", "lal"]));
        assert_eq!(root.children.len(), 2);
        assert_eq!(builder.nodes_built(), 2 + 4);
        assert_eq!(root.outcome, Outcome::Live);
    }

    #[test]
    fn test_chanter_queues_whole_phrase() {
        let mut strategy = ChanterStrategy::new(open_game(&["ei!"]), small());
        assert_eq!(strategy.next(), Ok(false));
        assert_eq!(strategy.queue.len(), 2);
        assert_eq!(strategy.next(), Ok(false));
        assert_eq!(strategy.next(), Ok(false));
        assert_eq!(strategy.current_game().commands(), "ei!");
        assert_eq!(strategy.current_game().phrase_counts(), &[1]);
    }

    #[test]
    fn test_chanter_without_phrases_has_no_move() {
        let game = Game::new(
            Board::new(5, 5, &[]).unwrap(),
            Arc::new(vec![fixtures::single_cell()]),
            Arc::new(PhraseBook::empty()),
            0,
            2,
        )
        .unwrap();
        let mut strategy = ChanterStrategy::new(game, small());
        assert_eq!(strategy.next(), Err(SearchError::NoLegalMove));
    }

    #[test]
    fn test_chant_rollout_plays_a_phrase() {
        let mut strategy = ChantRolloutStrategy::new(open_game(&["ei!", "lal"]), small(), Some(4));
        assert_eq!(strategy.next(), Ok(false));
        let commands = strategy.current_game().commands();
        assert!(commands == "e" || commands == "l");
    }

    #[test]
    fn test_chant_rollout_rejects_dead_phrases() {
        let mut strategy = ChantRolloutStrategy::new(open_game(&["dd"]), small(), Some(1));
        assert_eq!(strategy.next(), Err(SearchError::NoLegalMove));
        assert_eq!(strategy.current_game().commands(), "");
    }
}
