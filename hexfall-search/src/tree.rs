//! Depth-bounded score tree
//!
//! Builds every direction sequence to a fixed depth, scores the leaves by
//! score plus how far down the unit sits, and propagates the best child's
//! score upward. The strategy then walks the tree one best child per move.
//!
//! ## Architecture
//! - Level 2: TreeStrategy::next() - descend, rebuild on exhaustion
//! - Level 3: TreeBuilder - recursive construction and scoring
//! - Level 4: ScoreNode accessors

use rayon::prelude::*;
use tracing::debug;

use hexfall_core::{Direction, Game};

use crate::config::TreeConfig;
use crate::{best_index, Outcome, SearchError, Strategy};

/// Order in which children are built; ties resolve to the earliest
pub const SEARCH_ORDER: [Direction; 6] = [
    Direction::SE,
    Direction::SW,
    Direction::E,
    Direction::W,
    Direction::Cw,
    Direction::Ccw,
];

// ============================================================================
// TREE NODES (Level 4)
// ============================================================================

#[derive(Clone, Debug)]
pub struct ScoreNode {
    /// None only for the root
    pub direction: Option<Direction>,
    pub game: Game,
    pub score: f64,
    pub outcome: Outcome,
    pub children: Vec<ScoreNode>,
}

impl ScoreNode {
    pub fn is_dead(&self) -> bool {
        self.outcome.is_dead()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Highest-scoring live child; dead children only when nothing is live
    pub fn best_child_index(&self) -> Option<usize> {
        best_index(self.children.iter().map(|c| (c.outcome, c.score)))
    }

    pub fn best_child(&self) -> Option<&ScoreNode> {
        self.best_child_index().map(|i| &self.children[i])
    }

    /// Nodes in this subtree, itself included
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(ScoreNode::size).sum::<usize>()
    }
}

// ============================================================================
// CONSTRUCTION (Level 3)
// ============================================================================

/// Builds score trees; holds the per-build node counter
pub struct TreeBuilder<'a> {
    config: &'a TreeConfig,
    nodes_built: usize,
}

impl<'a> TreeBuilder<'a> {
    pub fn new(config: &'a TreeConfig) -> Self {
        Self {
            config,
            nodes_built: 0,
        }
    }

    pub fn nodes_built(&self) -> usize {
        self.nodes_built
    }

    /// Root for `game` with one subtree per direction, `config.depth` plies deep
    pub fn build_root(&mut self, game: &Game) -> ScoreNode {
        let depth = self.config.depth.max(1);

        let children: Vec<ScoreNode> = if self.config.parallel {
            let config = self.config;
            let built: Vec<(ScoreNode, usize)> = SEARCH_ORDER
                .par_iter()
                .map(|&direction| {
                    let mut builder = TreeBuilder::new(config);
                    let node = builder.build(direction, game, depth - 1, 1);
                    (node, builder.nodes_built)
                })
                .collect();
            built
                .into_iter()
                .map(|(node, count)| {
                    self.nodes_built += count;
                    node
                })
                .collect()
        } else {
            SEARCH_ORDER
                .iter()
                .map(|&direction| self.build(direction, game, depth - 1, 1))
                .collect()
        };

        let mut root = ScoreNode {
            direction: None,
            game: game.fork(),
            score: 0.0,
            outcome: Outcome::Live,
            children,
        };
        root.score = root.best_child().map(|c| c.score).unwrap_or(self.config.dead_penalty);
        if root.children.iter().all(|c| c.outcome == Outcome::Invalid) {
            root.outcome = Outcome::Invalid;
        }
        root
    }

    /// Node for `direction` played from `parent`, with `remaining` plies below
    /// and sitting `height` plies under the root
    pub fn build(&mut self, direction: Direction, parent: &Game, remaining: u32, height: u32) -> ScoreNode {
        self.nodes_built += 1;

        let mut game = parent.fork();
        let outcome = match game.apply(direction) {
            Err(_) => Outcome::Invalid,
            Ok(update) if update.done => Outcome::GameOver,
            Ok(_) => Outcome::Live,
        };

        let mut node = ScoreNode {
            direction: Some(direction),
            game,
            score: self.config.dead_penalty,
            outcome,
            children: Vec::new(),
        };
        if node.is_dead() {
            return node;
        }

        let own = node.game.score() as f64;
        if remaining == 0 {
            let descent = node.game.unit().mean_row() + height as f64;
            node.score = own + self.config.depth_weight * descent;
            return node;
        }

        node.children = SEARCH_ORDER
            .iter()
            .map(|&d| self.build(d, &node.game, remaining - 1, height + 1))
            .collect();
        let best = node.best_child().map(|c| c.score).unwrap_or(self.config.dead_penalty);
        node.score = own + best;
        node
    }
}

// ============================================================================
// DESCENT (Level 2)
// ============================================================================

/// Walks a built tree one best child at a time
pub struct TreeDescender {
    root: ScoreNode,
}

impl TreeDescender {
    pub fn new(root: ScoreNode) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &ScoreNode {
        &self.root
    }

    /// Step to the best child and return its direction
    pub fn next_direction(&mut self) -> Result<Direction, SearchError> {
        if self.root.is_dead() {
            return Err(SearchError::NoLegalMove);
        }
        let index = self.root.best_child_index().ok_or(SearchError::TreeExhausted)?;
        let child = self.root.children.swap_remove(index);
        if child.outcome == Outcome::Invalid {
            return Err(SearchError::NoLegalMove);
        }
        let direction = child.direction.ok_or(SearchError::NoLegalMove)?;
        self.root = child;
        Ok(direction)
    }
}

pub struct TreeStrategy {
    game: Game,
    config: TreeConfig,
    descender: Option<TreeDescender>,
}

impl TreeStrategy {
    pub fn new(game: Game, config: TreeConfig) -> Self {
        Self {
            game,
            config,
            descender: None,
        }
    }

    fn rebuild(&mut self) -> &mut TreeDescender {
        let mut builder = TreeBuilder::new(&self.config);
        let root = builder.build_root(&self.game);
        debug!(
            nodes = builder.nodes_built(),
            best = root.score,
            "built score tree"
        );
        self.descender.insert(TreeDescender::new(root))
    }
}

impl Strategy for TreeStrategy {
    fn next(&mut self) -> Result<bool, SearchError> {
        let step = match self.descender.as_mut() {
            Some(descender) => descender.next_direction(),
            None => Err(SearchError::TreeExhausted),
        };

        let step = match step {
            Err(SearchError::TreeExhausted) => self.rebuild().next_direction(),
            other => other,
        };
        let direction = match step {
            Ok(direction) => direction,
            Err(err) => {
                // Dead tree; the next call starts from scratch
                self.descender = None;
                return Err(err);
            }
        };

        debug!(%direction, "tree move");
        match self.game.apply(direction) {
            Ok(outcome) => Ok(outcome.done),
            Err(err) => {
                self.descender = None;
                Err(err.into())
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

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    fn shallow(depth: u32) -> TreeConfig {
        TreeConfig {
            depth,
            ..TreeConfig::default()
        }
    }

    #[test]
    fn test_tree_size() {
        let config = shallow(2);
        let mut builder = TreeBuilder::new(&config);
        let root = builder.build_root(&fixtures::game(7, 7, 5));
        assert_eq!(root.children.len(), 6);
        // Rotations of a single cell are dead and never expanded
        assert!(root.children[4].is_dead());
        assert!(root.children[4].is_leaf());
        assert_eq!(builder.nodes_built(), root.size() - 1);
    }

    #[test]
    fn test_dead_nodes_score_penalty() {
        let config = shallow(1);
        let mut builder = TreeBuilder::new(&config);
        let root = builder.build_root(&fixtures::game(7, 7, 5));
        let cw = &root.children[4];
        assert_eq!(cw.outcome, Outcome::Invalid);
        assert_eq!(cw.score, config.dead_penalty);
    }

    #[test]
    fn test_leaves_prefer_descending() {
        let config = shallow(1);
        let mut builder = TreeBuilder::new(&config);
        let root = builder.build_root(&fixtures::game(7, 7, 5));
        let best = root.best_child().unwrap();
        // SE comes first and moves down a row
        assert_eq!(best.direction, Some(Direction::SE));
        assert!(best.score > root.children[2].score);
    }

    #[test]
    fn test_parallel_build_matches_sequential() {
        let game = fixtures::game(6, 6, 3);
        let sequential = shallow(3);
        let parallel = TreeConfig {
            parallel: true,
            ..shallow(3)
        };

        let mut a = TreeBuilder::new(&sequential);
        let mut b = TreeBuilder::new(&parallel);
        let left = a.build_root(&game);
        let right = b.build_root(&game);

        assert_eq!(a.nodes_built(), b.nodes_built());
        assert_eq!(left.score, right.score);
        assert_eq!(left.best_child_index(), right.best_child_index());
    }

    #[test]
    fn test_descender_exhausts_at_leaf() {
        let config = shallow(1);
        let root = TreeBuilder::new(&config).build_root(&fixtures::game(5, 5, 5));
        let mut descender = TreeDescender::new(root);
        assert_eq!(descender.next_direction(), Ok(Direction::SE));
        assert_eq!(descender.next_direction(), Err(SearchError::TreeExhausted));
    }

    #[test]
    fn test_strategy_rebuilds_and_finishes() {
        let mut strategy = TreeStrategy::new(fixtures::game(4, 4, 3), shallow(2));
        let mut done = false;
        for _ in 0..100 {
            done = strategy.next().unwrap();
            if done {
                break;
            }
        }
        assert!(done);
        assert!(strategy.current_game().move_score() > 0);
    }

    #[test]
    fn test_game_over_root_has_no_moves() {
        let mut game = fixtures::game(2, 1, 1);
        game.apply(Direction::SE).unwrap();
        let mut strategy = TreeStrategy::new(game, shallow(2));
        assert_eq!(strategy.next(), Err(SearchError::NoLegalMove));
        assert!(strategy.descender.is_none());
    }
}
