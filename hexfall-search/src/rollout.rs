//! Monte-Carlo rollout strategy
//!
//! Each decision draws a handful of distinct candidate directions (lateral
//! moves are more likely than rotations), probes each with a long random
//! continuation, and commits to the candidate whose probe scored best. The
//! probed subtree under the chosen move is kept and reused next time.
//!
//! ## Architecture
//! - Level 2: MonteCarloStrategy::next() - retry until a live move is found
//! - Level 3: Prober - recursive probing with retries on dead ends
//! - Level 4: Weighted direction draws

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use hexfall_core::{Direction, Game};

use crate::config::RolloutConfig;
use crate::{create_rng, Outcome, SearchError, Strategy};

// ============================================================================
// WEIGHTED DRAWS (Level 4)
// ============================================================================

/// Draw one direction from a weighted list; None if the list is empty
pub fn draw_direction<R: Rng>(weights: &[(Direction, u32)], rng: &mut R) -> Option<Direction> {
    let dist = WeightedIndex::new(weights.iter().map(|&(_, w)| w)).ok()?;
    Some(weights[dist.sample(rng)].0)
}

/// Draw up to `n` distinct directions without replacement
pub fn draw_distinct<R: Rng>(n: usize, weights: &[(Direction, u32)], rng: &mut R) -> Vec<Direction> {
    let mut pool = weights.to_vec();
    let mut drawn = Vec::with_capacity(n.min(pool.len()));
    while drawn.len() < n {
        let Some(direction) = draw_direction(&pool, rng) else {
            break;
        };
        remove_direction(&mut pool, direction);
        drawn.push(direction);
    }
    drawn
}

pub fn remove_direction(weights: &mut Vec<(Direction, u32)>, direction: Direction) {
    weights.retain(|&(d, _)| d != direction);
}

// ============================================================================
// PROBE TREE
// ============================================================================

/// A probed position: the game after this node's move, how that move went,
/// and what its continuation scored
#[derive(Clone, Debug)]
pub struct ProbeNode {
    pub game: Game,
    pub outcome: Outcome,
    pub score: f64,
    /// Indexed by [`Direction::index`]
    pub children: [Option<Box<ProbeNode>>; 6],
}

impl ProbeNode {
    pub fn new(game: Game) -> Self {
        Self {
            game,
            outcome: Outcome::Live,
            score: 0.0,
            children: Default::default(),
        }
    }

    pub fn child(&self, direction: Direction) -> Option<&ProbeNode> {
        self.children[direction.index()].as_deref()
    }
}

// ============================================================================
// PROBING (Level 3)
// ============================================================================

/// Runs probes; owns nothing but borrowed config and RNG
pub struct Prober<'a> {
    config: &'a RolloutConfig,
    rng: &'a mut ChaCha8Rng,
    probes: usize,
}

impl<'a> Prober<'a> {
    pub fn new(config: &'a RolloutConfig, rng: &'a mut ChaCha8Rng) -> Self {
        Self {
            config,
            rng,
            probes: 0,
        }
    }

    pub fn probes(&self) -> usize {
        self.probes
    }

    /// Play `direction` on `node` (already forked from its parent) and probe
    /// up to `tries` further moves. Returns whether the move itself died and
    /// the score credited to it; the score is also stored on the node.
    pub fn try_direction(
        &mut self,
        node: &mut ProbeNode,
        direction: Direction,
        mut so_far: f64,
        tries: u32,
    ) -> (bool, f64) {
        self.probes += 1;
        let unit_before = node.game.unit().clone();

        let update = match node.game.apply(direction) {
            Ok(update) => update,
            Err(_) => {
                node.outcome = Outcome::Invalid;
                node.score = so_far + node.game.score() as f64 + self.config.dead_penalty;
                return (true, node.score);
            }
        };
        if update.done {
            node.outcome = Outcome::GameOver;
            node.score = so_far + node.game.score() as f64 + self.config.dead_penalty;
            return (true, node.score);
        }

        if direction.is_descent() {
            so_far += self.config.descent_bonus;
        }
        let here = so_far + node.game.score() as f64;

        if update.locked
            && node
                .game
                .board()
                .gap_below_any(&unit_before, self.config.gap_depth)
        {
            node.score = here - self.config.gap_penalty;
            return (false, node.score);
        }

        if tries == 0 {
            node.score = here;
            return (false, node.score);
        }

        let mut weights = self.config.weights.entries();
        let mut score = here;
        for _ in 0..self.config.path_end_retries.max(1) {
            let Some(next) = draw_direction(&weights, &mut *self.rng) else {
                break;
            };
            let mut child = ProbeNode::new(node.game.fork());
            let (dead, child_score) = self.try_direction(&mut child, next, so_far, tries - 1);
            node.children[next.index()] = Some(Box::new(child));
            score = child_score;
            if !dead {
                break;
            }
            remove_direction(&mut weights, next);
        }

        node.score = score;
        (false, score)
    }

    /// Probe `n` distinct directions from `root` (reusing earlier probes) and
    /// return the best one with the directions that were drawn
    pub fn try_directions(
        &mut self,
        root: &mut ProbeNode,
        n: usize,
        weights: &[(Direction, u32)],
    ) -> Option<(Direction, Vec<Direction>)> {
        let drawn = draw_distinct(n, weights, &mut *self.rng);

        for &direction in &drawn {
            if root.children[direction.index()].is_none() {
                let mut child = ProbeNode::new(root.game.fork());
                self.try_direction(&mut child, direction, 0.0, self.config.probe_depth);
                root.children[direction.index()] = Some(Box::new(child));
            }
        }

        let score_of = |d: Direction| root.child(d).map(|c| c.score).unwrap_or(f64::MIN);
        let mut best = *drawn.first()?;
        for &direction in &drawn {
            if score_of(direction) > score_of(best) {
                best = direction;
            }
        }
        Some((best, drawn))
    }
}

// ============================================================================
// STRATEGY (Level 2)
// ============================================================================

/// With no live move left, the best-scoring probed move that ends the game
fn final_move(root: &ProbeNode) -> Option<Direction> {
    Direction::ALL
        .iter()
        .copied()
        .filter(|&d| root.child(d).map(|c| c.outcome == Outcome::GameOver).unwrap_or(false))
        .max_by(|&a, &b| {
            let score = |d| root.child(d).map(|c| c.score).unwrap_or(f64::MIN);
            score(a).total_cmp(&score(b))
        })
}

pub struct MonteCarloStrategy {
    root: ProbeNode,
    config: RolloutConfig,
    rng: ChaCha8Rng,
}

impl MonteCarloStrategy {
    pub fn new(game: Game, config: RolloutConfig, seed: Option<u64>) -> Self {
        Self {
            root: ProbeNode::new(game),
            config,
            rng: create_rng(seed),
        }
    }

    pub fn root(&self) -> &ProbeNode {
        &self.root
    }
}

impl Strategy for MonteCarloStrategy {
    fn next(&mut self) -> Result<bool, SearchError> {
        let mut weights = self.config.weights.entries();
        let mut prober = Prober::new(&self.config, &mut self.rng);
        let mut chosen = None;

        for _ in 0..self.config.game_end_retries.max(1) {
            let Some((best, _)) = prober.try_directions(&mut self.root, self.config.probe_width, &weights)
            else {
                break;
            };
            let live = self.root.child(best).map(|c| !c.outcome.is_dead()).unwrap_or(false);
            if live {
                chosen = Some(best);
                break;
            }
            debug!(direction = %best, "best probe ends the game, redrawing");
            remove_direction(&mut weights, best);
            if weights.is_empty() {
                break;
            }
        }
        let probes = prober.probes();

        let direction = chosen
            .or_else(|| final_move(&self.root))
            .ok_or(SearchError::NoLegalMove)?;
        let child = self.root.children[direction.index()]
            .take()
            .ok_or(SearchError::NoLegalMove)?;

        debug!(%direction, score = child.score, probes, "monte-carlo move");
        self.root = *child;
        Ok(self.root.game.is_done())
    }

    fn current_game(&self) -> &Game {
        &self.root.game
    }

    fn into_game(self) -> Game {
        self.root.game
    }
}
