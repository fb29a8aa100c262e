//! Search configuration
//!
//! Every knob the strategies use lives here so a whole run can be described
//! by one JSON document. Missing fields fall back to their defaults.

use serde::{Deserialize, Serialize};

use hexfall_core::Direction;

/// Top-level configuration shared by every strategy
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub tree: TreeConfig,
    pub rollout: RolloutConfig,
    pub chant: ChantConfig,
    /// Random seed for reproducibility (None = from entropy)
    pub seed: Option<u64>,
    /// Commands played by the replay strategy
    pub replay: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            tree: TreeConfig::default(),
            rollout: RolloutConfig::default(),
            chant: ChantConfig::default(),
            seed: None,
            replay: String::new(),
        }
    }
}

impl SearchConfig {
    /// Set random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the replay command string
    pub fn with_replay(mut self, commands: impl Into<String>) -> Self {
        self.replay = commands.into();
        self
    }

    /// Set the score-tree depth
    pub fn with_tree_depth(mut self, depth: u32) -> Self {
        self.tree.depth = depth;
        self
    }

    pub fn with_rollout(mut self, rollout: RolloutConfig) -> Self {
        self.rollout = rollout;
        self
    }

    pub fn with_chant(mut self, chant: ChantConfig) -> Self {
        self.chant = chant;
        self
    }
}

// ============================================================================
// SCORE TREE
// ============================================================================

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    /// Plies below the current position
    pub depth: u32,
    /// Weight of (mean member row + ply) at the leaves
    pub depth_weight: f64,
    /// Score of a node whose move errors or ends the game
    pub dead_penalty: f64,
    /// Build the root's subtrees in parallel
    pub parallel: bool,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            depth: 4,
            depth_weight: 100.0,
            dead_penalty: -1_000_000.0,
            parallel: false,
        }
    }
}

// ============================================================================
// MONTE-CARLO ROLLOUT
// ============================================================================

/// Relative draw weights per direction
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectionWeights {
    pub east: u32,
    pub west: u32,
    pub south_east: u32,
    pub south_west: u32,
    pub clockwise: u32,
    pub counter_clockwise: u32,
}

impl Default for DirectionWeights {
    fn default() -> Self {
        Self {
            east: 75,
            west: 75,
            south_east: 25,
            south_west: 25,
            clockwise: 25,
            counter_clockwise: 25,
        }
    }
}

impl DirectionWeights {
    pub fn weight(&self, direction: Direction) -> u32 {
        match direction {
            Direction::E => self.east,
            Direction::W => self.west,
            Direction::SE => self.south_east,
            Direction::SW => self.south_west,
            Direction::Cw => self.clockwise,
            Direction::Ccw => self.counter_clockwise,
        }
    }

    /// Directions with a non-zero weight, in enumeration order
    pub fn entries(&self) -> Vec<(Direction, u32)> {
        Direction::ALL
            .iter()
            .map(|&d| (d, self.weight(d)))
            .filter(|&(_, w)| w > 0)
            .collect()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RolloutConfig {
    /// Moves probed below each candidate
    pub probe_depth: u32,
    /// Distinct candidate directions drawn per decision
    pub probe_width: usize,
    /// Redraws when the best candidate ends the game
    pub game_end_retries: usize,
    /// Redraws when a probe continuation dies
    pub path_end_retries: usize,
    /// Added to a probe's score when its move errors or ends the game
    pub dead_penalty: f64,
    /// Added for every SE/SW move along a probe
    pub descent_bonus: f64,
    /// Diagonal steps inspected below a freshly locked unit
    pub gap_depth: u32,
    /// Subtracted when a lock leaves an empty cell below the unit
    pub gap_penalty: f64,
    pub weights: DirectionWeights,
}

impl Default for RolloutConfig {
    fn default() -> Self {
        Self {
            probe_depth: 300,
            probe_width: 6,
            game_end_retries: 1000,
            path_end_retries: 10,
            dead_penalty: -1_000_000.0,
            descent_bonus: 10.0,
            gap_depth: 3,
            gap_penalty: 25.0,
            weights: DirectionWeights::default(),
        }
    }
}

// ============================================================================
// PHRASES
// ============================================================================

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChantConfig {
    /// Phrase plies in the chanter's tree
    pub depth: u32,
    /// Score of a phrase that errors or ends the game
    pub dead_penalty: f64,
    /// Phrases chained below each sampled phrase by chant-rollout
    pub rollout_depth: u32,
    /// Redraws when a chained phrase dies
    pub retries: usize,
    /// Phrases sampled per chant-rollout decision
    pub width: usize,
    /// Diagonal steps inspected below a unit that locks mid-rollout
    pub gap_depth: u32,
}

impl Default for ChantConfig {
    fn default() -> Self {
        Self {
            depth: 3,
            dead_penalty: -1_000_000_000.0,
            rollout_depth: 6,
            retries: 100,
            width: 4,
            gap_depth: 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SearchConfig::default();
        assert_eq!(config.tree.depth, 4);
        assert_eq!(config.rollout.weights.weight(Direction::E), 75);
        assert_eq!(config.rollout.weights.weight(Direction::Cw), 25);
        assert!(config.seed.is_none());
    }

    #[test]
    fn test_builders() {
        let config = SearchConfig::default()
            .with_seed(9)
            .with_replay("lll")
            .with_tree_depth(2);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.replay, "lll");
        assert_eq!(config.tree.depth, 2);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: SearchConfig =
            serde_json::from_str(r#"{"seed": 3, "tree": {"depth": 2}}"#).unwrap();
        assert_eq!(config.seed, Some(3));
        assert_eq!(config.tree.depth, 2);
        assert_eq!(config.tree.depth_weight, 100.0);
        assert_eq!(config.rollout, RolloutConfig::default());
    }

    #[test]
    fn test_zero_weights_are_skipped() {
        let weights = DirectionWeights {
            clockwise: 0,
            counter_clockwise: 0,
            ..Default::default()
        };
        let entries = weights.entries();
        assert_eq!(entries.len(), 4);
        assert!(entries.iter().all(|(d, _)| !d.is_rotation()));
    }
}
