//! Output records

use serde::{Deserialize, Serialize};

/// One solution as submitted
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputEntry {
    pub problem_id: u64,
    pub seed: u64,
    pub tag: String,
    pub solution: String,
}

impl OutputEntry {
    /// Tagged with `tag`, or with the score when no tag is given
    pub fn new(problem_id: u64, seed: u64, tag: Option<&str>, final_score: i64, solution: String) -> Self {
        let tag = match tag {
            Some(tag) => tag.to_string(),
            None => format!("Final Score: {}", final_score),
        };
        Self {
            problem_id,
            seed,
            tag,
            solution,
        }
    }
}
