//! Phrases of power
//!
//! A phrase earns a bonus every time it shows up in the played command
//! string. Phrases are kept in two forms: the literal text that ends up in
//! the submitted solution, and the direction sequence it spells, which is
//! what the game actually tracks while playing.

use serde::{Deserialize, Serialize};

use crate::cell::Direction;
use crate::command::{self, Command};
use crate::error::ProblemError;

/// Stock phrases used when none are supplied
pub const DEFAULT_PHRASES: [&str; 12] = [
    "ei!",
    "ia! ia!",
    "r'lyeh",
    "yuggoth",
    "tsathoggua",
    "necronomicon",
    "planet 10",
    "monkeyboy",
    "john bigboote",
    "case nightmare green",
    "the laundry",
    "blue hades",
];

/// Flat bonus for a phrase that appears at least once
pub const FIRST_USE_BONUS: i64 = 300;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phrase {
    text: String,
    directions: Vec<Direction>,
}

impl Phrase {
    /// Parse a phrase; every byte must be a movement or rotation command
    pub fn new(text: &str) -> Result<Self, ProblemError> {
        let bad = |byte| ProblemError::BadPhrase {
            phrase: text.to_string(),
            byte,
        };

        let mut directions = Vec::with_capacity(text.len());
        for byte in text.bytes() {
            match command::parse(byte) {
                Ok(Command::Move(direction)) => directions.push(direction),
                Ok(Command::Noop) | Err(_) => return Err(bad(byte)),
            }
        }
        if directions.is_empty() {
            return Err(bad(0));
        }

        Ok(Self {
            text: text.to_string(),
            directions,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn directions(&self) -> &[Direction] {
        &self.directions
    }

    pub fn len(&self) -> usize {
        self.directions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.directions.is_empty()
    }

    /// Bonus for `occurrences` appearances
    pub fn bonus(&self, occurrences: usize) -> i64 {
        power_bonus(self.len(), occurrences)
    }
}

/// `2 * len * occurrences + 300`, or nothing for zero occurrences
pub fn power_bonus(len: usize, occurrences: usize) -> i64 {
    if occurrences == 0 {
        return 0;
    }
    2 * len as i64 * occurrences as i64 + FIRST_USE_BONUS
}

/// Count occurrences of `needle` in `haystack`, letting matches overlap.
///
/// The scan restarts one character past the start of each match, so
/// "aaa" holds "aa" twice.
pub fn count_overlapping(haystack: &str, needle: &str) -> usize {
    if needle.is_empty() {
        return 0;
    }

    let mut count = 0;
    let mut from = 0;
    while let Some(pos) = haystack[from..].find(needle) {
        count += 1;
        from += pos + 1;
        while !haystack.is_char_boundary(from) {
            from += 1;
        }
    }
    count
}

// ============================================================================
// PHRASE BOOK
// ============================================================================

/// The set of phrases a game is scored against
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhraseBook {
    phrases: Vec<Phrase>,
    /// Indices into `phrases`, longest first
    by_length: Vec<usize>,
}

impl PhraseBook {
    /// Build a book, dropping duplicate phrases
    pub fn new<S: AsRef<str>>(texts: &[S]) -> Result<Self, ProblemError> {
        let mut phrases: Vec<Phrase> = Vec::with_capacity(texts.len());
        for text in texts {
            let phrase = Phrase::new(text.as_ref())?;
            if !phrases.iter().any(|p| p.text == phrase.text) {
                phrases.push(phrase);
            }
        }

        let mut by_length: Vec<usize> = (0..phrases.len()).collect();
        by_length.sort_by(|&a, &b| phrases[b].len().cmp(&phrases[a].len()));

        Ok(Self { phrases, by_length })
    }

    /// A book with no phrases at all
    pub fn empty() -> Self {
        Self {
            phrases: Vec::new(),
            by_length: Vec::new(),
        }
    }

    pub fn phrases(&self) -> &[Phrase] {
        &self.phrases
    }

    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Phrase> {
        self.phrases.get(index)
    }

    /// Indices of phrases whose direction form ends `history`
    pub fn completed_by<'a>(&'a self, history: &'a [Direction]) -> impl Iterator<Item = usize> + 'a {
        self.phrases
            .iter()
            .enumerate()
            .filter(move |(_, p)| history.ends_with(&p.directions))
            .map(|(i, _)| i)
    }

    /// Power bonus from per-phrase occurrence counters (indexed like `phrases`)
    pub fn bonus_from_counts(&self, counts: &[usize]) -> i64 {
        self.phrases
            .iter()
            .zip(counts)
            .map(|(phrase, &n)| phrase.bonus(n))
            .sum()
    }

    /// Power bonus counting phrase text literally in a command string
    pub fn bonus_for(&self, commands: &str) -> i64 {
        self.phrases
            .iter()
            .map(|phrase| phrase.bonus(count_overlapping(commands, &phrase.text)))
            .sum()
    }

    /// Rewrite played commands so every phrase spelled by direction appears
    /// as literal phrase text.
    ///
    /// `directions[i]` must be the direction of `raw[i]`. Every position where
    /// a phrase matches gets its text written over the played bytes, so
    /// overlapping occurrences survive as literal text. Later positions
    /// overwrite shared bytes and at one position the longest phrase is
    /// written last. Bytes outside any match keep their played spelling.
    pub fn substitute(&self, directions: &[Direction], raw: &[u8]) -> String {
        let mut out = raw[..directions.len()].to_vec();
        for i in 0..directions.len() {
            let rest = &directions[i..];
            for phrase in self.by_length.iter().rev().map(|&k| &self.phrases[k]) {
                if rest.starts_with(&phrase.directions) {
                    out[i..i + phrase.len()].copy_from_slice(phrase.text.as_bytes());
                }
            }
        }
        out.into_iter().map(char::from).collect()
    }
}

impl Default for PhraseBook {
    fn default() -> Self {
        // The stock phrases are all valid commands
        Self::new(&DEFAULT_PHRASES).unwrap_or_else(|_| Self::empty())
    }
}
