//! Game state and the update state machine
//!
//! A [`Game`] is Active while a unit is falling. Every accepted command either
//! moves the unit or locks it; a lock clears rows, scores, and spawns the next
//! unit. When no unit can be spawned the game is Done.

use std::sync::Arc;

use tracing::debug;

use crate::board::Board;
use crate::cell::Direction;
use crate::command::{self, Command};
use crate::error::{GameError, ProblemError};
use crate::lcg::Lcg;
use crate::phrase::PhraseBook;
use crate::unit::Unit;

// ============================================================================
// CORE TYPES
// ============================================================================

/// What an accepted update did
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct UpdateOutcome {
    /// The unit locked into the board
    pub locked: bool,
    /// No further unit could be spawned
    pub done: bool,
}

impl UpdateOutcome {
    const MOVED: UpdateOutcome = UpdateOutcome { locked: false, done: false };
    const LOCKED: UpdateOutcome = UpdateOutcome { locked: true, done: false };
    const FINISHED: UpdateOutcome = UpdateOutcome { locked: true, done: true };
}

/// Points for locking a unit of `size` members that cleared `lines` rows
pub fn move_points(size: usize, lines: u32) -> i64 {
    let lines = lines as i64;
    size as i64 + 100 * (1 + lines) * lines / 2
}

/// Bonus for following a multi-line clear
pub fn line_bonus(previous_lines: u32, points: i64) -> i64 {
    if previous_lines > 1 {
        (previous_lines as i64 - 1) * points / 10
    } else {
        0
    }
}

/// One simulated game for one seed.
///
/// Cloning (see [`Game::fork`]) gives a fully independent copy; the unit
/// templates and phrase book are immutable and shared between copies.
#[derive(Clone, Debug)]
pub struct Game {
    board: Board,
    templates: Arc<Vec<Unit>>,
    phrases: Arc<PhraseBook>,
    lcg: Lcg,
    seed: u64,
    source_length: u32,
    dispatched: u32,
    unit: Unit,
    /// Positions the current unit has already occupied
    previous: Vec<Unit>,
    move_score: i64,
    previous_lines: u32,
    /// Occurrences per phrase, indexed like the phrase book
    phrase_counts: Vec<usize>,
    /// Played bytes, exactly as given
    commands: Vec<u8>,
    /// Direction of each played byte
    history: Vec<Direction>,
    locked_units: u32,
    done: bool,
}

impl Game {
    // ========================================================================
    // CONSTRUCTION
    // ========================================================================

    /// Start a game: draw and center the first unit.
    ///
    /// Fails when there are no templates, the game allows no units, or the
    /// first unit does not fit.
    pub fn new(
        board: Board,
        templates: Arc<Vec<Unit>>,
        phrases: Arc<PhraseBook>,
        seed: u64,
        source_length: u32,
    ) -> Result<Self, ProblemError> {
        if templates.is_empty() {
            return Err(ProblemError::NoUnits);
        }
        if source_length == 0 {
            return Err(ProblemError::NoSpawn { seed });
        }

        let mut lcg = Lcg::new(seed);
        let first = templates[lcg.next_index(templates.len())].centered_on(board.width());
        if !board.is_valid(&first) {
            return Err(ProblemError::NoSpawn { seed });
        }

        let phrase_counts = vec![0; phrases.len()];
        Ok(Self {
            board,
            templates,
            phrases,
            lcg,
            seed,
            source_length,
            dispatched: 1,
            unit: first,
            previous: Vec::new(),
            move_score: 0,
            previous_lines: 0,
            phrase_counts,
            commands: Vec::new(),
            history: Vec::new(),
            locked_units: 0,
            done: false,
        })
    }

    /// Independent deep copy for speculative play
    pub fn fork(&self) -> Game {
        self.clone()
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The falling unit (the last one placed, once the game is done)
    pub fn unit(&self) -> &Unit {
        &self.unit
    }

    pub fn previous_positions(&self) -> &[Unit] {
        &self.previous
    }

    pub fn phrases(&self) -> &PhraseBook {
        &self.phrases
    }

    pub fn phrase_counts(&self) -> &[usize] {
        &self.phrase_counts
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn source_length(&self) -> u32 {
        self.source_length
    }

    /// Units drawn so far, the current one included
    pub fn dispatched(&self) -> u32 {
        self.dispatched
    }

    pub fn locked_units(&self) -> u32 {
        self.locked_units
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Score from locked units and cleared lines only
    pub fn move_score(&self) -> i64 {
        self.move_score
    }

    /// Move score plus the power bonus for phrases spelled so far
    pub fn score(&self) -> i64 {
        self.move_score + self.phrases.bonus_from_counts(&self.phrase_counts)
    }

    /// The played commands, byte for byte
    pub fn commands(&self) -> String {
        self.commands.iter().map(|&b| b as char).collect()
    }

    pub fn history(&self) -> &[Direction] {
        &self.history
    }

    /// Commands to submit: every phrase spelled by direction is written out
    /// as its literal text
    pub fn final_commands(&self) -> String {
        self.phrases.substitute(&self.history, &self.commands)
    }

    /// Score of [`Game::final_commands`] as a judge would count it
    pub fn final_score(&self) -> i64 {
        self.move_score + self.phrases.bonus_for(&self.final_commands())
    }

    /// Would `direction` be rejected as a revisit?
    pub fn would_revisit(&self, direction: Direction) -> bool {
        let candidate = self.unit.step(direction);
        candidate.overlaps(&self.unit) || candidate.overlaps_any(&self.previous)
    }

    // ========================================================================
    // UPDATE
    // ========================================================================

    /// Feed one command byte.
    ///
    /// A rejected update leaves the game exactly as it was.
    pub fn update(&mut self, byte: u8) -> Result<UpdateOutcome, GameError> {
        if self.done {
            return Err(GameError::GameOver);
        }
        match command::parse(byte)? {
            Command::Noop => Ok(UpdateOutcome::MOVED),
            Command::Move(direction) => self.step(direction, byte),
        }
    }

    /// Play a direction using its canonical command byte
    pub fn apply(&mut self, direction: Direction) -> Result<UpdateOutcome, GameError> {
        if self.done {
            return Err(GameError::GameOver);
        }
        self.step(direction, command::canonical(direction))
    }

    /// Feed every byte of `commands`, stopping at the first rejection
    pub fn play(&mut self, commands: &str) -> Result<UpdateOutcome, GameError> {
        let mut outcome = UpdateOutcome::default();
        for byte in commands.bytes() {
            outcome = self.update(byte)?;
        }
        Ok(outcome)
    }

    fn step(&mut self, direction: Direction, byte: u8) -> Result<UpdateOutcome, GameError> {
        if self.would_revisit(direction) {
            return Err(GameError::RevisitedPosition);
        }

        let candidate = self.unit.step(direction);
        self.previous.push(self.unit.clone());
        self.record(direction, byte);

        if self.board.is_valid(&candidate) {
            self.unit = candidate;
            return Ok(UpdateOutcome::MOVED);
        }

        Ok(self.lock_and_advance())
    }

    fn record(&mut self, direction: Direction, byte: u8) {
        self.commands.push(byte);
        self.history.push(direction);
        for index in self.phrases.completed_by(&self.history) {
            self.phrase_counts[index] += 1;
        }
    }

    fn lock_and_advance(&mut self) -> UpdateOutcome {
        self.board.lock(&self.unit);
        self.locked_units += 1;

        let lines = self.board.clear_rows();
        let points = move_points(self.unit.size(), lines);
        self.move_score += points + line_bonus(self.previous_lines, points);
        self.previous_lines = lines;

        debug!(
            seed = self.seed,
            lines,
            score = self.move_score,
            locked = self.locked_units,
            "unit locked"
        );

        self.previous.clear();

        if self.dispatched >= self.source_length {
            self.done = true;
            return UpdateOutcome::FINISHED;
        }

        let index = self.lcg.next_index(self.templates.len());
        let next = self.templates[index].centered_on(self.board.width());
        self.dispatched += 1;

        if !self.board.is_valid(&next) {
            debug!(seed = self.seed, "no room to spawn next unit");
            self.done = true;
            return UpdateOutcome::FINISHED;
        }

        self.unit = next;
        UpdateOutcome::LOCKED
    }
}

// ============================================================================
// TESTS
// ============================================================================
