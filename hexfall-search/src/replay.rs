//! Replays a fixed command string one byte per step

use hexfall_core::Game;

use crate::{SearchError, Strategy};

pub struct ReplayStrategy {
    game: Game,
    commands: Vec<u8>,
    position: usize,
}

impl ReplayStrategy {
    pub fn new(game: Game, commands: &str) -> Self {
        Self {
            game,
            commands: commands.as_bytes().to_vec(),
            position: 0,
        }
    }

    pub fn remaining(&self) -> usize {
        self.commands.len() - self.position
    }
}

impl Strategy for ReplayStrategy {
    /// Reports done once the commands run out, even if the game goes on
    fn next(&mut self) -> Result<bool, SearchError> {
        let Some(&byte) = self.commands.get(self.position) else {
            return Ok(true);
        };
        self.position += 1;
        let outcome = self.game.update(byte)?;
        Ok(outcome.done)
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
    use super::*;
    use crate::fixtures;
    use hexfall_core::GameError;

    #[test]
    fn test_replays_in_order() {
        let mut strategy = ReplayStrategy::new(fixtures::game(5, 5, 3), "ei!");
        assert_eq!(strategy.remaining(), 3);
        for _ in 0..3 {
            assert_eq!(strategy.next(), Ok(false));
        }
        assert_eq!(strategy.current_game().commands(), "ei!");
        assert_eq!(strategy.next(), Ok(true));
    }

    #[test]
    fn test_rejected_byte_surfaces() {
        let mut strategy = ReplayStrategy::new(fixtures::game(5, 5, 3), "d");
        assert_eq!(
            strategy.next(),
            Err(SearchError::Game(GameError::RevisitedPosition))
        );
    }

    #[test]
    fn test_stops_when_game_ends() {
        let mut strategy = ReplayStrategy::new(fixtures::single_column(), "lalaaaa");
        let mut done = false;
        for _ in 0..4 {
            done = strategy.next().unwrap();
        }
        assert!(done);
        assert!(strategy.current_game().is_done());
    }
}
