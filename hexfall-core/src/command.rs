//! The command alphabet
//!
//! Every direction has six single-byte spellings. The first spelling of each
//! is the canonical one used when a strategy plays a bare direction.

use crate::cell::Direction;
use crate::error::GameError;

// ============================================================================
// ALIAS TABLE
// ============================================================================

const W_ALIASES: [u8; 6] = [b'p', b'\'', b'!', b'.', b'0', b'3'];
const E_ALIASES: [u8; 6] = [b'b', b'c', b'e', b'f', b'y', b'2'];
const SW_ALIASES: [u8; 6] = [b'a', b'g', b'h', b'i', b'j', b'4'];
const SE_ALIASES: [u8; 6] = [b'l', b'm', b'n', b'o', b' ', b'5'];
const CW_ALIASES: [u8; 6] = [b'd', b'q', b'r', b'v', b'z', b'1'];
const CCW_ALIASES: [u8; 6] = [b'k', b's', b't', b'u', b'w', b'x'];

/// Bytes accepted and ignored
pub const NOOP_BYTES: [u8; 3] = [b'\t', b'\n', b'\r'];

/// A decoded command byte
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Move(Direction),
    Noop,
}

/// Decode one command byte (case-sensitive)
pub fn parse(byte: u8) -> Result<Command, GameError> {
    if NOOP_BYTES.contains(&byte) {
        return Ok(Command::Noop);
    }
    Direction::ALL
        .iter()
        .copied()
        .find(|&d| aliases(d).contains(&byte))
        .map(Command::Move)
        .ok_or(GameError::UnknownCommand(byte))
}

/// All six spellings of a direction, canonical first
pub fn aliases(direction: Direction) -> &'static [u8; 6] {
    match direction {
        Direction::E => &E_ALIASES,
        Direction::W => &W_ALIASES,
        Direction::SE => &SE_ALIASES,
        Direction::SW => &SW_ALIASES,
        Direction::Cw => &CW_ALIASES,
        Direction::Ccw => &CCW_ALIASES,
    }
}

pub fn canonical(direction: Direction) -> u8 {
    aliases(direction)[0]
}

/// Map a command string onto directions, dropping no-op bytes
pub fn normalize(text: &str) -> Result<Vec<Direction>, GameError> {
    let mut directions = Vec::with_capacity(text.len());
    for byte in text.bytes() {
        if let Command::Move(direction) = parse(byte)? {
            directions.push(direction);
        }
    }
    Ok(directions)
}

/// Spell a direction sequence with canonical bytes
pub fn spell(directions: &[Direction]) -> String {
    directions.iter().map(|&d| canonical(d) as char).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_alias_parses_to_its_direction() {
        for direction in Direction::ALL {
            for &byte in aliases(direction) {
                assert_eq!(parse(byte), Ok(Command::Move(direction)), "byte {:?}", byte as char);
            }
        }
    }

    #[test]
    fn test_aliases_are_disjoint() {
        let mut seen = Vec::new();
        for direction in Direction::ALL {
            for &byte in aliases(direction) {
                assert!(!seen.contains(&byte));
                seen.push(byte);
            }
        }
        assert_eq!(seen.len(), 36);
    }

    #[test]
    fn test_noop_and_unknown() {
        assert_eq!(parse(b'\n'), Ok(Command::Noop));
        assert_eq!(parse(b'\t'), Ok(Command::Noop));
        assert_eq!(parse(b'A'), Err(GameError::UnknownCommand(b'A')));
        assert_eq!(parse(b'#'), Err(GameError::UnknownCommand(b'#')));
    }

    #[test]
    fn test_normalize() {
        assert_eq!(
            normalize("ei!").unwrap(),
            vec![Direction::E, Direction::SW, Direction::W]
        );
        assert_eq!(normalize("l\nm").unwrap(), vec![Direction::SE, Direction::SE]);
        assert!(normalize("EI!").is_err());
    }

    #[test]
    fn test_spell_uses_canonical_bytes() {
        assert_eq!(spell(&Direction::ALL), "bpladk");
    }
}
