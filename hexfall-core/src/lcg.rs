//! Linear congruential generator for the unit sequence
//!
//! The sequence must match the problem setter's bit for bit.

const MULTIPLIER: u32 = 1103515245;
const INCREMENT: u32 = 12345;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Lcg {
    state: u32,
}

impl Lcg {
    pub fn new(seed: u64) -> Self {
        Self { state: seed as u32 }
    }

    /// Emit bits 16..30 of the current state, then advance.
    ///
    /// Only the low 31 bits ever reach the output, so wrapping at 2^32 gives
    /// the same sequence as reducing modulo 2^31.
    pub fn next_value(&mut self) -> u32 {
        let value = (self.state >> 16) & 0x7fff;
        self.state = self.state.wrapping_mul(MULTIPLIER).wrapping_add(INCREMENT);
        value
    }

    /// Draw a template index in `0..count`
    pub fn next_index(&mut self, count: usize) -> usize {
        if count == 0 {
            return 0;
        }
        self.next_value() as usize % count
    }
}
