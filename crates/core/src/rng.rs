//! RNG module - deterministic piece randomization
//!
//! Pieces are drawn from the configured definition set either uniformly at
//! random (the default) or from a shuffled bag that hands out each definition
//! once before refilling. Both run on a small LCG so a session replays
//! identically from the same seed.

use serde::{Deserialize, Serialize};

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    ///
    /// Uses the high bits; the low bits of an LCG cycle with short periods.
    pub fn next_range(&mut self, max: u32) -> u32 {
        ((self.next_u32() as u64 * max as u64) >> 32) as u32
    }

    /// Shuffle a slice using Fisher-Yates
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.next_range((i + 1) as u32) as usize;
            slice.swap(i, j);
        }
    }

    pub fn state(&self) -> u32 {
        self.state
    }
}

/// How the next piece is chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Randomizer {
    /// Every definition equally likely on every draw
    #[default]
    Uniform,
    /// Each definition once per shuffled bag
    Bag7,
}

/// Draws definition indices in `0..len`
#[derive(Debug, Clone)]
pub struct PieceQueue {
    randomizer: Randomizer,
    len: usize,
    bag: Vec<usize>,
    bag_index: usize,
    rng: SimpleRng,
}

impl PieceQueue {
    /// `len` must be non-zero
    pub fn new(randomizer: Randomizer, len: usize, seed: u32) -> Self {
        Self {
            randomizer,
            len,
            bag: (0..len).collect(),
            // force a shuffle on the first bag draw
            bag_index: len,
            rng: SimpleRng::new(seed),
        }
    }

    /// Draw the next definition index
    pub fn draw(&mut self) -> usize {
        match self.randomizer {
            Randomizer::Uniform => self.rng.next_range(self.len as u32) as usize,
            Randomizer::Bag7 => {
                if self.bag_index >= self.len {
                    self.rng.shuffle(&mut self.bag);
                    self.bag_index = 0;
                }
                let index = self.bag[self.bag_index];
                self.bag_index += 1;
                index
            }
        }
    }

    /// Current RNG state (for restarting with a continued sequence)
    pub fn seed(&self) -> u32 {
        self.rng.state()
    }
}
