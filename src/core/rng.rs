//! Deterministic random number generation for search strategies.
//!
//! ## Key Features
//!
//! - **Deterministic**: Same seed produces identical choices, so a seeded
//!   strategy replays the same game
//! - **Forkable**: Independent streams for sub-searches that must not
//!   disturb the caller's sequence
//! - **Bitboard aware**: `pick_bit` draws a uniform cell from a move mask
//!
//! ```
//! use reversi_arena::core::GameRng;
//!
//! let mut a = GameRng::new(7);
//! let mut b = GameRng::new(7);
//! assert_eq!(a.pick_bit(0b1011_0000), b.pick_bit(0b1011_0000));
//! ```

use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Deterministic RNG backed by ChaCha8.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
    fork_counter: u64,
}

impl GameRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
            fork_counter: 0,
        }
    }

    /// Create an RNG seeded from `seed`, or from OS entropy when absent.
    #[must_use]
    pub fn seeded_or_random(seed: Option<u64>) -> Self {
        Self::new(seed.unwrap_or_else(|| rand::thread_rng().next_u64()))
    }

    /// The seed this RNG started from.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Fork an independent, deterministic stream.
    #[must_use]
    pub fn fork(&mut self) -> Self {
        self.fork_counter += 1;
        let fork_seed = self
            .seed
            .wrapping_add(self.fork_counter.wrapping_mul(0x9E37_79B9_7F4A_7C15));
        Self::new(fork_seed)
    }

    /// Shuffle a slice in place.
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        use rand::seq::SliceRandom;
        slice.shuffle(&mut self.inner);
    }

    /// Choose a random element from a slice.
    #[must_use]
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        use rand::seq::SliceRandom;
        slice.choose(&mut self.inner)
    }

    /// Choose the index of one set bit of `mask`, uniformly.
    ///
    /// Returns `None` for an empty mask.
    pub fn pick_bit(&mut self, mask: u64) -> Option<u32> {
        let count = mask.count_ones();
        if count == 0 {
            return None;
        }
        let mut skip = self.inner.gen_range(0..count);
        let mut rest = mask;
        loop {
            let bit = rest.trailing_zeros();
            if skip == 0 {
                return Some(bit);
            }
            skip -= 1;
            rest &= rest - 1;
        }
    }
}
