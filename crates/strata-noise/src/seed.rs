//! World seed handling.
//!
//! Every noise primitive is seeded from the world seed plus a constant
//! offset, so primitives that share a world seed stay decorrelated.

use std::hash::{Hash, Hasher};

use rustc_hash::FxHasher;

/// The single integer every generated value is derived from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct WorldSeed(pub i64);

impl WorldSeed {
    /// Create a seed from a raw value.
    pub const fn new(seed: i64) -> Self {
        Self(seed)
    }

    /// Returns the raw 64-bit value.
    pub const fn value(self) -> i64 {
        self.0
    }

    /// Seed for a specific primitive: `seed + offset` with wrapping.
    pub const fn offset(self, offset: i64) -> Self {
        Self(self.0.wrapping_add(offset))
    }

    /// Fold the seed into the 32-bit seed the `noise` crate expects.
    ///
    /// Hashes the full 64 bits so that seeds differing only in their high
    /// 32 bits still produce different permutation tables. `FxHasher` has a
    /// fixed algorithm, so a seed maps to the same world on every toolchain.
    pub fn noise_seed(self) -> u32 {
        let mut hasher = FxHasher::default();
        self.0.hash(&mut hasher);
        let h = hasher.finish();
        (h ^ (h >> 32)) as u32
    }
}

impl From<i64> for WorldSeed {
    fn from(value: i64) -> Self {
        Self(value)
    }
}
