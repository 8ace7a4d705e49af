//! Uncorrelated per-cell noise.

use std::hash::{Hash, Hasher};

use noise::NoiseFn;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rustc_hash::FxHasher;

use crate::WorldSeed;

/// White noise: an independent value in `[-1, 1]` for every integer cell.
///
/// Coordinates are floored to their lattice cell, so every point inside the
/// same cell shares a value. Used for per-position probability rolls.
#[derive(Clone, Copy, Debug)]
pub struct WhiteNoise {
    seed: i64,
}

impl WhiteNoise {
    /// Create a white noise seeded from `seed`.
    pub fn new(seed: WorldSeed) -> Self {
        Self { seed: seed.value() }
    }

    /// Value for an integer cell.
    pub fn cell_2d(&self, x: i32, y: i32) -> f64 {
        roll(self.cell_seed(&[x, y]))
    }

    /// Value for an integer cell.
    pub fn cell_3d(&self, x: i32, y: i32, z: i32) -> f64 {
        roll(self.cell_seed(&[x, y, z]))
    }

    /// Combine the seed with a cell address into one RNG seed.
    fn cell_seed(&self, cell: &[i32]) -> u64 {
        let mut hasher = FxHasher::default();
        self.seed.hash(&mut hasher);
        cell.hash(&mut hasher);
        hasher.finish()
    }
}

impl NoiseFn<f64, 2> for WhiteNoise {
    fn get(&self, point: [f64; 2]) -> f64 {
        self.cell_2d(point[0].floor() as i32, point[1].floor() as i32)
    }
}

impl NoiseFn<f64, 3> for WhiteNoise {
    fn get(&self, point: [f64; 3]) -> f64 {
        self.cell_3d(
            point[0].floor() as i32,
            point[1].floor() as i32,
            point[2].floor() as i32,
        )
    }
}

#[inline]
fn roll(cell_seed: u64) -> f64 {
    ChaCha8Rng::seed_from_u64(cell_seed).random_range(-1.0..=1.0)
}
