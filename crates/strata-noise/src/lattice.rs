//! Seeded lattice noise primitives.
//!
//! Thin wrappers over the `noise` crate's gradient noises. The wrappers fix
//! the seed at construction and clamp output to `[-1, 1]`, so composite
//! noises can rely on the documented range.

use noise::{NoiseFn, Perlin, Simplex};

use crate::WorldSeed;

/// Perlin-style gradient noise on the integer lattice.
#[derive(Clone, Debug)]
pub struct PerlinNoise {
    inner: Perlin,
}

impl PerlinNoise {
    /// Create a Perlin noise seeded from `seed`.
    pub fn new(seed: WorldSeed) -> Self {
        Self {
            inner: Perlin::new(seed.noise_seed()),
        }
    }
}

impl NoiseFn<f64, 2> for PerlinNoise {
    fn get(&self, point: [f64; 2]) -> f64 {
        self.inner.get(point).clamp(-1.0, 1.0)
    }
}

impl NoiseFn<f64, 3> for PerlinNoise {
    fn get(&self, point: [f64; 3]) -> f64 {
        self.inner.get(point).clamp(-1.0, 1.0)
    }
}

/// Simplex gradient noise.
#[derive(Clone, Debug)]
pub struct SimplexNoise {
    inner: Simplex,
}

impl SimplexNoise {
    /// Create a simplex noise seeded from `seed`.
    pub fn new(seed: WorldSeed) -> Self {
        Self {
            inner: Simplex::new(seed.noise_seed()),
        }
    }
}

impl NoiseFn<f64, 2> for SimplexNoise {
    fn get(&self, point: [f64; 2]) -> f64 {
        self.inner.get(point).clamp(-1.0, 1.0)
    }
}

impl NoiseFn<f64, 3> for SimplexNoise {
    fn get(&self, point: [f64; 3]) -> f64 {
        self.inner.get(point).clamp(-1.0, 1.0)
    }
}
