//! Deterministic noise: seeded primitives and the composites built on them.
//!
//! Every type implements [`noise::NoiseFn`] for the dimensions it supports,
//! is fully seeded at construction, and is immutable afterwards, so a single
//! instance can be shared across threads generating different regions.

mod adapter;
mod brownian;
mod error;
mod lattice;
mod seed;
mod subsampled;
mod white;

pub use adapter::Noise3dTo2dAdapter;
pub use brownian::{BrownianNoise, DEFAULT_LACUNARITY, DEFAULT_PERSISTENCE};
pub use error::NoiseError;
pub use lattice::{PerlinNoise, SimplexNoise};
pub use noise::NoiseFn;
pub use seed::WorldSeed;
pub use subsampled::SubSampledNoise;
pub use white::WhiteNoise;
