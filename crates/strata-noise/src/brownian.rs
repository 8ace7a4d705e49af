//! Multi-octave fractal Brownian motion (fBm) composite.
//!
//! Sums octaves of a source noise, each at `lacunarity` times the previous
//! frequency and `persistence` times the previous amplitude, then divides by
//! the total amplitude so the result stays inside the source's `[-1, 1]`.

use noise::NoiseFn;

use crate::NoiseError;

/// Frequency multiplier between successive octaves.
pub const DEFAULT_LACUNARITY: f64 = 2.0;

/// Amplitude multiplier between successive octaves.
pub const DEFAULT_PERSISTENCE: f64 = 0.5;

/// Fractal Brownian composite over any 2D or 3D source noise.
#[derive(Clone, Debug)]
pub struct BrownianNoise<N> {
    source: N,
    octaves: u32,
    lacunarity: f64,
    persistence: f64,
    /// `1 / sum(amplitudes)`, precomputed.
    scale: f64,
}

impl<N> BrownianNoise<N> {
    /// Composite `octaves` layers with doubled frequency and halved amplitude.
    ///
    /// # Errors
    ///
    /// Returns [`NoiseError::ZeroOctaves`] if `octaves == 0`.
    pub fn new(source: N, octaves: u32) -> Result<Self, NoiseError> {
        Self::with_params(source, octaves, DEFAULT_LACUNARITY, DEFAULT_PERSISTENCE)
    }

    /// Composite with explicit lacunarity and persistence.
    ///
    /// # Errors
    ///
    /// Rejects zero octaves and non-finite or non-positive lacunarity or
    /// persistence.
    pub fn with_params(
        source: N,
        octaves: u32,
        lacunarity: f64,
        persistence: f64,
    ) -> Result<Self, NoiseError> {
        if octaves == 0 {
            return Err(NoiseError::ZeroOctaves);
        }
        if !lacunarity.is_finite() || lacunarity <= 0.0 {
            return Err(NoiseError::InvalidLacunarity(lacunarity));
        }
        if !persistence.is_finite() || persistence <= 0.0 {
            return Err(NoiseError::InvalidPersistence(persistence));
        }

        let mut sum = 0.0;
        let mut amp = 1.0;
        for _ in 0..octaves {
            sum += amp;
            amp *= persistence;
        }

        Ok(Self {
            source,
            octaves,
            lacunarity,
            persistence,
            scale: 1.0 / sum,
        })
    }

    /// Number of composited octaves.
    pub fn octaves(&self) -> u32 {
        self.octaves
    }

    /// Frequency multiplier between octaves.
    pub fn lacunarity(&self) -> f64 {
        self.lacunarity
    }

    /// Amplitude multiplier between octaves.
    pub fn persistence(&self) -> f64 {
        self.persistence
    }

    /// The wrapped source noise.
    pub fn source(&self) -> &N {
        &self.source
    }
}

impl<N: NoiseFn<f64, 2>> NoiseFn<f64, 2> for BrownianNoise<N> {
    fn get(&self, point: [f64; 2]) -> f64 {
        let mut total = 0.0;
        let mut frequency = 1.0;
        let mut amplitude = 1.0;

        for _ in 0..self.octaves {
            total += self.source.get([point[0] * frequency, point[1] * frequency]) * amplitude;
            frequency *= self.lacunarity;
            amplitude *= self.persistence;
        }

        total * self.scale
    }
}

impl<N: NoiseFn<f64, 3>> NoiseFn<f64, 3> for BrownianNoise<N> {
    fn get(&self, point: [f64; 3]) -> f64 {
        let mut total = 0.0;
        let mut frequency = 1.0;
        let mut amplitude = 1.0;

        for _ in 0..self.octaves {
            let p = [
                point[0] * frequency,
                point[1] * frequency,
                point[2] * frequency,
            ];
            total += self.source.get(p) * amplitude;
            frequency *= self.lacunarity;
            amplitude *= self.persistence;
        }

        total * self.scale
    }
}
