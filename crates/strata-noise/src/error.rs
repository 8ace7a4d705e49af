//! Noise construction errors.

/// Degenerate parameters rejected when building a noise function.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NoiseError {
    /// Brownian noise needs at least one octave.
    #[error("octave count must be at least 1")]
    ZeroOctaves,

    /// Lacunarity must be a finite positive number.
    #[error("lacunarity must be finite and positive, got {0}")]
    InvalidLacunarity(f64),

    /// Persistence must be a finite positive number.
    #[error("persistence must be finite and positive, got {0}")]
    InvalidPersistence(f64),

    /// Subsampling stride of zero.
    #[error("sample rate must be at least 1")]
    ZeroSampleRate,

    /// A zoom component was zero, NaN or infinite.
    #[error("zoom must be finite and non-zero on both axes, got ({0}, {1})")]
    InvalidZoom(f64, f64),
}
