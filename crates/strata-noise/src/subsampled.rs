//! Scaled, subsampled noise evaluation over whole regions.
//!
//! Multi-octave noise evaluated per voxel column dominates generation cost.
//! [`SubSampledNoise`] evaluates its source only on a lattice aligned to
//! multiples of `sample_rate` and bilinearly interpolates in between, then
//! hands back a dense array indexed exactly like a 2D facet over the same
//! rectangle.

use glam::{DVec2, IVec2};
use noise::NoiseFn;
use strata_math::Rect2i;

use crate::NoiseError;

/// Wraps a 2D noise with a per-axis zoom and a subsampling stride.
#[derive(Clone, Debug)]
pub struct SubSampledNoise<N> {
    source: N,
    zoom: DVec2,
    sample_rate: u32,
}

impl<N: NoiseFn<f64, 2>> SubSampledNoise<N> {
    /// Create a subsampled view of `source`.
    ///
    /// `zoom` scales world coordinates before they reach the source;
    /// `sample_rate` is the key lattice stride in world cells (1 evaluates
    /// every cell exactly).
    ///
    /// # Errors
    ///
    /// Rejects a zero `sample_rate` and a zoom with a zero or non-finite
    /// component.
    pub fn new(source: N, zoom: DVec2, sample_rate: u32) -> Result<Self, NoiseError> {
        if sample_rate == 0 {
            return Err(NoiseError::ZeroSampleRate);
        }
        if !zoom.is_finite() || zoom.x == 0.0 || zoom.y == 0.0 {
            return Err(NoiseError::InvalidZoom(zoom.x, zoom.y));
        }
        Ok(Self {
            source,
            zoom,
            sample_rate,
        })
    }

    /// Evaluate the source at one scaled world coordinate.
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        self.source.get([x * self.zoom.x, y * self.zoom.y])
    }

    /// Evaluate the whole rectangle in one batch.
    ///
    /// The returned vector has `region.area()` entries and is indexed by
    /// [`Rect2i::world_index`]. With `sample_rate == 1` each entry equals
    /// [`SubSampledNoise::sample`] at that cell; otherwise entries on the key
    /// lattice are exact and the rest are bilinear interpolations.
    pub fn noise_region(&self, region: &Rect2i) -> Vec<f32> {
        if self.sample_rate == 1 {
            return region
                .iter()
                .map(|p| self.sample(p.x as f64, p.y as f64) as f32)
                .collect();
        }

        let rate = self.sample_rate as i32;
        let key_min = IVec2::new(floor_to(region.min.x, rate), floor_to(region.min.y, rate));
        let key_max = IVec2::new(ceil_to(region.max.x, rate), ceil_to(region.max.y, rate));
        let keys_x = ((key_max.x - key_min.x) / rate + 1) as usize;
        let keys_y = ((key_max.y - key_min.y) / rate + 1) as usize;

        let mut keys = Vec::with_capacity(keys_x * keys_y);
        for ky in 0..keys_y as i32 {
            for kx in 0..keys_x as i32 {
                let wx = key_min.x + kx * rate;
                let wy = key_min.y + ky * rate;
                keys.push(self.sample(wx as f64, wy as f64));
            }
        }

        let inv_rate = 1.0 / rate as f64;
        region
            .iter()
            .map(|p| {
                let rel = p - key_min;
                let gx = (rel.x / rate) as usize;
                let gy = (rel.y / rate) as usize;
                let tx = (rel.x % rate) as f64 * inv_rate;
                let ty = (rel.y % rate) as f64 * inv_rate;
                let gx1 = (gx + 1).min(keys_x - 1);
                let gy1 = (gy + 1).min(keys_y - 1);

                let v00 = keys[gy * keys_x + gx];
                let v10 = keys[gy * keys_x + gx1];
                let v01 = keys[gy1 * keys_x + gx];
                let v11 = keys[gy1 * keys_x + gx1];
                lerp(ty, lerp(tx, v00, v10), lerp(tx, v01, v11)) as f32
            })
            .collect()
    }

    /// Per-axis coordinate scale.
    pub fn zoom(&self) -> DVec2 {
        self.zoom
    }

    /// Key lattice stride.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

impl<N: NoiseFn<f64, 2>> NoiseFn<f64, 2> for SubSampledNoise<N> {
    fn get(&self, point: [f64; 2]) -> f64 {
        self.sample(point[0], point[1])
    }
}

#[inline]
fn lerp(t: f64, a: f64, b: f64) -> f64 {
    a + t * (b - a)
}

#[inline]
fn floor_to(v: i32, rate: i32) -> i32 {
    v.div_euclid(rate) * rate
}

#[inline]
fn ceil_to(v: i32, rate: i32) -> i32 {
    let floor = floor_to(v, rate);
    if floor == v { v } else { floor + rate }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::{BrownianNoise, PerlinNoise, SimplexNoise, WorldSeed};

    struct CountingNoise {
        calls: AtomicUsize,
    }

    impl NoiseFn<f64, 2> for CountingNoise {
        fn get(&self, point: [f64; 2]) -> f64 {
            self.calls.fetch_add(1, Ordering::Relaxed);
            (point[0] * 0.5 + point[1] * 0.25).sin()
        }
    }

    #[test]
    fn test_invalid_parameters_rejected() {
        let source = SimplexNoise::new(WorldSeed::new(1));
        assert_eq!(
            SubSampledNoise::new(source.clone(), DVec2::splat(0.01), 0).err(),
            Some(NoiseError::ZeroSampleRate)
        );
        assert!(matches!(
            SubSampledNoise::new(source.clone(), DVec2::new(0.0, 0.01), 1),
            Err(NoiseError::InvalidZoom(..))
        ));
        assert!(matches!(
            SubSampledNoise::new(source, DVec2::new(0.01, f64::INFINITY), 1),
            Err(NoiseError::InvalidZoom(..))
        ));
    }

    #[test]
    fn test_rate_one_matches_point_evaluation_exactly() {
        let fbm = BrownianNoise::new(PerlinNoise::new(WorldSeed::new(25)), 12).unwrap();
        let noise = SubSampledNoise::new(fbm, DVec2::splat(0.01), 1).unwrap();
        let region = Rect2i::from_min_and_size(IVec2::new(-20, 37), IVec2::new(24, 17));

        let batch = noise.noise_region(&region);
        assert_eq!(batch.len(), region.area());
        for p in region.iter() {
            let idx = region.world_index(p).unwrap();
            assert_eq!(batch[idx], noise.sample(p.x as f64, p.y as f64) as f32);
        }
    }

    #[test]
    fn test_subsampled_exact_on_key_lattice() {
        let noise =
            SubSampledNoise::new(SimplexNoise::new(WorldSeed::new(3)), DVec2::splat(0.01), 4)
                .unwrap();
        let region = Rect2i::from_min_and_size(IVec2::new(-13, 5), IVec2::new(30, 21));
        let batch = noise.noise_region(&region);

        for p in region.iter().filter(|p| p.x % 4 == 0 && p.y % 4 == 0) {
            let idx = region.world_index(p).unwrap();
            let direct = noise.sample(p.x as f64, p.y as f64) as f32;
            assert!(
                (batch[idx] - direct).abs() < 1e-6,
                "key point {p} should be exact: {} vs {direct}",
                batch[idx]
            );
        }
    }

    #[test]
    fn test_subsampled_close_to_direct_between_keys() {
        let noise =
            SubSampledNoise::new(SimplexNoise::new(WorldSeed::new(8)), DVec2::splat(0.005), 4)
                .unwrap();
        let region = Rect2i::from_min_and_size(IVec2::new(100, -50), IVec2::new(32, 32));
        let batch = noise.noise_region(&region);

        for p in region.iter() {
            let idx = region.world_index(p).unwrap();
            let direct = noise.sample(p.x as f64, p.y as f64) as f32;
            assert!(
                (batch[idx] - direct).abs() < 0.02,
                "interpolation error too large at {p}: {} vs {direct}",
                batch[idx]
            );
        }
    }

    #[test]
    fn test_subsampling_reduces_evaluations() {
        let noise = SubSampledNoise::new(
            CountingNoise {
                calls: AtomicUsize::new(0),
            },
            DVec2::ONE,
            4,
        )
        .unwrap();
        let region = Rect2i::from_min_and_size(IVec2::ZERO, IVec2::splat(16));
        let batch = noise.noise_region(&region);

        assert_eq!(batch.len(), 256);
        // Keys at 0, 4, 8, 12, 16 on each axis.
        assert_eq!(noise.source.calls.load(Ordering::Relaxed), 25);
    }

    #[test]
    fn test_lattice_alignment_for_negative_coordinates() {
        assert_eq!(floor_to(-5, 4), -8);
        assert_eq!(ceil_to(-5, 4), -4);
        assert_eq!(ceil_to(8, 4), 8);
        assert_eq!(floor_to(7, 4), 4);
    }
}
