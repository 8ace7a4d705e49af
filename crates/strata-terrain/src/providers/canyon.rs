//! Canyon carving: re-seats the surface inside a vertical band driven by
//! biome height and three blended noises.

use glam::DVec2;
use strata_facet::FacetBorder;
use strata_noise::{BrownianNoise, PerlinNoise, SimplexNoise, SubSampledNoise, WorldSeed};

use crate::error::{PipelineError, ProviderError};
use crate::facets::{BiomeHeightFacet, FacetKind, SurfaceHeightFacet};
use crate::region::GeneratingRegion;
use crate::stage::{FacetProvider, StageDescriptor};

/// Vertical extent of the canyon band above its base.
const CANYON_BAND: f32 = 35.0;
/// Acceptance curve width.
const SIGMA: f32 = CANYON_BAND / 4.0;
/// Scales the Gaussian acceptance down so it never reaches certainty.
const PROBABILITY_DIVISOR: f32 = 1.5;

/// Unnormalised Gaussian, `exp(-x² / 2σ²)`.
fn gauss(x: f32, sigma: f32) -> f32 {
    libm::expf(-x * x / (2.0 * sigma * sigma))
}

/// Updates [`SurfaceHeightFacet`] where biome height is in `(0.6, 4)`.
#[derive(Clone, Debug)]
pub struct CanyonProvider {
    detail: SubSampledNoise<SimplexNoise>,
    rough: SubSampledNoise<BrownianNoise<PerlinNoise>>,
    broad: SubSampledNoise<SimplexNoise>,
}

/// The canyon band for one column.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CanyonBand {
    /// Added to every accepted height: `10 * (b² - 1)`.
    pub base: f32,
    /// Highest offset above the surface the band reaches.
    pub max: f32,
}

impl CanyonBand {
    pub fn for_biome_height(b: f32) -> Self {
        let base = 10.0 * (b * b - 1.0);
        Self {
            base,
            max: base + CANYON_BAND,
        }
    }
}

impl CanyonProvider {
    /// # Errors
    ///
    /// Only fails if the noise stack is misconfigured.
    pub fn new(seed: WorldSeed) -> Result<Self, ProviderError> {
        let zoom = DVec2::splat(0.01);
        let fbm = BrownianNoise::new(PerlinNoise::new(seed.offset(25)), 12)?;
        Ok(Self {
            detail: SubSampledNoise::new(SimplexNoise::new(seed.offset(-50)), zoom, 1)?,
            rough: SubSampledNoise::new(fbm, zoom, 1)?,
            broad: SubSampledNoise::new(SimplexNoise::new(seed.offset(50)), DVec2::splat(0.001), 1)?,
        })
    }

    /// Whether a column with biome height `b` is a canyon candidate at all.
    pub fn applies_to(b: f32) -> bool {
        b > 0.6 && b < 4.0
    }

    /// New height for one column, or `None` if it is left untouched.
    ///
    /// `blend` is the absolute mean of the three noises at the column.
    /// Candidate heights walk upward from the floored surface; the highest
    /// one whose acceptance probability clears `1 - blend` wins.
    pub fn carve_column(h: f32, b: f32, blend: f32, min_y: i32, max_y: i32) -> Option<f32> {
        if !Self::applies_to(b) {
            return None;
        }
        let surface = h.floor() as i32;
        let band = CanyonBand::for_biome_height(b);
        if surface < min_y || surface as f32 + band.max > max_y as f32 {
            return None;
        }

        let mut carved = None;
        let mut wy = surface;
        while wy <= max_y && (wy as f32) <= surface as f32 + band.max {
            let depth = (wy - surface) as f32;
            let probability = gauss(CANYON_BAND / 2.0 - depth, SIGMA) / PROBABILITY_DIVISOR;
            if blend > 1.0 - probability {
                carved = Some(wy as f32 + band.base);
            }
            wy += 1;
        }
        carved
    }
}

impl FacetProvider for CanyonProvider {
    fn descriptor(&self) -> StageDescriptor {
        StageDescriptor::new("canyon")
            .requires(FacetKind::BiomeHeight, FacetBorder::ZERO)
            .updates(FacetKind::SurfaceHeight, FacetBorder::sides(4))
    }

    fn process(&self, region: &mut GeneratingRegion) -> Result<(), PipelineError> {
        let core = region.region();
        region.update(|surface: &mut SurfaceHeightFacet, view| {
            let biome_height = view.get::<BiomeHeightFacet>()?;
            let rect = surface.world_region();
            let detail = self.detail.noise_region(&rect);
            let rough = self.rough.noise_region(&rect);
            let broad = self.broad.noise_region(&rect);

            for p in rect.iter() {
                let Some(idx) = surface.world_index(p.x, p.y) else {
                    continue;
                };
                let blend = ((detail[idx] + rough[idx] + broad[idx]) / 3.0).abs();
                let h = surface.as_slice()[idx];
                let b = biome_height.get_world(p.x, p.y);
                if let Some(carved) = Self::carve_column(h, b, blend, core.min.y, core.max.y) {
                    surface.as_mut_slice()[idx] = carved;
                }
            }
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gauss_peaks_at_zero() {
        assert_eq!(gauss(0.0, SIGMA), 1.0);
        assert!(gauss(SIGMA, SIGMA) < 1.0);
        assert!((gauss(3.0, SIGMA) - gauss(-3.0, SIGMA)).abs() < 1e-7);
    }

    #[test]
    fn test_outside_biome_band_untouched() {
        for b in [0.0, 0.6, 4.0, 4.5] {
            assert_eq!(CanyonProvider::carve_column(40.0, b, 1.0, 0, 255), None);
        }
    }

    #[test]
    fn test_band_must_fit_in_region() {
        // b = 2 gives base 30, max 65; surface 40 + 65 > 100.
        assert_eq!(CanyonProvider::carve_column(40.0, 2.0, 1.0, 0, 100), None);
        // Surface below the region floor.
        assert_eq!(CanyonProvider::carve_column(-5.0, 2.0, 1.0, 0, 255), None);
        assert!(CanyonProvider::carve_column(40.0, 2.0, 1.0, 0, 105).is_some());
    }

    #[test]
    fn test_low_blend_never_carves() {
        // The acceptance probability tops out at 1 / 1.5, so blends at or
        // below 1/3 are always rejected.
        assert_eq!(CanyonProvider::carve_column(40.0, 2.0, 0.3, 0, 255), None);
    }

    #[test]
    fn test_highest_accepted_depth_wins() {
        let b = 2.0;
        let band = CanyonBand::for_biome_height(b);
        let carved = CanyonProvider::carve_column(40.7, b, 0.9, 0, 255).unwrap();

        // Accepted depths sit symmetrically around mid-band.
        let top = (0..=band.max as i32)
            .rev()
            .find(|&d| 0.9 > 1.0 - gauss(CANYON_BAND / 2.0 - d as f32, SIGMA) / 1.5)
            .unwrap();
        assert_eq!(carved, (40 + top) as f32 + band.base);
        assert!(top > (CANYON_BAND / 2.0) as i32);
    }
}
