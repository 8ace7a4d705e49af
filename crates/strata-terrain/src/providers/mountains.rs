use glam::DVec2;
use strata_facet::FacetBorder;
use strata_noise::{BrownianNoise, Noise3dTo2dAdapter, PerlinNoise, SubSampledNoise, WorldSeed};

use crate::error::{PipelineError, ProviderError};
use crate::facets::{FacetKind, SurfaceHeightFacet};
use crate::region::GeneratingRegion;
use crate::stage::{FacetProvider, StageDescriptor};

/// Tallest uplift mountains add when nothing else is configured.
pub const DEFAULT_MOUNTAIN_HEIGHT: f32 = 400.0;

/// Octaves of the mountain fBm when nothing else is configured.
pub const DEFAULT_MOUNTAIN_OCTAVES: u32 = 8;

type MountainNoise = SubSampledNoise<Noise3dTo2dAdapter<BrownianNoise<PerlinNoise>>>;

/// Raises the surface by broad, low-frequency uplift.
///
/// The uplift is `clamp(noise * mountain_height, 0, mountain_height)`, so
/// the surface never goes down and rises by at most `mountain_height`.
#[derive(Clone, Debug)]
pub struct MountainsProvider {
    mountain_height: f32,
    noise: MountainNoise,
}

impl MountainsProvider {
    /// # Errors
    ///
    /// Fails if `octaves` is zero or `mountain_height` is negative or not
    /// finite.
    pub fn new(seed: WorldSeed, mountain_height: f32, octaves: u32) -> Result<Self, ProviderError> {
        if !mountain_height.is_finite() || mountain_height < 0.0 {
            return Err(ProviderError::InvalidMountainHeight(mountain_height));
        }
        let fbm = BrownianNoise::new(PerlinNoise::new(seed.offset(2)), octaves)?;
        let noise = SubSampledNoise::new(Noise3dTo2dAdapter::new(fbm), DVec2::splat(0.001), 1)?;
        Ok(Self {
            mountain_height,
            noise,
        })
    }

    /// Uplift for a single column.
    pub fn uplift_at(&self, x: i32, z: i32) -> f32 {
        self.uplift(self.noise.sample(x as f64, z as f64) as f32)
    }

    fn uplift(&self, n: f32) -> f32 {
        (n * self.mountain_height).clamp(0.0, self.mountain_height)
    }
}

impl FacetProvider for MountainsProvider {
    fn descriptor(&self) -> StageDescriptor {
        StageDescriptor::new("mountains").updates(FacetKind::SurfaceHeight, FacetBorder::ZERO)
    }

    fn process(&self, region: &mut GeneratingRegion) -> Result<(), PipelineError> {
        region.update(|surface: &mut SurfaceHeightFacet, _| {
            let values = self.noise.noise_region(&surface.world_region());
            for (h, n) in surface.as_mut_slice().iter_mut().zip(values) {
                *h += self.uplift(n);
            }
            Ok(())
        })
    }
}
