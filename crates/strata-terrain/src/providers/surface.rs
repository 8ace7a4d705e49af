use glam::DVec2;
use strata_facet::FacetBorder;
use strata_noise::{BrownianNoise, PerlinNoise, SubSampledNoise, WorldSeed};

use crate::error::{PipelineError, ProviderError};
use crate::facets::{FacetKind, SurfaceHeightFacet};
use crate::region::GeneratingRegion;
use crate::stage::{FacetProvider, StageDescriptor};

/// Height of the rolling base terrain around `base_height`, in blocks.
pub const SURFACE_AMPLITUDE: f32 = 20.0;

/// Produces the base [`SurfaceHeightFacet`]: gentle fBm hills around a
/// configured base height.
#[derive(Clone, Debug)]
pub struct SurfaceProvider {
    base_height: f32,
    noise: SubSampledNoise<BrownianNoise<PerlinNoise>>,
}

impl SurfaceProvider {
    /// # Errors
    ///
    /// Only fails if the noise stack is misconfigured.
    pub fn new(seed: WorldSeed, base_height: f32) -> Result<Self, ProviderError> {
        let fbm = BrownianNoise::new(PerlinNoise::new(seed), 8)?;
        Ok(Self {
            base_height,
            noise: SubSampledNoise::new(fbm, DVec2::splat(0.01), 4)?,
        })
    }
}

impl FacetProvider for SurfaceProvider {
    fn descriptor(&self) -> StageDescriptor {
        StageDescriptor::new("surface").produces(FacetKind::SurfaceHeight, FacetBorder::ZERO)
    }

    fn process(&self, region: &mut GeneratingRegion) -> Result<(), PipelineError> {
        let core = region.region();
        let mut facet = SurfaceHeightFacet::new(&core, region.border(FacetKind::SurfaceHeight));
        let values = self.noise.noise_region(&facet.world_region());
        for (h, n) in facet.as_mut_slice().iter_mut().zip(values) {
            *h = self.base_height + n * SURFACE_AMPLITUDE;
        }
        region.set(facet)
    }
}
