//! Biome height and the per-column biome classification derived from it.

use glam::DVec2;
use strata_facet::FacetBorder;
use strata_noise::{BrownianNoise, SimplexNoise, SubSampledNoise, WorldSeed};

use crate::error::{PipelineError, ProviderError};
use crate::facets::{
    Biome, BiomeFacet, BiomeHeightFacet, FacetKind, SeaLevelFacet, SurfaceHeightFacet,
};
use crate::region::GeneratingRegion;
use crate::stage::{FacetProvider, StageDescriptor};

/// Upper bound of biome height.
pub const MAX_BIOME_HEIGHT: f32 = 5.0;

/// Produces [`BiomeHeightFacet`] in `[0, MAX_BIOME_HEIGHT]`.
#[derive(Clone, Debug)]
pub struct BiomeHeightProvider {
    noise: SubSampledNoise<BrownianNoise<SimplexNoise>>,
}

impl BiomeHeightProvider {
    /// # Errors
    ///
    /// Only fails if the noise stack is misconfigured.
    pub fn new(seed: WorldSeed) -> Result<Self, ProviderError> {
        let fbm = BrownianNoise::new(SimplexNoise::new(seed.offset(7)), 6)?;
        Ok(Self {
            noise: SubSampledNoise::new(fbm, DVec2::splat(0.002), 4)?,
        })
    }
}

fn to_biome_height(n: f32) -> f32 {
    ((n + 1.0) * 0.5 * MAX_BIOME_HEIGHT).clamp(0.0, MAX_BIOME_HEIGHT)
}

impl FacetProvider for BiomeHeightProvider {
    fn descriptor(&self) -> StageDescriptor {
        StageDescriptor::new("biome_height").produces(FacetKind::BiomeHeight, FacetBorder::ZERO)
    }

    fn process(&self, region: &mut GeneratingRegion) -> Result<(), PipelineError> {
        let core = region.region();
        let mut facet = BiomeHeightFacet::new(&core, region.border(FacetKind::BiomeHeight));
        let values = self.noise.noise_region(&facet.world_region());
        for (b, n) in facet.as_mut_slice().iter_mut().zip(values) {
            *b = to_biome_height(n);
        }
        region.set(facet)
    }
}

/// Blocks above sea level that still count as beach.
const BEACH_BAND: f32 = 2.0;
/// Height above sea level where snow starts.
const SNOW_LINE: f32 = 90.0;

/// Classify one column.
///
/// Water and beach come first, then rifts (the band canyons carve), then
/// altitude, then the biome height bands.
pub fn classify(surface: f32, biome_height: f32, sea_level: i32) -> Biome {
    let sea = sea_level as f32;
    if surface < sea {
        Biome::Ocean
    } else if surface <= sea + BEACH_BAND {
        Biome::Beach
    } else if biome_height > 0.6 && biome_height < 1.0 {
        Biome::Rift
    } else if surface > sea + SNOW_LINE {
        Biome::Snow
    } else if biome_height >= 3.0 {
        Biome::Mountains
    } else if biome_height <= 0.6 {
        Biome::Desert
    } else if biome_height < 2.0 {
        Biome::Plains
    } else {
        Biome::Forest
    }
}

/// Produces [`BiomeFacet`] from surface, biome height and sea level.
#[derive(Clone, Copy, Debug, Default)]
pub struct BiomeProvider;

impl BiomeProvider {
    pub fn new() -> Self {
        Self
    }
}

impl FacetProvider for BiomeProvider {
    fn descriptor(&self) -> StageDescriptor {
        StageDescriptor::new("biome")
            .requires(FacetKind::SeaLevel, FacetBorder::ZERO)
            .requires(FacetKind::SurfaceHeight, FacetBorder::ZERO)
            .requires(FacetKind::BiomeHeight, FacetBorder::ZERO)
            .produces(FacetKind::Biome, FacetBorder::ZERO)
    }

    fn process(&self, region: &mut GeneratingRegion) -> Result<(), PipelineError> {
        let core = region.region();
        let mut facet = BiomeFacet::new(&core, region.border(FacetKind::Biome));
        {
            let sea = region.get::<SeaLevelFacet>()?.level;
            let surface = region.get::<SurfaceHeightFacet>()?;
            let biome_height = region.get::<BiomeHeightFacet>()?;
            for p in facet.world_region().iter() {
                let biome = classify(
                    surface.get_world(p.x, p.y),
                    biome_height.get_world(p.x, p.y),
                    sea,
                );
                facet.set_world(p.x, p.y, biome);
            }
        }
        region.set(facet)
    }
}
