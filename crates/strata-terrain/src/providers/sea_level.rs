use strata_facet::FacetBorder;

use crate::error::PipelineError;
use crate::facets::{FacetKind, SeaLevelFacet};
use crate::region::GeneratingRegion;
use crate::stage::{FacetProvider, StageDescriptor};

/// Sea level used when nothing else is configured.
pub const DEFAULT_SEA_LEVEL: i32 = 32;

/// Produces a constant [`SeaLevelFacet`].
#[derive(Clone, Copy, Debug)]
pub struct SeaLevelProvider {
    level: i32,
}

impl SeaLevelProvider {
    pub fn new(level: i32) -> Self {
        Self { level }
    }
}

impl Default for SeaLevelProvider {
    fn default() -> Self {
        Self::new(DEFAULT_SEA_LEVEL)
    }
}

impl FacetProvider for SeaLevelProvider {
    fn descriptor(&self) -> StageDescriptor {
        StageDescriptor::new("sea_level").produces(FacetKind::SeaLevel, FacetBorder::ZERO)
    }

    fn process(&self, region: &mut GeneratingRegion) -> Result<(), PipelineError> {
        region.set(SeaLevelFacet { level: self.level })
    }
}
