use glam::IVec3;
use strata_facet::FacetBorder;
use strata_noise::{WhiteNoise, WorldSeed};

use crate::error::PipelineError;
use crate::facets::{FacetKind, HouseFacet, SurfaceHeightFacet};
use crate::region::GeneratingRegion;
use crate::stage::{FacetProvider, StageDescriptor};

/// White-noise value a column must exceed to hold a house.
pub const HOUSE_THRESHOLD: f64 = 0.99;

/// Horizontal reach of a house around its anchor.
const HOUSE_REACH: i32 = 4;

/// Height a house rises above its anchor, anchor layer excluded.
const HOUSE_RISE: i32 = 7;

/// Border of the house facet: anchors whose shell can reach into the core.
///
/// Shells only grow upwards from the anchor, so the facet reaches down but
/// not up.
pub const HOUSE_BORDER: FacetBorder = FacetBorder {
    top: 0,
    bottom: HOUSE_RISE,
    sides: HOUSE_REACH,
};

/// Produces [`HouseFacet`]: rare anchors sitting on the surface.
///
/// The facet extends sideways and downwards by the size of a house, so a
/// house anchored just outside the region, including in the region below,
/// still shows up when a chunk of this region is rasterized.
#[derive(Clone, Copy, Debug)]
pub struct HouseProvider {
    noise: WhiteNoise,
}

impl HouseProvider {
    pub fn new(seed: WorldSeed) -> Self {
        Self {
            noise: WhiteNoise::new(seed.offset(0x4805E)),
        }
    }

    /// Whether column `(x, z)` holds a house anchor.
    pub fn is_anchor(&self, x: i32, z: i32) -> bool {
        self.noise.cell_2d(x, z) > HOUSE_THRESHOLD
    }
}

impl FacetProvider for HouseProvider {
    fn descriptor(&self) -> StageDescriptor {
        StageDescriptor::new("house")
            .requires(FacetKind::SurfaceHeight, FacetBorder::sides(HOUSE_REACH))
            .produces(FacetKind::House, HOUSE_BORDER)
    }

    fn process(&self, region: &mut GeneratingRegion) -> Result<(), PipelineError> {
        let core = region.region();
        let mut facet = HouseFacet::new(&core, region.border(FacetKind::House));
        {
            let surface = region.get::<SurfaceHeightFacet>()?;
            let world = facet.world_region();
            for column in world.xz().iter() {
                if !self.is_anchor(column.x, column.y) {
                    continue;
                }
                let pos = IVec3::new(
                    column.x,
                    surface.get_world(column.x, column.y).floor() as i32,
                    column.y,
                );
                if world.contains(pos) {
                    facet.set_world(pos, true);
                }
            }
        }
        region.set(facet)
    }
}
