use glam::IVec3;
use strata_math::Region3i;
use strata_voxel::{BlockId, BlockRegistry, ChunkWriter};

use super::{WorldRasterizer, resolve};
use crate::error::RasterError;
use crate::facets::{FacetKind, HouseFacet};
use crate::region::GeneratedRegion;

/// Block houses are built from.
pub const HOUSE_BLOCK: &str = "stone";

/// Vertical lift from the anchor to the house center.
const CENTER_LIFT: i32 = 4;
/// Edge length of the outer cube.
const OUTER_EDGE: i32 = 8;
/// Edge length of the hollow inside.
const INNER_EDGE: i32 = 6;

/// Cube of edge `edge` whose cells run from `center - edge/2` up to
/// `center + edge/2 - 1` on each axis.
fn cube(center: IVec3, edge: i32) -> Region3i {
    Region3i::from_min_and_size(center - IVec3::splat(edge / 2), IVec3::splat(edge))
}

/// Wall cells of a house anchored at `anchor`: the outer cube minus the
/// hollow inside, both centered four blocks above the anchor.
pub fn house_shell(anchor: IVec3) -> impl Iterator<Item = IVec3> {
    let center = anchor + IVec3::new(0, CENTER_LIFT, 0);
    let inside = cube(center, INNER_EDGE);
    cube(center, OUTER_EDGE)
        .iter()
        .filter(move |p| !inside.contains(*p))
}

/// Builds a hollow stone cube on every house anchor.
#[derive(Clone, Copy, Debug)]
pub struct HouseRasterizer {
    stone: BlockId,
}

impl WorldRasterizer for HouseRasterizer {
    fn initialize(registry: &BlockRegistry) -> Result<Self, RasterError> {
        Ok(Self {
            stone: resolve(registry, HOUSE_BLOCK)?,
        })
    }

    fn generate_chunk(
        &self,
        chunk: &mut dyn ChunkWriter,
        region: &GeneratedRegion,
    ) -> Result<usize, RasterError> {
        let houses = region
            .facet::<HouseFacet>()
            .ok_or(RasterError::MissingFacet(FacetKind::House))?;

        let mut written = 0;
        for (anchor, present) in houses.sorted_entries() {
            if !present {
                continue;
            }
            for pos in house_shell(anchor) {
                if chunk.set_block(pos, self.stone) {
                    written += 1;
                }
            }
        }
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use strata_voxel::{BlockDef, Chunk, PlacementRecorder};

    use super::*;

    #[test]
    fn test_shell_at_origin() {
        let shell: Vec<_> = house_shell(IVec3::ZERO).collect();
        assert_eq!(shell.len(), 512 - 216);

        let outer = cube(IVec3::new(0, 4, 0), OUTER_EDGE);
        let inner = cube(IVec3::new(0, 4, 0), INNER_EDGE);
        assert_eq!(outer.min, IVec3::new(-4, 0, -4));
        assert_eq!(outer.max, IVec3::new(3, 7, 3));
        assert!(shell.iter().all(|p| outer.contains(*p) && !inner.contains(*p)));
        // The anchor sits in the floor of the shell.
        assert!(shell.contains(&IVec3::ZERO));
        assert!(!shell.contains(&IVec3::new(0, 4, 0)));
    }

    #[test]
    fn test_unknown_block_fails_fast() {
        let registry = BlockRegistry::new();
        assert_eq!(
            HouseRasterizer::initialize(&registry).err(),
            Some(RasterError::UnknownBlock("stone".into()))
        );
    }

    #[test]
    fn test_shell_clipped_to_chunk() {
        let mut registry = BlockRegistry::new();
        let stone = registry.register(BlockDef::solid("stone")).unwrap();

        // Only the x >= 0 half of a shell anchored at the origin.
        let region = Region3i::from_min_and_size(IVec3::new(0, -16, -16), IVec3::splat(32));
        let mut chunk = Chunk::with_region(region);
        for pos in house_shell(IVec3::ZERO) {
            chunk.set_block(pos, stone);
        }
        let expected = house_shell(IVec3::ZERO).filter(|p| p.x >= 0).count();
        assert_eq!(chunk.count(stone), expected);

        let mut recorder = PlacementRecorder::new(region);
        for pos in house_shell(IVec3::ZERO) {
            recorder.set_block(pos, stone);
        }
        assert_eq!(recorder.placements().len(), expected);
    }
}
