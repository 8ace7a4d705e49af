use strata_voxel::{BlockId, BlockRegistry, ChunkWriter};

use super::{WorldRasterizer, resolve};
use crate::error::RasterError;
use crate::facets::{FacetKind, FloraFacet, FloraType};
use crate::region::GeneratedRegion;

/// Block name placed for each flora category.
pub fn flora_block_name(flora: FloraType) -> &'static str {
    match flora {
        FloraType::Grass => "tall_grass",
        FloraType::Flower => "flower",
        FloraType::Mushroom => "mushroom",
    }
}

/// Places one decoration block per flora entry.
#[derive(Clone, Copy, Debug)]
pub struct FloraRasterizer {
    blocks: [BlockId; FloraType::ALL.len()],
}

impl FloraRasterizer {
    fn block(&self, flora: FloraType) -> BlockId {
        self.blocks[flora as usize]
    }
}

impl WorldRasterizer for FloraRasterizer {
    fn initialize(registry: &BlockRegistry) -> Result<Self, RasterError> {
        let mut blocks = [BlockId::AIR; FloraType::ALL.len()];
        for flora in FloraType::ALL {
            blocks[flora as usize] = resolve(registry, flora_block_name(flora))?;
        }
        Ok(Self { blocks })
    }

    fn generate_chunk(
        &self,
        chunk: &mut dyn ChunkWriter,
        region: &GeneratedRegion,
    ) -> Result<usize, RasterError> {
        let flora = region
            .facet::<FloraFacet>()
            .ok_or(RasterError::MissingFacet(FacetKind::Flora))?;

        let mut written = 0;
        for (pos, kind) in flora.sorted_entries() {
            if chunk.set_block(pos, self.block(kind)) {
                written += 1;
            }
        }
        Ok(written)
    }
}
