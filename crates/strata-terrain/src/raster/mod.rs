//! Rasterizers: turn finished facets into blocks.
//!
//! Each rasterizer resolves its blocks against a [`BlockRegistry`] once, at
//! construction, and then writes through a [`ChunkWriter`] per chunk. Writes
//! outside the chunk are skipped by the writer, so a rasterizer can emit a
//! whole structure without clipping it first.

mod flora;
mod house;

pub use flora::{FloraRasterizer, flora_block_name};
pub use house::{HOUSE_BLOCK, HouseRasterizer, house_shell};

use strata_voxel::{BlockId, BlockRegistry, ChunkWriter};

use crate::error::RasterError;
use crate::region::GeneratedRegion;

/// Converts facets of a generated region into block placements.
pub trait WorldRasterizer: Send + Sync {
    /// Resolve every block this rasterizer emits.
    ///
    /// # Errors
    ///
    /// Returns [`RasterError::UnknownBlock`] for the first unregistered name.
    fn initialize(registry: &BlockRegistry) -> Result<Self, RasterError>
    where
        Self: Sized;

    /// Write this rasterizer's blocks into `chunk`. Returns how many blocks
    /// landed inside the chunk.
    ///
    /// # Errors
    ///
    /// Returns [`RasterError::MissingFacet`] if `region` lacks a facet this
    /// rasterizer reads.
    fn generate_chunk(
        &self,
        chunk: &mut dyn ChunkWriter,
        region: &GeneratedRegion,
    ) -> Result<usize, RasterError>;
}

pub(crate) fn resolve(registry: &BlockRegistry, name: &str) -> Result<BlockId, RasterError> {
    registry
        .lookup_by_name(name)
        .ok_or_else(|| RasterError::UnknownBlock(name.to_string()))
}
