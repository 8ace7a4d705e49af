//! Block registry, dense chunk storage and the writer interface rasterizers
//! emit voxels through.

pub mod chunk;
pub mod registry;

pub use chunk::{CHUNK_SIZE, Chunk, ChunkWriter, PlacementRecorder, VoxelPlacement};
pub use registry::{BlockDef, BlockId, BlockRegistry, RegistryError};
