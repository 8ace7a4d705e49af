//! Dense block storage over a world-space box and the [`ChunkWriter`] seam
//! rasterizers write through.

use glam::IVec3;
use rustc_hash::FxHashMap;
use strata_math::Region3i;

use crate::BlockId;

/// Edge length of a default chunk in blocks.
pub const CHUNK_SIZE: i32 = 32;

/// A single block written by a rasterizer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct VoxelPlacement {
    pub position: IVec3,
    pub block: BlockId,
}

/// Write target for rasterizers.
///
/// Implementations skip positions outside [`ChunkWriter::region`] without
/// failing, so rasterizers may emit whole structures that straddle chunks.
pub trait ChunkWriter {
    /// World-space box this writer accepts.
    fn region(&self) -> Region3i;

    /// Write `block` at world `pos`. Returns `false` if `pos` was skipped.
    fn set_block(&mut self, pos: IVec3, block: BlockId) -> bool;
}

/// Dense chunk; cells are indexed with x fastest, then z, then y.
#[derive(Clone, Debug, PartialEq)]
pub struct Chunk {
    region: Region3i,
    blocks: Vec<BlockId>,
}

impl Chunk {
    /// A `CHUNK_SIZE`³ chunk of air whose minimum corner is `min`.
    pub fn new(min: IVec3) -> Self {
        Self::with_region(Region3i::from_min_and_size(min, IVec3::splat(CHUNK_SIZE)))
    }

    /// A chunk of air covering an arbitrary box.
    pub fn with_region(region: Region3i) -> Self {
        Self {
            region,
            blocks: vec![BlockId::AIR; region.volume()],
        }
    }

    /// Block at world `pos`, or `None` outside the chunk.
    pub fn get_block(&self, pos: IVec3) -> Option<BlockId> {
        self.index(pos).map(|i| self.blocks[i])
    }

    /// Number of non-air cells.
    pub fn count_non_air(&self) -> usize {
        self.blocks.iter().filter(|b| !b.is_air()).count()
    }

    /// Number of cells holding `block`.
    pub fn count(&self, block: BlockId) -> usize {
        self.blocks.iter().filter(|&&b| b == block).count()
    }

    /// Iterate over every non-air cell as a placement.
    pub fn placements(&self) -> impl Iterator<Item = VoxelPlacement> + '_ {
        self.region
            .iter()
            .zip(self.blocks.iter())
            .filter(|(_, b)| !b.is_air())
            .map(|(position, &block)| VoxelPlacement { position, block })
    }

    fn index(&self, pos: IVec3) -> Option<usize> {
        if !self.region.contains(pos) {
            return None;
        }
        let size = self.region.size();
        let rel = pos - self.region.min;
        Some((rel.x + rel.z * size.x + rel.y * size.x * size.z) as usize)
    }
}

impl ChunkWriter for Chunk {
    fn region(&self) -> Region3i {
        self.region
    }

    fn set_block(&mut self, pos: IVec3, block: BlockId) -> bool {
        match self.index(pos) {
            Some(i) => {
                self.blocks[i] = block;
                true
            }
            None => false,
        }
    }
}

/// Writer that records placements instead of storing them densely.
///
/// Later writes to the same position replace earlier ones.
#[derive(Clone, Debug)]
pub struct PlacementRecorder {
    region: Region3i,
    placements: Vec<VoxelPlacement>,
    by_position: FxHashMap<IVec3, usize>,
}

impl PlacementRecorder {
    pub fn new(region: Region3i) -> Self {
        Self {
            region,
            placements: Vec::new(),
            by_position: FxHashMap::default(),
        }
    }

    /// Recorded placements in write order.
    pub fn placements(&self) -> &[VoxelPlacement] {
        &self.placements
    }
}

impl ChunkWriter for PlacementRecorder {
    fn region(&self) -> Region3i {
        self.region
    }

    fn set_block(&mut self, pos: IVec3, block: BlockId) -> bool {
        if !self.region.contains(pos) {
            return false;
        }
        match self.by_position.get(&pos) {
            Some(&i) => self.placements[i].block = block,
            None => {
                self.by_position.insert(pos, self.placements.len());
                self.placements.push(VoxelPlacement {
                    position: pos,
                    block,
                });
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_chunk_is_air() {
        let chunk = Chunk::new(IVec3::new(32, 0, -32));
        assert_eq!(chunk.count_non_air(), 0);
        assert_eq!(chunk.get_block(IVec3::new(32, 0, -32)), Some(BlockId::AIR));
        assert_eq!(chunk.get_block(IVec3::new(63, 31, -1)), Some(BlockId::AIR));
        assert_eq!(chunk.get_block(IVec3::new(64, 0, -32)), None);
    }

    #[test]
    fn test_set_block_inside_and_outside() {
        let mut chunk = Chunk::new(IVec3::ZERO);
        assert!(chunk.set_block(IVec3::new(1, 2, 3), BlockId(5)));
        assert!(!chunk.set_block(IVec3::new(-1, 2, 3), BlockId(5)));
        assert_eq!(chunk.get_block(IVec3::new(1, 2, 3)), Some(BlockId(5)));
        assert_eq!(chunk.count_non_air(), 1);
        assert_eq!(chunk.count(BlockId(5)), 1);
    }

    #[test]
    fn test_placements_report_world_positions() {
        let region = Region3i::from_min_and_size(IVec3::new(-4, 10, 7), IVec3::new(3, 2, 5));
        let mut chunk = Chunk::with_region(region);
        chunk.set_block(IVec3::new(-2, 11, 9), BlockId(1));
        chunk.set_block(IVec3::new(-4, 10, 7), BlockId(2));
        let placed: Vec<_> = chunk.placements().collect();
        assert_eq!(
            placed,
            vec![
                VoxelPlacement {
                    position: IVec3::new(-4, 10, 7),
                    block: BlockId(2),
                },
                VoxelPlacement {
                    position: IVec3::new(-2, 11, 9),
                    block: BlockId(1),
                },
            ]
        );
    }

    #[test]
    fn test_recorder_skips_outside_and_overwrites() {
        let region = Region3i::from_min_and_size(IVec3::ZERO, IVec3::splat(4));
        let mut recorder = PlacementRecorder::new(region);
        assert!(recorder.set_block(IVec3::new(1, 1, 1), BlockId(3)));
        assert!(recorder.set_block(IVec3::new(1, 1, 1), BlockId(4)));
        assert!(!recorder.set_block(IVec3::new(4, 0, 0), BlockId(3)));
        assert_eq!(
            recorder.placements(),
            &[VoxelPlacement {
                position: IVec3::new(1, 1, 1),
                block: BlockId(4),
            }]
        );
    }
}
