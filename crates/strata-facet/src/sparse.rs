use glam::IVec3;
use hashbrown::HashMap;
use strata_math::Region3i;

use crate::{FacetBorder, FacetError};

/// Sparse 3D facet: only positions that hold a value are stored.
///
/// Used for placements (flora, structures) where almost every cell is empty.
#[derive(Clone, Debug)]
pub struct SparseFacet3D<T> {
    world_region: Region3i,
    relative_region: Region3i,
    entries: HashMap<IVec3, T>,
}

impl<T: Copy> SparseFacet3D<T> {
    /// An empty facet covering `core` grown by `border`.
    pub fn new(core: &Region3i, border: FacetBorder) -> Self {
        Self {
            world_region: core.expand(border.top, border.bottom, border.sides),
            relative_region: *core,
            entries: HashMap::new(),
        }
    }

    /// The bordered volume this facet covers.
    pub fn world_region(&self) -> Region3i {
        self.world_region
    }

    /// The region core, without border.
    pub fn relative_region(&self) -> Region3i {
        self.relative_region
    }

    /// Value at a world position, `None` if nothing was placed there.
    ///
    /// # Panics
    ///
    /// Panics if `pos` lies outside [`SparseFacet3D::world_region`].
    pub fn get_world(&self, pos: IVec3) -> Option<T> {
        match self.try_get_world(pos) {
            Ok(v) => v,
            Err(e) => panic!("{e}"),
        }
    }

    /// Value at a world position, or [`FacetError::OutOfBounds`].
    pub fn try_get_world(&self, pos: IVec3) -> Result<Option<T>, FacetError> {
        if !self.world_region.contains(pos) {
            return Err(FacetError::OutOfBounds {
                position: pos,
                region: self.world_region,
            });
        }
        Ok(self.entries.get(&pos).copied())
    }

    /// Place a value at a world position.
    ///
    /// # Panics
    ///
    /// Panics if `pos` lies outside [`SparseFacet3D::world_region`].
    pub fn set_world(&mut self, pos: IVec3, value: T) {
        if !self.world_region.contains(pos) {
            panic!(
                "{}",
                FacetError::OutOfBounds {
                    position: pos,
                    region: self.world_region,
                }
            );
        }
        self.entries.insert(pos, value);
    }

    /// Remove the value at a world position, returning it.
    pub fn remove_world(&mut self, pos: IVec3) -> Option<T> {
        self.entries.remove(&pos)
    }

    /// All placed values, in unspecified order.
    pub fn entries(&self) -> impl Iterator<Item = (IVec3, T)> + '_ {
        self.entries.iter().map(|(p, v)| (*p, *v))
    }

    /// Placed values sorted by `(y, z, x)`, for reproducible iteration.
    pub fn sorted_entries(&self) -> Vec<(IVec3, T)> {
        let mut out: Vec<_> = self.entries().collect();
        out.sort_by_key(|(p, _)| (p.y, p.z, p.x));
        out
    }

    /// Number of placed values.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing has been placed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
