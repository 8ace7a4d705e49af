use glam::{IVec2, IVec3};
use strata_math::{Rect2i, Region3i};

use crate::{FacetBorder, FacetError};

/// Dense 2D field over a region's horizontal footprint plus its border.
///
/// World coordinates are `(x, z)`; they are stored as a [`Rect2i`] whose `y`
/// axis is world `z`. Values are laid out by [`Rect2i::world_index`], so a
/// batched noise array over [`FieldFacet2D::world_region`] lines up entry for
/// entry with [`FieldFacet2D::as_slice`].
#[derive(Clone, Debug, PartialEq)]
pub struct FieldFacet2D<T> {
    world_region: Rect2i,
    relative_region: Rect2i,
    data: Vec<T>,
}

impl<T: Copy> FieldFacet2D<T> {
    /// Allocate a field covering `core.xz()` grown by `border.sides`, with
    /// every cell set to `fill`.
    pub fn new(core: &Region3i, border: FacetBorder, fill: T) -> Self {
        let relative_region = core.xz();
        let world_region = relative_region.expand(border.sides);
        Self {
            world_region,
            relative_region,
            data: vec![fill; world_region.area()],
        }
    }

    /// The bordered area this facet stores.
    pub fn world_region(&self) -> Rect2i {
        self.world_region
    }

    /// The region core, without border.
    pub fn relative_region(&self) -> Rect2i {
        self.relative_region
    }

    /// Index of a world position into [`FieldFacet2D::as_slice`].
    pub fn world_index(&self, x: i32, z: i32) -> Option<usize> {
        self.world_region.world_index(IVec2::new(x, z))
    }

    /// Value at world `(x, z)`.
    ///
    /// # Panics
    ///
    /// Panics if `(x, z)` lies outside [`FieldFacet2D::world_region`].
    pub fn get_world(&self, x: i32, z: i32) -> T {
        match self.try_get_world(x, z) {
            Ok(v) => v,
            Err(e) => panic!("{e}"),
        }
    }

    /// Value at world `(x, z)`, or [`FacetError::OutOfBounds`].
    pub fn try_get_world(&self, x: i32, z: i32) -> Result<T, FacetError> {
        self.world_index(x, z)
            .map(|i| self.data[i])
            .ok_or_else(|| self.out_of_bounds(x, z))
    }

    /// Set the value at world `(x, z)`.
    ///
    /// # Panics
    ///
    /// Panics if `(x, z)` lies outside [`FieldFacet2D::world_region`].
    pub fn set_world(&mut self, x: i32, z: i32, value: T) {
        match self.world_index(x, z) {
            Some(i) => self.data[i] = value,
            None => panic!("{}", self.out_of_bounds(x, z)),
        }
    }

    /// Value at `(x, z)` relative to the core's minimum corner. Negative
    /// offsets reach into the border.
    ///
    /// # Panics
    ///
    /// Panics if the position lies outside the bordered area.
    pub fn get_relative(&self, x: i32, z: i32) -> T {
        let min = self.relative_region.min;
        self.get_world(min.x + x, min.y + z)
    }

    /// Set the value at `(x, z)` relative to the core's minimum corner.
    ///
    /// # Panics
    ///
    /// Panics if the position lies outside the bordered area.
    pub fn set_relative(&mut self, x: i32, z: i32, value: T) {
        let min = self.relative_region.min;
        self.set_world(min.x + x, min.y + z, value);
    }

    /// Raw values in world-index order.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Mutable raw values in world-index order.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    fn out_of_bounds(&self, x: i32, z: i32) -> FacetError {
        let r = self.world_region;
        FacetError::OutOfBounds {
            position: IVec3::new(x, 0, z),
            region: Region3i::from_min_max(
                IVec3::new(r.min.x, 0, r.min.y),
                IVec3::new(r.max.x, 0, r.max.y),
            ),
        }
    }
}
