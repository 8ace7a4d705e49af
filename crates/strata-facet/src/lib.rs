//! Bordered facet storage addressed in world coordinates.
//!
//! A facet is one computed property of a region (surface height, biome,
//! placement flags). Storage always covers the region's core plus the border
//! its consumers asked for; reading or writing outside that area is a
//! precondition violation and panics.

mod border;
mod error;
mod field;
mod sparse;

pub use border::FacetBorder;
pub use error::FacetError;
pub use field::FieldFacet2D;
pub use sparse::SparseFacet3D;
