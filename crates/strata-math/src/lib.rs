//! Integer region math shared by facets, noise batches, and rasterizers.

mod region;

pub use region::{Rect2i, Region3i};
