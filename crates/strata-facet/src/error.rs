use glam::IVec3;
use strata_math::Region3i;

/// Errors from the checked facet accessors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FacetError {
    /// The position lies outside the facet's bordered world region.
    #[error("position {position} is outside facet region {region:?}")]
    OutOfBounds {
        /// Requested world position (`y` is zero for 2D facets).
        position: IVec3,
        /// The facet's bordered world region.
        region: Region3i,
    },
}
