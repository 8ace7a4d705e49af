//! Facet-based world generation: stages that compute per-region facets in
//! dependency order, and rasterizers that turn those facets into blocks.
//!
//! A [`Pipeline`] is built once from seeded [`FacetProvider`]s. Generating a
//! region runs every stage in order over a [`GeneratingRegion`], which only
//! lets a stage touch the facets its [`StageDescriptor`] declares. The
//! resulting [`GeneratedRegion`] is handed to [`WorldRasterizer`]s per chunk.

mod error;
mod facets;
mod parallel;
mod pipeline;
mod presets;
mod region;
mod stage;

pub mod providers;
pub mod raster;

pub use error::{Access, PipelineError, ProviderError, RasterError, TerrainError};
pub use facets::{
    Biome, BiomeFacet, BiomeHeightFacet, Facet, FacetKind, FloraFacet, FloraType, HouseFacet,
    SeaLevelFacet, SurfaceHeightFacet,
};
pub use parallel::{ParallelRegionGenerator, RegionResult};
pub use pipeline::{Pipeline, PipelineBuilder};
pub use presets::{WorldSettings, register_standard_blocks, standard_pipeline, standard_rasterizers};
pub use raster::WorldRasterizer;
pub use region::{GeneratedRegion, GeneratingRegion};
pub use stage::{FacetDecl, FacetProvider, StageDescriptor};
