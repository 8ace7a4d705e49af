use strata_noise::NoiseError;
use thiserror::Error;

use crate::facets::{Biome, FacetKind, FloraType};

/// How a stage touched a facet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    Read,
    Update,
    Produce,
}

impl std::fmt::Display for Access {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Access::Read => "read",
            Access::Update => "update",
            Access::Produce => "produce",
        })
    }
}

/// Errors from building or running a [`crate::Pipeline`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    /// A stage reads or updates a facet nothing produces.
    #[error("stage `{stage}` needs facet `{facet}` but no stage produces it")]
    MissingProducer { stage: String, facet: FacetKind },

    /// Two stages claim to produce the same facet.
    #[error("facet `{facet}` is produced by both `{first}` and `{second}`")]
    DuplicateProducer {
        facet: FacetKind,
        first: String,
        second: String,
    },

    /// Stage dependencies form a cycle.
    #[error("dependency cycle between stages: {}", stages.join(", "))]
    Cycle { stages: Vec<String> },

    /// A stage touched a facet its descriptor does not list.
    #[error("stage `{stage}` attempted to {access} undeclared facet `{facet}`")]
    UndeclaredAccess {
        stage: String,
        facet: FacetKind,
        access: Access,
    },

    /// A stage panicked while processing a region.
    #[error("stage `{stage}` panicked: {message}")]
    StagePanicked { stage: String, message: String },

    /// A declared facet was not present when it was needed.
    #[error("facet `{facet}` is not available to stage `{stage}`")]
    MissingFacet { stage: String, facet: FacetKind },
}

/// Errors constructing a facet provider.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProviderError {
    #[error(transparent)]
    Noise(#[from] NoiseError),

    /// A flora probability outside `[0, 1]`.
    #[error("flora probability {value} for {biome:?}/{flora:?} is outside [0, 1]")]
    InvalidProbability {
        biome: Option<Biome>,
        flora: Option<FloraType>,
        value: f32,
    },

    /// A mountain height that is negative or not a number.
    #[error("mountain height {0} must be finite and non-negative")]
    InvalidMountainHeight(f32),

    /// A placement density outside `[0, 1]`.
    #[error("density {0} is outside [0, 1]")]
    InvalidDensity(f32),
}

/// Errors from rasterizer setup or execution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RasterError {
    /// A block name the rasterizer needs is not registered.
    #[error("block `{0}` is not registered")]
    UnknownBlock(String),

    /// The generated region lacks a facet the rasterizer reads.
    #[error("generated region has no `{0}` facet")]
    MissingFacet(FacetKind),
}

/// Any failure while turning a seed into chunks.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TerrainError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error(transparent)]
    Raster(#[from] RasterError),
}
