//! The concrete facets a world is built from and the kinds that key them.

use std::any::Any;
use std::fmt;
use std::ops::{Deref, DerefMut};

use strata_facet::{FacetBorder, FieldFacet2D, SparseFacet3D};
use strata_math::Region3i;

/// Identifies one facet in a region's store and in stage descriptors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FacetKind {
    SeaLevel,
    SurfaceHeight,
    BiomeHeight,
    Biome,
    Flora,
    House,
}

impl fmt::Display for FacetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FacetKind::SeaLevel => "sea_level",
            FacetKind::SurfaceHeight => "surface_height",
            FacetKind::BiomeHeight => "biome_height",
            FacetKind::Biome => "biome",
            FacetKind::Flora => "flora",
            FacetKind::House => "house",
        };
        f.write_str(name)
    }
}

/// A type that can live in a region's facet store.
///
/// Each kind maps to exactly one Rust type, so the store can hand out typed
/// references keyed only by [`Facet::KIND`].
pub trait Facet: Any + Send + Sync {
    const KIND: FacetKind;
}

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

/// Coarse terrain classification per column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Biome {
    Forest,
    Plains,
    Mountains,
    Snow,
    Beach,
    Ocean,
    Rift,
    Desert,
}

impl Biome {
    pub const ALL: [Biome; 8] = [
        Biome::Forest,
        Biome::Plains,
        Biome::Mountains,
        Biome::Snow,
        Biome::Beach,
        Biome::Ocean,
        Biome::Rift,
        Biome::Desert,
    ];
}

/// Small surface decoration. Declaration order is the order categories are
/// tried during selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FloraType {
    Grass,
    Flower,
    Mushroom,
}

impl FloraType {
    pub const ALL: [FloraType; 3] = [FloraType::Grass, FloraType::Flower, FloraType::Mushroom];
}

// ---------------------------------------------------------------------------
// Facets
// ---------------------------------------------------------------------------

/// World sea level; a single value for the whole region.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SeaLevelFacet {
    pub level: i32,
}

impl Facet for SeaLevelFacet {
    const KIND: FacetKind = FacetKind::SeaLevel;
}

macro_rules! field_facet {
    ($(#[$meta:meta])* $name:ident, $kind:ident, $value:ty, $fill:expr) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq)]
        pub struct $name(pub FieldFacet2D<$value>);

        impl $name {
            pub fn new(core: &Region3i, border: FacetBorder) -> Self {
                Self(FieldFacet2D::new(core, border, $fill))
            }
        }

        impl Facet for $name {
            const KIND: FacetKind = FacetKind::$kind;
        }

        impl Deref for $name {
            type Target = FieldFacet2D<$value>;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl DerefMut for $name {
            fn deref_mut(&mut self) -> &mut Self::Target {
                &mut self.0
            }
        }
    };
}

macro_rules! sparse_facet {
    ($(#[$meta:meta])* $name:ident, $kind:ident, $value:ty) => {
        $(#[$meta])*
        #[derive(Clone, Debug)]
        pub struct $name(pub SparseFacet3D<$value>);

        impl $name {
            pub fn new(core: &Region3i, border: FacetBorder) -> Self {
                Self(SparseFacet3D::new(core, border))
            }
        }

        impl Facet for $name {
            const KIND: FacetKind = FacetKind::$kind;
        }

        impl Deref for $name {
            type Target = SparseFacet3D<$value>;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl DerefMut for $name {
            fn deref_mut(&mut self) -> &mut Self::Target {
                &mut self.0
            }
        }
    };
}

field_facet!(
    /// Terrain surface height per column, in blocks.
    SurfaceHeightFacet,
    SurfaceHeight,
    f32,
    0.0
);

field_facet!(
    /// Low-frequency "terrain character" per column, in `[0, 5]`. Drives
    /// biome choice and canyon depth.
    BiomeHeightFacet,
    BiomeHeight,
    f32,
    0.0
);

field_facet!(
    /// Biome per column.
    BiomeFacet,
    Biome,
    Biome,
    Biome::Plains
);

sparse_facet!(
    /// Flora placements, one per decorated column at most.
    FloraFacet,
    Flora,
    FloraType
);

sparse_facet!(
    /// House anchors: `true` where a house stands on the surface.
    HouseFacet,
    House,
    bool
);
