//! The stock transform stages.

mod biome;
mod canyon;
mod flora;
mod house;
mod mountains;
mod sea_level;
mod surface;

pub use biome::{BiomeHeightProvider, BiomeProvider, MAX_BIOME_HEIGHT, classify};
pub use canyon::{CanyonBand, CanyonProvider};
pub use flora::{DEFAULT_FLORA_DENSITY, FloraProvider, FloraTable};
pub use house::{HOUSE_BORDER, HOUSE_THRESHOLD, HouseProvider};
pub use mountains::{DEFAULT_MOUNTAIN_HEIGHT, DEFAULT_MOUNTAIN_OCTAVES, MountainsProvider};
pub use sea_level::{DEFAULT_SEA_LEVEL, SeaLevelProvider};
pub use surface::{SURFACE_AMPLITUDE, SurfaceProvider};
