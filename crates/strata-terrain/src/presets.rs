//! The stock world: default stage set, block set and rasterizers.

use strata_noise::WorldSeed;
use strata_voxel::{BlockDef, BlockRegistry, RegistryError};

use crate::error::{RasterError, TerrainError};
use crate::facets::FloraType;
use crate::pipeline::Pipeline;
use crate::providers::{
    BiomeHeightProvider, BiomeProvider, CanyonProvider, DEFAULT_FLORA_DENSITY,
    DEFAULT_MOUNTAIN_HEIGHT, DEFAULT_MOUNTAIN_OCTAVES, DEFAULT_SEA_LEVEL, FloraProvider,
    FloraTable, HouseProvider, MountainsProvider, SeaLevelProvider, SurfaceProvider,
};
use crate::raster::{
    FloraRasterizer, HOUSE_BLOCK, HouseRasterizer, WorldRasterizer, flora_block_name,
};

/// Knobs of the stock world.
#[derive(Clone, Debug, PartialEq)]
pub struct WorldSettings {
    pub seed: WorldSeed,
    pub sea_level: i32,
    pub base_height: f32,
    pub mountain_height: f32,
    pub mountain_octaves: u32,
    pub canyons: bool,
    pub houses: bool,
    pub flora_density: f32,
}

impl Default for WorldSettings {
    fn default() -> Self {
        Self {
            seed: WorldSeed::default(),
            sea_level: DEFAULT_SEA_LEVEL,
            base_height: 48.0,
            mountain_height: DEFAULT_MOUNTAIN_HEIGHT,
            mountain_octaves: DEFAULT_MOUNTAIN_OCTAVES,
            canyons: true,
            houses: true,
            flora_density: DEFAULT_FLORA_DENSITY,
        }
    }
}

/// Build the stock pipeline.
///
/// Stages are added as sea level, surface, biome height, mountains,
/// canyons, biome, flora, houses; mountains therefore update the surface
/// before canyons do.
///
/// # Errors
///
/// Fails on invalid settings, e.g. zero octaves or a density outside `[0, 1]`.
pub fn standard_pipeline(settings: &WorldSettings) -> Result<Pipeline, TerrainError> {
    let seed = settings.seed;
    let mut builder = Pipeline::builder(seed)
        .stage(SeaLevelProvider::new(settings.sea_level))
        .stage(SurfaceProvider::new(seed, settings.base_height)?)
        .stage(BiomeHeightProvider::new(seed)?)
        .stage(MountainsProvider::new(
            seed,
            settings.mountain_height,
            settings.mountain_octaves,
        )?);
    if settings.canyons {
        builder = builder.stage(CanyonProvider::new(seed)?);
    }
    builder = builder.stage(BiomeProvider::new()).stage(FloraProvider::new(
        seed,
        settings.flora_density,
        FloraTable::standard(),
    )?);
    if settings.houses {
        builder = builder.stage(HouseProvider::new(seed));
    }
    Ok(builder.build()?)
}

/// Register every block the stock rasterizers place.
///
/// # Errors
///
/// Fails if one of the names is already registered.
pub fn register_standard_blocks(registry: &mut BlockRegistry) -> Result<(), RegistryError> {
    registry.register(BlockDef::solid(HOUSE_BLOCK))?;
    for flora in FloraType::ALL {
        registry.register(BlockDef::decoration(flora_block_name(flora)))?;
    }
    Ok(())
}

/// Stock rasterizers for the enabled facets, in the order they should run.
///
/// # Errors
///
/// Fails if a block they need is not registered.
pub fn standard_rasterizers(
    registry: &BlockRegistry,
    settings: &WorldSettings,
) -> Result<Vec<Box<dyn WorldRasterizer>>, RasterError> {
    let mut rasterizers: Vec<Box<dyn WorldRasterizer>> =
        vec![Box::new(FloraRasterizer::initialize(registry)?)];
    if settings.houses {
        rasterizers.push(Box::new(HouseRasterizer::initialize(registry)?));
    }
    Ok(rasterizers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderError;

    #[test]
    fn test_standard_stage_order() {
        let pipeline = standard_pipeline(&WorldSettings::default()).unwrap();
        assert_eq!(
            pipeline.stage_names(),
            [
                "sea_level",
                "surface",
                "biome_height",
                "mountains",
                "canyon",
                "biome",
                "flora",
                "house"
            ]
        );
    }

    #[test]
    fn test_optional_stages_dropped() {
        let settings = WorldSettings {
            canyons: false,
            houses: false,
            ..WorldSettings::default()
        };
        let names = standard_pipeline(&settings).unwrap().stage_names().len();
        assert_eq!(names, 6);
    }

    #[test]
    fn test_invalid_density_rejected() {
        let settings = WorldSettings {
            flora_density: 2.0,
            ..WorldSettings::default()
        };
        assert!(matches!(
            standard_pipeline(&settings),
            Err(TerrainError::Provider(_))
        ));
    }

    #[test]
    fn test_degenerate_mountain_height_rejected() {
        for mountain_height in [-5.0, f32::NAN] {
            let settings = WorldSettings {
                mountain_height,
                ..WorldSettings::default()
            };
            assert!(matches!(
                standard_pipeline(&settings),
                Err(TerrainError::Provider(ProviderError::InvalidMountainHeight(_)))
            ));
        }
    }

    #[test]
    fn test_standard_blocks_satisfy_rasterizers() {
        let mut registry = BlockRegistry::new();
        register_standard_blocks(&mut registry).unwrap();
        let rasterizers = standard_rasterizers(&registry, &WorldSettings::default()).unwrap();
        assert_eq!(rasterizers.len(), 2);
        assert!(register_standard_blocks(&mut registry).is_err());
    }
}
