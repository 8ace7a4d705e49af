//! Configuration structs with generator defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level generator configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GeneratorConfig {
    /// World identity and base levels.
    pub world: WorldConfig,
    /// Terrain shaping stages.
    pub terrain: TerrainConfig,
    /// Surface flora.
    pub flora: FloraConfig,
    /// Region layout and worker pool.
    pub generation: GenerationConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// World configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WorldConfig {
    /// World seed; every noise source is derived from it.
    pub seed: i64,
    /// Sea level in blocks.
    pub sea_level: i32,
    /// Mean surface height before mountains and canyons.
    pub base_height: f32,
}

/// Terrain configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TerrainConfig {
    /// Maximum mountain uplift in blocks.
    pub mountain_height: f32,
    /// Octaves of the mountain ridge noise.
    pub mountain_octaves: u32,
    /// Run the canyon stage.
    pub canyon_enabled: bool,
    /// Run the house stage and rasterizer.
    pub houses_enabled: bool,
}

/// Flora configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FloraConfig {
    /// Share of eligible columns that receive flora, in `[0, 1]`.
    pub density: f32,
}

/// Generation configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GenerationConfig {
    /// Horizontal edge length of a region in blocks.
    pub region_size: u32,
    /// Vertical extent of a region in blocks.
    pub region_height: u32,
    /// Regions generated along each horizontal axis.
    pub regions: u32,
    /// Worker threads (0 = one per core minus one).
    pub worker_threads: usize,
}

/// Debug configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log filter (error, warn, info, debug, trace or a full directive).
    pub log_level: String,
}

// --- Defaults ---

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            sea_level: 32,
            base_height: 48.0,
        }
    }
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            mountain_height: 400.0,
            mountain_octaves: 8,
            canyon_enabled: true,
            houses_enabled: true,
        }
    }
}

impl Default for FloraConfig {
    fn default() -> Self {
        Self { density: 0.4 }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            region_size: 64,
            region_height: 256,
            regions: 4,
            worker_threads: 0,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Platform config directory for the generator, e.g.
/// `~/.config/strata` on Linux. Falls back to `./strata`.
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .map(|dir| dir.join("strata"))
        .unwrap_or_else(|| PathBuf::from("strata"))
}

// --- Validation ---

impl GeneratorConfig {
    /// Reject values the generator cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let density = self.flora.density;
        if !(0.0..=1.0).contains(&density) {
            return Err(ConfigError::OutOfRange {
                field: "flora.density",
                reason: format!("{density} is outside [0, 1]"),
            });
        }
        if self.terrain.mountain_octaves == 0 {
            return Err(ConfigError::OutOfRange {
                field: "terrain.mountain_octaves",
                reason: "must be at least 1".to_string(),
            });
        }
        if !self.terrain.mountain_height.is_finite() || self.terrain.mountain_height < 0.0 {
            return Err(ConfigError::OutOfRange {
                field: "terrain.mountain_height",
                reason: format!("{} is not a non-negative height", self.terrain.mountain_height),
            });
        }
        if self.generation.region_size == 0 || self.generation.region_height == 0 {
            return Err(ConfigError::OutOfRange {
                field: "generation.region_size",
                reason: "regions must have a non-zero size".to_string(),
            });
        }
        if self.generation.region_size > i32::MAX as u32
            || self.generation.region_height > i32::MAX as u32
        {
            return Err(ConfigError::OutOfRange {
                field: "generation.region_size",
                reason: "regions must fit in i32 coordinates".to_string(),
            });
        }
        if self.world.base_height.is_nan() {
            return Err(ConfigError::OutOfRange {
                field: "world.base_height",
                reason: "must be a number".to_string(),
            });
        }
        Ok(())
    }
}

// --- Load / Save / Reload ---

impl GeneratorConfig {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join("config.ron");

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: GeneratorConfig =
                ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = GeneratorConfig::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let config_path = config_dir.join("config.ron");
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(2)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// Re-read `config.ron`: `Some(new_config)` if it differs from `self`.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let config_path = config_dir.join("config.ron");
        let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
        let new_config: GeneratorConfig =
            ron::from_str(&contents).map_err(ConfigError::ParseError)?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }
}
