//! Generator configuration.
//!
//! Settings persist to disk as `config.ron`, can be overridden from the
//! command line, and are validated before a world is built from them.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    DebugConfig, FloraConfig, GenerationConfig, GeneratorConfig, TerrainConfig, WorldConfig,
    default_config_dir,
};
pub use error::ConfigError;
