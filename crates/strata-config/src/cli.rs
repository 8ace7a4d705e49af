//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::GeneratorConfig;

/// Strata command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "strata", about = "Deterministic facet-based world generator")]
pub struct CliArgs {
    /// World seed.
    #[arg(long, allow_negative_numbers = true)]
    pub seed: Option<i64>,

    /// Flora density in [0, 1].
    #[arg(long)]
    pub density: Option<f32>,

    /// Maximum mountain uplift in blocks.
    #[arg(long)]
    pub mountain_height: Option<f32>,

    /// Regions generated along each horizontal axis.
    #[arg(long)]
    pub regions: Option<u32>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl GeneratorConfig {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(seed) = args.seed {
            self.world.seed = seed;
        }
        if let Some(density) = args.density {
            self.flora.density = density;
        }
        if let Some(height) = args.mountain_height {
            self.terrain.mountain_height = height;
        }
        if let Some(regions) = args.regions {
            self.generation.regions = regions;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_override() {
        let mut config = GeneratorConfig::default();
        let args = CliArgs {
            seed: Some(-3),
            density: Some(0.1),
            log_level: Some("debug".to_string()),
            ..CliArgs::default()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.world.seed, -3);
        assert_eq!(config.flora.density, 0.1);
        assert_eq!(config.debug.log_level, "debug");
        // Non-overridden fields retain defaults
        assert_eq!(config.terrain.mountain_height, 400.0);
        assert_eq!(config.generation.regions, 4);
    }

    #[test]
    fn test_cli_no_override() {
        let original = GeneratorConfig::default();
        let mut config = GeneratorConfig::default();
        config.apply_cli_overrides(&CliArgs::default());
        assert_eq!(config, original);
    }

    #[test]
    fn test_parse_flags() {
        let args = CliArgs::try_parse_from([
            "strata",
            "--seed",
            "-42",
            "--regions",
            "2",
            "--mountain-height",
            "120.5",
        ])
        .unwrap();
        assert_eq!(args.seed, Some(-42));
        assert_eq!(args.regions, Some(2));
        assert_eq!(args.mountain_height, Some(120.5));
        assert!(args.config.is_none());
    }
}
