//! Demo binary that generates a patch of world and reports what came out.
//!
//! Configuration is loaded from `config.ron` and can be overridden via CLI flags.
//! Run with `cargo run -p strata-demo -- --seed 7 --regions 2`.

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Instant;

use clap::Parser;
use glam::IVec3;
use strata_config::{CliArgs, ConfigError, GeneratorConfig, default_config_dir};
use strata_math::Region3i;
use strata_noise::WorldSeed;
use strata_terrain::{
    FloraFacet, FloraType, GeneratedRegion, HouseFacet, ParallelRegionGenerator, PipelineError,
    RasterError, SurfaceHeightFacet, TerrainError, WorldRasterizer, WorldSettings,
    register_standard_blocks, standard_pipeline, standard_rasterizers,
};
use strata_voxel::{BlockRegistry, CHUNK_SIZE, Chunk, RegistryError};
use tracing::{error, info, warn};

#[derive(Debug, thiserror::Error)]
enum DemoError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error(transparent)]
    Terrain(#[from] TerrainError),
    #[error("failed to start workers: {0}")]
    Workers(#[from] std::io::Error),
    #[error("region at {min} failed: {source}")]
    Region {
        min: IVec3,
        #[source]
        source: PipelineError,
    },
}

impl From<RasterError> for DemoError {
    fn from(e: RasterError) -> Self {
        Self::Terrain(e.into())
    }
}

/// Totals over every generated region.
#[derive(Debug, Default)]
struct Summary {
    regions: usize,
    chunks: usize,
    min_height: f32,
    max_height: f32,
    flora: [usize; FloraType::ALL.len()],
    houses: usize,
    solid_voxels: usize,
    placed_voxels: usize,
    generation_time_us: u64,
}

impl Summary {
    fn new() -> Self {
        Self {
            min_height: f32::INFINITY,
            max_height: f32::NEG_INFINITY,
            ..Self::default()
        }
    }

    /// Fold the facets of one region into the totals. Only the core region
    /// counts so that neighbouring borders are not counted twice.
    fn record_facets(&mut self, generated: &GeneratedRegion) {
        let core = generated.region();
        self.regions += 1;

        if let Some(surface) = generated.facet::<SurfaceHeightFacet>() {
            for p in core.xz().iter() {
                let h = surface.get_world(p.x, p.y);
                self.min_height = self.min_height.min(h);
                self.max_height = self.max_height.max(h);
            }
        }
        if let Some(flora) = generated.facet::<FloraFacet>() {
            for (pos, kind) in flora.entries() {
                if core.contains(pos)
                    && let Some(slot) = FloraType::ALL.iter().position(|&f| f == kind)
                {
                    self.flora[slot] += 1;
                }
            }
        }
        if let Some(houses) = generated.facet::<HouseFacet>() {
            self.houses += houses.entries().filter(|(pos, _)| core.contains(*pos)).count();
        }
    }

    fn record_chunk(&mut self, chunk: &Chunk, registry: &BlockRegistry) {
        self.chunks += 1;
        self.solid_voxels += chunk
            .placements()
            .filter(|p| registry.is_solid(p.block))
            .count();
    }
}

/// Regions laid out on an `n x n` grid starting at the origin.
fn region_grid(config: &GeneratorConfig) -> Vec<Region3i> {
    let n = config.generation.regions as i32;
    let size = config.generation.region_size as i32;
    let height = config.generation.region_height as i32;
    (0..n)
        .flat_map(|x| (0..n).map(move |z| (x, z)))
        .map(|(x, z)| {
            Region3i::from_min_and_size(
                IVec3::new(x * size, 0, z * size),
                IVec3::new(size, height, size),
            )
        })
        .collect()
}

/// Split `region` into chunk-sized pieces, clipped to the region.
fn chunks_of(region: Region3i) -> impl Iterator<Item = Region3i> {
    let size = region.size();
    let steps = (size + IVec3::splat(CHUNK_SIZE - 1)) / CHUNK_SIZE;
    (0..steps.y).flat_map(move |cy| {
        (0..steps.z).flat_map(move |cz| {
            (0..steps.x).map(move |cx| {
                let min = region.min + IVec3::new(cx, cy, cz) * CHUNK_SIZE;
                let max = (min + IVec3::splat(CHUNK_SIZE - 1)).min(region.max);
                Region3i::from_min_max(min, max)
            })
        })
    })
}

fn settings_from(config: &GeneratorConfig) -> WorldSettings {
    WorldSettings {
        seed: WorldSeed::new(config.world.seed),
        sea_level: config.world.sea_level,
        base_height: config.world.base_height,
        mountain_height: config.terrain.mountain_height,
        mountain_octaves: config.terrain.mountain_octaves,
        canyons: config.terrain.canyon_enabled,
        houses: config.terrain.houses_enabled,
        flora_density: config.flora.density,
    }
}

fn run(config: &GeneratorConfig) -> Result<Summary, DemoError> {
    config.validate()?;
    let settings = settings_from(config);

    let mut registry = BlockRegistry::new();
    register_standard_blocks(&mut registry)?;
    info!(blocks = registry.len(), "Registered blocks");

    let pipeline = Arc::new(standard_pipeline(&settings)?);
    let rasterizers: Vec<Box<dyn WorldRasterizer>> = standard_rasterizers(&registry, &settings)?;

    let generator = match config.generation.worker_threads {
        0 => ParallelRegionGenerator::with_defaults(Arc::clone(&pipeline))?,
        threads => {
            ParallelRegionGenerator::new(Arc::clone(&pipeline), threads, threads * 4, threads * 8)?
        }
    };

    let regions = region_grid(config);
    info!(
        seed = config.world.seed,
        regions = regions.len(),
        "Generating regions"
    );

    let start = Instant::now();
    let mut summary = Summary::new();
    for result in generator.generate_all(regions) {
        summary.generation_time_us += result.generation_time_us;
        let generated = result.result.map_err(|source| DemoError::Region {
            min: result.region.min,
            source,
        })?;
        summary.record_facets(&generated);

        for chunk_region in chunks_of(generated.region()) {
            let mut chunk = Chunk::with_region(chunk_region);
            for rasterizer in &rasterizers {
                summary.placed_voxels += rasterizer.generate_chunk(&mut chunk, &generated)?;
            }
            summary.record_chunk(&chunk, &registry);
        }
    }
    info!(elapsed_ms = start.elapsed().as_millis() as u64, "Generation finished");

    Ok(summary)
}

fn report(summary: &Summary) {
    info!(
        regions = summary.regions,
        chunks = summary.chunks,
        worker_time_ms = summary.generation_time_us / 1000,
        "Summary"
    );
    if summary.regions > 0 {
        info!(
            min = summary.min_height,
            max = summary.max_height,
            "Surface height range"
        );
    }
    for (flora, count) in FloraType::ALL.iter().zip(summary.flora) {
        info!(?flora, count, "Flora");
    }
    info!(
        houses = summary.houses,
        solid_voxels = summary.solid_voxels,
        placed_voxels = summary.placed_voxels,
        "Structures"
    );
}

fn main() -> ExitCode {
    let args = CliArgs::parse();

    let config_dir = args.config.clone().unwrap_or_else(default_config_dir);

    let mut config = GeneratorConfig::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        GeneratorConfig::default()
    });
    config.apply_cli_overrides(&args);

    let log_dir = config_dir.join("logs");
    strata_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config));

    if config.generation.regions == 0 {
        warn!("No regions requested; nothing to generate");
    }

    match run(&config) {
        Ok(summary) => {
            report(&summary);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "World generation failed");
            ExitCode::FAILURE
        }
    }
}
