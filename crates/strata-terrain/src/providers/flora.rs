//! Surface flora: position filters plus a per-biome category table.

use hashbrown::HashMap;
use strata_facet::FacetBorder;
use strata_noise::{WhiteNoise, WorldSeed};

use crate::error::{PipelineError, ProviderError};
use crate::facets::{
    Biome, BiomeFacet, FacetKind, FloraFacet, FloraType, SeaLevelFacet, SurfaceHeightFacet,
};
use crate::region::GeneratingRegion;
use crate::stage::{FacetProvider, StageDescriptor};

/// Share of surviving columns that receive flora when nothing else is
/// configured.
pub const DEFAULT_FLORA_DENSITY: f32 = 0.4;

/// Seed offset of the density roll, kept apart from category selection.
const DENSITY_SEED_OFFSET: i64 = 0x0F10_7A;

fn check_probability(
    biome: Option<Biome>,
    flora: Option<FloraType>,
    value: f32,
) -> Result<f32, ProviderError> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(ProviderError::InvalidProbability {
            biome,
            flora,
            value,
        })
    }
}

// ---------------------------------------------------------------------------
// Probability table
// ---------------------------------------------------------------------------

/// Probability of each flora category per biome.
///
/// The probability of `(biome, flora)` is `biome weight * type weight`
/// unless an explicit override is registered for the pair.
#[derive(Clone, Debug, Default)]
pub struct FloraTable {
    type_weights: HashMap<FloraType, f32>,
    biome_weights: HashMap<Biome, f32>,
    overrides: HashMap<(Biome, FloraType), f32>,
}

impl FloraTable {
    /// An empty table: every probability is zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// The stock table: mostly grass, forests and plains densest, nothing
    /// in oceans and rifts, no mushrooms on beaches, deserts, snow or rifts
    /// and no flowers on beaches.
    pub fn standard() -> Self {
        let mut table = Self::new();
        let types = [
            (FloraType::Grass, 0.85),
            (FloraType::Flower, 0.10),
            (FloraType::Mushroom, 0.05),
        ];
        let biomes = [
            (Biome::Forest, 0.3),
            (Biome::Plains, 0.2),
            (Biome::Mountains, 0.2),
            (Biome::Snow, 0.001),
            (Biome::Beach, 0.001),
            (Biome::Ocean, 0.0),
            (Biome::Rift, 0.0),
            (Biome::Desert, 0.001),
        ];
        for (flora, p) in types {
            table.type_weights.insert(flora, p);
        }
        for (biome, p) in biomes {
            table.biome_weights.insert(biome, p);
        }
        for (biome, flora) in [
            (Biome::Beach, FloraType::Mushroom),
            (Biome::Beach, FloraType::Flower),
            (Biome::Desert, FloraType::Mushroom),
            (Biome::Snow, FloraType::Mushroom),
            (Biome::Rift, FloraType::Mushroom),
        ] {
            table.overrides.insert((biome, flora), 0.0);
        }
        table
    }

    /// Set the weight of a category across all biomes.
    ///
    /// # Errors
    ///
    /// Rejects weights outside `[0, 1]`.
    pub fn set_type_weight(&mut self, flora: FloraType, p: f32) -> Result<(), ProviderError> {
        self.type_weights
            .insert(flora, check_probability(None, Some(flora), p)?);
        Ok(())
    }

    /// Set the weight of a biome across all categories.
    ///
    /// # Errors
    ///
    /// Rejects weights outside `[0, 1]`.
    pub fn set_biome_weight(&mut self, biome: Biome, p: f32) -> Result<(), ProviderError> {
        self.biome_weights
            .insert(biome, check_probability(Some(biome), None, p)?);
        Ok(())
    }

    /// Pin the probability of one pair, ignoring the weights.
    ///
    /// # Errors
    ///
    /// Rejects probabilities outside `[0, 1]`.
    pub fn register(&mut self, biome: Biome, flora: FloraType, p: f32) -> Result<(), ProviderError> {
        self.overrides
            .insert((biome, flora), check_probability(Some(biome), Some(flora), p)?);
        Ok(())
    }

    /// Probability of `flora` in `biome`.
    pub fn probability(&self, biome: Biome, flora: FloraType) -> f32 {
        if let Some(&p) = self.overrides.get(&(biome, flora)) {
            return p;
        }
        let b = self.biome_weights.get(&biome).copied().unwrap_or(0.0);
        let t = self.type_weights.get(&flora).copied().unwrap_or(0.0);
        b * t
    }

    /// Pick a category for a roll `r` in `[0, 1]`.
    ///
    /// Categories are tried in declaration order; each takes the roll if it
    /// is below its probability, otherwise the probability is subtracted and
    /// the next category tries. A zero probability can never be chosen.
    pub fn select(&self, biome: Biome, mut r: f32) -> Option<FloraType> {
        for flora in FloraType::ALL {
            let p = self.probability(biome, flora);
            if r < p {
                return Some(flora);
            }
            r -= p;
        }
        None
    }
}

// ---------------------------------------------------------------------------
// Provider
// ---------------------------------------------------------------------------

/// Produces [`FloraFacet`]: at most one plant on top of each column.
///
/// A column qualifies when the cell above its surface is at or above sea
/// level and passes the density roll; the category then comes from the
/// table for the column's biome.
#[derive(Clone, Debug)]
pub struct FloraProvider {
    density: f32,
    table: FloraTable,
    density_noise: WhiteNoise,
    type_noise: WhiteNoise,
}

impl FloraProvider {
    /// # Errors
    ///
    /// Rejects a density outside `[0, 1]`.
    pub fn new(seed: WorldSeed, density: f32, table: FloraTable) -> Result<Self, ProviderError> {
        if !(0.0..=1.0).contains(&density) {
            return Err(ProviderError::InvalidDensity(density));
        }
        Ok(Self {
            density,
            table,
            density_noise: WhiteNoise::new(seed.offset(DENSITY_SEED_OFFSET)),
            type_noise: WhiteNoise::new(seed),
        })
    }

    /// The standard table at the default density.
    ///
    /// # Errors
    ///
    /// Never fails in practice; the signature matches [`FloraProvider::new`].
    pub fn with_defaults(seed: WorldSeed) -> Result<Self, ProviderError> {
        Self::new(seed, DEFAULT_FLORA_DENSITY, FloraTable::standard())
    }

    pub fn table(&self) -> &FloraTable {
        &self.table
    }

    fn passes_density(&self, x: i32, y: i32, z: i32) -> bool {
        (self.density_noise.cell_3d(x, y, z).abs() as f32) < self.density
    }
}

impl FacetProvider for FloraProvider {
    fn descriptor(&self) -> StageDescriptor {
        StageDescriptor::new("flora")
            .requires(FacetKind::SeaLevel, FacetBorder::ZERO)
            .requires(FacetKind::SurfaceHeight, FacetBorder::ZERO)
            .requires(FacetKind::Biome, FacetBorder::ZERO)
            .produces(FacetKind::Flora, FacetBorder::ZERO)
    }

    fn process(&self, region: &mut GeneratingRegion) -> Result<(), PipelineError> {
        let core = region.region();
        let mut facet = FloraFacet::new(&core, region.border(FacetKind::Flora));
        {
            let sea_level = region.get::<SeaLevelFacet>()?.level;
            let surface = region.get::<SurfaceHeightFacet>()?;
            let biomes = region.get::<BiomeFacet>()?;
            let world = facet.world_region();

            for column in world.xz().iter() {
                let (x, z) = (column.x, column.y);
                let y = surface.get_world(x, z).floor() as i32 + 1;
                if y < world.min.y || y > world.max.y {
                    continue;
                }
                if y < sea_level || !self.passes_density(x, y, z) {
                    continue;
                }
                let roll = self.type_noise.cell_2d(x, z).abs() as f32;
                if let Some(flora) = self.table.select(biomes.get_world(x, z), roll) {
                    facet.set_world(glam::IVec3::new(x, y, z), flora);
                }
            }
        }
        region.set(facet)
    }
}
