//! Stage scheduling: dependency ordering, border propagation and per-region
//! execution.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;

use hashbrown::HashMap;
use strata_facet::FacetBorder;
use strata_math::Region3i;
use strata_noise::WorldSeed;

use crate::error::PipelineError;
use crate::facets::FacetKind;
use crate::region::{GeneratedRegion, GeneratingRegion};
use crate::stage::{FacetProvider, StageDescriptor};

/// Collects stages before they are ordered.
pub struct PipelineBuilder {
    seed: WorldSeed,
    stages: Vec<Box<dyn FacetProvider>>,
}

impl PipelineBuilder {
    /// Append a stage. Insertion order breaks ties between stages that do
    /// not depend on each other, including the order updaters of the same
    /// facet run in.
    pub fn stage(mut self, provider: impl FacetProvider + 'static) -> Self {
        self.stages.push(Box::new(provider));
        self
    }

    /// Order the stages and compute facet borders.
    ///
    /// # Errors
    ///
    /// Fails if a needed facet has no producer, a facet has two producers,
    /// or the dependencies form a cycle.
    pub fn build(self) -> Result<Pipeline, PipelineError> {
        let descriptors: Vec<StageDescriptor> = self.stages.iter().map(|s| s.descriptor()).collect();
        let order = schedule(&descriptors)?;
        let borders = propagate_borders(&descriptors, &order);

        let names: Vec<&str> = order.iter().map(|&i| descriptors[i].name.as_str()).collect();
        tracing::info!(seed = self.seed.value(), stages = ?names, "Built generation pipeline");

        let mut slots: Vec<Option<Box<dyn FacetProvider>>> = self.stages.into_iter().map(Some).collect();
        let stages = order
            .iter()
            .filter_map(|&i| slots[i].take().map(|p| (descriptors[i].name.clone(), p)))
            .collect();

        Ok(Pipeline {
            seed: self.seed,
            stages,
            borders: Arc::new(borders),
        })
    }
}

/// An ordered, validated set of stages that turns a region into facets.
///
/// Immutable once built; share it between threads behind an [`Arc`].
pub struct Pipeline {
    seed: WorldSeed,
    stages: Vec<(String, Box<dyn FacetProvider>)>,
    borders: Arc<HashMap<FacetKind, FacetBorder>>,
}

impl Pipeline {
    pub fn builder(seed: WorldSeed) -> PipelineBuilder {
        PipelineBuilder {
            seed,
            stages: Vec::new(),
        }
    }

    /// Seed the pipeline was assembled for.
    pub fn seed(&self) -> WorldSeed {
        self.seed
    }

    /// Stage names in execution order.
    pub fn stage_names(&self) -> Vec<&str> {
        self.stages.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Border every facet of `kind` is allocated with.
    pub fn border(&self, kind: FacetKind) -> FacetBorder {
        self.borders.get(&kind).copied().unwrap_or_default()
    }

    /// Run every stage over `region` in order.
    ///
    /// # Errors
    ///
    /// Returns the first stage failure, typically an undeclared facet access.
    /// A stage that panics is reported as [`PipelineError::StagePanicked`];
    /// the partly generated region is dropped.
    pub fn generate(&self, region: Region3i) -> Result<GeneratedRegion, PipelineError> {
        let mut generating = GeneratingRegion::with_borders(region, Arc::clone(&self.borders));
        for (name, stage) in &self.stages {
            let start = Instant::now();
            panic::catch_unwind(AssertUnwindSafe(|| generating.run_stage(stage.as_ref())))
                .map_err(|payload| PipelineError::StagePanicked {
                    stage: name.clone(),
                    message: panic_message(payload.as_ref()),
                })??;
            tracing::debug!(
                stage = name.as_str(),
                min = %region.min,
                elapsed_us = start.elapsed().as_micros() as u64,
                "Stage complete"
            );
        }
        Ok(generating.into_generated())
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Topological order of `descriptors` as indices.
///
/// Edges run producer → updaters (chained in insertion order) → readers.
/// Among ready stages the lowest index goes first, so the result is
/// deterministic.
fn schedule(descriptors: &[StageDescriptor]) -> Result<Vec<usize>, PipelineError> {
    let mut producers: HashMap<FacetKind, usize> = HashMap::new();
    for (i, desc) in descriptors.iter().enumerate() {
        for decl in &desc.produces {
            if let Some(&first) = producers.get(&decl.kind) {
                return Err(PipelineError::DuplicateProducer {
                    facet: decl.kind,
                    first: descriptors[first].name.clone(),
                    second: desc.name.clone(),
                });
            }
            producers.insert(decl.kind, i);
        }
    }

    let mut updaters: HashMap<FacetKind, Vec<usize>> = HashMap::new();
    for (i, desc) in descriptors.iter().enumerate() {
        for decl in &desc.updates {
            updaters.entry(decl.kind).or_default().push(i);
        }
    }

    let n = descriptors.len();
    let mut edges: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut add_edge = |from: usize, to: usize| {
        if from != to && !edges[from].contains(&to) {
            edges[from].push(to);
        }
    };

    for (i, desc) in descriptors.iter().enumerate() {
        for decl in desc.requires.iter().chain(desc.updates.iter()) {
            let Some(&producer) = producers.get(&decl.kind) else {
                return Err(PipelineError::MissingProducer {
                    stage: desc.name.clone(),
                    facet: decl.kind,
                });
            };
            add_edge(producer, i);
        }
    }

    for (kind, chain) in &updaters {
        for pair in chain.windows(2) {
            add_edge(pair[0], pair[1]);
        }
        for (i, desc) in descriptors.iter().enumerate() {
            if desc.requires.iter().any(|d| d.kind == *kind) && !chain.contains(&i) {
                for &u in chain {
                    add_edge(u, i);
                }
            }
        }
    }

    let mut in_degree = vec![0_usize; n];
    for targets in &edges {
        for &t in targets {
            in_degree[t] += 1;
        }
    }

    let mut order = Vec::with_capacity(n);
    let mut done = vec![false; n];
    while order.len() < n {
        let Some(next) = (0..n).find(|&i| !done[i] && in_degree[i] == 0) else {
            let stages = (0..n)
                .filter(|&i| !done[i])
                .map(|i| descriptors[i].name.clone())
                .collect();
            return Err(PipelineError::Cycle { stages });
        };
        done[next] = true;
        order.push(next);
        for &t in &edges[next] {
            in_degree[t] -= 1;
        }
    }
    Ok(order)
}

/// Walk the stages backwards so every facet's border covers what all later
/// stages need from it.
///
/// A stage's outputs are allocated at least with their declared border. Its
/// inputs must then cover the largest output border grown by the input's own
/// declared border.
fn propagate_borders(
    descriptors: &[StageDescriptor],
    order: &[usize],
) -> HashMap<FacetKind, FacetBorder> {
    let mut borders: HashMap<FacetKind, FacetBorder> = HashMap::new();

    for &i in order.iter().rev() {
        let desc = &descriptors[i];
        let mut out = FacetBorder::ZERO;
        for decl in desc.outputs() {
            let border = borders.entry(decl.kind).or_default();
            *border = border.max(decl.border);
            out = out.max(*border);
        }
        for decl in &desc.requires {
            let border = borders.entry(decl.kind).or_default();
            *border = border.max(decl.border.extend_by(out));
        }
    }
    borders
}

#[cfg(test)]
mod tests {
    use glam::IVec3;

    use super::*;
    use crate::facets::{BiomeHeightFacet, SurfaceHeightFacet};

    /// Stage that declares facets and does nothing else.
    struct Decl(StageDescriptor);

    impl FacetProvider for Decl {
        fn descriptor(&self) -> StageDescriptor {
            self.0.clone()
        }

        fn process(&self, region: &mut GeneratingRegion) -> Result<(), PipelineError> {
            let core = region.region();
            for decl in &self.0.produces {
                let border = region.border(decl.kind);
                match decl.kind {
                    FacetKind::SurfaceHeight => region.set(SurfaceHeightFacet::new(&core, border))?,
                    FacetKind::BiomeHeight => region.set(BiomeHeightFacet::new(&core, border))?,
                    _ => {}
                }
            }
            Ok(())
        }
    }

    fn stage(name: &str) -> StageDescriptor {
        StageDescriptor::new(name)
    }

    fn names(pipeline: &Pipeline) -> Vec<String> {
        pipeline.stage_names().into_iter().map(String::from).collect()
    }

    /// Stage that produces the surface and then panics.
    struct Explodes;

    impl FacetProvider for Explodes {
        fn descriptor(&self) -> StageDescriptor {
            stage("explodes").produces(FacetKind::SurfaceHeight, FacetBorder::ZERO)
        }

        fn process(&self, _region: &mut GeneratingRegion) -> Result<(), PipelineError> {
            panic!("bad clamp range");
        }
    }

    #[test]
    fn test_readers_run_after_producer_and_updaters() {
        let pipeline = Pipeline::builder(WorldSeed::new(1))
            .stage(Decl(stage("reader").requires(FacetKind::SurfaceHeight, FacetBorder::ZERO)))
            .stage(Decl(stage("update_b").updates(FacetKind::SurfaceHeight, FacetBorder::ZERO)))
            .stage(Decl(stage("update_a").updates(FacetKind::SurfaceHeight, FacetBorder::ZERO)))
            .stage(Decl(stage("producer").produces(FacetKind::SurfaceHeight, FacetBorder::ZERO)))
            .build()
            .unwrap();

        assert_eq!(names(&pipeline), ["producer", "update_b", "update_a", "reader"]);
    }

    #[test]
    fn test_independent_stages_keep_insertion_order() {
        let pipeline = Pipeline::builder(WorldSeed::new(1))
            .stage(Decl(stage("b").produces(FacetKind::BiomeHeight, FacetBorder::ZERO)))
            .stage(Decl(stage("a").produces(FacetKind::SurfaceHeight, FacetBorder::ZERO)))
            .build()
            .unwrap();
        assert_eq!(names(&pipeline), ["b", "a"]);
    }

    #[test]
    fn test_missing_producer() {
        let result = Pipeline::builder(WorldSeed::new(1))
            .stage(Decl(stage("canyon").updates(FacetKind::SurfaceHeight, FacetBorder::ZERO)))
            .build();
        assert_eq!(
            result.err(),
            Some(PipelineError::MissingProducer {
                stage: "canyon".into(),
                facet: FacetKind::SurfaceHeight,
            })
        );
    }

    #[test]
    fn test_duplicate_producer() {
        let result = Pipeline::builder(WorldSeed::new(1))
            .stage(Decl(stage("one").produces(FacetKind::SurfaceHeight, FacetBorder::ZERO)))
            .stage(Decl(stage("two").produces(FacetKind::SurfaceHeight, FacetBorder::ZERO)))
            .build();
        assert!(matches!(
            result.err(),
            Some(PipelineError::DuplicateProducer { facet: FacetKind::SurfaceHeight, .. })
        ));
    }

    #[test]
    fn test_cycle_detected() {
        let result = Pipeline::builder(WorldSeed::new(1))
            .stage(Decl(
                stage("a")
                    .produces(FacetKind::SurfaceHeight, FacetBorder::ZERO)
                    .requires(FacetKind::BiomeHeight, FacetBorder::ZERO),
            ))
            .stage(Decl(
                stage("b")
                    .produces(FacetKind::BiomeHeight, FacetBorder::ZERO)
                    .requires(FacetKind::SurfaceHeight, FacetBorder::ZERO),
            ))
            .build();
        match result.err() {
            Some(PipelineError::Cycle { stages }) => assert_eq!(stages, ["a", "b"]),
            other => panic!("expected cycle, got {other:?}"),
        }
    }

    #[test]
    fn test_borders_propagate_through_stages() {
        // house-like stage: needs surface with border 4 and produces a
        // facet with border 4, so surface must extend 8 beyond the core.
        let pipeline = Pipeline::builder(WorldSeed::new(1))
            .stage(Decl(stage("surface").produces(FacetKind::SurfaceHeight, FacetBorder::ZERO)))
            .stage(Decl(stage("biome_height").produces(FacetKind::BiomeHeight, FacetBorder::ZERO)))
            .stage(Decl(
                stage("canyon")
                    .requires(FacetKind::BiomeHeight, FacetBorder::ZERO)
                    .updates(FacetKind::SurfaceHeight, FacetBorder::sides(4)),
            ))
            .stage(Decl(
                stage("house")
                    .requires(FacetKind::SurfaceHeight, FacetBorder::sides(4))
                    .produces(FacetKind::House, FacetBorder::sides(4)),
            ))
            .build()
            .unwrap();

        assert_eq!(pipeline.border(FacetKind::House), FacetBorder::sides(4));
        assert_eq!(pipeline.border(FacetKind::SurfaceHeight), FacetBorder::sides(8));
        assert_eq!(pipeline.border(FacetKind::BiomeHeight), FacetBorder::sides(8));
        assert_eq!(pipeline.border(FacetKind::Flora), FacetBorder::ZERO);
    }

    #[test]
    fn test_stage_panic_becomes_error() {
        let pipeline = Pipeline::builder(WorldSeed::new(1)).stage(Explodes).build().unwrap();
        let core = Region3i::from_min_and_size(IVec3::ZERO, IVec3::splat(16));
        assert_eq!(
            pipeline.generate(core).err(),
            Some(PipelineError::StagePanicked {
                stage: "explodes".into(),
                message: "bad clamp range".into(),
            })
        );
    }

    #[test]
    fn test_generate_allocates_propagated_border() {
        let pipeline = Pipeline::builder(WorldSeed::new(1))
            .stage(Decl(stage("surface").produces(FacetKind::SurfaceHeight, FacetBorder::ZERO)))
            .stage(Decl(stage("reader").requires(FacetKind::SurfaceHeight, FacetBorder::sides(3))))
            .build()
            .unwrap();

        let core = Region3i::from_min_and_size(IVec3::new(16, 0, 16), IVec3::new(16, 64, 16));
        let generated = pipeline.generate(core).unwrap();
        let surface = generated.facet::<SurfaceHeightFacet>().unwrap();
        assert_eq!(surface.world_region().width(), 22);
        assert_eq!(surface.relative_region().width(), 16);
    }
}
