//! Per-region facet storage: the guarded view stages work through while a
//! region is generating, and the finished result rasterizers read.

use std::any::Any;
use std::sync::Arc;

use hashbrown::HashMap;
use strata_facet::FacetBorder;
use strata_math::Region3i;

use crate::error::{Access, PipelineError};
use crate::facets::{Facet, FacetKind};
use crate::stage::{FacetProvider, StageDescriptor};

type FacetBox = Box<dyn Any + Send + Sync>;

const NO_STAGE: &str = "<no active stage>";

/// A region in the middle of generation.
///
/// Facet access is checked against the descriptor of the stage currently
/// running; anything undeclared fails with
/// [`PipelineError::UndeclaredAccess`].
pub struct GeneratingRegion {
    region: Region3i,
    borders: Arc<HashMap<FacetKind, FacetBorder>>,
    facets: HashMap<FacetKind, FacetBox>,
    stage: Option<StageDescriptor>,
}

impl GeneratingRegion {
    /// An empty region whose facets all use a zero border.
    pub fn new(region: Region3i) -> Self {
        Self::with_borders(region, Arc::new(HashMap::new()))
    }

    pub(crate) fn with_borders(
        region: Region3i,
        borders: Arc<HashMap<FacetKind, FacetBorder>>,
    ) -> Self {
        Self {
            region,
            borders,
            facets: HashMap::new(),
            stage: None,
        }
    }

    /// Seed a facet before any stage runs, e.g. to feed a single provider.
    pub fn with_facet<F: Facet>(mut self, facet: F) -> Self {
        self.facets.insert(F::KIND, Box::new(facet));
        self
    }

    /// The core box being generated, without borders.
    pub fn region(&self) -> Region3i {
        self.region
    }

    /// Border the scheduler computed for `kind`. Producers size their facets
    /// with it.
    pub fn border(&self, kind: FacetKind) -> FacetBorder {
        self.borders.get(&kind).copied().unwrap_or_default()
    }

    /// Read a facet the running stage requires, updates or has produced.
    pub fn get<F: Facet>(&self) -> Result<&F, PipelineError> {
        self.check(F::KIND, Access::Read)?;
        self.facets
            .get(&F::KIND)
            .and_then(|b| b.downcast_ref::<F>())
            .ok_or_else(|| self.missing(F::KIND))
    }

    /// Store a facet the running stage produces.
    pub fn set<F: Facet>(&mut self, facet: F) -> Result<(), PipelineError> {
        self.check(F::KIND, Access::Produce)?;
        self.facets.insert(F::KIND, Box::new(facet));
        Ok(())
    }

    /// Modify a facet the running stage updates.
    ///
    /// `f` receives the facet mutably along with a read view of the rest of
    /// the region, so an updater can read its other inputs at the same time.
    /// The facet being updated is not visible through that view.
    pub fn update<F, R>(
        &mut self,
        f: impl FnOnce(&mut F, &Self) -> Result<R, PipelineError>,
    ) -> Result<R, PipelineError>
    where
        F: Facet,
    {
        self.check(F::KIND, Access::Update)?;
        let mut boxed = self
            .facets
            .remove(&F::KIND)
            .ok_or_else(|| self.missing(F::KIND))?;
        let result = match boxed.downcast_mut::<F>() {
            Some(facet) => f(facet, self),
            None => Err(self.missing(F::KIND)),
        };
        self.facets.insert(F::KIND, boxed);
        result
    }

    /// Run one provider against this region with its descriptor enforced.
    ///
    /// Fails with [`PipelineError::MissingFacet`] if the provider returns
    /// without setting everything it declares as produced.
    pub fn run_stage(&mut self, provider: &dyn FacetProvider) -> Result<(), PipelineError> {
        let descriptor = provider.descriptor();
        let produces: Vec<FacetKind> = descriptor.produces.iter().map(|d| d.kind).collect();
        self.stage = Some(descriptor);
        let result = provider.process(self);
        let stage = self.stage.take();
        result?;

        if let Some(kind) = produces.into_iter().find(|k| !self.facets.contains_key(k)) {
            return Err(PipelineError::MissingFacet {
                stage: stage.map(|s| s.name).unwrap_or_default(),
                facet: kind,
            });
        }
        Ok(())
    }

    /// Finish generation and hand the facets over for rasterization.
    pub fn into_generated(self) -> GeneratedRegion {
        GeneratedRegion {
            region: self.region,
            facets: self.facets,
        }
    }

    fn stage_name(&self) -> String {
        self.stage
            .as_ref()
            .map_or_else(|| NO_STAGE.to_string(), |s| s.name.clone())
    }

    fn check(&self, kind: FacetKind, access: Access) -> Result<(), PipelineError> {
        match &self.stage {
            Some(stage) if stage.allows(kind, access) => Ok(()),
            _ => Err(PipelineError::UndeclaredAccess {
                stage: self.stage_name(),
                facet: kind,
                access,
            }),
        }
    }

    fn missing(&self, kind: FacetKind) -> PipelineError {
        PipelineError::MissingFacet {
            stage: self.stage_name(),
            facet: kind,
        }
    }
}

/// A fully generated region: every facet the pipeline produced, unguarded.
pub struct GeneratedRegion {
    region: Region3i,
    facets: HashMap<FacetKind, FacetBox>,
}

impl GeneratedRegion {
    /// The core box that was generated.
    pub fn region(&self) -> Region3i {
        self.region
    }

    /// A facet by type, or `None` if no stage produced it.
    pub fn facet<F: Facet>(&self) -> Option<&F> {
        self.facets.get(&F::KIND).and_then(|b| b.downcast_ref::<F>())
    }

    /// Kinds present, sorted.
    pub fn kinds(&self) -> Vec<FacetKind> {
        let mut kinds: Vec<_> = self.facets.keys().copied().collect();
        kinds.sort();
        kinds
    }
}

impl std::fmt::Debug for GeneratedRegion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeneratedRegion")
            .field("region", &self.region)
            .field("facets", &self.kinds())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use glam::IVec3;

    use super::*;
    use crate::facets::{BiomeHeightFacet, SeaLevelFacet, SurfaceHeightFacet};

    fn core() -> Region3i {
        Region3i::from_min_and_size(IVec3::ZERO, IVec3::new(8, 32, 8))
    }

    struct Raise;

    impl FacetProvider for Raise {
        fn descriptor(&self) -> StageDescriptor {
            StageDescriptor::new("raise")
                .requires(FacetKind::SeaLevel, FacetBorder::ZERO)
                .updates(FacetKind::SurfaceHeight, FacetBorder::ZERO)
        }

        fn process(&self, region: &mut GeneratingRegion) -> Result<(), PipelineError> {
            region.update(|surface: &mut SurfaceHeightFacet, view| {
                let sea = view.get::<SeaLevelFacet>()?.level as f32;
                for h in surface.as_mut_slice() {
                    *h = h.max(sea);
                }
                Ok(())
            })
        }
    }

    struct Sneaky;

    impl FacetProvider for Sneaky {
        fn descriptor(&self) -> StageDescriptor {
            StageDescriptor::new("sneaky").produces(FacetKind::BiomeHeight, FacetBorder::ZERO)
        }

        fn process(&self, region: &mut GeneratingRegion) -> Result<(), PipelineError> {
            region.get::<SurfaceHeightFacet>()?;
            Ok(())
        }
    }

    struct Forgetful;

    impl FacetProvider for Forgetful {
        fn descriptor(&self) -> StageDescriptor {
            StageDescriptor::new("forgetful").produces(FacetKind::BiomeHeight, FacetBorder::ZERO)
        }

        fn process(&self, _region: &mut GeneratingRegion) -> Result<(), PipelineError> {
            Ok(())
        }
    }

    fn seeded() -> GeneratingRegion {
        GeneratingRegion::new(core())
            .with_facet(SeaLevelFacet { level: 10 })
            .with_facet(SurfaceHeightFacet::new(&core(), FacetBorder::ZERO))
    }

    #[test]
    fn test_update_reads_other_inputs() {
        let mut region = seeded();
        region.run_stage(&Raise).unwrap();
        let generated = region.into_generated();
        let surface = generated.facet::<SurfaceHeightFacet>().unwrap();
        assert!(surface.as_slice().iter().all(|&h| h == 10.0));
    }

    #[test]
    fn test_undeclared_read_rejected() {
        let mut region = seeded();
        let err = region.run_stage(&Sneaky).unwrap_err();
        assert_eq!(
            err,
            PipelineError::UndeclaredAccess {
                stage: "sneaky".into(),
                facet: FacetKind::SurfaceHeight,
                access: Access::Read,
            }
        );
    }

    #[test]
    fn test_access_outside_stage_rejected() {
        let region = seeded();
        assert!(matches!(
            region.get::<SeaLevelFacet>(),
            Err(PipelineError::UndeclaredAccess { .. })
        ));
    }

    #[test]
    fn test_unset_product_reported() {
        let mut region = seeded();
        let err = region.run_stage(&Forgetful).unwrap_err();
        assert_eq!(
            err,
            PipelineError::MissingFacet {
                stage: "forgetful".into(),
                facet: FacetKind::BiomeHeight,
            }
        );
    }

    #[test]
    fn test_missing_input_reported() {
        let mut region = GeneratingRegion::new(core())
            .with_facet(SurfaceHeightFacet::new(&core(), FacetBorder::ZERO));
        let err = region.run_stage(&Raise).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::MissingFacet {
                facet: FacetKind::SeaLevel,
                ..
            }
        ));
        // The updated facet survives a failed update.
        let generated = region.into_generated();
        assert!(generated.facet::<SurfaceHeightFacet>().is_some());
        assert!(generated.facet::<BiomeHeightFacet>().is_none());
    }
}
