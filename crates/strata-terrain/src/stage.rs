//! Transform stages: the provider trait and the descriptor the scheduler
//! orders them by.

use strata_facet::FacetBorder;

use crate::error::{Access, PipelineError};
use crate::facets::FacetKind;
use crate::region::GeneratingRegion;

/// One facet a stage touches, with the border it needs on that facet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FacetDecl {
    pub kind: FacetKind,
    pub border: FacetBorder,
}

/// Everything the scheduler needs to know about a stage.
///
/// `produces` creates a facet, `updates` modifies one in place after its
/// producer ran, `requires` only reads.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StageDescriptor {
    pub name: String,
    pub produces: Vec<FacetDecl>,
    pub updates: Vec<FacetDecl>,
    pub requires: Vec<FacetDecl>,
}

impl StageDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            produces: Vec::new(),
            updates: Vec::new(),
            requires: Vec::new(),
        }
    }

    pub fn produces(mut self, kind: FacetKind, border: FacetBorder) -> Self {
        self.produces.push(FacetDecl { kind, border });
        self
    }

    pub fn updates(mut self, kind: FacetKind, border: FacetBorder) -> Self {
        self.updates.push(FacetDecl { kind, border });
        self
    }

    pub fn requires(mut self, kind: FacetKind, border: FacetBorder) -> Self {
        self.requires.push(FacetDecl { kind, border });
        self
    }

    /// Returns `true` if this stage may perform `access` on `kind`.
    ///
    /// Reading is allowed on anything the stage requires, updates or has
    /// produced.
    pub fn allows(&self, kind: FacetKind, access: Access) -> bool {
        let has = |decls: &[FacetDecl]| decls.iter().any(|d| d.kind == kind);
        match access {
            Access::Read => has(&self.requires) || has(&self.updates) || has(&self.produces),
            Access::Update => has(&self.updates),
            Access::Produce => has(&self.produces),
        }
    }

    /// Facets this stage writes, produced or updated.
    pub fn outputs(&self) -> impl Iterator<Item = &FacetDecl> {
        self.produces.iter().chain(self.updates.iter())
    }
}

/// A transform stage run once per region.
///
/// Providers are seeded at construction and immutable afterwards; one
/// instance is shared by every worker generating regions.
pub trait FacetProvider: Send + Sync {
    /// Facets this provider produces, updates and requires.
    fn descriptor(&self) -> StageDescriptor;

    /// Run over one region. Facets are reached through `region`, which
    /// rejects any access the descriptor does not declare.
    fn process(&self, region: &mut GeneratingRegion) -> Result<(), PipelineError>;
}
