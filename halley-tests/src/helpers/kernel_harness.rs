//! In-process kernel harness wired with probe services

use halley_kernel::catalog::StaticCatalog;
use halley_kernel::config::CatalogFile;
use halley_kernel::context::{KernelContext, SharedKernelContext};
use halley_kernel::errors::KernelError;
use halley_kernel::orchestrator::{LifecycleOrchestrator, OrchestratorError};
use std::path::Path;
use std::sync::Arc;

use super::probe::{Journal, probe_constructors};

/// Test harness holding an orchestrator whose constructor registry is the
/// standard probe set, plus the journal those probes write to.
pub struct TestKernelHarness {
    pub orchestrator: LifecycleOrchestrator,
    pub journal: Journal,
    pub context: SharedKernelContext,
}

impl TestKernelHarness {
    /// Create a harness over an in-memory catalog.
    pub fn new(catalog: StaticCatalog) -> Self {
        let journal = Journal::new();
        let context: SharedKernelContext = Arc::new(KernelContext::default());
        let orchestrator = LifecycleOrchestrator::new(
            Arc::new(catalog),
            probe_constructors(&journal),
            context.clone(),
        );
        Self {
            orchestrator,
            journal,
            context,
        }
    }

    /// Create a harness from a catalog file on disk; the file's properties
    /// become the kernel context's properties.
    pub fn from_file(path: &Path) -> Result<Self, KernelError> {
        let file = CatalogFile::load(path)?;
        let catalog = file.build()?;
        let journal = Journal::new();
        let context: SharedKernelContext =
            Arc::new(KernelContext::new(file.context_properties()?));
        let orchestrator = LifecycleOrchestrator::new(
            Arc::new(catalog),
            probe_constructors(&journal),
            context.clone(),
        );
        Ok(Self {
            orchestrator,
            journal,
            context,
        })
    }

    pub fn transition(&self, level: i32) -> Result<u32, OrchestratorError> {
        self.orchestrator.transition_to(level, false)
    }

    /// Ids of currently live services, sorted.
    pub fn live_services(&self) -> Vec<String> {
        self.orchestrator.registry().ids()
    }
}
