//! Probe services that journal their lifecycle operations.
//!
//! Stands in for marker files: every construct/initialize/stop lands in a
//! shared in-memory journal, in execution order, so tests can assert on
//! exactly what the kernel did and in what sequence.

use halley_kernel::context::KernelContext;
use halley_kernel::factory::ConstructorRegistry;
use halley_kernel::registry::ServiceInstance;
use halley_kernel::service::{Service, ServiceError};
use parking_lot::Mutex;
use std::sync::Arc;

/// Shared journal of lifecycle operations.
#[derive(Clone, Default)]
pub struct Journal {
    entries: Arc<Mutex<Vec<String>>>,
}

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, entry: impl Into<String>) {
        self.entries.lock().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().clone()
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    /// Service ids in construction order.
    pub fn constructed(&self) -> Vec<String> {
        self.ids_with_prefix("construct:")
    }

    /// Service ids in initialization order.
    pub fn initialized(&self) -> Vec<String> {
        self.ids_with_prefix("init:")
    }

    /// Service ids in stop order.
    pub fn stopped(&self) -> Vec<String> {
        self.ids_with_prefix("stop:")
    }

    fn ids_with_prefix(&self, prefix: &str) -> Vec<String> {
        self.entries
            .lock()
            .iter()
            .filter_map(|e| e.strip_prefix(prefix).map(str::to_string))
            .collect()
    }
}

/// A service whose behavior is fixed at construction.
pub struct ProbeService {
    id: String,
    journal: Journal,
    fail_initialize: bool,
    fail_stop: bool,
}

impl Service for ProbeService {
    fn initialize(
        &self,
        _context: &KernelContext,
        _parameters: &[(String, String)],
    ) -> Result<(), ServiceError> {
        self.journal.record(format!("init:{}", self.id));
        if self.fail_initialize {
            return Err("initialize refused".into());
        }
        Ok(())
    }

    fn stop(&self) -> Result<(), ServiceError> {
        self.journal.record(format!("stop:{}", self.id));
        if self.fail_stop {
            return Err("stop refused".into());
        }
        Ok(())
    }
}

/// Constructor registry with the standard probe implementations:
///
/// - `probe`: well-behaved
/// - `probe-fail-construct`: construction fails
/// - `probe-fail-init`: constructs but initialization fails
/// - `probe-fail-stop`: runs but stop fails
pub fn probe_constructors(journal: &Journal) -> ConstructorRegistry {
    let mut constructors = ConstructorRegistry::new();

    register_probe(&mut constructors, journal, "probe", false, false);
    register_probe(&mut constructors, journal, "probe-fail-init", true, false);
    register_probe(&mut constructors, journal, "probe-fail-stop", false, true);

    let j = journal.clone();
    constructors.register("probe-fail-construct", move |d| {
        j.record(format!("construct-fail:{}", d.id()));
        Err("construction refused".into())
    });

    constructors
}

fn register_probe(
    constructors: &mut ConstructorRegistry,
    journal: &Journal,
    key: &str,
    fail_initialize: bool,
    fail_stop: bool,
) {
    let j = journal.clone();
    constructors.register(key, move |d| {
        j.record(format!("construct:{}", d.id()));
        Ok(Arc::new(ProbeService {
            id: d.id().to_string(),
            journal: j.clone(),
            fail_initialize,
            fail_stop,
        }) as ServiceInstance)
    });
}
