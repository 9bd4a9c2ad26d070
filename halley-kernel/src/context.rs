//! Shared kernel context handed to services at initialization.
//!
//! One context is constructed per kernel and passed by reference to every
//! component that needs it. There is no process-wide singleton; anything a
//! service needs from its surroundings flows through here.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;

use crate::registry::{SharedInstanceRegistry, new_shared_registry};

/// Shared state visible to every service.
pub struct KernelContext {
    properties: HashMap<String, String>,
    registry: SharedInstanceRegistry,
    started_at: DateTime<Utc>,
}

impl KernelContext {
    pub fn new(properties: HashMap<String, String>) -> Self {
        Self {
            properties,
            registry: new_shared_registry(),
            started_at: Utc::now(),
        }
    }

    /// Process-wide property, if set.
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(|v| v.as_str())
    }

    pub fn properties(&self) -> &HashMap<String, String> {
        &self.properties
    }

    /// The instance registry, for services that look up their peers.
    pub fn registry(&self) -> &SharedInstanceRegistry {
        &self.registry
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn uptime_secs(&self) -> u64 {
        (Utc::now() - self.started_at).num_seconds().max(0) as u64
    }
}

impl Default for KernelContext {
    fn default() -> Self {
        Self::new(HashMap::new())
    }
}

/// Thread-safe shared handle to the context.
pub type SharedKernelContext = Arc<KernelContext>;
