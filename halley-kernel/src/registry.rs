//! Cache of live service instances keyed by descriptor id.
//!
//! The registry is the single source of truth for "is this service currently
//! up". Entries are created when the factory completes both construction
//! phases and removed when a stop action executes successfully (or through
//! an explicit administrative remove); they are never silently evicted.
//!
//! The registry carries its own lock, independent of the orchestrator lock,
//! so administrative lookups never block on an in-flight multi-level
//! transition. During a transition a lookup may observe a partially updated
//! step; registry state is guaranteed consistent only between transitions.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

use crate::service::Service;

/// A live, initialized service instance.
pub type ServiceInstance = Arc<dyn Service>;

/// Synchronized id -> instance cache.
pub struct InstanceRegistry {
    instances: Mutex<HashMap<String, ServiceInstance>>,
}

impl InstanceRegistry {
    pub fn new() -> Self {
        Self {
            instances: Mutex::new(HashMap::new()),
        }
    }

    pub fn get(&self, id: &str) -> Option<ServiceInstance> {
        self.instances.lock().get(id).cloned()
    }

    /// Insert an instance, returning the displaced one if the id was
    /// already present so the caller can decide whether to shut it down.
    pub fn put(&self, id: &str, instance: ServiceInstance) -> Option<ServiceInstance> {
        self.instances.lock().insert(id.to_string(), instance)
    }

    pub fn remove(&self, id: &str) -> Option<ServiceInstance> {
        self.instances.lock().remove(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.instances.lock().contains_key(id)
    }

    /// Registered ids, sorted for stable reporting.
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.instances.lock().keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.instances.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.lock().is_empty()
    }
}

impl Default for InstanceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Thread-safe shared handle to the registry.
pub type SharedInstanceRegistry = Arc<InstanceRegistry>;

pub fn new_shared_registry() -> SharedInstanceRegistry {
    Arc::new(InstanceRegistry::new())
}
