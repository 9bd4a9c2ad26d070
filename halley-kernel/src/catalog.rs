//! Descriptor catalogs: where the orchestrator gets its service set.
//!
//! The orchestrator never parses configuration itself; it asks a
//! [`DescriptorCatalog`] for the enabled descriptors due to start or stop
//! within a level range. [`StaticCatalog`] is the in-memory implementation,
//! typically built from a catalog file (see [`crate::config`]) or
//! programmatically.

use std::sync::Arc;

use crate::descriptor::ServiceDescriptor;
use crate::errors::{KernelError, Result};

/// Range-queryable source of service descriptors.
///
/// Both queries return only enabled descriptors whose relevant action is
/// set and fires; the orchestrator sorts the result itself.
pub trait DescriptorCatalog: Send + Sync {
    /// Descriptors whose load action falls in `(from_exclusive, to_inclusive]`.
    fn startup_range(&self, from_exclusive: i32, to_inclusive: i32)
    -> Vec<Arc<ServiceDescriptor>>;

    /// Descriptors whose stop action falls in `(to_exclusive, from_inclusive]`.
    fn shutdown_range(&self, to_exclusive: i32, from_inclusive: i32)
    -> Vec<Arc<ServiceDescriptor>>;

    /// Look up one descriptor by id, enabled or not.
    fn get(&self, id: &str) -> Option<Arc<ServiceDescriptor>>;

    /// All descriptor ids, in registration order.
    fn ids(&self) -> Vec<String>;
}

/// Fixed in-memory descriptor set.
#[derive(Debug)]
pub struct StaticCatalog {
    descriptors: Vec<Arc<ServiceDescriptor>>,
}

impl StaticCatalog {
    pub fn new() -> Self {
        Self {
            descriptors: Vec::new(),
        }
    }

    /// Add a descriptor. Ids are unique within one catalog.
    pub fn insert(&mut self, descriptor: ServiceDescriptor) -> Result<()> {
        if self.descriptors.iter().any(|d| d.id() == descriptor.id()) {
            return Err(KernelError::DuplicateService(descriptor.id().to_string()));
        }
        self.descriptors.push(Arc::new(descriptor));
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

impl Default for StaticCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl DescriptorCatalog for StaticCatalog {
    fn startup_range(
        &self,
        from_exclusive: i32,
        to_inclusive: i32,
    ) -> Vec<Arc<ServiceDescriptor>> {
        self.descriptors
            .iter()
            .filter(|d| d.starts_within(from_exclusive, to_inclusive))
            .cloned()
            .collect()
    }

    fn shutdown_range(
        &self,
        to_exclusive: i32,
        from_inclusive: i32,
    ) -> Vec<Arc<ServiceDescriptor>> {
        self.descriptors
            .iter()
            .filter(|d| d.stops_within(to_exclusive, from_inclusive))
            .cloned()
            .collect()
    }

    fn get(&self, id: &str) -> Option<Arc<ServiceDescriptor>> {
        self.descriptors.iter().find(|d| d.id() == id).cloned()
    }

    fn ids(&self) -> Vec<String> {
        self.descriptors.iter().map(|d| d.id().to_string()).collect()
    }
}

#[cfg(test)]
mod tests;
