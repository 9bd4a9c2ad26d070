//! Two-phase construction of service instances.
//!
//! Descriptors carry an implementation key, not a type; the
//! [`ConstructorRegistry`] maps keys to constructor functions so hosts
//! register what is constructible up front. Instantiation then runs in two
//! phases: construct (allocation only) and initialize (context and
//! parameters applied). Only a fully initialized instance enters the
//! instance registry.

use std::collections::HashMap;
use tracing::debug;

use crate::context::KernelContext;
use crate::descriptor::ServiceDescriptor;
use crate::errors::{KernelError, Result};
use crate::registry::{ServiceInstance, SharedInstanceRegistry};
use crate::service::ServiceError;

/// Constructor function for one implementation key. Must have no side
/// effects beyond allocation.
pub type Constructor =
    Box<dyn Fn(&ServiceDescriptor) -> std::result::Result<ServiceInstance, ServiceError> + Send + Sync>;

/// Map from implementation key to constructor.
pub struct ConstructorRegistry {
    constructors: HashMap<String, Constructor>,
}

impl ConstructorRegistry {
    pub fn new() -> Self {
        Self {
            constructors: HashMap::new(),
        }
    }

    /// Register a constructor under a key. Re-registering a key replaces
    /// the previous constructor.
    pub fn register<F>(&mut self, key: &str, constructor: F)
    where
        F: Fn(&ServiceDescriptor) -> std::result::Result<ServiceInstance, ServiceError>
            + Send
            + Sync
            + 'static,
    {
        self.constructors
            .insert(key.to_string(), Box::new(constructor));
    }

    pub fn resolve(&self, key: &str) -> Option<&Constructor> {
        self.constructors.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.constructors.contains_key(key)
    }
}

impl Default for ConstructorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Creates service instances from descriptors.
pub struct InstanceFactory {
    constructors: ConstructorRegistry,
    registry: Option<SharedInstanceRegistry>,
}

impl InstanceFactory {
    pub fn new(constructors: ConstructorRegistry) -> Self {
        Self {
            constructors,
            registry: None,
        }
    }

    /// Attach an instance registry; every successfully initialized instance
    /// is registered under its descriptor id.
    pub fn with_registry(mut self, registry: SharedInstanceRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn constructors(&self) -> &ConstructorRegistry {
        &self.constructors
    }

    /// Construct and initialize a service instance.
    ///
    /// An id that already holds a live initialized instance in the attached
    /// registry is a duplicate-initialization error; the registry, not the
    /// descriptor set, answers "is this service currently up".
    pub fn instantiate(
        &self,
        descriptor: &ServiceDescriptor,
        context: &KernelContext,
    ) -> Result<ServiceInstance> {
        let id = descriptor.id();

        if let Some(registry) = &self.registry
            && registry.contains(id)
        {
            return Err(KernelError::DuplicateInitialization(id.to_string()));
        }

        // Phase 1: construct
        let constructor = self
            .constructors
            .resolve(descriptor.implementation())
            .ok_or_else(|| KernelError::UnknownImplementation {
                service: id.to_string(),
                implementation: descriptor.implementation().to_string(),
            })?;
        let instance = constructor(descriptor).map_err(|source| KernelError::Construction {
            service: id.to_string(),
            source,
        })?;
        debug!("Constructed service {} ({})", id, descriptor.implementation());

        // Phase 2: initialize
        instance
            .initialize(context, descriptor.parameters())
            .map_err(|source| KernelError::Initialization {
                service: id.to_string(),
                source,
            })?;
        debug!("Initialized service {}", id);

        if let Some(registry) = &self.registry {
            registry.put(id, instance.clone());
        }

        Ok(instance)
    }
}
