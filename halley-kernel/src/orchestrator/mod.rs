//! Run level transitions and service orchestration.
//!
//! The [`LifecycleOrchestrator`] owns the current run level and drives it
//! toward a requested major level one elementary step at a time, never
//! jumping. At each step it starts or stops the services due at that
//! boundary (in deterministic order), notifies listeners, and only then
//! commits the new level. Failures are best-effort (logged and counted)
//! unless the failing action carries a failure code, in which case the
//! remainder of the step is abandoned and the error propagates with the
//! level left at the last committed boundary.

mod error;
mod events;

pub use error::OrchestratorError;
pub use events::{LevelChange, LifecycleListener, LoggingListener};

use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicI32, Ordering};
use tracing::{debug, error, info};

use crate::catalog::DescriptorCatalog;
use crate::context::SharedKernelContext;
use crate::errors::KernelError;
use crate::factory::{ConstructorRegistry, InstanceFactory};
use crate::level::{RunLevel, parse_level};
use crate::ordering;
use crate::registry::SharedInstanceRegistry;

/// Snapshot of kernel state for management surfaces.
#[derive(Debug, Clone, Serialize)]
pub struct KernelStatus {
    pub level: i32,
    pub level_name: String,
    /// Ids of currently live services, sorted.
    pub services: Vec<String>,
    pub uptime_secs: u64,
}

/// The run level state machine.
///
/// Purely reactive: owns no background threads, mutates the level only
/// inside [`transition_to`](Self::transition_to). Concurrent transition
/// requests serialize on one lock held for the whole traversal; the
/// instance registry stays independently readable throughout.
pub struct LifecycleOrchestrator {
    catalog: Arc<dyn DescriptorCatalog>,
    factory: InstanceFactory,
    registry: SharedInstanceRegistry,
    context: SharedKernelContext,
    listeners: RwLock<Vec<Arc<dyn LifecycleListener>>>,
    current: AtomicI32,
    transition_lock: Mutex<()>,
}

impl LifecycleOrchestrator {
    /// Create an orchestrator at HALTED. The instance registry is the one
    /// owned by the context, so services and management surfaces see the
    /// same picture of what is live.
    pub fn new(
        catalog: Arc<dyn DescriptorCatalog>,
        constructors: ConstructorRegistry,
        context: SharedKernelContext,
    ) -> Self {
        let registry = context.registry().clone();
        let factory = InstanceFactory::new(constructors).with_registry(registry.clone());
        Self {
            catalog,
            factory,
            registry,
            context,
            listeners: RwLock::new(Vec::new()),
            current: AtomicI32::new(RunLevel::Halted.number()),
            transition_lock: Mutex::new(()),
        }
    }

    /// The last committed level boundary.
    pub fn current_level(&self) -> i32 {
        self.current.load(Ordering::Acquire)
    }

    pub fn registry(&self) -> &SharedInstanceRegistry {
        &self.registry
    }

    pub fn context(&self) -> &SharedKernelContext {
        &self.context
    }

    /// Register a listener. Re-adding a listener replaces it rather than
    /// duplicating; safe concurrently with an in-flight transition.
    pub fn add_listener(&self, listener: Arc<dyn LifecycleListener>) {
        let mut listeners = self.listeners.write();
        listeners.retain(|l| !Arc::ptr_eq(l, &listener));
        listeners.push(listener);
    }

    pub fn remove_listener(&self, listener: &Arc<dyn LifecycleListener>) {
        self.listeners.write().retain(|l| !Arc::ptr_eq(l, listener));
    }

    /// Drive the system to `target`, which must be a major level.
    ///
    /// Returns the number of best-effort failures encountered. A fatal
    /// failure (an action with a failure code) aborts the current step and
    /// propagates; already completed work stays committed and
    /// [`current_level`](Self::current_level) reports the last boundary
    /// reached.
    pub fn transition_to(&self, target: i32, force: bool) -> Result<u32, OrchestratorError> {
        let target_level = RunLevel::from_number(target)
            .filter(RunLevel::is_major)
            .ok_or(OrchestratorError::InvalidLevel(target))?;

        let _guard = self.transition_lock.lock();

        let from = self.current_level();
        if from == target {
            return Ok(0);
        }
        let from_level = RunLevel::from_number(from).ok_or_else(|| {
            KernelError::Internal(format!("current level {} is off the scale", from))
        })?;

        info!("Changing run level from {} to {}", from_level, target_level);

        let mut errors = 0u32;
        if from_level < target_level {
            let mut level = from_level;
            while level < target_level {
                let dest = level.next_up().ok_or_else(|| {
                    KernelError::Internal(format!("no level above {}", level))
                })?;
                errors += self.startup_step(level, dest)?;
                self.fire_level_event(level, dest, force);
                self.current.store(dest.number(), Ordering::Release);
                if dest == RunLevel::Running {
                    // Synthetic marker event; no services bind here.
                    self.fire_level_event(RunLevel::Running, RunLevel::RunningPost, force);
                }
                level = dest;
            }
        } else {
            let mut level = from_level;
            while level > target_level {
                let dest = level.next_down().ok_or_else(|| {
                    KernelError::Internal(format!("no level below {}", level))
                })?;
                errors += self.shutdown_step(level, dest)?;
                self.fire_level_event(level, dest, force);
                self.current.store(dest.number(), Ordering::Release);
                level = dest;
            }
        }

        if errors == 0 {
            info!("Run level is now {}", target_level);
        } else {
            info!(
                "Run level is now {} ({} service error{})",
                target_level,
                errors,
                if errors == 1 { "" } else { "s" }
            );
        }
        Ok(errors)
    }

    /// Start the services due when stepping from `level` up to `dest`.
    fn startup_step(&self, level: RunLevel, dest: RunLevel) -> Result<u32, OrchestratorError> {
        let mut due = self.catalog.startup_range(level.number(), dest.number());
        if due.is_empty() {
            return Ok(0);
        }
        ordering::sort_for_startup(&mut due);

        let mut errors = 0u32;
        for descriptor in due {
            let id = descriptor.id();
            // A level may be re-entered; a live service is not rebuilt.
            if self.registry.contains(id) {
                debug!("Service {} is already running, skipping", id);
                continue;
            }

            info!("Starting service {} at level {}", id, dest);
            match self.factory.instantiate(&descriptor, &self.context) {
                Ok(_) => {}
                Err(source) => {
                    let code = descriptor
                        .load_action()
                        .and_then(|a| a.on_failure.clone());
                    if let Some(code) = code {
                        error!(
                            "Fatal failure starting service {} (code {}): {}",
                            id, code, source
                        );
                        return Err(OrchestratorError::Fatal {
                            service: id.to_string(),
                            code,
                            source,
                        });
                    }
                    error!("Failed to start service {}: {}", id, source);
                    errors += 1;
                }
            }
        }
        Ok(errors)
    }

    /// Stop the services due when stepping from `level` down to `dest`.
    fn shutdown_step(&self, level: RunLevel, dest: RunLevel) -> Result<u32, OrchestratorError> {
        let mut due = self.catalog.shutdown_range(dest.number(), level.number());
        if due.is_empty() {
            return Ok(0);
        }
        ordering::sort_for_shutdown(&mut due);

        let mut errors = 0u32;
        for descriptor in due {
            let id = descriptor.id();
            // Never started (disabled, failed, or stopped already): not an error.
            let Some(instance) = self.registry.get(id) else {
                debug!("Service {} is not running, nothing to stop", id);
                continue;
            };

            info!("Stopping service {}", id);
            match instance.stop() {
                Ok(()) => {
                    self.registry.remove(id);
                }
                Err(service_error) => {
                    let source = KernelError::Shutdown {
                        service: id.to_string(),
                        source: service_error,
                    };
                    let code = descriptor
                        .stop_action()
                        .and_then(|a| a.on_failure.clone());
                    if let Some(code) = code {
                        error!(
                            "Fatal failure stopping service {} (code {}): {}",
                            id, code, source
                        );
                        return Err(OrchestratorError::Fatal {
                            service: id.to_string(),
                            code,
                            source,
                        });
                    }
                    // The entry stays registered; the instance is still live.
                    error!("Failed to stop service {}: {}", id, source);
                    errors += 1;
                }
            }
        }
        Ok(errors)
    }

    /// Notify a stable snapshot of the listener set of one level change.
    fn fire_level_event(&self, from: RunLevel, to: RunLevel, forced: bool) {
        let snapshot: Vec<Arc<dyn LifecycleListener>> = self.listeners.read().clone();
        if snapshot.is_empty() {
            return;
        }
        debug!(
            "Notifying {} listener(s) of level change {} -> {}",
            snapshot.len(),
            from,
            to
        );
        let event = LevelChange::new(from, to, forced);
        for listener in snapshot {
            listener.on_level_change(&event);
        }
    }

    /// Administrative level change. Accepts a symbolic level name or a
    /// number and reports the outcome in human-readable form.
    pub fn change_level(&self, level: &str, force: bool) -> Result<String, OrchestratorError> {
        let target = parse_level(level).map_err(OrchestratorError::UnknownLevel)?;

        let before = self.current_level();
        let errors = self.transition_to(target.number(), force)?;
        let after = self.current_level();

        if before == after {
            return Ok(format!("Already at run level {}", level_name(after)));
        }
        Ok(format!(
            "Run level changed from {} to {} ({} error{})",
            level_name(before),
            level_name(after),
            errors,
            if errors == 1 { "" } else { "s" }
        ))
    }

    /// Point-in-time status snapshot for management surfaces.
    pub fn status(&self) -> KernelStatus {
        let level = self.current_level();
        KernelStatus {
            level,
            level_name: level_name(level),
            services: self.registry.ids(),
            uptime_secs: self.context.uptime_secs(),
        }
    }
}

fn level_name(level: i32) -> String {
    RunLevel::from_number(level)
        .map(|l| l.as_str().to_string())
        .unwrap_or_else(|| level.to_string())
}
