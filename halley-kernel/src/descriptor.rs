//! Service descriptors and their lifecycle actions.
//!
//! A [`ServiceDescriptor`] is the static configuration of one pluggable
//! service: its identity, the implementation key the factory resolves, an
//! enable flag, ordered parameters, and up to two [`LifecycleAction`]s
//! binding it to the run level scale (one for loading, one for stopping).
//! Descriptors are immutable once built; each gets a registration sequence
//! number from a monotonic counter, used as the final ordering tie-breaker.

use std::sync::atomic::{AtomicU64, Ordering};

/// Process-wide registration counter. Strictly monotonic so descriptor
/// ordering is reproducible for a fixed construction order.
static NEXT_REGISTRATION_SEQ: AtomicU64 = AtomicU64::new(0);

/// Which side of the lifecycle an action drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionDirection {
    /// Start the service while climbing.
    Load,
    /// Stop the service while descending.
    Stop,
}

/// Binding of a service to one run level and an intra-level sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LifecycleAction {
    pub direction: ActionDirection,
    /// Level at which the action fires. Values <= 0 are the "unset"
    /// sentinel and never fire.
    pub target_level: i32,
    /// Orders actions firing at the same level transition. Lower first.
    pub sequence: i32,
    /// Failure code. When set, a failure at this action aborts the whole
    /// transition step instead of being logged and counted.
    pub on_failure: Option<String>,
}

impl LifecycleAction {
    pub fn load(target_level: i32) -> Self {
        Self {
            direction: ActionDirection::Load,
            target_level,
            sequence: 0,
            on_failure: None,
        }
    }

    pub fn stop(target_level: i32) -> Self {
        Self {
            direction: ActionDirection::Stop,
            target_level,
            sequence: 0,
            on_failure: None,
        }
    }

    pub fn with_sequence(mut self, sequence: i32) -> Self {
        self.sequence = sequence;
        self
    }

    pub fn with_failure_code(mut self, code: &str) -> Self {
        self.on_failure = Some(code.to_string());
        self
    }

    /// Whether the action is bound to a reachable level at all.
    pub fn fires(&self) -> bool {
        self.target_level > 0
    }

    /// Whether a failure at this action aborts the transition step.
    pub fn is_fatal(&self) -> bool {
        self.on_failure.is_some()
    }
}

/// Static description of one pluggable service.
#[derive(Debug, Clone)]
pub struct ServiceDescriptor {
    id: String,
    implementation: String,
    enabled: bool,
    parameters: Vec<(String, String)>,
    load_action: Option<LifecycleAction>,
    stop_action: Option<LifecycleAction>,
    registration_seq: u64,
}

impl ServiceDescriptor {
    /// Build a descriptor. The registration sequence number is assigned here
    /// and never reassigned.
    pub fn new(id: &str, implementation: &str) -> Self {
        Self {
            id: id.to_string(),
            implementation: implementation.to_string(),
            enabled: true,
            parameters: Vec::new(),
            load_action: None,
            stop_action: None,
            registration_seq: NEXT_REGISTRATION_SEQ.fetch_add(1, Ordering::Relaxed),
        }
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_parameter(mut self, key: &str, value: &str) -> Self {
        self.parameters.push((key.to_string(), value.to_string()));
        self
    }

    pub fn with_load(mut self, action: LifecycleAction) -> Self {
        self.load_action = Some(action);
        self
    }

    pub fn with_stop(mut self, action: LifecycleAction) -> Self {
        self.stop_action = Some(action);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn implementation(&self) -> &str {
        &self.implementation
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Parameters in declaration order.
    pub fn parameters(&self) -> &[(String, String)] {
        &self.parameters
    }

    /// First parameter value for a key, if declared.
    pub fn parameter(&self, key: &str) -> Option<&str> {
        self.parameters
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn load_action(&self) -> Option<&LifecycleAction> {
        self.load_action.as_ref()
    }

    pub fn stop_action(&self) -> Option<&LifecycleAction> {
        self.stop_action.as_ref()
    }

    pub fn registration_seq(&self) -> u64 {
        self.registration_seq
    }

    /// Whether this descriptor starts during a climb whose levels fall in
    /// `(from_exclusive, to_inclusive]`.
    pub fn starts_within(&self, from_exclusive: i32, to_inclusive: i32) -> bool {
        self.enabled
            && self.load_action.as_ref().is_some_and(|a| {
                a.fires() && a.target_level > from_exclusive && a.target_level <= to_inclusive
            })
    }

    /// Whether this descriptor stops during a descent whose levels fall in
    /// `(to_exclusive, from_inclusive]`. The range mirrors the startup one:
    /// a load action fires when the climb arrives at its level, a stop
    /// action when the descent leaves it.
    pub fn stops_within(&self, to_exclusive: i32, from_inclusive: i32) -> bool {
        self.enabled
            && self.stop_action.as_ref().is_some_and(|a| {
                a.fires() && a.target_level > to_exclusive && a.target_level <= from_inclusive
            })
    }
}
