//! Deterministic startup and shutdown ordering over descriptor sets.
//!
//! Startup sorts ascending by `(target_level, sequence, registration_seq)`.
//! Shutdown is the mirror: higher levels stop first, lower sequence stops
//! first within a level, and the most recently registered descriptor stops
//! first as the final tie-break. Both orders are total and reproducible for
//! a fixed descriptor set.
//!
//! Callers must filter for the relevant action before sorting; comparing a
//! descriptor without it is a contract violation.

use std::cmp::Ordering;
use std::sync::Arc;

use crate::descriptor::ServiceDescriptor;

/// Ascending startup order: level, then sequence, then registration order.
pub fn startup_cmp(a: &ServiceDescriptor, b: &ServiceDescriptor) -> Ordering {
    let la = a
        .load_action()
        .expect("startup ordering requires a load action");
    let lb = b
        .load_action()
        .expect("startup ordering requires a load action");

    la.target_level
        .cmp(&lb.target_level)
        .then(la.sequence.cmp(&lb.sequence))
        .then(a.registration_seq().cmp(&b.registration_seq()))
}

/// Descending shutdown order: higher level first, then lower sequence first
/// within a level, then most recent registration first.
pub fn shutdown_cmp(a: &ServiceDescriptor, b: &ServiceDescriptor) -> Ordering {
    let sa = a
        .stop_action()
        .expect("shutdown ordering requires a stop action");
    let sb = b
        .stop_action()
        .expect("shutdown ordering requires a stop action");

    sb.target_level
        .cmp(&sa.target_level)
        .then(sa.sequence.cmp(&sb.sequence))
        .then(b.registration_seq().cmp(&a.registration_seq()))
}

pub fn sort_for_startup(descriptors: &mut [Arc<ServiceDescriptor>]) {
    descriptors.sort_by(|a, b| startup_cmp(a, b));
}

pub fn sort_for_shutdown(descriptors: &mut [Arc<ServiceDescriptor>]) {
    descriptors.sort_by(|a, b| shutdown_cmp(a, b));
}
