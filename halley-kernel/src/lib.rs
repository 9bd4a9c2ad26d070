//! Run-level service lifecycle kernel.
//!
//! Brings a set of independently pluggable services up and down through an
//! ordered scale of run levels, honoring per-service ordering, enabling,
//! and failure policy. The [`orchestrator::LifecycleOrchestrator`] drives
//! transitions one elementary level at a time; descriptors come from a
//! [`catalog::DescriptorCatalog`], instances are built by the
//! [`factory::InstanceFactory`] and cached in the
//! [`registry::InstanceRegistry`], and every level boundary is fanned out
//! to registered [`orchestrator::LifecycleListener`]s.
//!
//! Single process, purely reactive: no background threads, no persisted
//! state, no distributed coordination.

pub mod catalog;
pub mod config;
pub mod context;
pub mod descriptor;
pub mod errors;
pub mod factory;
pub mod level;
pub mod ordering;
pub mod orchestrator;
pub mod registry;
pub mod service;
