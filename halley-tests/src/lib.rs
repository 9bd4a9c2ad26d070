//! Test utilities for the halley workspace
//!
//! This crate provides helper builders and an in-process harness for
//! testing the run level kernel: catalog construction, probe services
//! that journal their lifecycle, and transition scenarios.

pub mod helpers;

pub use helpers::catalog_builder::{TestCatalogBuilder, TestServiceBuilder};
pub use helpers::kernel_harness::TestKernelHarness;
pub use helpers::probe::{Journal, probe_constructors};
