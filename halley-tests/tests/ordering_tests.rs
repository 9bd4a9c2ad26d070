//! Ordering guarantees across a whole transition.
//!
//! The kernel promises a deterministic total order: level, then sequence,
//! then registration order on the way up; the mirror on the way down.

use halley_kernel::catalog::StaticCatalog;
use halley_kernel::descriptor::{LifecycleAction, ServiceDescriptor};
use halley_tests::TestKernelHarness;

fn bound(id: &str, up_level: i32, up_seq: i32, down_level: i32, down_seq: i32) -> ServiceDescriptor {
    ServiceDescriptor::new(id, "probe")
        .with_load(LifecycleAction::load(up_level).with_sequence(up_seq))
        .with_stop(LifecycleAction::stop(down_level).with_sequence(down_seq))
}

#[test]
fn test_startup_order_level_then_sequence() {
    let mut catalog = StaticCatalog::new();
    catalog.insert(bound("api", 9, 0, 9, 0)).unwrap();
    catalog.insert(bound("store-replica", 3, 5, 3, 5)).unwrap();
    catalog.insert(bound("store", 3, 0, 3, 0)).unwrap();
    catalog.insert(bound("cache", 6, 0, 6, 0)).unwrap();
    let harness = TestKernelHarness::new(catalog);

    harness.transition(9).unwrap();
    assert_eq!(
        harness.journal.constructed(),
        vec!["store", "store-replica", "cache", "api"]
    );
}

#[test]
fn test_shutdown_order_mirrors_startup() {
    let mut catalog = StaticCatalog::new();
    catalog.insert(bound("api", 9, 0, 9, 0)).unwrap();
    catalog.insert(bound("store-replica", 3, 5, 3, 5)).unwrap();
    catalog.insert(bound("store", 3, 0, 3, 0)).unwrap();
    catalog.insert(bound("cache", 6, 0, 6, 0)).unwrap();
    let harness = TestKernelHarness::new(catalog);

    harness.transition(9).unwrap();
    harness.transition(0).unwrap();

    // Higher level stops first; within a level, lower sequence first.
    assert_eq!(
        harness.journal.stopped(),
        vec!["api", "cache", "store", "store-replica"]
    );
}

#[test]
fn test_startup_tie_breaks_on_registration_order() {
    let mut catalog = StaticCatalog::new();
    catalog.insert(bound("first", 3, 1, 3, 1)).unwrap();
    catalog.insert(bound("second", 3, 1, 3, 1)).unwrap();
    let harness = TestKernelHarness::new(catalog);

    harness.transition(3).unwrap();
    assert_eq!(harness.journal.constructed(), vec!["first", "second"]);
}

#[test]
fn test_shutdown_tie_breaks_on_most_recent_registration() {
    let mut catalog = StaticCatalog::new();
    catalog.insert(bound("first", 3, 1, 3, 1)).unwrap();
    catalog.insert(bound("second", 3, 1, 3, 1)).unwrap();
    let harness = TestKernelHarness::new(catalog);

    harness.transition(9).unwrap();
    harness.transition(0).unwrap();
    // Most recently registered stops first.
    assert_eq!(harness.journal.stopped(), vec!["second", "first"]);
}

#[test]
fn test_initialization_follows_construction_per_service() {
    let mut catalog = StaticCatalog::new();
    catalog.insert(bound("a", 3, 0, 3, 0)).unwrap();
    catalog.insert(bound("b", 3, 1, 3, 1)).unwrap();
    let harness = TestKernelHarness::new(catalog);

    harness.transition(3).unwrap();
    // Two-phase per service, not two passes over the set.
    assert_eq!(
        harness.journal.entries(),
        vec!["construct:a", "init:a", "construct:b", "init:b"]
    );
}

#[test]
fn test_order_is_reproducible_across_runs() {
    let build = || {
        let mut catalog = StaticCatalog::new();
        catalog.insert(bound("x", 6, 2, 6, 2)).unwrap();
        catalog.insert(bound("y", 3, 0, 3, 0)).unwrap();
        catalog.insert(bound("z", 6, 0, 6, 0)).unwrap();
        TestKernelHarness::new(catalog)
    };

    let first = build();
    first.transition(9).unwrap();
    let second = build();
    second.transition(9).unwrap();

    assert_eq!(first.journal.constructed(), second.journal.constructed());
    assert_eq!(first.journal.constructed(), vec!["y", "z", "x"]);
}
