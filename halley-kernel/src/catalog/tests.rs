use super::*;
use crate::descriptor::LifecycleAction;

fn catalog() -> StaticCatalog {
    let mut catalog = StaticCatalog::new();
    catalog
        .insert(
            ServiceDescriptor::new("store", "impl")
                .with_load(LifecycleAction::load(3))
                .with_stop(LifecycleAction::stop(3)),
        )
        .unwrap();
    catalog
        .insert(
            ServiceDescriptor::new("cache", "impl")
                .with_load(LifecycleAction::load(6))
                .with_stop(LifecycleAction::stop(6)),
        )
        .unwrap();
    catalog
        .insert(
            ServiceDescriptor::new("api", "impl").with_load(LifecycleAction::load(9)),
        )
        .unwrap();
    catalog
        .insert(
            ServiceDescriptor::new("disabled", "impl")
                .with_enabled(false)
                .with_load(LifecycleAction::load(3)),
        )
        .unwrap();
    catalog
}

fn ids(descriptors: Vec<Arc<ServiceDescriptor>>) -> Vec<String> {
    descriptors.iter().map(|d| d.id().to_string()).collect()
}

#[test]
fn test_duplicate_id_rejected() {
    let mut catalog = StaticCatalog::new();
    catalog
        .insert(ServiceDescriptor::new("svc", "impl"))
        .unwrap();
    let err = catalog
        .insert(ServiceDescriptor::new("svc", "other"))
        .unwrap_err();
    assert!(matches!(err, KernelError::DuplicateService(_)));
    assert_eq!(catalog.len(), 1);
}

#[test]
fn test_startup_range_is_exclusive_inclusive() {
    let catalog = catalog();
    assert_eq!(ids(catalog.startup_range(2, 3)), vec!["store"]);
    assert_eq!(ids(catalog.startup_range(3, 6)), vec!["cache"]);
    assert_eq!(
        ids(catalog.startup_range(0, 9)),
        vec!["store", "cache", "api"]
    );
    assert!(catalog.startup_range(6, 6).is_empty());
}

#[test]
fn test_shutdown_range_is_exclusive_inclusive() {
    let catalog = catalog();
    assert_eq!(ids(catalog.shutdown_range(2, 3)), vec!["store"]);
    assert_eq!(ids(catalog.shutdown_range(5, 6)), vec!["cache"]);
    assert_eq!(ids(catalog.shutdown_range(0, 9)), vec!["store", "cache"]);
    assert!(catalog.shutdown_range(6, 9).is_empty());
    assert!(catalog.shutdown_range(3, 5).is_empty());
}

#[test]
fn test_disabled_descriptors_never_returned() {
    let catalog = catalog();
    assert!(!ids(catalog.startup_range(0, 9)).contains(&"disabled".to_string()));
    // But they are still reachable by id.
    assert!(catalog.get("disabled").is_some());
}

#[test]
fn test_descriptor_without_stop_action_absent_from_shutdown() {
    let catalog = catalog();
    assert!(!ids(catalog.shutdown_range(0, 10)).contains(&"api".to_string()));
}

#[test]
fn test_ids_in_registration_order() {
    let catalog = catalog();
    assert_eq!(catalog.ids(), vec!["store", "cache", "api", "disabled"]);
}
