use exprof_config::{ProfileDefinition, ProfilesConfig};
use exprof_reconcile::*;
use exprof_testkit::{MemoryStore, StubHost};

fn config() -> ProfilesConfig {
    ProfilesConfig::default()
        .with_profile("Work", ProfileDefinition::with_extensions(["ext.a"]))
        .with_profile("Home", ProfileDefinition::default())
        .with_active(["Work"])
}

#[test]
fn scenario_already_active_profile_is_rejected_without_write() {
    let store = MemoryStore::new(config());
    let host = StubHost::new();
    let engine = ProfileEngine::new(&store, &host);

    let signals = engine.activate_profile_by_name("Work");

    assert_eq!(
        signals,
        vec![Signal::AlreadyActive {
            profile: "Work".to_string()
        }]
    );
    assert_eq!(signals[0].message(), "Profile 'Work' is already active");
    assert_eq!(signals[0].severity(), Severity::Info);
    assert!(store.writes().is_empty());
    assert_eq!(host.queries(), 0);
}

#[test]
fn undefined_profile_is_rejected_without_write() {
    let store = MemoryStore::new(config());
    let host = StubHost::new();
    let engine = ProfileEngine::new(&store, &host);

    let signals = engine.activate_profile_by_name("Travel");

    assert_eq!(signals.len(), 1);
    assert_eq!(signals[0].message(), "Profile 'Travel' is not defined");
    assert_eq!(signals[0].severity(), Severity::Error);
    assert!(store.writes().is_empty());
}

#[test]
fn defined_inactive_profile_is_activated() {
    let store = MemoryStore::new(config());
    let host = StubHost::new();
    let engine = ProfileEngine::new(&store, &host);

    let signals = engine.activate_profile_by_name("Home");

    assert_eq!(
        store.active_profiles(),
        vec!["Work".to_string(), "Home".to_string()]
    );
    assert!(matches!(signals.as_slice(), [Signal::Completed { offer_view: true, .. }]));
}
