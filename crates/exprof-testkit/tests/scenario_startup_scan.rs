use std::time::Duration;

use exprof_reconcile::*;
use exprof_testkit::{config_from_yaml, MemoryStore, StubHost};

const SETTINGS: &str = r#"
extension-profiles:
  enableStartupCheck: true
  activeProfiles: ["Ghost", "Demo", "Work"]
  profiles:
    Work:
      extensions: ["ext.a", "ext.b"]
      disabledExtensions: ["ext.noisy"]
    Demo:
      temporaryProfile: true
      extensions: ["ext.demo"]
"#;

#[test]
fn scenario_each_active_profile_is_scanned_independently() {
    let config = config_from_yaml(SETTINGS).unwrap();
    let store = MemoryStore::new(config.clone());
    let host = StubHost::new().with_enabled(["ext.a", "ext.noisy"]);
    let engine = ProfileEngine::new(&store, &host);

    let signals = engine.scan_active_profiles(&config);

    assert_eq!(
        signals,
        vec![
            Signal::ProfileNotDefined {
                profile: "Ghost".to_string()
            },
            Signal::TemporaryProfileActive {
                profile: "Demo".to_string()
            },
            Signal::NeedsEnable {
                profile: "Work".to_string(),
                extensions: vec!["ext.b".to_string()],
                presentation: Presentation::Notification,
            },
            Signal::NeedsDisable {
                profile: "Work".to_string(),
                extensions: vec!["ext.noisy".to_string()],
            },
        ]
    );
    assert!(store.writes().is_empty());
}

#[test]
fn dismissing_temporary_warning_falls_through_to_startup_reconcile() {
    let config = config_from_yaml(SETTINGS).unwrap();
    let store = MemoryStore::new(config);
    let host = StubHost::new();
    let engine = ProfileEngine::new(&store, &host);

    let warning = Signal::TemporaryProfileActive {
        profile: "Demo".to_string(),
    };
    let follow_up = warning.on_dismiss().expect("dismissal has a fall-through");
    let signals = engine.dispatch(&follow_up);

    assert_eq!(
        signals,
        vec![Signal::NeedsEnable {
            profile: "Demo".to_string(),
            extensions: vec!["ext.demo".to_string()],
            presentation: Presentation::Notification,
        }]
    );
}

#[tokio::test(start_paused = true)]
async fn startup_check_waits_for_host_before_scanning() {
    let config = config_from_yaml(SETTINGS).unwrap();
    let store = MemoryStore::new(config);
    let host = StubHost::new();
    let engine = ProfileEngine::new(&store, &host);

    let started = tokio::time::Instant::now();
    let signals = run_startup_check(&engine, STARTUP_DELAY).await;

    assert!(started.elapsed() >= STARTUP_DELAY);
    assert_eq!(signals.len(), 3);
}

#[tokio::test(start_paused = true)]
async fn startup_check_disabled_does_nothing() {
    let mut config = config_from_yaml(SETTINGS).unwrap();
    config.enable_startup_check = false;
    let store = MemoryStore::new(config);
    let host = StubHost::new();
    let engine = ProfileEngine::new(&store, &host);

    let signals = run_startup_check(&engine, Duration::from_secs(60)).await;

    assert!(signals.is_empty());
    assert_eq!(host.queries(), 0);
}
