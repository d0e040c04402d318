// Versioned persistence across simulated page reloads.

use orb_core::persist::{load_error, load_preferences, load_session, save_preferences};
use orb_core::*;
use std::rc::Rc;

const HOUR_MS: f64 = 60.0 * 60.0 * 1000.0;

fn reload(local: &MemoryStorage, session: &MemoryStorage, clock: &ManualClock) -> Store {
    Store::builder()
        .clock(Rc::new(clock.clone()))
        .local_storage(local.clone())
        .session_storage(session.clone())
        .build()
}

#[test]
fn preferences_survive_reload() {
    let (local, session) = (MemoryStorage::new(), MemoryStorage::new());
    let clock = ManualClock::new(0.0);
    let mut store = reload(&local, &session, &clock);
    store.set_theme(Theme::Dark);
    store.set_font_size(18);
    let written = store.preferences().clone();

    let restored = reload(&local, &session, &clock);
    assert_eq!(restored.preferences(), &written);
    assert_eq!(restored.preferences().theme, Theme::Dark);
    assert_eq!(restored.preferences().font_size, 18);
}

#[test]
fn preferences_envelope_shape() {
    let local = MemoryStorage::new();
    let prefs = PreferencesState {
        theme: Theme::Dark,
        font_size: 18,
        ..PreferencesState::default()
    };
    save_preferences(&local, &prefs).unwrap();
    let raw = local.get_item("orb-preferences").unwrap().unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(json["version"], 1);
    assert_eq!(json["state"]["theme"], "dark");
    assert_eq!(json["state"]["fontSize"], 18);
}

#[test]
fn wrong_version_or_garbage_falls_back_to_defaults() {
    let local = MemoryStorage::new();
    local
        .set_item(
            "orb-preferences",
            r#"{"version":2,"state":{"theme":"dark","fontSize":18,"autoSave":true,"notifications":true}}"#,
        )
        .unwrap();
    assert_eq!(load_preferences(&local), PreferencesState::default());

    local.set_item("orb-preferences", "{not json").unwrap();
    assert_eq!(load_preferences(&local), PreferencesState::default());

    local
        .set_item(
            "orb-preferences",
            r#"{"version":1,"state":{"theme":"dark","fontSize":200,"autoSave":true,"notifications":true}}"#,
        )
        .unwrap();
    assert_eq!(load_preferences(&local), PreferencesState::default());

    let store = Store::builder().local_storage(local).build();
    assert_eq!(store.preferences(), &PreferencesState::default());
    assert!(store.ui().error().is_none());
}

#[test]
fn session_snapshot_restores_as_active() {
    let (local, session) = (MemoryStorage::new(), MemoryStorage::new());
    let clock = ManualClock::new(0.0);
    let mut store = reload(&local, &session, &clock);
    store.set_context_value("topic", "orbs");
    store.set_session_active(false);

    clock.advance(HOUR_MS);
    let restored = reload(&local, &session, &clock);
    assert!(restored.session().is_active);
    assert_eq!(restored.session().last_activity_ms, HOUR_MS);
    assert_eq!(
        restored.session().context_value("topic"),
        Some(&serde_json::json!("orbs"))
    );
}

#[test]
fn version_zero_session_is_migrated() {
    let session = MemoryStorage::new();
    session
        .set_item(
            "orb-session",
            r#"{"version":0,"state":{"context":{"lang":"en"}}}"#,
        )
        .unwrap();
    let restored = load_session(&session, 500.0).expect("migrated");
    assert_eq!(restored.metadata.version, 1);
    assert_eq!(restored.metadata.created_at_ms, 500.0);
    assert_eq!(restored.context_value("lang"), Some(&serde_json::json!("en")));

    session
        .set_item("orb-session", r#"{"version":9,"state":{}}"#)
        .unwrap();
    assert!(load_session(&session, 500.0).is_none());
}

#[test]
fn system_error_survives_reload() {
    let (local, session) = (MemoryStorage::new(), MemoryStorage::new());
    let clock = ManualClock::new(10_000.0);
    let mut store = reload(&local, &session, &clock);
    store.set_error(ErrorState::new(ErrorKind::System, "GPU lost", clock.now_ms()));

    clock.advance(HOUR_MS);
    let mut restored = reload(&local, &session, &clock);
    let error = restored.ui().error().expect("restored");
    assert_eq!(error.kind, ErrorKind::System);
    assert_eq!(error.message, "GPU lost");

    restored.clear_error();
    assert!(local.get_item("orb-error").unwrap().is_none());
}

#[test]
fn transient_errors_are_not_persisted() {
    let (local, session) = (MemoryStorage::new(), MemoryStorage::new());
    let clock = ManualClock::new(0.0);
    let mut store = reload(&local, &session, &clock);
    store.set_error(ErrorState::new(ErrorKind::Network, "offline", 0.0));
    assert!(local.get_item("orb-error").unwrap().is_none());
}

#[test]
fn day_old_error_is_dropped() {
    let (local, session) = (MemoryStorage::new(), MemoryStorage::new());
    let clock = ManualClock::new(0.0);
    let mut store = reload(&local, &session, &clock);
    store.set_error(ErrorState::new(ErrorKind::Authentication, "", 0.0));
    assert!(local.get_item("orb-error").unwrap().is_some());

    clock.advance(25.0 * HOUR_MS);
    let restored = reload(&local, &session, &clock);
    assert!(restored.ui().error().is_none());
    assert!(local.get_item("orb-error").unwrap().is_none());
    assert!(load_error(&local, clock.now_ms(), 24.0 * HOUR_MS).is_none());
}

#[test]
fn store_without_backends_persists_nothing() {
    let mut store = Store::default();
    store.set_theme(Theme::Light);
    let other = Store::default();
    assert_eq!(other.preferences().theme, Theme::System);
}
