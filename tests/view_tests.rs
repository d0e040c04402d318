// Host-side tests for the DOM-independent view helpers.

#![allow(dead_code)]
mod view {
    include!("../src/view.rs");
}

use orb_core::{ErrorKind, ErrorState, PreferencesState, RetryAction, Store, Theme};
use view::*;

#[test]
fn error_toast_wins_and_offers_retry() {
    let mut store = Store::default();
    assert_eq!(toast_view(store.ui()), None);

    store.set_success("Saved");
    let shown = toast_view(store.ui()).unwrap();
    assert_eq!(shown.kind, ToastKind::Success);
    assert_eq!(shown.text, "Saved");

    store.set_error(
        ErrorState::new(ErrorKind::Network, "", 0.0).with_retry(RetryAction::new(|| {})),
    );
    let shown = toast_view(store.ui()).unwrap();
    assert_eq!(shown.kind, ToastKind::Error);
    assert_eq!(shown.text, ErrorKind::Network.default_message());
    assert!(shown.can_retry);
}

#[test]
fn unrecoverable_error_hides_retry() {
    let mut store = Store::default();
    store.set_error(
        ErrorState::new(ErrorKind::System, "GPU lost", 0.0)
            .with_recoverable(false)
            .with_retry(RetryAction::new(|| {})),
    );
    assert!(!toast_view(store.ui()).unwrap().can_retry);
}

#[test]
fn body_classes_follow_preferences() {
    let prefs = PreferencesState {
        theme: Theme::Dark,
        high_contrast: true,
        ..PreferencesState::default()
    };
    assert_eq!(body_classes(&prefs), vec!["theme-dark", "high-contrast"]);
    assert_eq!(body_classes(&PreferencesState::default()), vec!["theme-system"]);
}

#[test]
fn theme_cycle_visits_all() {
    let mut theme = Theme::System;
    let mut seen = Vec::new();
    for _ in 0..3 {
        theme = next_theme(theme);
        seen.push(theme);
    }
    assert_eq!(seen, vec![Theme::Light, Theme::Dark, Theme::System]);
}
