//! Screen-reader announcements derived from UI slice transitions.

use crate::store::UiState;
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Politeness {
    Polite,
    Assertive,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Announcement {
    pub politeness: Politeness,
    pub message: String,
}

impl Announcement {
    pub fn polite(message: impl Into<String>) -> Self {
        Self {
            politeness: Politeness::Polite,
            message: message.into(),
        }
    }

    pub fn assertive(message: impl Into<String>) -> Self {
        Self {
            politeness: Politeness::Assertive,
            message: message.into(),
        }
    }
}

/// Sink for announcements (aria-live regions on the web, logs natively).
pub trait Announcer {
    fn announce(&mut self, announcement: &Announcement);
    fn clear(&mut self);
}

/// Discards everything.
pub struct SilentAnnouncer;

impl Announcer for SilentAnnouncer {
    fn announce(&mut self, _: &Announcement) {}
    fn clear(&mut self) {}
}

/// Keeps every announcement; clones share the log.
#[derive(Clone, Debug, Default)]
pub struct RecordingAnnouncer {
    log: Rc<RefCell<Vec<Announcement>>>,
    clears: Rc<RefCell<u32>>,
}

impl RecordingAnnouncer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn announcements(&self) -> Vec<Announcement> {
        self.log.borrow().clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.log.borrow().iter().map(|a| a.message.clone()).collect()
    }

    pub fn clears(&self) -> u32 {
        *self.clears.borrow()
    }
}

impl Announcer for RecordingAnnouncer {
    fn announce(&mut self, announcement: &Announcement) {
        self.log.borrow_mut().push(announcement.clone());
    }

    fn clear(&mut self) {
        *self.clears.borrow_mut() += 1;
    }
}

/// What a screen reader should hear for one UI commit. Errors come first so
/// the assertive region is written before any polite message.
pub fn announcements_for(prev: &UiState, next: &UiState) -> Vec<Announcement> {
    let mut out = Vec::new();
    if let Some(error) = next.error() {
        if prev.error() != Some(error) {
            out.push(Announcement::assertive(format!(
                "Error: {}",
                error.display_message()
            )));
        }
    }
    match (prev.is_loading(), next.is_loading()) {
        (false, true) => out.push(Announcement::polite("Loading...")),
        (true, false) => out.push(Announcement::polite("Loading complete")),
        _ => {}
    }
    if let Some(success) = next.success() {
        if prev.success() != Some(success) {
            out.push(Announcement::polite(success));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorKind, ErrorState};
    use crate::store::Store;

    #[test]
    fn loading_edges_are_polite() {
        let mut store = Store::default();
        let before = store.state().ui.clone();
        store.set_loading(true);
        let during = store.state().ui.clone();
        store.set_loading(false);
        let after = store.state().ui.clone();

        assert_eq!(
            announcements_for(&before, &during),
            vec![Announcement::polite("Loading...")]
        );
        assert_eq!(
            announcements_for(&during, &after),
            vec![Announcement::polite("Loading complete")]
        );
    }

    #[test]
    fn new_error_is_assertive_and_uses_fallback_message() {
        let mut store = Store::default();
        let before = store.state().ui.clone();
        store.set_error(ErrorState::new(ErrorKind::Network, "", 0.0));
        let out = announcements_for(&before, &store.state().ui);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].politeness, Politeness::Assertive);
        assert!(out[0].message.starts_with("Error: "));
        assert!(out[0].message.len() > "Error: ".len());
    }

    #[test]
    fn unchanged_ui_announces_nothing() {
        let store = Store::default();
        let ui = store.state().ui.clone();
        assert!(announcements_for(&ui, &ui).is_empty());
    }
}
