use super::{RootState, SliceChanges};
use std::collections::VecDeque;

/// One recorded commit.
#[derive(Clone, Debug)]
pub struct DebugEntry {
    pub timestamp_ms: f64,
    pub action: &'static str,
    pub changes: SliceChanges,
    pub previous: RootState,
    pub next: RootState,
}

/// Newest-first log of commits for inspection tooling.
///
/// Entries share slice allocations with the live state, so keeping them is
/// cheap.
#[derive(Clone, Debug)]
pub struct DebugHistory {
    entries: VecDeque<DebugEntry>,
    capacity: usize,
}

impl DebugHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity.min(64)),
            capacity: capacity.max(1),
        }
    }

    pub(super) fn record(
        &mut self,
        timestamp_ms: f64,
        action: &'static str,
        changes: SliceChanges,
        previous: &RootState,
        next: &RootState,
    ) {
        log::debug!("[store] {action} changed {changes:?}");
        self.entries.push_front(DebugEntry {
            timestamp_ms,
            action,
            changes,
            previous: previous.clone(),
            next: next.clone(),
        });
        self.entries.truncate(self.capacity);
    }

    /// Newest first.
    pub fn entries(&self) -> impl Iterator<Item = &DebugEntry> {
        self.entries.iter()
    }

    pub fn actions(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|e| e.action)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
