//! Cancellable one-shot timers driven by tick time.
//!
//! Each key has at most one pending deadline; scheduling a key again
//! replaces the earlier deadline.

use smallvec::SmallVec;

#[derive(Clone, Debug)]
pub struct TimerQueue<K> {
    pending: SmallVec<[(K, f64); 4]>,
}

impl<K> Default for TimerQueue<K> {
    fn default() -> Self {
        Self {
            pending: SmallVec::new(),
        }
    }
}

impl<K: Copy + PartialEq> TimerQueue<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, key: K, deadline_ms: f64) {
        self.cancel(key);
        self.pending.push((key, deadline_ms));
    }

    /// Returns whether a timer was pending.
    pub fn cancel(&mut self, key: K) -> bool {
        let before = self.pending.len();
        self.pending.retain(|(k, _)| *k != key);
        before != self.pending.len()
    }

    pub fn is_pending(&self, key: K) -> bool {
        self.pending.iter().any(|(k, _)| *k == key)
    }

    pub fn deadline(&self, key: K) -> Option<f64> {
        self.pending
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, at)| *at)
    }

    /// Remove and return every timer due at `now_ms`, earliest first.
    pub fn drain_due(&mut self, now_ms: f64) -> SmallVec<[K; 4]> {
        let mut due: SmallVec<[(K, f64); 4]> = SmallVec::new();
        self.pending.retain(|(k, at)| {
            if *at <= now_ms {
                due.push((*k, *at));
                false
            } else {
                true
            }
        });
        due.sort_by(|a, b| a.1.total_cmp(&b.1));
        due.into_iter().map(|(k, _)| k).collect()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}
