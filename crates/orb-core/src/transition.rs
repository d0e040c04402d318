//! Time-bounded interpolation between orb states.

use crate::visual::{OrbAnimationState, OrbVisualConfig};
use serde::{Deserialize, Serialize};

/// Transition bookkeeping mirrored into the orb slice.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionState {
    pub previous_state: Option<OrbAnimationState>,
    pub progress: f32,
    pub duration_ms: f64,
    pub start_ms: Option<f64>,
}

impl TransitionState {
    /// Rest value: nothing in flight, fully arrived.
    pub fn settled(state: OrbAnimationState) -> Self {
        Self {
            previous_state: None,
            progress: 1.0,
            duration_ms: state.duration_ms(),
            start_ms: None,
        }
    }

    pub fn in_flight(&self) -> bool {
        self.start_ms.is_some()
    }
}

impl Default for TransitionState {
    fn default() -> Self {
        Self::settled(OrbAnimationState::default())
    }
}

/// Outcome of advancing the controller by one tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TransitionStep {
    /// Nothing in flight.
    Resting,
    Running(f32),
    /// Reached progress 1 on this tick.
    Completed,
}

/// Owns the timing of the single in-flight transition.
#[derive(Clone, Debug)]
pub struct TransitionController {
    target: OrbAnimationState,
    from: OrbVisualConfig,
    state: TransitionState,
}

impl TransitionController {
    pub fn new(initial: OrbAnimationState) -> Self {
        Self {
            target: initial,
            from: OrbVisualConfig::for_state(initial),
            state: TransitionState::settled(initial),
        }
    }

    pub fn target(&self) -> OrbAnimationState {
        self.target
    }

    pub fn state(&self) -> TransitionState {
        self.state
    }

    /// Start moving toward `next`. Returns `false` (and does nothing) when
    /// `next` is already the target.
    ///
    /// A transition already in flight is cut short: the new one starts from
    /// whatever is on screen right now, not from the old source.
    pub fn begin(&mut self, next: OrbAnimationState, now_ms: f64) -> bool {
        if next == self.target {
            return false;
        }
        self.from = self.current_config();
        let previous = self.target;
        self.target = next;
        self.state = TransitionState {
            previous_state: Some(previous),
            progress: 0.0,
            duration_ms: next.duration_ms(),
            start_ms: Some(now_ms),
        };
        log::debug!("[transition] {previous} -> {next} over {}ms", self.state.duration_ms);
        true
    }

    pub fn advance(&mut self, now_ms: f64) -> TransitionStep {
        let Some(start) = self.state.start_ms else {
            return TransitionStep::Resting;
        };
        let elapsed = (now_ms - start).max(0.0);
        let raw = if self.state.duration_ms > 0.0 {
            (elapsed / self.state.duration_ms).min(1.0) as f32
        } else {
            1.0
        };
        // never step backwards, even if the host clock jitters
        let progress = raw.max(self.state.progress);
        if progress >= 1.0 {
            self.state = TransitionState {
                previous_state: None,
                progress: 1.0,
                duration_ms: self.state.duration_ms,
                start_ms: None,
            };
            self.from = OrbVisualConfig::for_state(self.target);
            TransitionStep::Completed
        } else {
            self.state.progress = progress;
            TransitionStep::Running(progress)
        }
    }

    /// Eased blend from the transition source to the target.
    pub fn current_config(&self) -> OrbVisualConfig {
        let target = OrbVisualConfig::for_state(self.target);
        if !self.state.in_flight() {
            return target;
        }
        let t = self.target.easing().apply(self.state.progress);
        self.from.lerp(&target, t)
    }
}
