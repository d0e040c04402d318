//! Frame-rate sampling and the adaptive quality policy.

use crate::constants::{FPS_HIGH_AT, FPS_LOW_BELOW, FPS_MEDIUM_BELOW, FPS_SAMPLE_CAP, FPS_WINDOW};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum QualityLevel {
    Low,
    Medium,
    #[default]
    High,
}

impl QualityLevel {
    /// Pick a level for the averaged frame rate.
    ///
    /// Thresholds are the same in both directions; only the \[45, 55) band
    /// keeps whatever level is current.
    pub fn for_fps(current: QualityLevel, avg_fps: f64) -> QualityLevel {
        if avg_fps < FPS_LOW_BELOW {
            QualityLevel::Low
        } else if avg_fps < FPS_MEDIUM_BELOW {
            QualityLevel::Medium
        } else if avg_fps >= FPS_HIGH_AT {
            QualityLevel::High
        } else {
            current
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceMetrics {
    pub fps: f64,
    pub memory_mb: f64,
    pub render_time_ms: f64,
}

impl Default for PerformanceMetrics {
    fn default() -> Self {
        Self {
            fps: 60.0,
            memory_mb: 0.0,
            render_time_ms: 1000.0 / 60.0,
        }
    }
}

/// Best-effort heap usage. Returning `None` reports 0 MB.
pub trait MemoryProbe {
    fn used_heap_mb(&self) -> Option<f64>;
}

/// Probe for hosts without a heap API.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoMemoryProbe;

impl MemoryProbe for NoMemoryProbe {
    fn used_heap_mb(&self) -> Option<f64> {
        None
    }
}

/// Fixed-size FIFO of instantaneous fps samples.
#[derive(Clone, Debug)]
pub struct FrameRateMonitor {
    samples: VecDeque<f64>,
    window: usize,
    sum: f64,
}

impl Default for FrameRateMonitor {
    fn default() -> Self {
        Self::new(FPS_WINDOW)
    }
}

impl FrameRateMonitor {
    pub fn new(window: usize) -> Self {
        let window = window.max(1);
        Self {
            samples: VecDeque::with_capacity(window),
            window,
            sum: 0.0,
        }
    }

    /// Record one frame; returns the rolling average, or `None` when the
    /// frame was rejected (non-positive or non-finite delta).
    pub fn record(&mut self, delta_ms: f64) -> Option<f64> {
        if delta_ms <= 0.0 || !delta_ms.is_finite() {
            return None;
        }
        let fps = 1000.0 / delta_ms;
        if !fps.is_finite() {
            return None;
        }
        let fps = fps.min(FPS_SAMPLE_CAP);
        if self.samples.len() == self.window {
            if let Some(old) = self.samples.pop_front() {
                self.sum -= old;
            }
        }
        self.samples.push_back(fps);
        self.sum += fps;
        self.average()
    }

    pub fn average(&self) -> Option<f64> {
        if self.samples.is_empty() {
            None
        } else {
            Some(self.sum / self.samples.len() as f64)
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn reset(&mut self) {
        self.samples.clear();
        self.sum = 0.0;
    }
}
