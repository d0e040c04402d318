//! Per-frame driver for the orb: watches the requested animation state,
//! runs transitions and auto-revert, and adapts quality to the frame rate.

use crate::engine::{OrbAnimationEngine, OrbUniforms};
use crate::particles::{ParticleField, ParticleFieldCache, ParticleSystemConfig};
use crate::performance::{FrameRateMonitor, MemoryProbe, PerformanceMetrics, QualityLevel};
use crate::runtime::RuntimeConfig;
use crate::store::{InteractionMode, Store};
use crate::timer::TimerQueue;
use crate::transition::{TransitionController, TransitionStep};
use crate::visual::{OrbAnimationState, OrbVisualConfig};
use serde::Serialize;
use std::rc::Rc;

/// Everything a renderer needs for one frame.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrbFrame {
    pub state: OrbAnimationState,
    pub previous_state: Option<OrbAnimationState>,
    pub progress: f32,
    pub quality: QualityLevel,
    pub uniforms: OrbUniforms,
    pub particle_config: ParticleSystemConfig,
    pub particle_count: usize,
    #[serde(skip)]
    pub particles: Rc<ParticleField>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum OrbTimer {
    AutoRevert,
}

pub struct OrbStateManager {
    controller: TransitionController,
    engine: OrbAnimationEngine,
    monitor: FrameRateMonitor,
    particles: ParticleFieldCache,
    timers: TimerQueue<OrbTimer>,
    memory: Box<dyn MemoryProbe>,
    now_ms: f64,
    auto_revert_ms: f64,
}

impl OrbStateManager {
    /// `initial` must match the store's current animation state.
    pub fn new(
        config: &RuntimeConfig,
        initial: OrbAnimationState,
        memory: Box<dyn MemoryProbe>,
    ) -> Self {
        Self {
            controller: TransitionController::new(initial),
            engine: OrbAnimationEngine::new(),
            monitor: FrameRateMonitor::new(config.fps_window),
            particles: ParticleFieldCache::new(config.particle_seed),
            timers: TimerQueue::new(),
            memory,
            now_ms: 0.0,
            auto_revert_ms: config.auto_revert_ms,
        }
    }

    /// Monotonic frame time: the sum of every valid delta seen so far.
    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    pub fn controller(&self) -> &TransitionController {
        &self.controller
    }

    pub fn frame_rate(&self) -> &FrameRateMonitor {
        &self.monitor
    }

    pub fn particle_generations(&self) -> u32 {
        self.particles.generations()
    }

    pub fn auto_revert_pending(&self) -> bool {
        self.timers.is_pending(OrbTimer::AutoRevert)
    }

    pub fn request_state(&mut self, store: &mut Store, state: OrbAnimationState) {
        store.set_animation_state(state);
        self.observe(store);
    }

    /// Switch interaction mode; a resting orb follows with `Active` or
    /// `Inactive`. Busy states (processing, success, error) are left alone.
    pub fn set_interaction_mode(&mut self, store: &mut Store, mode: InteractionMode) {
        store.set_interaction_mode(mode);
        if !store.orb().animation_state.is_ambient() {
            return;
        }
        let next = match mode {
            InteractionMode::Active => OrbAnimationState::Active,
            InteractionMode::Passive => OrbAnimationState::Inactive,
        };
        self.request_state(store, next);
    }

    /// Advance monotonic time without producing a frame.
    pub fn advance_clock(&mut self, delta_ms: f64) -> f64 {
        if delta_ms.is_finite() && delta_ms > 0.0 {
            self.now_ms += delta_ms;
        }
        self.now_ms
    }

    pub fn tick(&mut self, store: &mut Store, delta_ms: f64) -> OrbFrame {
        self.advance_clock(delta_ms);
        self.frame(store, delta_ms)
    }

    /// One frame at the current clock: performance sampling, state
    /// observation, due timers, transition progress, then uniforms and
    /// particles.
    pub fn frame(&mut self, store: &mut Store, delta_ms: f64) -> OrbFrame {
        self.sample_performance(store, delta_ms);

        // A request written straight into the store cancels the revert
        // before the timer gets a chance to fire over it.
        self.observe(store);
        for timer in self.timers.drain_due(self.now_ms) {
            match timer {
                OrbTimer::AutoRevert => {
                    log::debug!("[orb] auto-revert to idle");
                    store.set_animation_state(OrbAnimationState::Idle);
                }
            }
        }

        self.observe(store);

        match self.controller.advance(self.now_ms) {
            TransitionStep::Resting => {}
            TransitionStep::Running(_) | TransitionStep::Completed => {
                store.set_transition(self.controller.state());
            }
        }

        let config = self.controller.current_config();
        let orb = store.orb();
        let speed = if store.preferences().reduce_motion {
            0.0
        } else {
            orb.animation_speed
        };
        let uniforms = self.engine.advance(
            delta_ms,
            speed,
            &config,
            orb.particle_system.glow_intensity,
        );
        let target = OrbVisualConfig::for_state(self.controller.target());
        let particles = self.particles.get(&orb.particle_system, target.base_color);
        let transition = self.controller.state();

        OrbFrame {
            state: self.controller.target(),
            previous_state: transition.previous_state,
            progress: transition.progress,
            quality: orb.quality_level,
            uniforms,
            particle_config: orb.particle_system.clone(),
            particle_count: particles.len(),
            particles,
        }
    }

    /// Start a transition if the store asks for a state we are not showing.
    fn observe(&mut self, store: &mut Store) {
        let requested = store.orb().animation_state;
        if !self.controller.begin(requested, self.now_ms) {
            return;
        }
        self.timers.cancel(OrbTimer::AutoRevert);
        if requested.auto_reverts() {
            self.timers
                .schedule(OrbTimer::AutoRevert, self.now_ms + self.auto_revert_ms);
        }
        store.set_transition(self.controller.state());
    }

    fn sample_performance(&mut self, store: &mut Store, delta_ms: f64) {
        let Some(avg_fps) = self.monitor.record(delta_ms) else {
            return;
        };
        store.update_performance_metrics(PerformanceMetrics {
            fps: avg_fps,
            memory_mb: self.memory.used_heap_mb().unwrap_or(0.0),
            render_time_ms: delta_ms,
        });

        let current = store.orb().quality_level;
        let next = QualityLevel::for_fps(current, avg_fps);
        if next != current {
            log::info!("[orb] quality {current:?} -> {next:?} at {avg_fps:.1} fps");
            store.set_quality_level(next);
        }
    }
}
