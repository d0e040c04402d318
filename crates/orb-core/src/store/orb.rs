//! Orb slice: discrete animation state, transition bookkeeping, particles
//! and the performance-driven quality level.

use super::Store;
use crate::constants::{ANIMATION_SPEED_MAX, ANIMATION_SPEED_MIN};
use crate::error::StoreError;
use crate::particles::ParticleSystemConfig;
use crate::performance::{PerformanceMetrics, QualityLevel};
use crate::transition::TransitionState;
use crate::visual::OrbAnimationState;
use serde::{Deserialize, Serialize};
use std::rc::Rc;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionMode {
    Active,
    #[default]
    Passive,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrbState {
    pub animation_state: OrbAnimationState,
    pub transition: TransitionState,
    pub particle_system: ParticleSystemConfig,
    pub quality_level: QualityLevel,
    pub performance_metrics: PerformanceMetrics,
    pub animation_speed: f32,
    pub interaction_mode: InteractionMode,
}

impl Default for OrbState {
    fn default() -> Self {
        let quality_level = QualityLevel::default();
        Self {
            animation_state: OrbAnimationState::default(),
            transition: TransitionState::default(),
            particle_system: ParticleSystemConfig::preset(quality_level),
            quality_level,
            performance_metrics: PerformanceMetrics::default(),
            animation_speed: 1.0,
            interaction_mode: InteractionMode::default(),
        }
    }
}

impl OrbState {
    pub fn previous_state(&self) -> Option<OrbAnimationState> {
        self.transition.previous_state
    }

    pub fn progress(&self) -> f32 {
        self.transition.progress
    }
}

impl Store {
    /// Request a new discrete state. The orb state manager picks the change
    /// up and runs the visual transition.
    pub fn set_animation_state(&mut self, state: OrbAnimationState) {
        self.update("set_animation_state", |s, _| {
            if s.orb.animation_state != state {
                Rc::make_mut(&mut s.orb).animation_state = state;
            }
            Ok(())
        });
    }

    pub fn set_transition(&mut self, transition: TransitionState) {
        self.update("set_transition", |s, _| {
            if s.orb.transition != transition {
                Rc::make_mut(&mut s.orb).transition = transition;
            }
            Ok(())
        });
    }

    pub fn set_particle_system(&mut self, config: ParticleSystemConfig) {
        self.update("set_particle_system", |s, _| {
            if s.orb.particle_system != config {
                Rc::make_mut(&mut s.orb).particle_system = config;
            }
            Ok(())
        });
    }

    /// Switch quality and its particle preset in one commit.
    pub fn set_quality_level(&mut self, level: QualityLevel) {
        self.update("set_quality_level", |s, _| {
            if s.orb.quality_level != level {
                let orb = Rc::make_mut(&mut s.orb);
                orb.quality_level = level;
                orb.particle_system = ParticleSystemConfig::preset(level);
            }
            Ok(())
        });
    }

    pub fn update_performance_metrics(&mut self, metrics: PerformanceMetrics) {
        self.update("update_performance_metrics", |s, _| {
            if s.orb.performance_metrics != metrics {
                Rc::make_mut(&mut s.orb).performance_metrics = metrics;
            }
            Ok(())
        });
    }

    /// Clamp to the supported range; non-finite values are rejected and
    /// surface as a captured error.
    pub fn set_animation_speed(&mut self, speed: f32) -> bool {
        self.update("set_animation_speed", |s, _| {
            if !speed.is_finite() {
                return Err(StoreError::invalid("animation_speed", format!("{speed} is not finite")));
            }
            let speed = speed.clamp(ANIMATION_SPEED_MIN, ANIMATION_SPEED_MAX);
            if s.orb.animation_speed != speed {
                Rc::make_mut(&mut s.orb).animation_speed = speed;
            }
            Ok(())
        })
    }

    pub fn set_interaction_mode(&mut self, mode: InteractionMode) {
        self.update("set_interaction_mode", |s, _| {
            if s.orb.interaction_mode != mode {
                Rc::make_mut(&mut s.orb).interaction_mode = mode;
            }
            Ok(())
        });
    }
}
