//! Per-frame shader parameters for the orb.

use crate::constants::{ANIMATION_SPEED_MAX, ANIMATION_SPEED_MIN, BREATHING_AMPLITUDE};
use crate::visual::OrbVisualConfig;
use bytemuck::{Pod, Zeroable};
use serde::Serialize;
use std::f32::consts::TAU;

/// Uniform block consumed by the orb shader. Laid out in 16-byte rows.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrbUniforms {
    pub time: f32,
    pub radius: f32,
    pub speed: f32,
    pub noise_strength: f32,
    pub noise_frequency: f32,
    pub alpha: f32,
    pub rotation: f32,
    pub glow: f32,
    pub base_color: [f32; 4],
    pub emissive_color: [f32; 4],
}

impl OrbUniforms {
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}

/// Advances the orb's animation clock and derives uniforms from it.
#[derive(Clone, Debug, Default)]
pub struct OrbAnimationEngine {
    time: f32,
    rotation: f32,
}

impl OrbAnimationEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seconds of animation time elapsed (already scaled by speed).
    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn advance(
        &mut self,
        delta_ms: f64,
        animation_speed: f32,
        config: &OrbVisualConfig,
        glow: f32,
    ) -> OrbUniforms {
        let speed = if animation_speed.is_finite() {
            animation_speed.clamp(ANIMATION_SPEED_MIN, ANIMATION_SPEED_MAX)
        } else {
            1.0
        };
        let dt = (delta_ms.max(0.0) / 1000.0) as f32 * speed;
        self.time += dt;
        self.rotation = (self.rotation + config.speed * dt).rem_euclid(TAU);

        let breathing = (self.time * (1.0 + config.speed) * 2.0).sin();
        OrbUniforms {
            time: self.time,
            radius: config.radius * (1.0 + BREATHING_AMPLITUDE * breathing),
            speed: config.speed,
            noise_strength: config.noise_strength,
            noise_frequency: config.noise_frequency,
            alpha: config.alpha,
            rotation: self.rotation,
            glow,
            base_color: config.base_color.extend(1.0).to_array(),
            emissive_color: config.emissive_color.extend(1.0).to_array(),
        }
    }
}
