//! Particle halo around the orb: per-quality presets and procedural field
//! generation.

use crate::color::{linear_to_hex, parse_hex};
use crate::constants::{PARTICLE_SHELL_INNER, PARTICLE_SHELL_OUTER};
use crate::performance::QualityLevel;
use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use rand::prelude::*;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;
use std::rc::Rc;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticleSystemConfig {
    pub enabled: bool,
    pub max_particles: u32,
    pub particle_size: f32,
    pub emission_rate: f32,
    pub particle_lifetime_ms: f32,
    pub particle_speed: f32,
    pub particle_color: String,
    pub glow_intensity: f32,
}

impl ParticleSystemConfig {
    pub fn preset(level: QualityLevel) -> Self {
        let (max_particles, particle_size, glow_intensity, emission_rate) = match level {
            QualityLevel::Low => (1500, 0.05, 0.5, 50.0),
            QualityLevel::Medium => (3000, 0.08, 0.8, 75.0),
            QualityLevel::High => (5000, 0.1, 1.0, 100.0),
        };
        Self {
            enabled: true,
            max_particles,
            particle_size,
            emission_rate,
            particle_lifetime_ms: 2000.0,
            particle_speed: 1.0,
            particle_color: "#ffffff".to_string(),
            glow_intensity,
        }
    }
}

impl Default for ParticleSystemConfig {
    fn default() -> Self {
        Self::preset(QualityLevel::default())
    }
}

/// One particle as uploaded to the GPU.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable, Serialize)]
pub struct ParticleVertex {
    pub position: [f32; 3],
    pub size: f32,
    pub color: [f32; 3],
    pub phase: f32,
    pub velocity: [f32; 3],
    pub alpha: f32,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ParticleField {
    pub particles: Vec<ParticleVertex>,
}

impl ParticleField {
    /// Scatter `count` particles uniformly over a spherical shell.
    ///
    /// Latitude uses `acos(2v - 1)` so density stays even instead of bunching
    /// at the poles. With `seed` the result is reproducible.
    pub fn generate(count: usize, base_color: Vec3, seed: Option<u64>) -> Self {
        let mut rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        let particles = (0..count)
            .map(|_| {
                let theta = rng.gen::<f32>() * TAU;
                let phi = (2.0 * rng.gen::<f32>() - 1.0).clamp(-1.0, 1.0).acos();
                let dir = Vec3::new(phi.sin() * theta.cos(), phi.sin() * theta.sin(), phi.cos());
                let shell = rng.gen_range(PARTICLE_SHELL_INNER..PARTICLE_SHELL_OUTER);
                let brightness = rng.gen_range(0.8_f32..1.2);
                let outward = rng.gen_range(0.8_f32..1.2);
                ParticleVertex {
                    position: (dir * shell).to_array(),
                    size: rng.gen_range(0.6..1.4),
                    color: (base_color * brightness).min(Vec3::ONE).to_array(),
                    phase: rng.gen::<f32>() * TAU,
                    velocity: (dir * outward).to_array(),
                    alpha: rng.gen_range(0.6..1.0),
                }
            })
            .collect();
        Self { particles }
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.particles)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct FieldKey {
    count: usize,
    color_hex: u32,
}

/// Keeps the last generated field until its count or base color changes.
#[derive(Debug, Default)]
pub struct ParticleFieldCache {
    seed: Option<u64>,
    key: Option<FieldKey>,
    field: Rc<ParticleField>,
    generations: u32,
}

impl ParticleFieldCache {
    pub fn new(seed: Option<u64>) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    pub fn get(&mut self, config: &ParticleSystemConfig, base_color: Vec3) -> Rc<ParticleField> {
        let count = if config.enabled {
            config.max_particles as usize
        } else {
            0
        };
        let key = FieldKey {
            count,
            color_hex: linear_to_hex(base_color),
        };
        if self.key != Some(key) {
            // tint toward the configured particle color so presets stay readable
            let tint = parse_hex(&config.particle_color).unwrap_or(Vec3::ONE);
            let color = base_color.lerp(tint, 0.35);
            self.field = Rc::new(ParticleField::generate(count, color, self.seed));
            self.key = Some(key);
            self.generations += 1;
            log::debug!(
                "[particles] regenerated {} particles (#{:06x})",
                count,
                key.color_hex
            );
        }
        self.field.clone()
    }

    /// How many times a field has been generated; exposes cache hits to callers.
    pub fn generations(&self) -> u32 {
        self.generations
    }
}

