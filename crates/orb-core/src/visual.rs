//! Discrete orb states and the per-state visual, duration and easing tables.
//!
//! Every concern is one array indexed by `OrbAnimationState::index`, so adding
//! a state without filling each table fails to compile.

use crate::color::{format_hex, hex_to_linear};
use crate::easing::Easing;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrbAnimationState {
    #[default]
    Idle,
    #[serde(alias = "loading")]
    Processing,
    Success,
    Error,
    Active,
    Inactive,
}

impl OrbAnimationState {
    pub const ALL: [OrbAnimationState; 6] = [
        OrbAnimationState::Idle,
        OrbAnimationState::Processing,
        OrbAnimationState::Success,
        OrbAnimationState::Error,
        OrbAnimationState::Active,
        OrbAnimationState::Inactive,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        match self {
            OrbAnimationState::Idle => 0,
            OrbAnimationState::Processing => 1,
            OrbAnimationState::Success => 2,
            OrbAnimationState::Error => 3,
            OrbAnimationState::Active => 4,
            OrbAnimationState::Inactive => 5,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            OrbAnimationState::Idle => "idle",
            OrbAnimationState::Processing => "processing",
            OrbAnimationState::Success => "success",
            OrbAnimationState::Error => "error",
            OrbAnimationState::Active => "active",
            OrbAnimationState::Inactive => "inactive",
        }
    }

    /// Parse a state name; unknown names fall back to `Idle`.
    pub fn parse_lossy(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "idle" => OrbAnimationState::Idle,
            "processing" | "loading" => OrbAnimationState::Processing,
            "success" => OrbAnimationState::Success,
            "error" => OrbAnimationState::Error,
            "active" => OrbAnimationState::Active,
            "inactive" => OrbAnimationState::Inactive,
            other => {
                log::warn!("[orb] unknown animation state {other:?}, using idle");
                OrbAnimationState::Idle
            }
        }
    }

    /// Transition length when entering this state.
    #[inline]
    pub fn duration_ms(self) -> f64 {
        TRANSITION_DURATIONS_MS[self.index()]
    }

    /// Curve applied while entering this state. Arriving states snap in,
    /// settling states ease both ends.
    #[inline]
    pub fn easing(self) -> Easing {
        TRANSITION_EASINGS[self.index()]
    }

    /// Whether the state reverts to idle on its own.
    #[inline]
    pub fn auto_reverts(self) -> bool {
        matches!(self, OrbAnimationState::Success | OrbAnimationState::Error)
    }

    /// Resting states that interaction-mode changes may replace.
    #[inline]
    pub fn is_ambient(self) -> bool {
        matches!(
            self,
            OrbAnimationState::Idle | OrbAnimationState::Active | OrbAnimationState::Inactive
        )
    }
}

impl fmt::Display for OrbAnimationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

const TRANSITION_DURATIONS_MS: [f64; 6] = [800.0, 600.0, 400.0, 500.0, 600.0, 800.0];

const TRANSITION_EASINGS: [Easing; 6] = [
    Easing::EaseInOut, // idle
    Easing::EaseOut,   // processing
    Easing::EaseOut,   // success
    Easing::EaseInOut, // error
    Easing::EaseOut,   // active
    Easing::EaseInOut, // inactive
];

/// Authored preset; colors are sRGB hex.
struct VisualPreset {
    base: u32,
    emissive: u32,
    speed: f32,
    noise_strength: f32,
    noise_frequency: f32,
    radius: f32,
    alpha: f32,
}

const VISUAL_PRESETS: [VisualPreset; 6] = [
    // idle
    VisualPreset {
        base: 0x4338ca,
        emissive: 0x6366f1,
        speed: 0.3,
        noise_strength: 0.15,
        noise_frequency: 1.5,
        radius: 1.0,
        alpha: 0.85,
    },
    // processing
    VisualPreset {
        base: 0x4a90e2,
        emissive: 0x7fb3f0,
        speed: 1.2,
        noise_strength: 0.35,
        noise_frequency: 2.5,
        radius: 1.1,
        alpha: 0.95,
    },
    // success
    VisualPreset {
        base: 0x22c55e,
        emissive: 0x4ade80,
        speed: 0.8,
        noise_strength: 0.4,
        noise_frequency: 2.0,
        radius: 1.2,
        alpha: 1.0,
    },
    // error
    VisualPreset {
        base: 0xef4444,
        emissive: 0xfca5a5,
        speed: 1.6,
        noise_strength: 0.5,
        noise_frequency: 3.5,
        radius: 0.8,
        alpha: 1.0,
    },
    // active
    VisualPreset {
        base: 0x818cf8,
        emissive: 0xa5b4fc,
        speed: 0.9,
        noise_strength: 0.3,
        noise_frequency: 2.0,
        radius: 1.15,
        alpha: 0.95,
    },
    // inactive
    VisualPreset {
        base: 0x475569,
        emissive: 0x64748b,
        speed: 0.15,
        noise_strength: 0.08,
        noise_frequency: 1.0,
        radius: 0.9,
        alpha: 0.6,
    },
];

/// Render-facing look of the orb. Colors are linear RGB.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrbVisualConfig {
    pub base_color: Vec3,
    pub emissive_color: Vec3,
    pub speed: f32,
    pub noise_strength: f32,
    pub noise_frequency: f32,
    pub radius: f32,
    pub alpha: f32,
}

impl OrbVisualConfig {
    pub fn for_state(state: OrbAnimationState) -> Self {
        let p = &VISUAL_PRESETS[state.index()];
        Self {
            base_color: hex_to_linear(p.base),
            emissive_color: hex_to_linear(p.emissive),
            speed: p.speed,
            noise_strength: p.noise_strength,
            noise_frequency: p.noise_frequency,
            radius: p.radius,
            alpha: p.alpha,
        }
    }

    /// Field-wise linear interpolation; `t` is clamped to \[0, 1\].
    pub fn lerp(&self, other: &Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: f32, b: f32| a + (b - a) * t;
        Self {
            base_color: self.base_color.lerp(other.base_color, t),
            emissive_color: self.emissive_color.lerp(other.emissive_color, t),
            speed: mix(self.speed, other.speed),
            noise_strength: mix(self.noise_strength, other.noise_strength),
            noise_frequency: mix(self.noise_frequency, other.noise_frequency),
            radius: mix(self.radius, other.radius),
            alpha: mix(self.alpha, other.alpha),
        }
    }

    pub fn base_hex(&self) -> String {
        format_hex(self.base_color)
    }

    /// Sum of absolute per-field differences; handy for "approaches" checks.
    pub fn distance(&self, other: &Self) -> f32 {
        (self.base_color - other.base_color).abs().element_sum()
            + (self.emissive_color - other.emissive_color).abs().element_sum()
            + (self.speed - other.speed).abs()
            + (self.noise_strength - other.noise_strength).abs()
            + (self.noise_frequency - other.noise_frequency).abs()
            + (self.radius - other.radius).abs()
            + (self.alpha - other.alpha).abs()
    }
}

/// Visual config of `state`, blended from `previous` while a transition is
/// under way (`progress` < 1).
pub fn config_for(
    state: OrbAnimationState,
    previous: Option<OrbAnimationState>,
    progress: f32,
) -> OrbVisualConfig {
    let target = OrbVisualConfig::for_state(state);
    match previous {
        Some(prev) if progress < 1.0 => OrbVisualConfig::for_state(prev).lerp(&target, progress),
        _ => target,
    }
}
