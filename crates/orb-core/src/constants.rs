// Shared timing and tuning constants for the orb runtime and its hosts.

// Auto-revert: success/error fall back to idle after this delay
pub const AUTO_REVERT_MS: f64 = 2000.0;

// Session and UI timers
pub const IDLE_TIMEOUT_MS: f64 = 30.0 * 60.0 * 1000.0; // 30 minutes without activity
pub const SUCCESS_DISMISS_MS: f64 = 3000.0; // success toast auto-dismiss
pub const ANNOUNCEMENT_CLEAR_MS: f64 = 5000.0; // live-region messages clear after this
pub const ERROR_MAX_AGE_MS: f64 = 24.0 * 60.0 * 60.0 * 1000.0; // persisted errors expire

// Bounded logs
pub const UI_HISTORY_CAPACITY: usize = 50;
pub const DEBUG_HISTORY_CAPACITY: usize = 50;

// Performance sampling
pub const FPS_WINDOW: usize = 60; // rolling window length in frames
pub const FPS_SAMPLE_CAP: f64 = 120.0; // clamp outlier spikes
pub const FPS_LOW_BELOW: f64 = 30.0;
pub const FPS_MEDIUM_BELOW: f64 = 45.0;
pub const FPS_HIGH_AT: f64 = 55.0;

// Animation speed multiplier bounds
pub const ANIMATION_SPEED_MIN: f32 = 0.0;
pub const ANIMATION_SPEED_MAX: f32 = 2.0;

// Per-frame shape modulation
pub const BREATHING_AMPLITUDE: f32 = 0.04; // fraction of radius
pub const PARTICLE_SHELL_INNER: f32 = 1.15; // multiples of the orb radius
pub const PARTICLE_SHELL_OUTER: f32 = 1.6;

// Preferences bounds
pub const FONT_SIZE_MIN: u8 = 8;
pub const FONT_SIZE_MAX: u8 = 48;

// Storage keys and envelope versions
pub const PREFERENCES_KEY: &str = "orb-preferences";
pub const SESSION_KEY: &str = "orb-session";
pub const ERROR_KEY: &str = "orb-error";
pub const PREFERENCES_VERSION: u32 = 1;
pub const SESSION_VERSION: u32 = 1;
pub const ERROR_VERSION: u32 = 1;
