// DOM hooks and host-side tuning for the web front-end.

// Element ids the page is expected to provide (created on demand otherwise)
pub const LIVE_POLITE_ID: &str = "orb-live-polite";
pub const LIVE_ASSERTIVE_ID: &str = "orb-live-assertive";
pub const TOAST_ID: &str = "orb-toast";
pub const TOAST_RETRY_ID: &str = "orb-toast-retry";
pub const TOAST_DISMISS_ID: &str = "orb-toast-dismiss";
pub const TOAST_TEXT_CLASS: &str = "toast-text";
pub const TOAST_TEXT_SELECTOR: &str = ".toast-text";
pub const MESSAGE_INPUT_ID: &str = "orb-input";
pub const SUBMIT_BUTTON_ID: &str = "orb-submit";
pub const VOICE_BUTTON_ID: &str = "orb-voice";

// Screen-reader-only styling for generated live regions
pub const SR_ONLY_STYLE: &str =
    "position:absolute;width:1px;height:1px;overflow:hidden;clip:rect(0 0 0 0);white-space:nowrap";

// Pointer activity is reported at most this often (ms)
pub const ACTIVITY_THROTTLE_MS: f64 = 250.0;

// A gap longer than this between frames means the tab was hidden; the frame
// is treated as zero-length instead of a 1 fps sample
pub const FRAME_STALL_MS: f64 = 1000.0;

// Animation speed step for the +/- keys
pub const SPEED_STEP: f32 = 0.1;
