/// Keyboard shortcuts understood by the page.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyCommand {
    DismissError,
    Retry,
    Undo,
    Redo,
    ToggleReduceMotion,
    ToggleHighContrast,
    CycleTheme,
    SpeedUp,
    SlowDown,
    VoiceInput,
}

/// Map a `KeyboardEvent.key` plus modifiers to a command.
///
/// Plain letters are ignored while typing in the message box; the caller
/// passes `typing` for that.
pub fn command_for_key(key: &str, ctrl: bool, shift: bool, typing: bool) -> Option<KeyCommand> {
    if ctrl {
        return match key {
            "z" | "Z" if shift => Some(KeyCommand::Redo),
            "z" | "Z" => Some(KeyCommand::Undo),
            "y" | "Y" => Some(KeyCommand::Redo),
            _ => None,
        };
    }
    if key == "Escape" {
        return Some(KeyCommand::DismissError);
    }
    if typing {
        return None;
    }
    match key {
        "r" | "R" => Some(KeyCommand::Retry),
        "m" | "M" => Some(KeyCommand::ToggleReduceMotion),
        "c" | "C" => Some(KeyCommand::ToggleHighContrast),
        "t" | "T" => Some(KeyCommand::CycleTheme),
        "v" | "V" => Some(KeyCommand::VoiceInput),
        "+" | "=" | "ArrowUp" => Some(KeyCommand::SpeedUp),
        "-" | "_" | "ArrowDown" => Some(KeyCommand::SlowDown),
        _ => None,
    }
}

/// Rate limiter for high-frequency pointer events.
#[derive(Clone, Copy, Debug)]
pub struct ActivityThrottle {
    interval_ms: f64,
    last_ms: Option<f64>,
}

impl ActivityThrottle {
    pub fn new(interval_ms: f64) -> Self {
        Self {
            interval_ms,
            last_ms: None,
        }
    }

    /// Whether an event at `now_ms` should be forwarded.
    pub fn should_fire(&mut self, now_ms: f64) -> bool {
        match self.last_ms {
            Some(last) if now_ms - last < self.interval_ms && now_ms >= last => false,
            _ => {
                self.last_ms = Some(now_ms);
                true
            }
        }
    }
}

/// Frame delta to feed the runtime. Stalls (hidden tab, debugger) become a
/// zero-length frame so they neither skew the frame rate nor fire timers.
#[inline]
pub fn frame_delta(raw_ms: f64, stall_ms: f64) -> f64 {
    if !raw_ms.is_finite() || raw_ms <= 0.0 || raw_ms > stall_ms {
        0.0
    } else {
        raw_ms
    }
}
