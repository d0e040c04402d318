use orb_core::{PreferencesState, Theme, UiState};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastKind {
    Error,
    Success,
}

impl ToastKind {
    pub fn class(self) -> &'static str {
        match self {
            ToastKind::Error => "toast-error",
            ToastKind::Success => "toast-success",
        }
    }
}

/// What the toast should show for the current UI slice, if anything.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ToastView {
    pub kind: ToastKind,
    pub text: String,
    pub can_retry: bool,
}

pub fn toast_view(ui: &UiState) -> Option<ToastView> {
    if let Some(error) = ui.error() {
        return Some(ToastView {
            kind: ToastKind::Error,
            text: error.display_message().to_string(),
            can_retry: error.recoverable && error.retry_action.is_some(),
        });
    }
    ui.success().map(|text| ToastView {
        kind: ToastKind::Success,
        text: text.to_string(),
        can_retry: false,
    })
}

/// Class names for `<body>` reflecting the preferences.
pub fn body_classes(prefs: &PreferencesState) -> Vec<&'static str> {
    let mut classes = vec![match prefs.theme {
        Theme::Light => "theme-light",
        Theme::Dark => "theme-dark",
        Theme::System => "theme-system",
    }];
    if prefs.high_contrast {
        classes.push("high-contrast");
    }
    if prefs.reduce_motion {
        classes.push("reduce-motion");
    }
    classes
}

pub fn next_theme(theme: Theme) -> Theme {
    match theme {
        Theme::System => Theme::Light,
        Theme::Light => Theme::Dark,
        Theme::Dark => Theme::System,
    }
}
