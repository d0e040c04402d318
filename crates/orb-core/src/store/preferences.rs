//! Preferences slice: plain user settings, persisted across reloads.

use super::Store;
use crate::constants::{FONT_SIZE_MAX, FONT_SIZE_MIN};
use crate::error::StoreError;
use serde::{Deserialize, Serialize};
use std::rc::Rc;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferencesState {
    pub theme: Theme,
    pub font_size: u8,
    pub auto_save: bool,
    pub notifications: bool,
    #[serde(default)]
    pub reduce_motion: bool,
    #[serde(default)]
    pub high_contrast: bool,
}

impl Default for PreferencesState {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            font_size: 14,
            auto_save: true,
            notifications: true,
            reduce_motion: false,
            high_contrast: false,
        }
    }
}

impl PreferencesState {
    pub fn validate(&self) -> Result<(), StoreError> {
        if !(FONT_SIZE_MIN..=FONT_SIZE_MAX).contains(&self.font_size) {
            return Err(StoreError::invalid(
                "font_size",
                format!("{} outside {FONT_SIZE_MIN}..={FONT_SIZE_MAX}", self.font_size),
            ));
        }
        Ok(())
    }
}

impl Store {
    fn edit_preferences(
        &mut self,
        action: &'static str,
        f: impl FnOnce(&mut PreferencesState),
    ) -> bool {
        self.update(action, |s, _| {
            let mut next = (*s.preferences).clone();
            f(&mut next);
            next.validate()?;
            if next != *s.preferences {
                s.preferences = Rc::new(next);
            }
            Ok(())
        })
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.edit_preferences("set_theme", |p| p.theme = theme);
    }

    /// Rejected (and captured as an error) outside the supported range.
    pub fn set_font_size(&mut self, font_size: u8) -> bool {
        self.edit_preferences("set_font_size", |p| p.font_size = font_size)
    }

    pub fn set_auto_save(&mut self, auto_save: bool) {
        self.edit_preferences("set_auto_save", |p| p.auto_save = auto_save);
    }

    pub fn set_notifications(&mut self, notifications: bool) {
        self.edit_preferences("set_notifications", |p| p.notifications = notifications);
    }

    pub fn set_reduce_motion(&mut self, reduce_motion: bool) {
        self.edit_preferences("set_reduce_motion", |p| p.reduce_motion = reduce_motion);
    }

    pub fn set_high_contrast(&mut self, high_contrast: bool) {
        self.edit_preferences("set_high_contrast", |p| p.high_contrast = high_contrast);
    }

    pub fn reset_preferences(&mut self) {
        self.edit_preferences("reset_preferences", |p| *p = PreferencesState::default());
    }
}
