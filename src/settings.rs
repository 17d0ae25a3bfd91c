//! Runtime settings
//!
//! Read from a JSON file by the native runner. Every field has a default, so a
//! partial file only overrides what it names.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{DEATH_FADE_MAX, DEATH_FADE_STEP, TICK_INTERVAL_MS};

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("cannot read settings file: {0}")]
    Io(#[from] std::io::Error),
    #[error("settings file is malformed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Game loop interval (ms)
    pub tick_interval_ms: u32,

    // === Death animation ===
    /// Fade frames added per tick while dying
    pub death_fade_step: u32,
    /// Fade frame at which the level reloads
    pub death_fade_max: u32,

    // === Audio ===
    pub muted: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tick_interval_ms: TICK_INTERVAL_MS,
            death_fade_step: DEATH_FADE_STEP,
            death_fade_max: DEATH_FADE_MAX,
            muted: false,
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Ticks a full death fade takes before the level reloads
    pub fn death_fade_ticks(&self) -> u32 {
        self.death_fade_max.div_ceil(self.death_fade_step.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let settings = Settings::from_json(r#"{ "muted": true }"#).unwrap();
        assert!(settings.muted);
        assert_eq!(settings.tick_interval_ms, TICK_INTERVAL_MS);
        assert_eq!(settings.death_fade_max, DEATH_FADE_MAX);
    }

    #[test]
    fn test_fade_ticks() {
        assert_eq!(Settings::default().death_fade_ticks(), 67);
        let instant = Settings {
            death_fade_step: 0,
            death_fade_max: 3,
            ..Default::default()
        };
        assert_eq!(instant.death_fade_ticks(), 3);
    }

    #[test]
    fn test_errors() {
        assert!(matches!(
            Settings::from_json("[1, 2"),
            Err(SettingsError::Json(_))
        ));
        assert!(matches!(
            Settings::load_from("/nonexistent/spin-doctor.json"),
            Err(SettingsError::Io(_))
        ));
    }
}
