use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

use crate::motion::MotionConfig;
use crate::reminders::{ReminderConfig, ReminderKind};

pub const MIN_SPRITE_SIZE: u32 = 16;
pub const MAX_SPRITE_SIZE: u32 = 256;
pub const MIN_TRAVEL_WIDTH: i32 = 100;
pub const MAX_TRAVEL_WIDTH: i32 = 9999;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartPosition {
    pub x: i32,
    pub y: i32,
}

impl Default for StartPosition {
    fn default() -> Self {
        Self { x: 500, y: 500 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReminderSettings {
    pub hydration: ReminderConfig,
    pub posture: ReminderConfig,
}

impl Default for ReminderSettings {
    fn default() -> Self {
        Self {
            hydration: ReminderConfig::default(),
            posture: ReminderConfig {
                enabled: false,
                interval_seconds: 1200,
            },
        }
    }
}

impl ReminderSettings {
    pub fn get(&self, kind: ReminderKind) -> ReminderConfig {
        match kind {
            ReminderKind::Hydration => self.hydration,
            ReminderKind::Posture => self.posture,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (ReminderKind, ReminderConfig)> + '_ {
        ReminderKind::ALL.into_iter().map(|kind| (kind, self.get(kind)))
    }
}

/// Everything the configuration dialog hands to a pet session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PetSettings {
    /// Display size of the sprite in pixels (square).
    pub sprite_size: u32,
    /// Width of the range the pet wanders in, centred on its anchor.
    pub travel_width: i32,
    pub start_position: StartPosition,
    pub motion: MotionConfig,
    pub reminders: ReminderSettings,
}

impl Default for PetSettings {
    fn default() -> Self {
        Self {
            sprite_size: 64,
            travel_width: 500,
            start_position: StartPosition::default(),
            motion: MotionConfig::default(),
            reminders: ReminderSettings::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("travel width {0} is outside 100..=9999 pixels")]
    TravelWidthOutOfRange(i32),

    #[error("{kind} reminder interval {seconds}s is outside 5..=3600 seconds")]
    IntervalOutOfRange { kind: ReminderKind, seconds: u32 },

    #[error("motion setting `{field}` must be positive")]
    NonPositiveMotion { field: &'static str },
}

impl PetSettings {
    /// Read settings from `path`, falling back to defaults when the file does
    /// not exist. The result is validated.
    pub fn load(path: &Path) -> Result<Self> {
        let settings = if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse settings in {}", path.display()))?
        } else {
            log::info!("No settings at {}, using defaults", path.display());
            PetSettings::default()
        };

        settings
            .validated()
            .with_context(|| format!("Invalid settings in {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let serialized = serde_json::to_string_pretty(self)?;
        fs::write(path, serialized)
            .with_context(|| format!("Failed to write settings to {}", path.display()))
    }

    /// Clamp the sprite size into range and reject everything else that is
    /// out of range.
    pub fn validated(mut self) -> Result<Self, SettingsError> {
        let clamped = self.sprite_size.clamp(MIN_SPRITE_SIZE, MAX_SPRITE_SIZE);
        if clamped != self.sprite_size {
            log::warn!("Sprite size {} clamped to {}", self.sprite_size, clamped);
            self.sprite_size = clamped;
        }

        if !(MIN_TRAVEL_WIDTH..=MAX_TRAVEL_WIDTH).contains(&self.travel_width) {
            return Err(SettingsError::TravelWidthOutOfRange(self.travel_width));
        }

        for (kind, config) in self.reminders.iter() {
            // Disabled reminders never schedule, so their interval is moot.
            if config.enabled && !config.interval_in_range() {
                return Err(SettingsError::IntervalOutOfRange {
                    kind,
                    seconds: config.interval_seconds,
                });
            }
        }

        if self.motion.decision_interval_ms == 0 {
            return Err(SettingsError::NonPositiveMotion {
                field: "decision_interval_ms",
            });
        }
        if self.motion.position_interval_ms == 0 {
            return Err(SettingsError::NonPositiveMotion {
                field: "position_interval_ms",
            });
        }
        if self.motion.step <= 0 {
            return Err(SettingsError::NonPositiveMotion { field: "step" });
        }

        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = PetSettings::load(&dir.path().join("settings.json")).unwrap();
        assert_eq!(settings, PetSettings::default());
        assert!(!settings.reminders.hydration.enabled);
        assert_eq!(settings.reminders.hydration.interval_seconds, 300);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(
            &path,
            r#"{ "travel_width": 800, "reminders": { "hydration": { "enabled": true, "interval_seconds": 60 } } }"#,
        )
        .unwrap();

        let settings = PetSettings::load(&path).unwrap();
        assert_eq!(settings.travel_width, 800);
        assert_eq!(settings.sprite_size, 64);
        assert_eq!(
            settings.reminders.hydration,
            ReminderConfig::enabled_every(60)
        );
        assert_eq!(settings.motion, MotionConfig::default());
    }

    #[test]
    fn save_then_load_is_identity() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let mut settings = PetSettings::default();
        settings.sprite_size = 128;
        settings.reminders.posture = ReminderConfig::enabled_every(900);

        settings.save(&path).unwrap();
        assert_eq!(PetSettings::load(&path).unwrap(), settings);
    }

    #[test]
    fn sprite_size_is_clamped() {
        let settings = PetSettings {
            sprite_size: 4000,
            ..PetSettings::default()
        };
        assert_eq!(settings.validated().unwrap().sprite_size, MAX_SPRITE_SIZE);

        let settings = PetSettings {
            sprite_size: 1,
            ..PetSettings::default()
        };
        assert_eq!(settings.validated().unwrap().sprite_size, MIN_SPRITE_SIZE);
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let narrow = PetSettings {
            travel_width: 20,
            ..PetSettings::default()
        };
        assert_eq!(
            narrow.validated().unwrap_err(),
            SettingsError::TravelWidthOutOfRange(20)
        );

        let mut hasty = PetSettings::default();
        hasty.reminders.posture = ReminderConfig::enabled_every(2);
        assert_eq!(
            hasty.validated().unwrap_err(),
            SettingsError::IntervalOutOfRange {
                kind: ReminderKind::Posture,
                seconds: 2
            }
        );

        let mut frozen = PetSettings::default();
        frozen.motion.step = 0;
        assert!(frozen.validated().is_err());
    }

    #[test]
    fn disabled_reminder_interval_is_not_checked() {
        let mut settings = PetSettings::default();
        settings.reminders.hydration = ReminderConfig {
            enabled: false,
            interval_seconds: 0,
        };
        assert!(settings.validated().is_ok());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ not json").unwrap();
        let err = PetSettings::load(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse settings"));
    }
}
