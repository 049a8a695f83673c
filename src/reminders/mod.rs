pub mod scheduler;

pub use scheduler::ReminderScheduler;

use std::fmt;

use serde::{Deserialize, Serialize};

/// Shortest reminder interval the configuration accepts, in seconds.
pub const MIN_INTERVAL_SECS: u32 = 5;
/// Longest reminder interval the configuration accepts, in seconds.
pub const MAX_INTERVAL_SECS: u32 = 3600;
/// How long a notice stays up before hiding itself.
pub const NOTICE_VISIBLE_MS: u64 = 3000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderKind {
    Hydration,
    Posture,
}

impl ReminderKind {
    pub const ALL: [ReminderKind; 2] = [ReminderKind::Hydration, ReminderKind::Posture];

    /// Text the notice window shows.
    pub fn message(self) -> &'static str {
        match self {
            ReminderKind::Hydration => "Hydration check!",
            ReminderKind::Posture => "Posture check!",
        }
    }
}

impl fmt::Display for ReminderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReminderKind::Hydration => f.write_str("hydration"),
            ReminderKind::Posture => f.write_str("posture"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReminderConfig {
    pub enabled: bool,
    pub interval_seconds: u32,
}

impl ReminderConfig {
    pub fn enabled_every(interval_seconds: u32) -> Self {
        Self {
            enabled: true,
            interval_seconds,
        }
    }

    pub fn interval_ms(&self) -> u64 {
        u64::from(self.interval_seconds) * 1000
    }

    pub fn interval_in_range(&self) -> bool {
        (MIN_INTERVAL_SECS..=MAX_INTERVAL_SECS).contains(&self.interval_seconds)
    }
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            interval_seconds: 300,
        }
    }
}
