pub mod wheel;

pub use wheel::{Firing, TimerWheel};

use crate::reminders::ReminderKind;

/// Every periodic or one-shot task a pet session schedules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerId {
    /// Samples the animation player.
    Animation,
    /// Advances the walking pet.
    Position,
    /// Re-rolls walk/idle.
    Decision,
    Reminder(ReminderKind),
    /// Auto-hides a shown notice.
    NoticeHide(ReminderKind),
}

impl TimerId {
    /// Timers a drag suspends. Animation and reminders keep running.
    pub const MOTION: [TimerId; 2] = [TimerId::Position, TimerId::Decision];
}
