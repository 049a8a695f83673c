use std::collections::{BTreeMap, BTreeSet};

use crate::timer::{TimerId, TimerWheel};

use super::{ReminderConfig, ReminderKind, NOTICE_VISIBLE_MS};

/// One independent periodic timer per enabled reminder, plus bookkeeping of
/// which notices are currently up.
#[derive(Debug, Clone, Default)]
pub struct ReminderScheduler {
    configs: BTreeMap<ReminderKind, ReminderConfig>,
    visible: BTreeSet<ReminderKind>,
    fire_counts: BTreeMap<ReminderKind, u64>,
}

impl ReminderScheduler {
    pub fn new(configs: impl IntoIterator<Item = (ReminderKind, ReminderConfig)>) -> Self {
        let configs: BTreeMap<_, _> = configs.into_iter().collect();
        for (kind, config) in &configs {
            debug_assert!(
                !config.enabled || config.interval_in_range(),
                "{kind} reminder interval {}s out of range",
                config.interval_seconds
            );
        }
        Self {
            configs,
            ..Self::default()
        }
    }

    /// Arm a timer for every enabled reminder. Disabled ones get none.
    pub fn schedule(&self, timers: &mut TimerWheel, now_ms: u64) {
        for kind in self.enabled_kinds() {
            let interval_ms = self.configs[&kind].interval_ms();
            timers.start_periodic(TimerId::Reminder(kind), interval_ms, now_ms);
        }
    }

    pub fn enabled_kinds(&self) -> impl Iterator<Item = ReminderKind> + '_ {
        self.configs
            .iter()
            .filter(|(_, config)| config.enabled)
            .map(|(kind, _)| *kind)
    }

    pub fn config(&self, kind: ReminderKind) -> Option<&ReminderConfig> {
        self.configs.get(&kind)
    }

    /// A reminder timer fired. The notice is (re)shown and its auto-hide
    /// countdown restarts; nothing is queued or de-duplicated.
    pub fn on_fire(&mut self, kind: ReminderKind, timers: &mut TimerWheel, now_ms: u64) {
        *self.fire_counts.entry(kind).or_default() += 1;
        self.visible.insert(kind);
        timers.start_once(TimerId::NoticeHide(kind), NOTICE_VISIBLE_MS, now_ms);
    }

    /// The auto-hide countdown ran out. Returns false if it was not showing.
    pub fn on_hide(&mut self, kind: ReminderKind) -> bool {
        self.visible.remove(&kind)
    }

    /// Forget every visible notice, returning what was showing.
    pub fn take_visible(&mut self) -> Vec<ReminderKind> {
        std::mem::take(&mut self.visible).into_iter().collect()
    }

    pub fn visible(&self) -> impl Iterator<Item = ReminderKind> + '_ {
        self.visible.iter().copied()
    }

    pub fn is_visible(&self, kind: ReminderKind) -> bool {
        self.visible.contains(&kind)
    }

    pub fn fire_count(&self, kind: ReminderKind) -> u64 {
        self.fire_counts.get(&kind).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scheduler() -> ReminderScheduler {
        ReminderScheduler::new([
            (ReminderKind::Hydration, ReminderConfig::enabled_every(5)),
            (
                ReminderKind::Posture,
                ReminderConfig {
                    enabled: false,
                    interval_seconds: 10,
                },
            ),
        ])
    }

    #[test]
    fn only_enabled_reminders_get_timers() {
        let mut timers = TimerWheel::new();
        scheduler().schedule(&mut timers, 0);

        assert!(timers.is_running(TimerId::Reminder(ReminderKind::Hydration)));
        assert!(!timers.is_registered(TimerId::Reminder(ReminderKind::Posture)));
        assert_eq!(timers.next_deadline(), Some(5_000));
    }

    #[test]
    fn firing_shows_notice_and_arms_hide() {
        let mut timers = TimerWheel::new();
        let mut reminders = scheduler();
        reminders.on_fire(ReminderKind::Hydration, &mut timers, 5_000);

        assert!(reminders.is_visible(ReminderKind::Hydration));
        assert_eq!(reminders.fire_count(ReminderKind::Hydration), 1);
        assert_eq!(timers.next_deadline(), Some(8_000));

        assert!(reminders.on_hide(ReminderKind::Hydration));
        assert!(!reminders.on_hide(ReminderKind::Hydration));
    }

    #[test]
    fn refiring_while_visible_restarts_hide_countdown() {
        let mut timers = TimerWheel::new();
        let mut reminders = scheduler();
        reminders.on_fire(ReminderKind::Hydration, &mut timers, 5_000);
        reminders.on_fire(ReminderKind::Hydration, &mut timers, 7_000);

        assert_eq!(reminders.fire_count(ReminderKind::Hydration), 2);
        assert_eq!(timers.next_deadline(), Some(10_000));
        assert_eq!(reminders.visible().count(), 1);
    }
}
