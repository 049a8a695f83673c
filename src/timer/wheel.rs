use super::TimerId;

/// One due timer handed back to the caller. The caller runs its callback to
/// completion before asking for the next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Firing {
    pub id: TimerId,
    /// When the timer was scheduled to fire.
    pub due_ms: u64,
    /// Time since this timer last fired (or was armed).
    pub elapsed_ms: u64,
}

#[derive(Debug, Clone)]
struct TimerEntry {
    id: TimerId,
    period_ms: u64,
    repeating: bool,
    /// `None` while suspended.
    next_due: Option<u64>,
    last_fired: u64,
}

/// Named timers on a virtual millisecond clock, dispatched one at a time.
///
/// Periodic timers re-arm at fixed rate (`due + period`). A timer that has
/// fallen more than a period behind fires once and re-arms from `now`, so a
/// stall never produces a burst of queued firings.
#[derive(Debug, Clone, Default)]
pub struct TimerWheel {
    // Registration order breaks ties between equal deadlines.
    entries: Vec<TimerEntry>,
}

impl TimerWheel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm (or re-arm) a repeating timer; first firing one period from `now`.
    pub fn start_periodic(&mut self, id: TimerId, period_ms: u64, now_ms: u64) {
        self.arm(id, period_ms, true, now_ms);
    }

    /// Arm (or re-arm) a timer that fires once, `delay_ms` from `now`.
    pub fn start_once(&mut self, id: TimerId, delay_ms: u64, now_ms: u64) {
        self.arm(id, delay_ms, false, now_ms);
    }

    fn arm(&mut self, id: TimerId, period_ms: u64, repeating: bool, now_ms: u64) {
        debug_assert!(period_ms > 0, "timer {id:?} armed with a zero period");
        let entry = TimerEntry {
            id,
            period_ms: period_ms.max(1),
            repeating,
            next_due: Some(now_ms + period_ms.max(1)),
            last_fired: now_ms,
        };
        match self.entries.iter_mut().find(|e| e.id == id) {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
    }

    /// Stop a timer without forgetting it. Returns false if it was not running.
    pub fn suspend(&mut self, id: TimerId) -> bool {
        match self.entries.iter_mut().find(|e| e.id == id) {
            Some(entry) if entry.next_due.is_some() => {
                entry.next_due = None;
                true
            }
            _ => false,
        }
    }

    /// Restart a suspended timer from a clean state: next firing one full
    /// period after `now`.
    pub fn resume(&mut self, id: TimerId, now_ms: u64) -> bool {
        match self.entries.iter_mut().find(|e| e.id == id) {
            Some(entry) if entry.next_due.is_none() => {
                entry.next_due = Some(now_ms + entry.period_ms);
                entry.last_fired = now_ms;
                true
            }
            _ => false,
        }
    }

    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    pub fn cancel_all(&mut self) {
        self.entries.clear();
    }

    /// Registered and not suspended.
    pub fn is_running(&self, id: TimerId) -> bool {
        self.entries
            .iter()
            .any(|e| e.id == id && e.next_due.is_some())
    }

    pub fn is_registered(&self, id: TimerId) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    pub fn running_count(&self) -> usize {
        self.entries.iter().filter(|e| e.next_due.is_some()).count()
    }

    pub fn next_deadline(&self) -> Option<u64> {
        self.entries.iter().filter_map(|e| e.next_due).min()
    }

    /// When `id` fires next; `None` if it is suspended or not registered.
    pub fn deadline(&self, id: TimerId) -> Option<u64> {
        self.entries
            .iter()
            .find(|e| e.id == id)
            .and_then(|e| e.next_due)
    }

    /// The earliest timer due at or before `now`, already re-armed (or
    /// removed, for one-shots).
    pub fn pop_due(&mut self, now_ms: u64) -> Option<Firing> {
        let (index, due_ms) = self
            .entries
            .iter()
            .enumerate()
            .filter_map(|(i, e)| e.next_due.filter(|due| *due <= now_ms).map(|due| (i, due)))
            .min_by_key(|&(_, due)| due)?;

        let entry = &mut self.entries[index];
        let firing = Firing {
            id: entry.id,
            due_ms,
            elapsed_ms: now_ms.saturating_sub(entry.last_fired),
        };

        if entry.repeating {
            let mut next = due_ms + entry.period_ms;
            if next <= now_ms {
                next = now_ms + entry.period_ms;
            }
            entry.next_due = Some(next);
            entry.last_fired = now_ms;
        } else {
            self.entries.remove(index);
        }

        Some(firing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reminders::ReminderKind;

    fn drain(wheel: &mut TimerWheel, now: u64) -> Vec<TimerId> {
        std::iter::from_fn(|| wheel.pop_due(now).map(|f| f.id)).collect()
    }

    #[test]
    fn fires_at_fixed_rate() {
        let mut wheel = TimerWheel::new();
        wheel.start_periodic(TimerId::Position, 50, 0);

        assert!(wheel.pop_due(49).is_none());
        let first = wheel.pop_due(50).unwrap();
        assert_eq!(first.elapsed_ms, 50);
        assert_eq!(wheel.next_deadline(), Some(100));

        // Late wake-up keeps the original cadence.
        let second = wheel.pop_due(103).unwrap();
        assert_eq!(second.due_ms, 100);
        assert_eq!(second.elapsed_ms, 53);
        assert_eq!(wheel.next_deadline(), Some(150));
    }

    #[test]
    fn stall_coalesces_missed_firings() {
        let mut wheel = TimerWheel::new();
        wheel.start_periodic(TimerId::Animation, 16, 0);

        let fired = drain(&mut wheel, 1_000);
        assert_eq!(fired, vec![TimerId::Animation]);
        assert_eq!(wheel.next_deadline(), Some(1_016));
    }

    #[test]
    fn earliest_deadline_first_ties_by_registration() {
        let mut wheel = TimerWheel::new();
        wheel.start_periodic(TimerId::Decision, 100, 0);
        wheel.start_periodic(TimerId::Position, 50, 0);
        wheel.start_periodic(TimerId::Animation, 100, 0);

        let fired = drain(&mut wheel, 100);
        assert_eq!(
            fired,
            vec![TimerId::Position, TimerId::Decision, TimerId::Animation]
        );
    }

    #[test]
    fn suspended_timers_build_no_backlog() {
        let mut wheel = TimerWheel::new();
        wheel.start_periodic(TimerId::Decision, 3_000, 0);
        assert!(wheel.suspend(TimerId::Decision));
        assert!(!wheel.suspend(TimerId::Decision));
        assert!(wheel.pop_due(60_000).is_none());
        assert!(wheel.is_registered(TimerId::Decision));
        assert!(!wheel.is_running(TimerId::Decision));

        assert!(wheel.resume(TimerId::Decision, 60_000));
        assert!(wheel.pop_due(62_999).is_none());
        let firing = wheel.pop_due(63_000).unwrap();
        assert_eq!(firing.elapsed_ms, 3_000);
    }

    #[test]
    fn resume_only_touches_suspended_timers() {
        let mut wheel = TimerWheel::new();
        wheel.start_periodic(TimerId::Position, 50, 0);
        assert!(!wheel.resume(TimerId::Position, 40));
        assert_eq!(wheel.next_deadline(), Some(50));
        assert!(!wheel.resume(TimerId::Decision, 40));
    }

    #[test]
    fn one_shot_fires_once_and_can_be_rearmed() {
        let kind = ReminderKind::Hydration;
        let mut wheel = TimerWheel::new();
        wheel.start_once(TimerId::NoticeHide(kind), 3_000, 0);
        wheel.start_once(TimerId::NoticeHide(kind), 3_000, 2_000);

        assert!(wheel.pop_due(3_000).is_none());
        assert_eq!(drain(&mut wheel, 5_000), vec![TimerId::NoticeHide(kind)]);
        assert!(!wheel.is_registered(TimerId::NoticeHide(kind)));
        assert_eq!(wheel.next_deadline(), None);
    }

    #[test]
    fn cancel_all_silences_everything() {
        let mut wheel = TimerWheel::new();
        wheel.start_periodic(TimerId::Animation, 16, 0);
        wheel.start_periodic(TimerId::Reminder(ReminderKind::Posture), 5_000, 0);
        assert_eq!(wheel.running_count(), 2);

        assert!(wheel.cancel(TimerId::Animation));
        assert!(!wheel.cancel(TimerId::Animation));
        wheel.cancel_all();
        assert_eq!(wheel.next_deadline(), None);
        assert!(wheel.pop_due(u64::MAX / 2).is_none());
    }
}
