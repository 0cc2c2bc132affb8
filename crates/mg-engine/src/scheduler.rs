use std::collections::BTreeMap;

/// Handle to a scheduled timer, used for cancellation.
///
/// Tokens are handed out in increasing order, so they double as the
/// creation-order tiebreak between timers due at the same instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerToken(u64);

/// Timers requested by the variant engines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariantTimer {
    /// 100 ms breathing oscillator step.
    BreathStep,
    /// End of the breath-hold dwell.
    HoldRelease,
    /// Next highlight-on or highlight-off step of a sequence playback.
    PlaybackStep,
    /// Delay before a sequence is played back again after an attempt.
    Replay,
    /// Target relocation.
    Relocate,
    /// End of the quiz feedback window.
    NextQuestion,
}

/// What a timer does when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerAction {
    /// The master 1 Hz session countdown.
    Countdown,
    /// A timer owned by the active variant.
    Variant(VariantTimer),
}

impl TimerAction {
    /// Firing order among timers due at the same instant. Lower runs first.
    fn priority(self) -> u8 {
        match self {
            Self::Countdown => 0,
            Self::Variant(_) => 1,
        }
    }

    fn in_scope(self, scope: TimerScope) -> bool {
        match scope {
            TimerScope::Session => true,
            TimerScope::Variant => matches!(self, Self::Variant(_)),
        }
    }
}

/// Which timers a bulk cancellation covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerScope {
    /// Every outstanding timer: the countdown and all variant timers.
    Session,
    /// Only the timers requested by the active variant.
    Variant,
}

#[derive(Debug, Clone)]
struct TimerEntry {
    action: TimerAction,
    generation: u64,
    due_ms: u64,
    interval_ms: Option<u64>,
}

/// A timer that came due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Firing {
    /// The timer that fired.
    pub token: TimerToken,
    /// What the timer was armed to do.
    pub action: TimerAction,
    /// Session generation the timer was armed under.
    pub generation: u64,
    /// Virtual time at which it fired.
    pub due_ms: u64,
}

/// Single-threaded timer wheel on a virtual millisecond clock.
///
/// Nothing fires on its own: the owner advances time and drains due timers
/// one at a time with [`Scheduler::pop_due`]. Timers due at the same instant
/// form one scheduling step and come out countdown first, then in creation
/// order. Due times saturate at `u64::MAX` rather than wrapping.
#[derive(Debug, Default)]
pub struct Scheduler {
    now_ms: u64,
    next_token: u64,
    timers: BTreeMap<TimerToken, TimerEntry>,
}

impl Scheduler {
    /// Create an empty scheduler at virtual time 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time in milliseconds.
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Fire `action` every `interval_ms` (at least 1 ms), first after one interval.
    pub fn schedule_periodic(
        &mut self,
        interval_ms: u64,
        action: TimerAction,
        generation: u64,
    ) -> TimerToken {
        let interval_ms = interval_ms.max(1);
        self.insert(TimerEntry {
            action,
            generation,
            due_ms: self.now_ms.saturating_add(interval_ms),
            interval_ms: Some(interval_ms),
        })
    }

    /// Fire `action` once, `delay_ms` from now.
    pub fn schedule_once(
        &mut self,
        delay_ms: u64,
        action: TimerAction,
        generation: u64,
    ) -> TimerToken {
        self.insert(TimerEntry {
            action,
            generation,
            due_ms: self.now_ms.saturating_add(delay_ms),
            interval_ms: None,
        })
    }

    /// Cancel one timer. Returns `false` if it had already fired or been cancelled.
    pub fn cancel(&mut self, token: TimerToken) -> bool {
        self.timers.remove(&token).is_some()
    }

    /// Cancel every timer in `scope`. Returns how many were removed.
    pub fn cancel_all(&mut self, scope: TimerScope) -> usize {
        let before = self.timers.len();
        self.timers.retain(|_, entry| !entry.action.in_scope(scope));
        let removed = before - self.timers.len();
        if removed > 0 {
            tracing::debug!(?scope, removed, "cancelled timers");
        }
        removed
    }

    /// Whether `token` is still armed.
    pub fn is_scheduled(&self, token: TimerToken) -> bool {
        self.timers.contains_key(&token)
    }

    /// Number of armed timers.
    pub fn len(&self) -> usize {
        self.timers.len()
    }

    /// Returns `true` if no timer is armed.
    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Due time of the next timer to fire, if any.
    pub fn next_due_ms(&self) -> Option<u64> {
        self.timers.values().map(|e| e.due_ms).min()
    }

    /// Take the next timer due at or before `until_ms`.
    ///
    /// Moves the clock to the timer's due time. Periodic timers are re-armed
    /// one interval later and keep their token; one-shot timers are removed.
    pub fn pop_due(&mut self, until_ms: u64) -> Option<Firing> {
        let token = self
            .timers
            .iter()
            .filter(|(_, e)| e.due_ms <= until_ms)
            .min_by_key(|(token, e)| (e.due_ms, e.action.priority(), **token))
            .map(|(token, _)| *token)?;

        let entry = self.timers.get_mut(&token)?;
        let firing = Firing {
            token,
            action: entry.action,
            generation: entry.generation,
            due_ms: entry.due_ms,
        };
        match entry.interval_ms {
            Some(interval) => entry.due_ms = entry.due_ms.saturating_add(interval),
            None => {
                self.timers.remove(&token);
            }
        }
        self.now_ms = self.now_ms.max(firing.due_ms);
        Some(firing)
    }

    /// Move the clock forward to `to_ms` without firing anything.
    ///
    /// Call after draining [`Scheduler::pop_due`] for the same window.
    pub fn advance_clock(&mut self, to_ms: u64) {
        self.now_ms = self.now_ms.max(to_ms);
    }

    fn insert(&mut self, entry: TimerEntry) -> TimerToken {
        let token = TimerToken(self.next_token);
        self.next_token += 1;
        self.timers.insert(token, entry);
        token
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BREATH: TimerAction = TimerAction::Variant(VariantTimer::BreathStep);

    fn drain(scheduler: &mut Scheduler, until_ms: u64) -> Vec<Firing> {
        let mut fired = Vec::new();
        while let Some(firing) = scheduler.pop_due(until_ms) {
            fired.push(firing);
        }
        scheduler.advance_clock(until_ms);
        fired
    }

    #[test]
    fn once_fires_a_single_time() {
        let mut scheduler = Scheduler::new();
        let token = scheduler.schedule_once(500, BREATH, 1);
        assert!(drain(&mut scheduler, 499).is_empty());
        let fired = drain(&mut scheduler, 500);
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].token, token);
        assert_eq!(fired[0].due_ms, 500);
        assert!(!scheduler.is_scheduled(token));
        assert!(drain(&mut scheduler, 10_000).is_empty());
    }

    #[test]
    fn periodic_rearms() {
        let mut scheduler = Scheduler::new();
        let token = scheduler.schedule_periodic(100, BREATH, 1);
        let fired = drain(&mut scheduler, 1_000);
        assert_eq!(fired.len(), 10);
        assert!(fired.iter().all(|f| f.token == token));
        assert_eq!(fired.last().map(|f| f.due_ms), Some(1_000));
        assert!(scheduler.is_scheduled(token));
        assert_eq!(scheduler.next_due_ms(), Some(1_100));
    }

    #[test]
    fn countdown_runs_first_within_a_step() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule_periodic(500, BREATH, 1);
        scheduler.schedule_periodic(1_000, TimerAction::Countdown, 1);
        let fired = drain(&mut scheduler, 1_000);
        let actions: Vec<_> = fired.iter().map(|f| (f.due_ms, f.action)).collect();
        assert_eq!(
            actions,
            vec![
                (500, BREATH),
                (1_000, TimerAction::Countdown),
                (1_000, BREATH),
            ]
        );
    }

    #[test]
    fn same_instant_uses_creation_order() {
        let mut scheduler = Scheduler::new();
        let first = scheduler.schedule_once(
            200,
            TimerAction::Variant(VariantTimer::PlaybackStep),
            1,
        );
        let second = scheduler.schedule_once(200, BREATH, 1);
        let fired = drain(&mut scheduler, 200);
        assert_eq!(fired[0].token, first);
        assert_eq!(fired[1].token, second);
    }

    #[test]
    fn cancel_prevents_firing() {
        let mut scheduler = Scheduler::new();
        let token = scheduler.schedule_once(100, BREATH, 1);
        assert!(scheduler.cancel(token));
        assert!(!scheduler.cancel(token));
        assert!(drain(&mut scheduler, 1_000).is_empty());
    }

    #[test]
    fn cancel_all_respects_scope() {
        let mut scheduler = Scheduler::new();
        let countdown = scheduler.schedule_periodic(1_000, TimerAction::Countdown, 1);
        scheduler.schedule_periodic(100, BREATH, 1);
        scheduler.schedule_once(2_000, TimerAction::Variant(VariantTimer::HoldRelease), 1);

        assert_eq!(scheduler.cancel_all(TimerScope::Variant), 2);
        assert!(scheduler.is_scheduled(countdown));
        assert_eq!(scheduler.cancel_all(TimerScope::Session), 1);
        assert!(scheduler.is_empty());
    }

    #[test]
    fn generation_travels_with_the_firing() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule_once(10, BREATH, 7);
        let fired = drain(&mut scheduler, 10);
        assert_eq!(fired[0].generation, 7);
    }

    #[test]
    fn delays_are_relative_to_the_firing_time() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule_once(300, BREATH, 1);
        let firing = scheduler.pop_due(1_000).unwrap();
        assert_eq!(scheduler.now_ms(), 300);
        scheduler.schedule_once(500, firing.action, 1);
        assert_eq!(scheduler.next_due_ms(), Some(800));
    }

    #[test]
    fn due_times_saturate_at_end_of_clock() {
        let mut scheduler = Scheduler::new();
        scheduler.advance_clock(u64::MAX - 50);
        let once = scheduler.schedule_once(100, BREATH, 1);
        let periodic = scheduler.schedule_periodic(1_000, TimerAction::Countdown, 1);
        assert_eq!(scheduler.next_due_ms(), Some(u64::MAX));
        assert!(scheduler.pop_due(u64::MAX - 1).is_none());

        let first = scheduler.pop_due(u64::MAX).unwrap();
        assert_eq!(first.token, periodic);
        assert_eq!(first.due_ms, u64::MAX);
        assert!(scheduler.is_scheduled(periodic));
        assert_eq!(scheduler.next_due_ms(), Some(u64::MAX));

        let second = scheduler.pop_due(u64::MAX).unwrap();
        assert_eq!(second.token, periodic);
        assert!(scheduler.is_scheduled(once));
    }

    #[test]
    fn clock_never_moves_backwards() {
        let mut scheduler = Scheduler::new();
        scheduler.advance_clock(1_000);
        scheduler.advance_clock(500);
        assert_eq!(scheduler.now_ms(), 1_000);
    }
}
