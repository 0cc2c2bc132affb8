use serde::{Deserialize, Serialize};

use super::{GameVariant, VariantContext, VariantState};
use crate::scheduler::VariantTimer;

/// Oscillator step interval.
pub const STEP_MS: u64 = 100;
/// Dwell at full size before exhaling.
pub const HOLD_MS: u64 = 2_000;
/// Bubble size at rest.
pub const MIN_SIZE: f64 = 50.0;
/// Bubble size at full inhale.
pub const MAX_SIZE: f64 = 100.0;
/// Size change per step.
pub const SIZE_STEP: f64 = 2.0;

/// Where the player is in the breath cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BreathPhase {
    /// Bubble growing.
    Inhale,
    /// Bubble at full size.
    Hold,
    /// Bubble shrinking.
    Exhale,
}

impl BreathPhase {
    /// Guidance text for the phase.
    pub fn prompt(self) -> &'static str {
        match self {
            Self::Inhale => "Breathe In...",
            Self::Hold => "Hold...",
            Self::Exhale => "Breathe Out...",
        }
    }
}

/// Breathing oscillator state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreathingState {
    /// Current phase.
    pub phase: BreathPhase,
    /// Bubble size, always within `MIN_SIZE..=MAX_SIZE`.
    pub size: f64,
    /// Full inhale-hold-exhale cycles finished this session.
    pub cycles_completed: u32,
}

impl Default for BreathingState {
    fn default() -> Self {
        Self {
            phase: BreathPhase::Inhale,
            size: MIN_SIZE,
            cycles_completed: 0,
        }
    }
}

/// Paced-breathing game. Points only for a completed cycle; takes no input.
#[derive(Debug)]
pub struct BreathingGame {
    state: BreathingState,
    award: u32,
}

impl BreathingGame {
    /// Create a game that awards `award` points per completed cycle.
    pub fn new(award: u32) -> Self {
        Self {
            state: BreathingState::default(),
            award,
        }
    }

    fn step(&mut self, ctx: &mut VariantContext<'_>) {
        match self.state.phase {
            BreathPhase::Inhale => {
                self.state.size = (self.state.size + SIZE_STEP).min(MAX_SIZE);
                if self.state.size >= MAX_SIZE {
                    self.state.phase = BreathPhase::Hold;
                    ctx.schedule_once(HOLD_MS, VariantTimer::HoldRelease);
                }
            }
            BreathPhase::Hold => {}
            BreathPhase::Exhale => {
                self.state.size = (self.state.size - SIZE_STEP).max(MIN_SIZE);
                if self.state.size <= MIN_SIZE {
                    self.state.phase = BreathPhase::Inhale;
                    self.state.cycles_completed += 1;
                    ctx.award(self.award);
                    tracing::debug!(cycles = self.state.cycles_completed, "breath cycle completed");
                }
            }
        }
    }
}

impl GameVariant for BreathingGame {
    fn name(&self) -> &str {
        "breathing"
    }

    fn initialize(&mut self, ctx: &mut VariantContext<'_>) {
        self.state = BreathingState::default();
        ctx.schedule_periodic(STEP_MS, VariantTimer::BreathStep);
    }

    fn on_timer(&mut self, timer: VariantTimer, ctx: &mut VariantContext<'_>) {
        match timer {
            VariantTimer::BreathStep => self.step(ctx),
            VariantTimer::HoldRelease if self.state.phase == BreathPhase::Hold => {
                self.state.phase = BreathPhase::Exhale;
            }
            _ => {}
        }
    }

    fn state(&self) -> VariantState {
        VariantState::Breathing(self.state.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variant::GameInput;
    use crate::variant::test_support::Harness;

    fn harness() -> Harness<BreathingGame> {
        Harness::new(BreathingGame::new(5))
    }

    fn state(h: &Harness<BreathingGame>) -> BreathingState {
        h.game.state.clone()
    }

    #[test]
    fn inhale_reaches_hold_after_25_steps() {
        let mut h = harness();
        h.advance(2_400);
        assert_eq!(state(&h).phase, BreathPhase::Inhale);
        assert!((state(&h).size - 98.0).abs() < f64::EPSILON);
        h.advance(100);
        assert_eq!(state(&h).phase, BreathPhase::Hold);
        assert!((state(&h).size - MAX_SIZE).abs() < f64::EPSILON);
    }

    #[test]
    fn hold_lasts_two_seconds() {
        let mut h = harness();
        h.advance(2_500);
        h.advance(1_999);
        assert_eq!(state(&h).phase, BreathPhase::Hold);
        h.advance(1);
        assert_eq!(state(&h).phase, BreathPhase::Exhale);
        assert!((state(&h).size - MAX_SIZE).abs() < f64::EPSILON);
    }

    #[test]
    fn full_cycle_awards_once() {
        let mut h = harness();
        h.advance(6_900);
        assert_eq!(h.score, 0);
        assert_eq!(state(&h).phase, BreathPhase::Exhale);
        h.advance(100);
        assert_eq!(h.score, 5);
        assert_eq!(state(&h).phase, BreathPhase::Inhale);
        assert_eq!(state(&h).cycles_completed, 1);
        assert!((state(&h).size - MIN_SIZE).abs() < f64::EPSILON);
    }

    #[test]
    fn second_cycle_takes_another_seven_seconds() {
        let mut h = harness();
        h.advance(7_000);
        h.advance(6_900);
        assert_eq!(h.score, 5);
        h.advance(100);
        assert_eq!(h.score, 10);
        assert_eq!(state(&h).cycles_completed, 2);
    }

    #[test]
    fn size_stays_in_bounds() {
        let mut h = harness();
        for _ in 0..300 {
            h.advance(100);
            let size = state(&h).size;
            assert!((MIN_SIZE..=MAX_SIZE).contains(&size), "size {size} out of bounds");
        }
    }

    #[test]
    fn ignores_input() {
        let mut h = harness();
        assert!(!h.input(&GameInput::Hit));
        assert_eq!(h.score, 0);
    }

    #[test]
    fn stray_release_outside_hold_is_ignored() {
        let mut h = harness();
        h.fire(VariantTimer::HoldRelease);
        assert_eq!(state(&h).phase, BreathPhase::Inhale);
    }
}
