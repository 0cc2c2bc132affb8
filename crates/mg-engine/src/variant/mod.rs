//! The variant engines and the contract the session controller drives them through.

/// Breathing oscillator.
pub mod breathing;
/// Sequence memory.
pub mod memory;
/// Emotion classification quiz.
pub mod quiz;
/// Moving target tracker.
pub mod target;

use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::error::{GameError, GameResult};
use crate::scheduler::{Scheduler, TimerAction, TimerToken, VariantTimer};

pub use breathing::{BreathPhase, BreathingGame, BreathingState};
pub use memory::{MemoryGame, MemoryState, Symbol};
pub use quiz::{QuizGame, QuizState, Stimulus, Valence};
pub use target::{Position, TargetGame, TargetState};

/// One game's behaviour inside a session.
///
/// The controller calls [`GameVariant::initialize`] once when a session starts,
/// then routes every variant timer and every accepted input here. A variant
/// never touches the session score directly: it requests points through
/// [`VariantContext::award`] and the controller decides whether they land.
pub trait GameVariant: std::fmt::Debug + Send {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Reset private state for a fresh session and arm any timers.
    fn initialize(&mut self, ctx: &mut VariantContext<'_>);

    /// Handle one of this variant's timers.
    fn on_timer(&mut self, timer: VariantTimer, ctx: &mut VariantContext<'_>);

    /// Handle player input. Returns `false` if the input was ignored.
    fn on_input(&mut self, _input: &GameInput, _ctx: &mut VariantContext<'_>) -> bool {
        false
    }

    /// Read-only copy of the current state for rendering.
    fn state(&self) -> VariantState;
}

/// Mutable context lent to a variant for one initialize, timer or input call.
pub struct VariantContext<'a> {
    scheduler: &'a mut Scheduler,
    /// Seeded RNG shared by the session.
    pub rng: &'a mut StdRng,
    generation: u64,
    awarded: u32,
}

impl<'a> VariantContext<'a> {
    pub(crate) fn new(scheduler: &'a mut Scheduler, rng: &'a mut StdRng, generation: u64) -> Self {
        Self {
            scheduler,
            rng,
            generation,
            awarded: 0,
        }
    }

    /// Arm a one-shot variant timer.
    pub fn schedule_once(&mut self, delay_ms: u64, timer: VariantTimer) -> TimerToken {
        self.scheduler
            .schedule_once(delay_ms, TimerAction::Variant(timer), self.generation)
    }

    /// Arm a periodic variant timer.
    pub fn schedule_periodic(&mut self, interval_ms: u64, timer: VariantTimer) -> TimerToken {
        self.scheduler
            .schedule_periodic(interval_ms, TimerAction::Variant(timer), self.generation)
    }

    /// Request points for the session score.
    pub fn award(&mut self, points: u32) {
        self.awarded = self.awarded.saturating_add(points);
    }

    /// Points requested so far during this call.
    pub fn awarded(&self) -> u32 {
        self.awarded
    }
}

/// Snapshot of a variant's private state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "variant", rename_all = "snake_case")]
pub enum VariantState {
    /// Breathing oscillator state.
    Breathing(BreathingState),
    /// Sequence memory state.
    Memory(MemoryState),
    /// Target tracker state.
    Target(TargetState),
    /// Quiz state.
    Quiz(QuizState),
}

impl VariantState {
    /// The line of guidance a frontend shows above the playfield.
    pub fn prompt(&self) -> String {
        match self {
            Self::Breathing(s) => s.phase.prompt().to_string(),
            Self::Memory(s) if s.is_playing_back || s.awaiting_replay => {
                "Watch the sequence...".to_string()
            }
            Self::Memory(s) => format!(
                "Repeat the sequence ({}/{})",
                s.user_input.len(),
                s.target_sequence.len()
            ),
            Self::Target(s) => format!("Click the moving target! Hits: {}", s.hit_count),
            Self::Quiz(s) => match &s.feedback {
                Some(feedback) => feedback.clone(),
                None => format!("What emotion is this? {}", s.stimulus),
            },
        }
    }
}

/// Player input, shaped by the active variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum GameInput {
    /// A memory pad press.
    Symbol(Symbol),
    /// A click on the tracked target.
    Hit,
    /// A quiz answer.
    Choice(String),
}

impl GameInput {
    /// Parse a text command: `hit`, a pad number `1`-`4`, or a quiz label.
    pub fn parse(text: &str) -> GameResult<Self> {
        let text = text.trim();
        if text.is_empty() {
            return Err(GameError::InvalidInput("empty input".into()));
        }
        if text.eq_ignore_ascii_case("hit") {
            return Ok(Self::Hit);
        }
        if text.bytes().all(|b| b.is_ascii_digit()) {
            return text
                .parse::<u8>()
                .ok()
                .and_then(Symbol::new)
                .map(Self::Symbol)
                .ok_or_else(|| {
                    GameError::InvalidInput(format!(
                        "pad {text} out of range 1-{}",
                        memory::ALPHABET_SIZE
                    ))
                });
        }
        Ok(Self::Choice(text.to_string()))
    }
}

impl std::fmt::Display for GameInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Symbol(s) => write!(f, "pad {s}"),
            Self::Hit => write!(f, "hit"),
            Self::Choice(label) => write!(f, "\"{label}\""),
        }
    }
}


#[cfg(test)]
pub(crate) mod test_support {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::{GameInput, GameVariant, VariantContext};
    use crate::scheduler::{Scheduler, TimerAction, VariantTimer};

    /// Drives a single variant without a session controller.
    pub(crate) struct Harness<G> {
        pub(crate) game: G,
        pub(crate) scheduler: Scheduler,
        pub(crate) rng: StdRng,
        pub(crate) score: u32,
    }

    impl<G: GameVariant> Harness<G> {
        pub(crate) fn new(game: G) -> Self {
            Self::with_seed(game, 42)
        }

        pub(crate) fn with_seed(game: G, seed: u64) -> Self {
            let mut harness = Self {
                game,
                scheduler: Scheduler::new(),
                rng: StdRng::seed_from_u64(seed),
                score: 0,
            };
            let mut ctx = VariantContext::new(&mut harness.scheduler, &mut harness.rng, 1);
            harness.game.initialize(&mut ctx);
            harness.score += ctx.awarded();
            harness
        }

        pub(crate) fn advance(&mut self, ms: u64) {
            let until = self.scheduler.now_ms() + ms;
            while let Some(firing) = self.scheduler.pop_due(until) {
                if let TimerAction::Variant(timer) = firing.action {
                    self.fire(timer);
                }
            }
            self.scheduler.advance_clock(until);
        }

        pub(crate) fn fire(&mut self, timer: VariantTimer) {
            let mut ctx = VariantContext::new(&mut self.scheduler, &mut self.rng, 1);
            self.game.on_timer(timer, &mut ctx);
            self.score += ctx.awarded();
        }

        pub(crate) fn input(&mut self, input: &GameInput) -> bool {
            let mut ctx = VariantContext::new(&mut self.scheduler, &mut self.rng, 1);
            let accepted = self.game.on_input(input, &mut ctx);
            self.score += ctx.awarded();
            accepted
        }
    }
}
