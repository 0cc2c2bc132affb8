use rand::Rng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use super::{GameInput, GameVariant, VariantContext, VariantState};
use crate::scheduler::VariantTimer;

/// Number of pads.
pub const ALPHABET_SIZE: u8 = 4;
/// Length of the first sequence in a session.
pub const INITIAL_LENGTH: usize = 3;
/// How long a pad stays lit during playback.
pub const PULSE_MS: u64 = 500;
/// Dark gap after each lit pad.
pub const GAP_MS: u64 = 500;
/// Pause between an attempt and the next playback.
pub const REPLAY_DELAY_MS: u64 = 1_000;

/// A memory pad, numbered `1..=ALPHABET_SIZE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Symbol(u8);

impl Symbol {
    /// Pad `n`, if it exists.
    pub fn new(n: u8) -> Option<Self> {
        (1..=ALPHABET_SIZE).contains(&n).then_some(Self(n))
    }

    /// All pads in order.
    pub fn all() -> impl Iterator<Item = Self> + Clone {
        (1..=ALPHABET_SIZE).map(Self)
    }

    /// Uniformly random pad.
    pub fn random(rng: &mut StdRng) -> Self {
        Self(rng.random_range(1..=ALPHABET_SIZE))
    }

    /// Pad number.
    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Symbol {
    type Error = String;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        Self::new(n).ok_or_else(|| format!("pad {n} out of range 1-{ALPHABET_SIZE}"))
    }
}

impl From<Symbol> for u8 {
    fn from(symbol: Symbol) -> Self {
        symbol.0
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Sequence memory state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryState {
    /// The sequence to repeat. Grows by one on every correct attempt.
    pub target_sequence: Vec<Symbol>,
    /// Pads pressed so far in the current attempt.
    pub user_input: Vec<Symbol>,
    /// Playback in progress; input is ignored.
    pub is_playing_back: bool,
    /// Pad lit right now during playback.
    pub highlighted: Option<Symbol>,
    /// An attempt just ended and a playback is pending; input is ignored.
    pub awaiting_replay: bool,
}

/// Simon-style sequence game.
///
/// Playback walks the sequence as strictly alternating pulse and gap steps,
/// each one armed only when the previous one fires.
#[derive(Debug)]
pub struct MemoryGame {
    state: MemoryState,
    award: u32,
    cursor: usize,
}

impl MemoryGame {
    /// Create a game that awards `award` points per correct sequence.
    pub fn new(award: u32) -> Self {
        Self {
            state: MemoryState::default(),
            award,
            cursor: 0,
        }
    }

    fn begin_playback(&mut self, ctx: &mut VariantContext<'_>) {
        self.state.awaiting_replay = false;
        self.state.is_playing_back = true;
        self.cursor = 0;
        self.state.highlighted = self.state.target_sequence.first().copied();
        if self.state.highlighted.is_some() {
            ctx.schedule_once(PULSE_MS, VariantTimer::PlaybackStep);
        } else {
            self.state.is_playing_back = false;
        }
    }

    fn playback_step(&mut self, ctx: &mut VariantContext<'_>) {
        if !self.state.is_playing_back {
            return;
        }
        if self.state.highlighted.take().is_some() {
            self.cursor += 1;
            ctx.schedule_once(GAP_MS, VariantTimer::PlaybackStep);
        } else if let Some(&next) = self.state.target_sequence.get(self.cursor) {
            self.state.highlighted = Some(next);
            ctx.schedule_once(PULSE_MS, VariantTimer::PlaybackStep);
        } else {
            self.state.is_playing_back = false;
            tracing::debug!(len = self.state.target_sequence.len(), "playback finished");
        }
    }

    fn press(&mut self, symbol: Symbol, ctx: &mut VariantContext<'_>) {
        self.state.user_input.push(symbol);
        if self.state.user_input.len() < self.state.target_sequence.len() {
            return;
        }

        if self.state.user_input == self.state.target_sequence {
            ctx.award(self.award);
            self.state.target_sequence.push(Symbol::random(ctx.rng));
            tracing::debug!(
                len = self.state.target_sequence.len(),
                "sequence matched"
            );
        } else {
            tracing::debug!("sequence mismatch");
        }
        self.state.user_input.clear();
        self.state.awaiting_replay = true;
        ctx.schedule_once(REPLAY_DELAY_MS, VariantTimer::Replay);
    }
}

impl GameVariant for MemoryGame {
    fn name(&self) -> &str {
        "memory"
    }

    fn initialize(&mut self, ctx: &mut VariantContext<'_>) {
        self.state = MemoryState {
            target_sequence: (0..INITIAL_LENGTH)
                .map(|_| Symbol::random(ctx.rng))
                .collect(),
            ..MemoryState::default()
        };
        self.begin_playback(ctx);
    }

    fn on_timer(&mut self, timer: VariantTimer, ctx: &mut VariantContext<'_>) {
        match timer {
            VariantTimer::PlaybackStep => self.playback_step(ctx),
            VariantTimer::Replay if self.state.awaiting_replay => self.begin_playback(ctx),
            _ => {}
        }
    }

    fn on_input(&mut self, input: &GameInput, ctx: &mut VariantContext<'_>) -> bool {
        let GameInput::Symbol(symbol) = input else {
            return false;
        };
        if self.state.is_playing_back || self.state.awaiting_replay {
            return false;
        }
        self.press(*symbol, ctx);
        true
    }

    fn state(&self) -> VariantState {
        VariantState::Memory(self.state.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variant::test_support::Harness;

    /// Full playback of a sequence of `len` pads.
    fn playback_ms(len: usize) -> u64 {
        len as u64 * (PULSE_MS + GAP_MS)
    }

    fn harness() -> Harness<MemoryGame> {
        Harness::new(MemoryGame::new(10))
    }

    fn press_all(h: &mut Harness<MemoryGame>, symbols: &[Symbol]) {
        for symbol in symbols {
            assert!(h.input(&GameInput::Symbol(*symbol)));
        }
    }

    fn wrong_sequence(target: &[Symbol]) -> Vec<Symbol> {
        let mut wrong = target.to_vec();
        let last = wrong.len() - 1;
        wrong[last] = Symbol::new(wrong[last].value() % ALPHABET_SIZE + 1).unwrap();
        wrong
    }

    #[test]
    fn symbol_bounds() {
        assert!(Symbol::new(0).is_none());
        assert!(Symbol::new(5).is_none());
        assert_eq!(Symbol::all().count(), 4);
        assert_eq!(Symbol::new(4).map(Symbol::value), Some(4));
    }

    #[test]
    fn initial_sequence_has_three_valid_symbols() {
        let h = harness();
        assert_eq!(h.game.state.target_sequence.len(), INITIAL_LENGTH);
        assert!(h.game.state.user_input.is_empty());
        assert!(h.game.state.is_playing_back);
        assert_eq!(
            h.game.state.highlighted,
            h.game.state.target_sequence.first().copied()
        );
    }

    #[test]
    fn playback_alternates_pulse_and_gap() {
        let mut h = harness();
        let sequence = h.game.state.target_sequence.clone();
        for (i, symbol) in sequence.iter().enumerate() {
            assert_eq!(h.game.state.highlighted, Some(*symbol), "pulse {i}");
            h.advance(PULSE_MS);
            assert_eq!(h.game.state.highlighted, None, "gap {i}");
            assert!(h.game.state.is_playing_back);
            h.advance(GAP_MS);
        }
        assert!(!h.game.state.is_playing_back);
    }

    #[test]
    fn input_ignored_during_playback() {
        let mut h = harness();
        h.advance(playback_ms(3) - 1);
        assert!(!h.input(&GameInput::Symbol(Symbol::new(1).unwrap())));
        assert!(h.game.state.user_input.is_empty());
        h.advance(1);
        assert!(h.input(&GameInput::Symbol(Symbol::new(1).unwrap())));
        assert_eq!(h.game.state.user_input.len(), 1);
    }

    #[test]
    fn correct_sequence_grows_by_one_and_awards() {
        let mut h = harness();
        h.advance(playback_ms(3));
        let target = h.game.state.target_sequence.clone();
        press_all(&mut h, &target);

        assert_eq!(h.score, 10);
        assert_eq!(h.game.state.target_sequence.len(), 4);
        assert_eq!(&h.game.state.target_sequence[..3], &target[..]);
        assert!(h.game.state.user_input.is_empty());
        assert!(h.game.state.awaiting_replay);
    }

    #[test]
    fn wrong_sequence_keeps_length_and_score() {
        let mut h = harness();
        h.advance(playback_ms(3));
        let target = h.game.state.target_sequence.clone();
        press_all(&mut h, &wrong_sequence(&target));

        assert_eq!(h.score, 0);
        assert_eq!(h.game.state.target_sequence, target);
        assert!(h.game.state.user_input.is_empty());
    }

    #[test]
    fn replay_starts_after_delay() {
        let mut h = harness();
        h.advance(playback_ms(3));
        let target = h.game.state.target_sequence.clone();
        press_all(&mut h, &target);

        assert!(!h.input(&GameInput::Symbol(Symbol::new(2).unwrap())));
        h.advance(REPLAY_DELAY_MS - 1);
        assert!(!h.game.state.is_playing_back);
        h.advance(1);
        assert!(h.game.state.is_playing_back);
        assert!(!h.game.state.awaiting_replay);
        assert_eq!(
            h.game.state.highlighted,
            h.game.state.target_sequence.first().copied()
        );
        h.advance(playback_ms(4));
        assert!(!h.game.state.is_playing_back);
    }

    #[test]
    fn user_input_never_exceeds_target() {
        let mut h = harness();
        for _ in 0..5 {
            h.advance(playback_ms(h.game.state.target_sequence.len()));
            for symbol in Symbol::all().cycle().take(10) {
                h.input(&GameInput::Symbol(symbol));
                assert!(h.game.state.user_input.len() <= h.game.state.target_sequence.len());
            }
            h.advance(REPLAY_DELAY_MS);
        }
    }

    #[test]
    fn other_inputs_ignored() {
        let mut h = harness();
        h.advance(playback_ms(3));
        assert!(!h.input(&GameInput::Hit));
        assert!(!h.input(&GameInput::Choice("Happy".into())));
        assert!(h.game.state.user_input.is_empty());
    }

    #[test]
    fn same_seed_same_sequence() {
        let a = Harness::with_seed(MemoryGame::new(10), 9);
        let b = Harness::with_seed(MemoryGame::new(10), 9);
        assert_eq!(a.game.state.target_sequence, b.game.state.target_sequence);
    }
}
