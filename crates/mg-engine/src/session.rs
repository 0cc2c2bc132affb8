//! Session lifecycle: one timed play-through at a time.
//!
//! ```text
//! Ready -> Playing -> Finished
//!   ^         |          |
//!   +---------+----------+   reset / close / switching games
//! ```
//!
//! The controller owns the scheduler, the RNG and the active variant. Hosts
//! advance virtual time with [`SessionController::advance`]; every timer due
//! in that window fires in order and the master countdown always runs first
//! within a scheduling step, so a finish at that instant beats any
//! variant award landing at the same instant.

use chrono::Utc;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::catalog::{GameDefinition, GameId};
use crate::config::EngineConfig;
use crate::error::{GameError, GameResult};
use crate::event::{EventLog, GameFinished, SessionEvent, SessionEventKind};
use crate::registry::GameRegistry;
use crate::scheduler::{Firing, Scheduler, TimerAction, TimerScope};
use crate::variant::{GameInput, GameVariant, VariantContext, VariantState};

/// Master countdown interval.
pub const COUNTDOWN_MS: u64 = 1_000;

/// Session lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    /// Waiting for `start`.
    Ready,
    /// Countdown running, input accepted.
    Playing,
    /// Countdown reached zero; frozen until reset.
    Finished,
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ready => write!(f, "ready"),
            Self::Playing => write!(f, "playing"),
            Self::Finished => write!(f, "finished"),
        }
    }
}

/// The active play-through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSession {
    /// Selected game, if any.
    pub game_id: Option<GameId>,
    /// Lifecycle state.
    pub state: SessionState,
    /// Points earned this session. Never decreases while playing.
    pub score: u32,
    /// Seconds left on the countdown.
    pub remaining_secs: u32,
    /// Full session length in seconds.
    pub duration_secs: u32,
    /// Bumped on every start and reset; timers armed under an older value are stale.
    pub generation: u64,
}

impl GameSession {
    fn new() -> Self {
        Self {
            game_id: None,
            state: SessionState::Ready,
            score: 0,
            remaining_secs: 0,
            duration_secs: 0,
            generation: 0,
        }
    }
}

/// Read-only view of the session for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Selected game, if any.
    pub game_id: Option<GameId>,
    /// Lifecycle state.
    pub state: SessionState,
    /// Current score.
    pub score: u32,
    /// Seconds left on the countdown.
    pub remaining_secs: u32,
    /// Elapsed share of the session, 0.0 to 100.0.
    pub progress_pct: f64,
    /// Variant state while a session is running or finished.
    pub variant: Option<VariantState>,
    /// Virtual time in milliseconds.
    pub at_ms: u64,
}

/// Orchestrates a single game session.
pub struct SessionController {
    registry: GameRegistry,
    config: EngineConfig,
    scheduler: Scheduler,
    rng: StdRng,
    session: GameSession,
    definition: Option<GameDefinition>,
    variant: Option<Box<dyn GameVariant>>,
    events: EventLog,
    outbox: Vec<GameFinished>,
}

impl std::fmt::Debug for SessionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionController")
            .field("session", &self.session)
            .field("timers", &self.scheduler.len())
            .field("now_ms", &self.scheduler.now_ms())
            .field("events", &self.events.len())
            .finish()
    }
}

impl SessionController {
    /// Create a controller over `registry`.
    pub fn new(registry: GameRegistry, config: EngineConfig) -> Self {
        let rng = StdRng::seed_from_u64(config.seed);
        let events = EventLog::new(config.max_events);
        Self {
            registry,
            config,
            scheduler: Scheduler::new(),
            rng,
            session: GameSession::new(),
            definition: None,
            variant: None,
            events,
            outbox: Vec::new(),
        }
    }

    /// Controller over the built-in catalog.
    pub fn with_defaults(config: EngineConfig) -> Self {
        Self::new(GameRegistry::default(), config)
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// The live session.
    pub fn session(&self) -> &GameSession {
        &self.session
    }

    /// Lifecycle state.
    pub fn state(&self) -> SessionState {
        self.session.state
    }

    /// Current score.
    pub fn score(&self) -> u32 {
        self.session.score
    }

    /// Seconds left on the countdown.
    pub fn remaining_secs(&self) -> u32 {
        self.session.remaining_secs
    }

    /// Definition of the selected game.
    pub fn definition(&self) -> Option<&GameDefinition> {
        self.definition.as_ref()
    }

    /// The registry sessions are resolved from.
    pub fn registry(&self) -> &GameRegistry {
        &self.registry
    }

    /// Variant state, if a session has been started since the last reset.
    pub fn variant_state(&self) -> Option<VariantState> {
        self.variant.as_ref().map(|v| v.state())
    }

    /// Current virtual time in milliseconds.
    pub fn now_ms(&self) -> u64 {
        self.scheduler.now_ms()
    }

    /// Number of armed timers.
    pub fn pending_timers(&self) -> usize {
        self.scheduler.len()
    }

    /// Session event history.
    pub fn events(&self) -> &EventLog {
        &self.events
    }

    /// Take the finish records emitted since the last call.
    pub fn drain_finished(&mut self) -> Vec<GameFinished> {
        std::mem::take(&mut self.outbox)
    }

    /// Read-only snapshot for the presentation layer.
    pub fn snapshot(&self) -> SessionSnapshot {
        let duration = self.session.duration_secs;
        let progress_pct = if duration == 0 {
            0.0
        } else {
            f64::from(duration - self.session.remaining_secs) / f64::from(duration) * 100.0
        };
        SessionSnapshot {
            game_id: self.session.game_id.clone(),
            state: self.session.state,
            score: self.session.score,
            remaining_secs: self.session.remaining_secs,
            progress_pct,
            variant: self.variant_state(),
            at_ms: self.scheduler.now_ms(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Select the game for the next session.
    ///
    /// Selecting while a session is running or finished switches games: the
    /// old session is reset first, cancelling all of its timers.
    pub fn select_game(&mut self, id: impl Into<GameId>) -> GameResult<()> {
        let id = id.into();
        let definition = self.registry.definition(&id)?.clone();
        if self.session.state != SessionState::Ready {
            self.reset();
        }
        self.session.duration_secs = self.duration_for(&definition);
        self.session.remaining_secs = self.session.duration_secs;
        self.session.game_id = Some(id.clone());
        self.definition = Some(definition);
        self.variant = None;
        tracing::debug!(game = %id, "game selected");
        self.push_event(SessionEventKind::GameSelected { game_id: id });
        Ok(())
    }

    /// Start a session for the selected game.
    ///
    /// A no-op while playing or finished; a finished session must be reset
    /// before it can be played again.
    pub fn start(&mut self) -> GameResult<()> {
        if self.session.state != SessionState::Ready {
            tracing::debug!(state = %self.session.state, "start ignored");
            return Ok(());
        }
        let id = self
            .session
            .game_id
            .clone()
            .ok_or(GameError::NoGameSelected)?;
        let (definition, mut variant) = self.registry.instantiate(&id)?;

        self.scheduler.cancel_all(TimerScope::Session);
        self.session.generation += 1;
        self.session.state = SessionState::Playing;
        self.session.score = 0;
        self.session.duration_secs = self.duration_for(&definition);
        self.session.remaining_secs = self.session.duration_secs;
        let generation = self.session.generation;

        self.scheduler
            .schedule_periodic(COUNTDOWN_MS, TimerAction::Countdown, generation);
        let mut ctx = VariantContext::new(&mut self.scheduler, &mut self.rng, generation);
        variant.initialize(&mut ctx);
        let awarded = ctx.awarded();

        tracing::info!(
            game = %id,
            variant = variant.name(),
            generation,
            duration_secs = self.session.duration_secs,
            "session started"
        );
        self.variant = Some(variant);
        self.definition = Some(definition);
        self.push_event(SessionEventKind::Started {
            game_id: id,
            generation,
            duration_secs: self.session.duration_secs,
        });
        self.apply_delta(awarded);
        Ok(())
    }

    /// Select `id` and start it in one call.
    pub fn start_game(&mut self, id: impl Into<GameId>) -> GameResult<()> {
        self.select_game(id)?;
        self.start()
    }

    /// Master countdown step. Ignored unless playing.
    ///
    /// Normally driven by the 1 Hz timer armed in [`SessionController::start`].
    pub fn tick(&mut self) {
        if self.session.state != SessionState::Playing {
            return;
        }
        self.session.remaining_secs = self.session.remaining_secs.saturating_sub(1);
        if self.session.remaining_secs == 0 {
            self.finish();
        }
    }

    /// Add `points` to the score. Dropped unless playing.
    pub fn apply_delta(&mut self, points: u32) {
        if points == 0 {
            return;
        }
        if self.session.state != SessionState::Playing {
            tracing::debug!(points, state = %self.session.state, "award dropped");
            return;
        }
        self.session.score = self.session.score.saturating_add(points);
        self.push_event(SessionEventKind::ScoreAwarded {
            points,
            total: self.session.score,
        });
    }

    /// Route input to the active variant. Returns `false` if it was ignored.
    pub fn submit_input(&mut self, input: &GameInput) -> bool {
        if self.session.state != SessionState::Playing {
            tracing::debug!(%input, state = %self.session.state, "input ignored");
            return false;
        }
        let Some(variant) = self.variant.as_mut() else {
            return false;
        };
        let mut ctx =
            VariantContext::new(&mut self.scheduler, &mut self.rng, self.session.generation);
        let accepted = variant.on_input(input, &mut ctx);
        let awarded = ctx.awarded();
        if !accepted {
            tracing::debug!(%input, variant = variant.name(), "input not accepted");
        }
        self.apply_delta(awarded);
        accepted
    }

    /// Cancel every timer, clear score and variant state, and return to Ready.
    ///
    /// The selected game is kept.
    pub fn reset(&mut self) {
        let cancelled = self.scheduler.cancel_all(TimerScope::Session);
        self.session.generation += 1;
        self.session.state = SessionState::Ready;
        self.session.score = 0;
        self.session.remaining_secs = self.session.duration_secs;
        self.variant = None;
        tracing::debug!(
            generation = self.session.generation,
            cancelled,
            "session reset"
        );
        self.push_event(SessionEventKind::Reset {
            generation: self.session.generation,
        });
    }

    /// Reset and drop the selection.
    pub fn close(&mut self) {
        self.reset();
        self.session.game_id = None;
        self.session.duration_secs = 0;
        self.session.remaining_secs = 0;
        self.definition = None;
    }

    /// Advance virtual time by `ms`, firing every timer due in the window.
    pub fn advance(&mut self, ms: u64) {
        let until = self.scheduler.now_ms().saturating_add(ms);
        while let Some(firing) = self.scheduler.pop_due(until) {
            self.fire(firing);
        }
        self.scheduler.advance_clock(until);
    }

    /// Advance until the session is no longer playing or `max_ms` elapsed.
    pub fn run_until_finished(&mut self, max_ms: u64) {
        let until = self.scheduler.now_ms().saturating_add(max_ms);
        while self.session.state == SessionState::Playing {
            let Some(firing) = self.scheduler.pop_due(until) else {
                break;
            };
            self.fire(firing);
        }
        if self.session.state == SessionState::Playing {
            self.scheduler.advance_clock(until);
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn fire(&mut self, firing: Firing) {
        if firing.generation != self.session.generation {
            tracing::warn!(
                action = ?firing.action,
                timer_generation = firing.generation,
                live_generation = self.session.generation,
                "stale timer ignored"
            );
            self.scheduler.cancel(firing.token);
            return;
        }
        match firing.action {
            TimerAction::Countdown => self.tick(),
            TimerAction::Variant(timer) => {
                if self.session.state != SessionState::Playing {
                    return;
                }
                let Some(variant) = self.variant.as_mut() else {
                    return;
                };
                let mut ctx = VariantContext::new(
                    &mut self.scheduler,
                    &mut self.rng,
                    self.session.generation,
                );
                variant.on_timer(timer, &mut ctx);
                let awarded = ctx.awarded();
                self.apply_delta(awarded);
            }
        }
    }

    fn finish(&mut self) {
        self.session.state = SessionState::Finished;
        let cancelled = self.scheduler.cancel_all(TimerScope::Session);
        let Some(game_id) = self.session.game_id.clone() else {
            return;
        };
        let finished = GameFinished {
            game_id,
            final_score: self.session.score,
            timestamp: Utc::now(),
        };
        tracing::info!(
            game = %finished.game_id,
            score = finished.final_score,
            cancelled,
            "session finished"
        );
        self.outbox.push(finished.clone());
        self.push_event(SessionEventKind::Finished(finished));
    }

    fn duration_for(&self, definition: &GameDefinition) -> u32 {
        self.config
            .duration_override
            .unwrap_or(definition.duration_secs)
            .max(1)
    }

    fn push_event(&mut self, kind: SessionEventKind) {
        self.events
            .push(SessionEvent::new(self.scheduler.now_ms(), kind));
    }
}
