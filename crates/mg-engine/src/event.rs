use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::GameId;

/// Emitted once when a session runs out of time.
///
/// This is the record handed to the persistence and aggregation side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameFinished {
    /// Game that was played.
    pub game_id: GameId,
    /// Score at the moment the countdown hit zero.
    pub final_score: u32,
    /// Wall-clock time of the finish.
    pub timestamp: DateTime<Utc>,
}

/// What happened in a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEventKind {
    /// A game was selected.
    GameSelected {
        /// The selected game.
        game_id: GameId,
    },
    /// A session started.
    Started {
        /// The game being played.
        game_id: GameId,
        /// Generation number of the new session.
        generation: u64,
        /// Session length in seconds.
        duration_secs: u32,
    },
    /// Points landed on the score.
    ScoreAwarded {
        /// Points added.
        points: u32,
        /// Score after the award.
        total: u32,
    },
    /// The countdown reached zero.
    Finished(GameFinished),
    /// The session was reset to Ready.
    Reset {
        /// Generation number after the reset.
        generation: u64,
    },
}

/// A timestamped session event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionEvent {
    /// Virtual time of the event in milliseconds.
    pub at_ms: u64,
    /// The specific kind of event.
    pub kind: SessionEventKind,
}

impl SessionEvent {
    /// Create an event at `at_ms`.
    pub fn new(at_ms: u64, kind: SessionEventKind) -> Self {
        Self { at_ms, kind }
    }
}

/// Bounded history of session events.
#[derive(Debug, Default)]
pub struct EventLog {
    events: Vec<SessionEvent>,
    max_events: usize,
}

impl EventLog {
    /// Create an event log with the given maximum capacity (0 = unlimited).
    pub fn new(max_events: usize) -> Self {
        Self {
            events: Vec::new(),
            max_events,
        }
    }

    /// Append an event, dropping the oldest events if the log exceeds its capacity.
    pub fn push(&mut self, event: SessionEvent) {
        self.events.push(event);
        if self.max_events > 0 && self.events.len() > self.max_events {
            let drain_count = self.events.len() - self.max_events;
            self.events.drain(..drain_count);
        }
    }

    /// All recorded events, oldest first.
    pub fn events(&self) -> &[SessionEvent] {
        &self.events
    }

    /// Every finish record still in the log.
    pub fn finished(&self) -> Vec<&GameFinished> {
        self.events
            .iter()
            .filter_map(|e| match &e.kind {
                SessionEventKind::Finished(finished) => Some(finished),
                _ => None,
            })
            .collect()
    }

    /// Return the number of recorded events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Return `true` if no events have been recorded.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
