use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use mg_engine::{GameFinished, GameId};
use serde::{Deserialize, Serialize};

use crate::error::ProgressResult;
use crate::store::KeyValueStore;

/// Store key the ledger lives under.
pub const PROGRESS_KEY: &str = "progress";

/// Stats for one game.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStats {
    /// Finished sessions.
    pub plays: u32,
    /// Sum of final scores.
    pub total_points: u64,
    /// Highest final score.
    pub best_score: u32,
    /// Final score of the most recent session.
    pub last_score: u32,
    /// When the most recent session finished.
    pub last_played: Option<DateTime<Utc>>,
}

impl GameStats {
    /// Mean final score, or 0 if never played.
    pub fn average_score(&self) -> f64 {
        if self.plays == 0 {
            0.0
        } else {
            self.total_points as f64 / f64::from(self.plays)
        }
    }
}

/// Everything the ledger has aggregated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressSummary {
    /// Finished sessions across all games.
    pub games_played: u32,
    /// Points earned across all games.
    pub points_earned: u64,
    /// Per-game stats keyed by game id.
    #[serde(default)]
    pub games: BTreeMap<GameId, GameStats>,
}

impl ProgressSummary {
    /// Stats for one game, if it was ever finished.
    pub fn game(&self, id: &GameId) -> Option<&GameStats> {
        self.games.get(id)
    }

    /// Fold one finish record into the totals.
    pub fn apply(&mut self, finished: &GameFinished) {
        self.games_played = self.games_played.saturating_add(1);
        self.points_earned = self
            .points_earned
            .saturating_add(u64::from(finished.final_score));

        let stats = self.games.entry(finished.game_id.clone()).or_default();
        stats.plays = stats.plays.saturating_add(1);
        stats.total_points = stats
            .total_points
            .saturating_add(u64::from(finished.final_score));
        stats.best_score = stats.best_score.max(finished.final_score);
        stats.last_score = finished.final_score;
        stats.last_played = Some(match stats.last_played {
            Some(prev) => prev.max(finished.timestamp),
            None => finished.timestamp,
        });
    }
}

/// Records finish events into a [`KeyValueStore`].
#[derive(Debug)]
pub struct ProgressLedger<S> {
    store: S,
}

impl<S: KeyValueStore> ProgressLedger<S> {
    /// Ledger over `store`.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Current totals. An empty store yields an empty summary.
    pub fn stats(&self) -> ProgressResult<ProgressSummary> {
        match self.store.get(PROGRESS_KEY)? {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(ProgressSummary::default()),
        }
    }

    /// Fold `finished` into the stored totals and return the new summary.
    pub fn record(&mut self, finished: &GameFinished) -> ProgressResult<ProgressSummary> {
        let mut summary = self.stats()?;
        summary.apply(finished);
        self.store
            .set(PROGRESS_KEY, &serde_json::to_string(&summary)?)?;
        tracing::info!(
            game = %finished.game_id,
            score = finished.final_score,
            games_played = summary.games_played,
            "progress recorded"
        );
        Ok(summary)
    }

    /// Record several finish records in order.
    pub fn record_all<'a>(
        &mut self,
        finished: impl IntoIterator<Item = &'a GameFinished>,
    ) -> ProgressResult<ProgressSummary> {
        let mut summary = self.stats()?;
        for record in finished {
            summary = self.record(record)?;
        }
        Ok(summary)
    }

    /// Drop all recorded progress.
    pub fn clear(&mut self) -> ProgressResult<bool> {
        self.store.remove(PROGRESS_KEY)
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Consume the ledger and return its store.
    pub fn into_store(self) -> S {
        self.store
    }
}
