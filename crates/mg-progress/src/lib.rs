//! Progress tracking for finished Mindgarden sessions.
//!
//! The engine emits [`mg_engine::GameFinished`] records and never touches
//! storage. This crate persists them through a [`KeyValueStore`] and
//! aggregates per-game and overall stats in a [`ProgressLedger`].

/// Error types for the progress crate.
pub mod error;
/// Per-game and overall stats built from finish records.
pub mod ledger;
/// Key-value stores: in-memory and single JSON file.
pub mod store;

/// Re-exports of [`error::ProgressError`] and [`error::ProgressResult`].
pub use error::{ProgressError, ProgressResult};
/// Re-exports of ledger types.
pub use ledger::{GameStats, PROGRESS_KEY, ProgressLedger, ProgressSummary};
/// Re-exports of store types.
pub use store::{JsonFileStore, KeyValueStore, MemoryStore};
