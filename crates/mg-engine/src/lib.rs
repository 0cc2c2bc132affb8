//! Timed mini-game sessions for MindGarden.
//!
//! A [`SessionController`] runs one session at a time against a
//! [`GameRegistry`]: it owns a virtual-time [`Scheduler`], a seeded RNG and the
//! active [`GameVariant`]. Hosts drive time with
//! [`SessionController::advance`], route player input through
//! [`SessionController::submit_input`] and collect [`GameFinished`] records
//! for persistence.

/// Game catalog: definitions, categories and the built-in games.
pub mod catalog;
/// Configuration for controller runs.
pub mod config;
/// Error types for the engine crate.
pub mod error;
/// Session events and the bounded event log.
pub mod event;
/// Maps game ids to definitions and variant engines.
pub mod registry;
/// Virtual-time timer wheel.
pub mod scheduler;
/// Session lifecycle and the controller.
pub mod session;
/// The variant trait and the four built-in variant engines.
pub mod variant;

/// Re-exports of catalog types.
pub use catalog::{Catalog, Category, Difficulty, GameDefinition, GameId, VariantKind};
/// Re-export of [`config::EngineConfig`].
pub use config::EngineConfig;
/// Re-exports of [`error::GameError`] and [`error::GameResult`].
pub use error::{GameError, GameResult};
/// Re-exports of event types.
pub use event::{EventLog, GameFinished, SessionEvent, SessionEventKind};
/// Re-export of [`registry::GameRegistry`].
pub use registry::GameRegistry;
/// Re-exports of scheduler types.
pub use scheduler::{Scheduler, TimerAction, TimerToken, VariantTimer};
/// Re-exports of session types.
pub use session::{GameSession, SessionController, SessionSnapshot, SessionState};
/// Re-exports of variant types.
pub use variant::{GameInput, GameVariant, VariantContext, VariantState};
