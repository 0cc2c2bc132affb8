use crate::catalog::GameId;

/// Alias for `Result<T, GameError>`.
pub type GameResult<T> = Result<T, GameError>;

/// Errors surfaced by the session engine.
///
/// Everything here is a configuration problem reported synchronously to the
/// caller. Ignored operations (starting twice, input outside a session,
/// stale timers) are not errors and never show up as one.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    /// The requested game id is not in the catalog.
    #[error("unknown game: \"{0}\"")]
    UnknownGame(GameId),

    /// `start` was called before any game was selected.
    #[error("no game selected")]
    NoGameSelected,

    /// A catalog or engine configuration value is invalid.
    #[error("invalid game configuration: {0}")]
    InvalidConfig(String),

    /// A text input could not be turned into a game input.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A JSON catalog could not be parsed.
    #[error("catalog parse error: {0}")]
    Parse(#[from] serde_json::Error),
}
