use std::path::PathBuf;

/// Alias for `Result<T, ProgressError>`.
pub type ProgressResult<T> = Result<T, ProgressError>;

/// Failures of the persistence side. The engine never produces these.
#[derive(Debug, thiserror::Error)]
pub enum ProgressError {
    /// Reading or writing the backing file failed.
    #[error("cannot access {path}: {source}")]
    Io {
        /// The file being accessed.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Stored data is not valid JSON of the expected shape.
    #[error("malformed progress data: {0}")]
    Json(#[from] serde_json::Error),

    /// The backing file holds JSON that is not an object.
    #[error("store file {0} is not a JSON object")]
    NotAnObject(PathBuf),
}
