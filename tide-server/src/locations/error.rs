//! Location store error types.

use std::path::PathBuf;

use crate::domain::ValidationError;

/// Errors from the location store.
///
/// None of these are swallowed: a failed upsert would silently lose
/// location memory, so callers always see them.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Underlying SQLite failure (unavailable, locked, I/O)
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A stored row no longer passes validation
    #[error("corrupt location row {id}: {source}")]
    CorruptRow { id: i64, source: ValidationError },

    /// Towns seed file could not be read
    #[error("failed to read towns file {}: {source}", path.display())]
    SeedRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Towns seed file is not a valid town list
    #[error("malformed towns file {}: {source}", path.display())]
    SeedParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// A seed entry failed validation
    #[error("invalid town entry {town:?}: {source}")]
    InvalidSeed {
        town: String,
        source: ValidationError,
    },
}
