//! Station catalog error types.

use std::path::PathBuf;

use crate::domain::ValidationError;

/// Errors that can occur while loading the station catalog.
///
/// All of these are fatal at startup: the server cannot resolve stations
/// without a catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Catalog file could not be read
    #[error("failed to read station catalog {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Catalog file is not a valid station list
    #[error("malformed station catalog {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// A station entry failed validation
    #[error("invalid station {id:?}: {source}")]
    InvalidStation {
        id: String,
        source: ValidationError,
    },

    /// Two entries share an id
    #[error("duplicate station id {0}")]
    DuplicateId(String),
}

/// A single-nearest query was made against an empty catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("no stations available")]
pub struct NoStationsAvailable;
