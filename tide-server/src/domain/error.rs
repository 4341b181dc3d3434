//! Domain error types.
//!
//! These errors represent validation failures on caller-supplied data.
//! They are raised before anything touches storage and are distinct from
//! IO and database errors.

/// Validation failures for coordinates and location fields.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// Latitude outside [-90, 90]
    #[error("latitude {0} is outside [-90, 90]")]
    LatitudeOutOfRange(f64),

    /// Longitude outside [-180, 180]
    #[error("longitude {0} is outside [-180, 180]")]
    LongitudeOutOfRange(f64),

    /// NaN or infinite coordinate
    #[error("{0} must be a finite number")]
    NotFinite(&'static str),

    /// A required text field was empty or whitespace
    #[error("{0} is required")]
    MissingField(&'static str),
}
