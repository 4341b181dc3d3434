//! Tide station type.

use super::{Coordinate, Located, ValidationError};

/// A tide-monitoring station.
///
/// The id is the provider's opaque identifier (NOAA uses seven digits, but
/// nothing here relies on that). Stations are immutable once loaded.
///
/// # Examples
///
/// ```
/// use tide_server::domain::{Coordinate, Station};
///
/// let pos = Coordinate::new(41.1758, -73.1839).unwrap();
/// let bridgeport = Station::new("8467150", "Bridgeport, CT", pos).unwrap();
/// assert_eq!(bridgeport.id(), "8467150");
///
/// // Blank ids are rejected
/// assert!(Station::new("  ", "Nowhere", pos).is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Station {
    id: String,
    name: String,
    position: Coordinate,
}

impl Station {
    /// Create a station. The id must not be blank.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        position: Coordinate,
    ) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ValidationError::MissingField("id"));
        }
        Ok(Self {
            id,
            name: name.into(),
            position,
        })
    }

    /// Provider station identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Located for Station {
    fn position(&self) -> Coordinate {
        self.position
    }
}
