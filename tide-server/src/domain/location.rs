//! Remembered locations.

use chrono::{DateTime, Utc};

use super::{Coordinate, Located, ValidationError};

/// A validated request to remember a named place.
///
/// `town` and `state` together form the identity; `zip` is informational
/// and may be empty. Values are kept exactly as given, so identity is
/// case-sensitive.
#[derive(Debug, Clone, PartialEq)]
pub struct NewLocation {
    town: String,
    state: String,
    zip: String,
    position: Coordinate,
    station_id: String,
}

impl NewLocation {
    /// Validate and build a new location.
    ///
    /// Town, state and station id must be non-blank.
    pub fn new(
        town: impl Into<String>,
        state: impl Into<String>,
        zip: impl Into<String>,
        position: Coordinate,
        station_id: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let town = town.into();
        let state = state.into();
        let station_id = station_id.into();

        if town.trim().is_empty() {
            return Err(ValidationError::MissingField("town"));
        }
        if state.trim().is_empty() {
            return Err(ValidationError::MissingField("state"));
        }
        if station_id.trim().is_empty() {
            return Err(ValidationError::MissingField("stationId"));
        }

        Ok(Self {
            town,
            state,
            zip: zip.into(),
            position,
            station_id,
        })
    }

    pub fn town(&self) -> &str {
        &self.town
    }

    pub fn state(&self) -> &str {
        &self.state
    }

    pub fn zip(&self) -> &str {
        &self.zip
    }

    pub fn station_id(&self) -> &str {
        &self.station_id
    }
}

impl Located for NewLocation {
    fn position(&self) -> Coordinate {
        self.position
    }
}

/// A stored location.
///
/// `position` and `station_id` are the values from the first insert and
/// are never refreshed; only `last_used` moves.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationRecord {
    pub id: i64,
    pub town: String,
    pub state: String,
    pub zip: String,
    pub position: Coordinate,
    pub station_id: String,
    pub created_at: DateTime<Utc>,
    pub last_used: DateTime<Utc>,
}

impl LocationRecord {
    /// ASCII case-insensitive substring match against town, state or zip.
    ///
    /// `needle` must already be lowercase ASCII-wise.
    pub fn matches(&self, needle: &str) -> bool {
        [&self.town, &self.state, &self.zip]
            .iter()
            .any(|field| field.to_ascii_lowercase().contains(needle))
    }
}

impl Located for LocationRecord {
    fn position(&self) -> Coordinate {
        self.position
    }
}
