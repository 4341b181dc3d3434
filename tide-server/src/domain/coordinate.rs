//! Geographic coordinates and great-circle distance.

use std::fmt;

use super::ValidationError;

/// Mean Earth radius used by the haversine formula.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A WGS84 latitude/longitude pair in degrees.
///
/// Latitude is within [-90, 90] and longitude within [-180, 180]; both are
/// finite. This type guarantees that by construction.
///
/// # Examples
///
/// ```
/// use tide_server::domain::Coordinate;
///
/// let stamford = Coordinate::new(41.0534, -73.5387).unwrap();
/// assert_eq!(stamford.lat(), 41.0534);
///
/// // Out of range is rejected
/// assert!(Coordinate::new(91.0, 0.0).is_err());
/// assert!(Coordinate::new(0.0, 180.5).is_err());
/// ```
#[derive(Clone, Copy, PartialEq)]
pub struct Coordinate {
    lat: f64,
    lon: f64,
}

impl Coordinate {
    /// Create a coordinate, rejecting non-finite or out-of-range values.
    pub fn new(lat: f64, lon: f64) -> Result<Self, ValidationError> {
        if !lat.is_finite() {
            return Err(ValidationError::NotFinite("lat"));
        }
        if !lon.is_finite() {
            return Err(ValidationError::NotFinite("lon"));
        }
        if !(-90.0..=90.0).contains(&lat) {
            return Err(ValidationError::LatitudeOutOfRange(lat));
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(ValidationError::LongitudeOutOfRange(lon));
        }
        Ok(Self { lat, lon })
    }

    /// Latitude in degrees.
    pub fn lat(&self) -> f64 {
        self.lat
    }

    /// Longitude in degrees.
    pub fn lon(&self) -> f64 {
        self.lon
    }

    /// Great-circle distance to `other` in kilometres.
    ///
    /// Uses the haversine formula on a sphere of radius [`EARTH_RADIUS_KM`].
    pub fn haversine_km(&self, other: &Coordinate) -> f64 {
        let phi1 = self.lat.to_radians();
        let phi2 = other.lat.to_radians();
        let d_phi = (other.lat - self.lat).to_radians();
        let d_lambda = (other.lon - self.lon).to_radians();

        let a = (d_phi / 2.0).sin().powi(2)
            + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
        // Rounding can push `a` past 1 for near-antipodal points
        let a = a.min(1.0);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        EARTH_RADIUS_KM * c
    }
}

/// Anything with a fixed position that can be ranked by distance.
pub trait Located {
    fn position(&self) -> Coordinate;
}

impl Located for Coordinate {
    fn position(&self) -> Coordinate {
        *self
    }
}

impl fmt::Debug for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Coordinate({}, {})", self.lat, self.lon)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4},{:.4}", self.lat, self.lon)
    }
}
