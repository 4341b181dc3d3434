//! Domain types for the tide backend.
//!
//! All types enforce their invariants at construction time, so code that
//! receives them can trust their validity.

mod coordinate;
mod error;
mod location;
mod station;

pub use coordinate::{Coordinate, EARTH_RADIUS_KM, Located};
pub use error::ValidationError;
pub use location::{LocationRecord, NewLocation};
pub use station::Station;
