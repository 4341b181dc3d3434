//! Tide station catalog and nearest-station resolution.
//!
//! The catalog is loaded once at startup, from either the compiled-in
//! table or a JSON file, and is read-only afterwards.

mod catalog;
mod embedded;
mod error;
mod nearest;

pub use catalog::{CatalogSource, StationCatalog, StationEntry};
pub(crate) use catalog::lenient_f64;
pub use error::{CatalogError, NoStationsAvailable};
pub use nearest::{Ranked, nearest, rank_by_distance};
