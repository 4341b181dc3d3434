//! Location memory.
//!
//! Remembers named places (town/state/zip) that callers have resolved,
//! deduplicated on `(town, state)` and ranked by most recent use.

mod error;
mod seed;
mod store;

pub use error::StoreError;
pub use seed::TownEntry;
pub use store::{
    DEFAULT_SEARCH_LIMIT, LocationStore, MAX_SEARCH_LIMIT, NearbyLocation, StoreConfig,
};
