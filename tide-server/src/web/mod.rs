//! Web layer for the tide backend.
//!
//! Provides HTTP endpoints for station lookup, location memory, tides and
//! the weekly outlook.

mod dto;
mod extract;
mod routes;
mod state;

pub use dto::*;
pub use extract::{ApiJson, ApiQuery};
pub use routes::{AppError, create_router};
pub use state::AppState;
