//! Application state for the web layer.

use std::sync::Arc;

use crate::providers::{MoonClient, TideClient};
use crate::resolve::StationResolver;

/// Shared application state.
///
/// Contains all the services needed to handle requests.
#[derive(Clone)]
pub struct AppState {
    /// Station catalog, location store and resolution flow
    pub resolver: Arc<StationResolver>,

    /// Tide predictions provider
    pub tides: Arc<TideClient>,

    /// Moon phase provider
    pub moon: Arc<MoonClient>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(resolver: StationResolver, tides: TideClient, moon: MoonClient) -> Self {
        Self {
            resolver: Arc::new(resolver),
            tides: Arc::new(tides),
            moon: Arc::new(moon),
        }
    }
}
