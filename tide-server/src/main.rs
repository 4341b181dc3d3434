use std::error::Error;
use std::process::ExitCode;
use std::sync::Arc;

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use tide_server::config::ServerConfig;
use tide_server::locations::LocationStore;
use tide_server::providers::{MoonClient, TideClient};
use tide_server::resolve::StationResolver;
use tide_server::stations::StationCatalog;
use tide_server::web::{AppState, create_router};

const DEFAULT_LOG_FILTER: &str = "tide_server=info,tower_http=info";

#[tokio::main]
async fn main() -> ExitCode {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "server failed");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), Box<dyn Error>> {
    let config = ServerConfig::from_env()?;

    // The catalog is required: without stations nothing can be resolved
    let catalog = StationCatalog::load(&config.catalog)?;
    info!(source = %config.catalog, stations = catalog.len(), "loaded station catalog");
    if catalog.get(&config.default_station).is_none() {
        warn!(station = %config.default_station, "default station is not in the catalog");
    }

    let store = LocationStore::connect(&config.store).await?;
    if let Some(path) = &config.seed_towns {
        store.seed_file(path).await?;
    }
    info!(
        database = %config.store.path.display(),
        locations = store.count().await?,
        "opened location store"
    );

    let tides = TideClient::new(config.tides.clone())?;
    let moon = MoonClient::new(config.moon.clone())?;

    let resolver = StationResolver::new(Arc::new(catalog), store, config.default_station.clone());
    let state = AppState::new(resolver, tides, moon);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!(addr = %config.bind_addr, "tide server listening");
    info!("GET  /stations/nearby    - Stations closest to a point");
    info!("GET  /stations/nearest   - Resolve a station, remembering the place");
    info!("GET  /tide/today         - Today's highs and lows");
    info!("GET  /tide/week          - Seven days of tides and moon phases");
    info!("GET  /locations/search   - Recent locations matching a query");
    info!("POST /locations/add      - Remember a location");

    axum::serve(listener, app).await?;
    Ok(())
}
