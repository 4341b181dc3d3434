//! Server configuration.
//!
//! Read from environment variables at startup. Every setting has a
//! default, so an empty environment gives a working local server.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use crate::locations::StoreConfig;
use crate::providers::{MoonConfig, TideConfig};
use crate::stations::CatalogSource;

/// Bridgeport, CT: the closest NOAA station to Stamford.
pub const DEFAULT_STATION: &str = "8467150";

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

/// Errors from reading configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{var}={value:?} is not a valid socket address")]
    InvalidAddr { var: &'static str, value: String },

    #[error("{var}={value:?} is not a valid number")]
    InvalidNumber { var: &'static str, value: String },
}

/// Everything `main` needs to start the server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Listen address
    pub bind_addr: SocketAddr,
    /// Location store database
    pub store: StoreConfig,
    /// Station catalog source
    pub catalog: CatalogSource,
    /// Optional towns file imported at startup
    pub seed_towns: Option<PathBuf>,
    /// Station used when a request names neither station nor point
    pub default_station: String,
    /// Tide provider client settings
    pub tides: TideConfig,
    /// Moon provider client settings
    pub moon: MoonConfig,
}

impl ServerConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bind_addr = match get("TIDES_BIND_ADDR") {
            Some(value) => SocketAddr::from_str(value.trim()).map_err(|_| ConfigError::InvalidAddr {
                var: "TIDES_BIND_ADDR",
                value,
            })?,
            None => DEFAULT_BIND_ADDR.parse().map_err(|_| ConfigError::InvalidAddr {
                var: "TIDES_BIND_ADDR",
                value: DEFAULT_BIND_ADDR.to_string(),
            })?,
        };

        let mut store = StoreConfig::new(get("TIDES_DATABASE").unwrap_or_else(|| "locations.db".to_string()));
        if let Some(value) = get("TIDES_DB_MAX_CONNECTIONS") {
            store = store.with_max_connections(parse_number("TIDES_DB_MAX_CONNECTIONS", value)?);
        }

        let catalog = match get("TIDES_STATIONS_FILE") {
            Some(path) => CatalogSource::File(PathBuf::from(path)),
            None => CatalogSource::Embedded,
        };

        let mut tides = TideConfig::new();
        let mut moon = MoonConfig::new();
        if let Some(url) = get("NOAA_API_URL") {
            tides = tides.with_base_url(url);
        }
        if let Some(datum) = get("NOAA_DATUM") {
            tides = tides.with_datum(datum.trim());
        }
        if let Some(units) = get("NOAA_UNITS") {
            tides = tides.with_units(units.trim());
        }
        if let Some(time_zone) = get("NOAA_TIME_ZONE") {
            tides = tides.with_time_zone(time_zone.trim());
        }
        if let Some(url) = get("MOON_API_URL") {
            moon = moon.with_base_url(url);
        }
        if let Some(value) = get("TIDES_HTTP_TIMEOUT_SECS") {
            let secs: u64 = parse_number("TIDES_HTTP_TIMEOUT_SECS", value)?;
            tides = tides.with_timeout(secs);
            moon = moon.with_timeout(secs);
        }

        Ok(Self {
            bind_addr,
            store,
            catalog,
            seed_towns: get("TIDES_SEED_TOWNS").map(PathBuf::from),
            default_station: get("TIDES_DEFAULT_STATION").unwrap_or_else(|| DEFAULT_STATION.to_string()),
            tides,
            moon,
        })
    }
}

fn parse_number<T: FromStr>(var: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidNumber { var, value })
}
