//! Station catalog.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::{Coordinate, Station};

use super::embedded::EMBEDDED_STATIONS;
use super::error::{CatalogError, NoStationsAvailable};
use super::nearest::{Ranked, nearest, rank_by_distance};

/// Where the catalog is loaded from. Chosen once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    /// The compiled-in station table.
    Embedded,
    /// A JSON array of `{id, name, lat, lon}`.
    File(PathBuf),
}

impl fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogSource::Embedded => f.write_str("embedded table"),
            CatalogSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// One station as written in a catalog file.
///
/// Coordinates may be JSON numbers or numeric strings; NOAA metadata
/// exports use strings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StationEntry {
    pub id: String,
    pub name: String,
    #[serde(deserialize_with = "lenient_f64")]
    pub lat: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub lon: f64,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f64),
    Text(String),
}

/// Deserialize an `f64` from either a JSON number or a numeric string.
pub(crate) fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => Ok(n),
        NumberOrString::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

/// Immutable list of known tide stations.
///
/// Loaded once at startup and shared read-only across requests, so it
/// needs no locking.
#[derive(Debug, Clone, Default)]
pub struct StationCatalog {
    stations: Vec<Station>,
    by_id: HashMap<String, usize>,
}

impl StationCatalog {
    /// Load the catalog from the configured source.
    pub fn load(source: &CatalogSource) -> Result<Self, CatalogError> {
        match source {
            CatalogSource::Embedded => Self::embedded(),
            CatalogSource::File(path) => Self::from_file(path),
        }
    }

    /// Build the catalog from the compiled-in table.
    pub fn embedded() -> Result<Self, CatalogError> {
        let entries = EMBEDDED_STATIONS
            .iter()
            .map(|&(id, name, lat, lon)| StationEntry {
                id: id.to_string(),
                name: name.to_string(),
                lat,
                lon,
            })
            .collect();
        Self::from_entries(entries)
    }

    /// Read a JSON station list from disk.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let entries: Vec<StationEntry> =
            serde_json::from_str(&contents).map_err(|source| CatalogError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        Self::from_entries(entries)
    }

    /// Validate raw entries into a catalog.
    pub fn from_entries(entries: Vec<StationEntry>) -> Result<Self, CatalogError> {
        let stations = entries
            .into_iter()
            .map(|e| {
                Coordinate::new(e.lat, e.lon)
                    .and_then(|pos| Station::new(e.id.clone(), e.name, pos))
                    .map_err(|source| CatalogError::InvalidStation { id: e.id, source })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_stations(stations)
    }

    /// Build a catalog from stations, rejecting duplicate ids.
    ///
    /// Catalog order is preserved; it is the tie-break for equal distances.
    pub fn from_stations(stations: Vec<Station>) -> Result<Self, CatalogError> {
        let mut by_id = HashMap::with_capacity(stations.len());
        for (idx, station) in stations.iter().enumerate() {
            if by_id.insert(station.id().to_string(), idx).is_some() {
                return Err(CatalogError::DuplicateId(station.id().to_string()));
            }
        }
        Ok(Self { stations, by_id })
    }

    /// All stations in catalog order.
    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    /// Look up a station by id.
    pub fn get(&self, id: &str) -> Option<&Station> {
        self.by_id.get(id).map(|&idx| &self.stations[idx])
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    /// The closest station to `point`.
    pub fn nearest(&self, point: Coordinate) -> Result<Ranked<'_, Station>, NoStationsAvailable> {
        nearest(point, &self.stations)
    }

    /// Up to `k` stations ordered by distance from `point`.
    pub fn nearest_k(&self, point: Coordinate, k: usize) -> Vec<Ranked<'_, Station>> {
        rank_by_distance(point, &self.stations, k)
    }
}
