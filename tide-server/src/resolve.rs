//! Station resolution for incoming requests.
//!
//! Every tide endpoint needs a station id. A caller either names one, or
//! gives a point and gets the nearest catalog station. If the point also
//! comes with a town and state, that place is remembered in the location
//! store. With neither, the configured default station is used.

use std::sync::Arc;

use tracing::debug;

use crate::domain::{Coordinate, LocationRecord, NewLocation, Station, ValidationError};
use crate::locations::{LocationStore, StoreError};
use crate::stations::{NoStationsAvailable, StationCatalog};

/// Errors from station resolution.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error(transparent)]
    NoStations(#[from] NoStationsAvailable),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// A named place supplied alongside a point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Place {
    pub town: String,
    pub state: String,
    pub zip: String,
}

impl Place {
    /// Build a place from optional request fields.
    ///
    /// Returns `None` when neither town nor state is given. Giving only
    /// one of them is a validation error.
    pub fn from_parts(
        town: Option<String>,
        state: Option<String>,
        zip: Option<String>,
    ) -> Result<Option<Self>, ValidationError> {
        let town = town.filter(|t| !t.trim().is_empty());
        let state = state.filter(|s| !s.trim().is_empty());

        match (town, state) {
            (None, None) => Ok(None),
            (Some(_), None) => Err(ValidationError::MissingField("state")),
            (None, Some(_)) => Err(ValidationError::MissingField("town")),
            (Some(town), Some(state)) => Ok(Some(Self {
                town,
                state,
                zip: zip.unwrap_or_default(),
            })),
        }
    }
}

/// What a request supplied to pick a station.
#[derive(Debug, Clone, Default)]
pub struct StationRequest {
    pub station_id: Option<String>,
    pub point: Option<Coordinate>,
    pub place: Option<Place>,
}

/// How the station was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionSource {
    Explicit,
    Nearest,
    Default,
}

/// The outcome of resolving a [`StationRequest`].
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub station_id: String,
    /// Catalog entry, when the id is in the catalog. Explicit ids are
    /// opaque and need not be.
    pub station: Option<Station>,
    pub distance_km: Option<f64>,
    pub source: ResolutionSource,
    /// The place remembered as a side effect, if any.
    pub remembered: Option<LocationRecord>,
}

/// Resolves requests to stations, remembering named places on the way.
#[derive(Debug, Clone)]
pub struct StationResolver {
    catalog: Arc<StationCatalog>,
    locations: LocationStore,
    default_station: String,
}

impl StationResolver {
    pub fn new(
        catalog: Arc<StationCatalog>,
        locations: LocationStore,
        default_station: impl Into<String>,
    ) -> Self {
        Self {
            catalog,
            locations,
            default_station: default_station.into(),
        }
    }

    pub fn catalog(&self) -> &StationCatalog {
        &self.catalog
    }

    pub fn locations(&self) -> &LocationStore {
        &self.locations
    }

    pub fn default_station(&self) -> &str {
        &self.default_station
    }

    /// Pick a station for `request`.
    pub async fn resolve(&self, request: StationRequest) -> Result<Resolution, ResolveError> {
        if let Some(id) = request.station_id.filter(|id| !id.trim().is_empty()) {
            debug!(station = %id, "using explicit station");
            return Ok(Resolution {
                station: self.catalog.get(&id).cloned(),
                station_id: id,
                distance_km: None,
                source: ResolutionSource::Explicit,
                remembered: None,
            });
        }

        let Some(point) = request.point else {
            debug!(station = %self.default_station, "using default station");
            return Ok(Resolution {
                station_id: self.default_station.clone(),
                station: self.catalog.get(&self.default_station).cloned(),
                distance_km: None,
                source: ResolutionSource::Default,
                remembered: None,
            });
        };

        let nearest = self.catalog.nearest(point)?;
        let station = nearest.item.clone();
        let distance_km = nearest.distance_km;
        debug!(%point, station = station.id(), distance_km, "resolved nearest station");

        let remembered = match request.place {
            Some(place) => {
                let location = NewLocation::new(place.town, place.state, place.zip, point, station.id())?;
                Some(self.locations.upsert(&location).await?)
            }
            None => None,
        };

        Ok(Resolution {
            station_id: station.id().to_string(),
            station: Some(station),
            distance_km: Some(distance_km),
            source: ResolutionSource::Nearest,
            remembered,
        })
    }

    /// Remember a place, resolving its station from `point` if not given.
    pub async fn remember(
        &self,
        place: Place,
        point: Coordinate,
        station_id: Option<String>,
    ) -> Result<LocationRecord, ResolveError> {
        let station_id = match station_id.filter(|id| !id.trim().is_empty()) {
            Some(id) => id,
            None => self.catalog.nearest(point)?.item.id().to_string(),
        };
        let location = NewLocation::new(place.town, place.state, place.zip, point, station_id)?;
        Ok(self.locations.upsert(&location).await?)
    }
}
