//! Data transfer objects for web requests and responses.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Located, LocationRecord, Station};
use crate::locations::NearbyLocation;
use crate::outlook::DayOutlook;
use crate::providers::TidePrediction;
use crate::resolve::{Resolution, ResolutionSource};
use crate::stations::Ranked;

/// A point with an optional result limit.
#[derive(Debug, Deserialize)]
pub struct PointQuery {
    pub lat: f64,
    pub lon: f64,
    pub limit: Option<u32>,
}

/// Request to resolve the nearest station, optionally remembering a place.
#[derive(Debug, Deserialize)]
pub struct NearestStationQuery {
    pub lat: f64,
    pub lon: f64,
    pub town: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
}

/// Station selection shared by the tide endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct TideQuery {
    /// Day in YYYY-MM-DD (today endpoint only; defaults to today)
    pub date: Option<String>,
    /// Explicit station id
    pub station: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub town: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
}

/// Location autocomplete request.
#[derive(Debug, Deserialize)]
pub struct LocationSearchQuery {
    pub query: Option<String>,
    pub limit: Option<u32>,
}

/// Request to remember a location.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddLocationRequest {
    pub town: String,
    pub state: String,
    #[serde(default)]
    pub zip: String,
    pub lat: f64,
    pub lon: f64,
    /// Resolved to the nearest station when absent
    pub station_id: Option<String>,
}

/// Service status.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
}

/// A station with its distance from the query point.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StationResult {
    pub id: String,
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    pub distance_km: f64,
}

impl StationResult {
    pub fn from_ranked(ranked: &Ranked<'_, Station>) -> Self {
        let pos = ranked.item.position();
        Self {
            id: ranked.item.id().to_string(),
            name: ranked.item.name().to_string(),
            lat: pos.lat(),
            lon: pos.lon(),
            distance_km: ranked.distance_km,
        }
    }
}

/// Response for nearby stations.
#[derive(Debug, Serialize)]
pub struct StationsResponse {
    pub stations: Vec<StationResult>,
}

/// A stored location.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationResult {
    pub id: i64,
    pub town: String,
    pub state: String,
    pub zip: String,
    pub lat: f64,
    pub lon: f64,
    pub station_id: String,
    pub created_at: DateTime<Utc>,
    pub last_used: DateTime<Utc>,
    /// Only set for nearby queries
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
}

impl LocationResult {
    pub fn from_record(record: LocationRecord) -> Self {
        Self {
            id: record.id,
            town: record.town,
            state: record.state,
            zip: record.zip,
            lat: record.position.lat(),
            lon: record.position.lon(),
            station_id: record.station_id,
            created_at: record.created_at,
            last_used: record.last_used,
            distance_km: None,
        }
    }

    pub fn from_nearby(nearby: NearbyLocation) -> Self {
        Self {
            distance_km: Some(nearby.distance_km),
            ..Self::from_record(nearby.record)
        }
    }
}

/// Response for location search and nearby queries.
#[derive(Debug, Serialize)]
pub struct LocationsResponse {
    pub locations: Vec<LocationResult>,
}

/// Response for adding a location.
#[derive(Debug, Serialize)]
pub struct AddLocationResponse {
    pub status: &'static str,
    pub location: LocationResult,
}

/// The station a request resolved to.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedStationResult {
    pub id: String,
    pub name: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
    /// `explicit`, `nearest` or `default`
    pub source: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remembered: Option<LocationResult>,
}

impl ResolvedStationResult {
    pub fn from_resolution(resolution: Resolution) -> Self {
        let source = match resolution.source {
            ResolutionSource::Explicit => "explicit",
            ResolutionSource::Nearest => "nearest",
            ResolutionSource::Default => "default",
        };
        let pos = resolution.station.as_ref().map(|s| s.position());
        Self {
            id: resolution.station_id,
            name: resolution.station.as_ref().map(|s| s.name().to_string()),
            lat: pos.map(|p| p.lat()),
            lon: pos.map(|p| p.lon()),
            distance_km: resolution.distance_km,
            source,
            remembered: resolution.remembered.map(LocationResult::from_record),
        }
    }
}

/// Tides and moon phase for one day.
#[derive(Debug, Serialize)]
pub struct TideDayResult {
    pub date: NaiveDate,
    pub highs: Vec<TidePrediction>,
    pub lows: Vec<TidePrediction>,
    pub moon_phase: String,
}

/// Response for today's tides.
#[derive(Debug, Serialize)]
pub struct TideTodayResponse {
    pub station: ResolvedStationResult,
    #[serde(flatten)]
    pub day: TideDayResult,
}

/// Response for the week of tides.
#[derive(Debug, Serialize)]
pub struct TideWeekResponse {
    pub station: ResolvedStationResult,
    pub week: Vec<TideDayResult>,
}

/// Response for the weekly outlook.
#[derive(Debug, Serialize)]
pub struct PredictionsResponse {
    pub predictions: Vec<DayOutlook>,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
