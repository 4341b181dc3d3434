//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::State,
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::{Days, Local, NaiveDate};
use futures::future::join_all;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::domain::{Coordinate, ValidationError};
use crate::locations::{DEFAULT_SEARCH_LIMIT, StoreError};
use crate::outlook::{OUTLOOK_DAYS, week_outlook};
use crate::providers::{ProviderError, TideDate, UNKNOWN_PHASE};
use crate::resolve::{Place, ResolveError, StationRequest};
use crate::stations::NoStationsAvailable;

use super::dto::*;
use super::extract::{ApiJson, ApiQuery};
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/stations/nearby", get(stations_nearby))
        .route("/stations/nearest", get(station_nearest))
        .route("/tide/today", get(tide_today))
        .route("/tide/week", get(tide_week))
        .route("/predictions/week", get(predictions_week))
        .route("/locations/search", get(locations_search))
        .route("/locations/add", post(locations_add))
        .route("/locations/nearby", get(locations_nearby))
        .fallback(not_found)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn root() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "Tide MCP backend running",
    })
}

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound {
        message: format!("No route for {}", uri.path()),
    }
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Stations closest to a point.
async fn stations_nearby(
    State(state): State<AppState>,
    ApiQuery(req): ApiQuery<PointQuery>,
) -> Result<Json<StationsResponse>, AppError> {
    let point = Coordinate::new(req.lat, req.lon)?;
    let limit = req.limit.unwrap_or(DEFAULT_SEARCH_LIMIT) as usize;

    let stations = state
        .resolver
        .catalog()
        .nearest_k(point, limit)
        .iter()
        .map(StationResult::from_ranked)
        .collect();

    Ok(Json(StationsResponse { stations }))
}

/// Resolve the nearest station, remembering the place if one is named.
async fn station_nearest(
    State(state): State<AppState>,
    ApiQuery(req): ApiQuery<NearestStationQuery>,
) -> Result<Json<ResolvedStationResult>, AppError> {
    let point = Coordinate::new(req.lat, req.lon)?;
    let place = Place::from_parts(req.town, req.state, req.zip)?;

    let resolution = state
        .resolver
        .resolve(StationRequest {
            station_id: None,
            point: Some(point),
            place,
        })
        .await?;

    Ok(Json(ResolvedStationResult::from_resolution(resolution)))
}

/// Build a resolution request from tide query parameters.
fn station_request(req: &TideQuery) -> Result<StationRequest, AppError> {
    let point = match (req.lat, req.lon) {
        (Some(lat), Some(lon)) => Some(Coordinate::new(lat, lon)?),
        (None, None) => None,
        (Some(_), None) => return Err(ValidationError::MissingField("lon").into()),
        (None, Some(_)) => return Err(ValidationError::MissingField("lat").into()),
    };
    let place = Place::from_parts(req.town.clone(), req.state.clone(), req.zip.clone())?;

    Ok(StationRequest {
        station_id: req.station.clone(),
        point,
        place,
    })
}

/// Today's (or a given day's) high and low tides with the moon phase.
async fn tide_today(
    State(state): State<AppState>,
    ApiQuery(req): ApiQuery<TideQuery>,
) -> Result<Json<TideTodayResponse>, AppError> {
    let (date, tide_date) = match req.date.as_deref().filter(|d| !d.is_empty()) {
        Some(raw) => {
            let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| AppError::BadRequest {
                message: format!("Invalid date (expected YYYY-MM-DD): {raw}"),
            })?;
            (date, TideDate::Day(date))
        }
        None => (Local::now().date_naive(), TideDate::Today),
    };

    let resolution = state.resolver.resolve(station_request(&req)?).await?;

    let (tides, moon_phase) = tokio::join!(
        state.tides.hilo(&resolution.station_id, tide_date),
        state.moon.phase(date)
    );
    let tides = tides?;
    let moon_phase = moon_phase?;

    Ok(Json(TideTodayResponse {
        station: ResolvedStationResult::from_resolution(resolution),
        day: TideDayResult {
            date,
            highs: tides.highs,
            lows: tides.lows,
            moon_phase,
        },
    }))
}

/// Seven days of tides and moon phases starting today.
///
/// All fourteen provider calls run concurrently. A failed moon lookup
/// falls back to "Unknown"; a failed tide lookup fails the request.
async fn tide_week(
    State(state): State<AppState>,
    ApiQuery(req): ApiQuery<TideQuery>,
) -> Result<Json<TideWeekResponse>, AppError> {
    let resolution = state.resolver.resolve(station_request(&req)?).await?;
    let station_id = resolution.station_id.clone();

    let today = Local::now().date_naive();
    let days: Vec<NaiveDate> = (0..OUTLOOK_DAYS)
        .filter_map(|i| today.checked_add_days(Days::new(i)))
        .collect();

    let (tides, phases) = tokio::join!(
        join_all(
            days.iter()
                .map(|day| state.tides.hilo(&station_id, TideDate::Day(*day))),
        ),
        join_all(days.iter().map(|day| state.moon.phase(*day))),
    );

    let mut week = Vec::with_capacity(days.len());
    for ((date, tides), phase) in days.into_iter().zip(tides).zip(phases) {
        let tides = tides?;
        let moon_phase = phase.unwrap_or_else(|e| {
            warn!(%date, error = %e, "moon phase unavailable, using fallback");
            UNKNOWN_PHASE.to_string()
        });
        week.push(TideDayResult {
            date,
            highs: tides.highs,
            lows: tides.lows,
            moon_phase,
        });
    }

    Ok(Json(TideWeekResponse {
        station: ResolvedStationResult::from_resolution(resolution),
        week,
    }))
}

/// Fishing and hunting outlook for the coming week.
async fn predictions_week() -> Json<PredictionsResponse> {
    Json(PredictionsResponse {
        predictions: week_outlook(Local::now().date_naive()),
    })
}

/// Autocomplete over remembered locations.
async fn locations_search(
    State(state): State<AppState>,
    ApiQuery(req): ApiQuery<LocationSearchQuery>,
) -> Result<Json<LocationsResponse>, AppError> {
    let records = state
        .resolver
        .locations()
        .search(req.query.as_deref(), req.limit.unwrap_or(DEFAULT_SEARCH_LIMIT))
        .await?;

    Ok(Json(LocationsResponse {
        locations: records.into_iter().map(LocationResult::from_record).collect(),
    }))
}

/// Remember a location.
async fn locations_add(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<AddLocationRequest>,
) -> Result<Json<AddLocationResponse>, AppError> {
    let point = Coordinate::new(req.lat, req.lon)?;
    let place = Place {
        town: req.town,
        state: req.state,
        zip: req.zip,
    };

    let record = state.resolver.remember(place, point, req.station_id).await?;

    Ok(Json(AddLocationResponse {
        status: "success",
        location: LocationResult::from_record(record),
    }))
}

/// Remembered locations closest to a point.
async fn locations_nearby(
    State(state): State<AppState>,
    ApiQuery(req): ApiQuery<PointQuery>,
) -> Result<Json<LocationsResponse>, AppError> {
    let point = Coordinate::new(req.lat, req.lon)?;
    let nearby = state
        .resolver
        .locations()
        .nearby(point, req.limit.unwrap_or(DEFAULT_SEARCH_LIMIT))
        .await?;

    Ok(Json(LocationsResponse {
        locations: nearby.into_iter().map(LocationResult::from_nearby).collect(),
    }))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Unprocessable { message: String },
    Unavailable { message: String },
    BadGateway { message: String },
    Internal { message: String },
}

impl From<ValidationError> for AppError {
    fn from(e: ValidationError) -> Self {
        AppError::Unprocessable {
            message: e.to_string(),
        }
    }
}

impl From<NoStationsAvailable> for AppError {
    fn from(e: NoStationsAvailable) -> Self {
        AppError::Unavailable {
            message: e.to_string(),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::InvalidSeed { source, .. } => source.into(),
            _ => AppError::Internal {
                message: e.to_string(),
            },
        }
    }
}

impl From<ResolveError> for AppError {
    fn from(e: ResolveError) -> Self {
        match e {
            ResolveError::NoStations(e) => e.into(),
            ResolveError::Validation(e) => e.into(),
            ResolveError::Store(e) => e.into(),
        }
    }
}

impl From<ProviderError> for AppError {
    fn from(e: ProviderError) -> Self {
        AppError::BadGateway {
            message: e.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Unprocessable { message } => (StatusCode::UNPROCESSABLE_ENTITY, message),
            AppError::Unavailable { message } => (StatusCode::SERVICE_UNAVAILABLE, message),
            AppError::BadGateway { message } => (StatusCode::BAD_GATEWAY, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            error!(%status, %message, "request failed");
        } else {
            warn!(%status, %message, "request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
