//! Local stand-ins for the NOAA and farmsense endpoints.
//!
//! `spawn` serves on an ephemeral port and returns its base URL:
//! - `/datagetter` answers by `station`: [`STATION_OK`] gets two highs and
//!   two lows, [`STATION_DOWN`] gets a 500, and anything else gets NOAA's
//!   in-body `error` object. Requests without hilo parameters get a 400.
//! - `/moon` answers [`STUB_PHASE`] for a numeric `d`.
//! - `/moon-down` always answers 500.

use std::collections::HashMap;

use axum::extract::Query;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Json, Router, routing::get};
use serde_json::json;

pub(crate) const STATION_OK: &str = "8467150";
pub(crate) const STATION_DOWN: &str = "DOWN";
pub(crate) const STATION_NO_DATA: &str = "NODATA";
pub(crate) const STUB_PHASE: &str = "Waxing Crescent";

type Params = Query<HashMap<String, String>>;

async fn datagetter(Query(params): Params) -> Response {
    let param = |key: &str| params.get(key).map(String::as_str);

    let day_range = param("begin_date").is_some() && param("begin_date") == param("end_date");
    let well_formed = param("product") == Some("predictions")
        && param("interval") == Some("hilo")
        && param("format") == Some("json")
        && (param("date") == Some("today") || day_range);
    if !well_formed {
        return (StatusCode::BAD_REQUEST, "missing hilo parameters").into_response();
    }

    match param("station") {
        Some(STATION_OK) => Json(json!({"predictions": [
            {"t": "2024-07-04 02:11", "v": "0.312", "type": "L"},
            {"t": "2024-07-04 08:20", "v": "7.104", "type": "H"},
            {"t": "2024-07-04 14:25", "v": "0.081", "type": "L"},
            {"t": "2024-07-04 20:41", "v": "7.660", "type": "H"}
        ]}))
        .into_response(),
        Some(STATION_DOWN) => (StatusCode::INTERNAL_SERVER_ERROR, "tide service down").into_response(),
        _ => Json(json!({"error": {"message": "No Predictions data was found."}})).into_response(),
    }
}

async fn moon(Query(params): Params) -> Response {
    match params.get("d").map(|d| d.parse::<i64>()) {
        Some(Ok(_)) => Json(json!([{"Error": 0, "ErrorMsg": "success", "Phase": STUB_PHASE}])).into_response(),
        _ => (StatusCode::BAD_REQUEST, "missing timestamp").into_response(),
    }
}

async fn moon_down() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, "moon service down").into_response()
}

/// Serve the stubs on `127.0.0.1:0` and return the base URL.
pub(crate) async fn spawn() -> String {
    let app = Router::new()
        .route("/datagetter", get(datagetter))
        .route("/moon", get(moon))
        .route("/moon-down", get(moon_down));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}
