//! NOAA CO-OPS tide predictions client.

use std::time::Duration;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::error::ProviderError;
use super::fetch_body;

/// Default NOAA data getter endpoint.
const DEFAULT_BASE_URL: &str = "https://api.tidesandcurrents.noaa.gov/api/prod/datagetter";

/// Configuration for the tide client.
#[derive(Debug, Clone)]
pub struct TideConfig {
    /// Base URL for the data getter
    pub base_url: String,
    /// Vertical datum for heights
    pub datum: String,
    /// `english` (feet) or `metric`
    pub units: String,
    /// NOAA time zone selector; `lst_ldt` is station local time
    pub time_zone: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl TideConfig {
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            datum: "MLLW".to_string(),
            units: "english".to_string(),
            time_zone: "lst_ldt".to_string(),
            timeout_secs: 30,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the vertical datum, e.g. `MLLW` or `MSL`.
    pub fn with_datum(mut self, datum: impl Into<String>) -> Self {
        self.datum = datum.into();
        self
    }

    /// Set `english` or `metric` units.
    pub fn with_units(mut self, units: impl Into<String>) -> Self {
        self.units = units.into();
        self
    }

    /// Set the NOAA time zone selector (`gmt`, `lst` or `lst_ldt`).
    pub fn with_time_zone(mut self, time_zone: impl Into<String>) -> Self {
        self.time_zone = time_zone.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for TideConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Which day to fetch predictions for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TideDate {
    /// NOAA's own notion of today at the station.
    Today,
    Day(NaiveDate),
}

impl TideDate {
    /// NOAA only accepts `today`/`latest`/`recent` in `date`; specific days
    /// go through a one-day begin/end range.
    fn query_params(&self) -> Vec<(&'static str, String)> {
        match self {
            TideDate::Today => vec![("date", "today".to_string())],
            TideDate::Day(date) => {
                let day = date.format("%Y%m%d").to_string();
                vec![("begin_date", day.clone()), ("end_date", day)]
            }
        }
    }
}

/// A single high or low tide, as NOAA reports it.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TidePrediction {
    /// Local time, `YYYY-MM-DD HH:MM`
    #[serde(rename = "t")]
    pub time: String,
    /// Height in the configured units
    #[serde(rename = "v")]
    pub height: String,
    /// `H` or `L`
    #[serde(rename = "type")]
    pub kind: String,
}

/// One day's predictions split into highs and lows.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TideDay {
    pub highs: Vec<TidePrediction>,
    pub lows: Vec<TidePrediction>,
}

impl TideDay {
    fn from_predictions(predictions: Vec<TidePrediction>) -> Self {
        let (highs, lows): (Vec<_>, Vec<_>) = predictions
            .into_iter()
            .filter(|p| p.kind == "H" || p.kind == "L")
            .partition(|p| p.kind == "H");
        Self { highs, lows }
    }
}

#[derive(Debug, Deserialize)]
struct PredictionsResponse {
    #[serde(default)]
    predictions: Vec<TidePrediction>,
    error: Option<ErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Parse a data getter response body.
///
/// NOAA reports problems (unknown station, no data) as a 200 with an
/// `error` object, so that is checked before the predictions.
fn parse_predictions(body: &str) -> Result<TideDay, ProviderError> {
    let response: PredictionsResponse =
        serde_json::from_str(body).map_err(|e| ProviderError::Json {
            message: e.to_string(),
        })?;

    if let Some(error) = response.error {
        return Err(ProviderError::Upstream(error.message));
    }

    Ok(TideDay::from_predictions(response.predictions))
}

/// Client for NOAA high/low tide predictions.
#[derive(Debug, Clone)]
pub struct TideClient {
    http: reqwest::Client,
    config: TideConfig,
}

impl TideClient {
    pub fn new(config: TideConfig) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { http, config })
    }

    /// High/low predictions for `station` on `date`.
    pub async fn hilo(&self, station: &str, date: TideDate) -> Result<TideDay, ProviderError> {
        let request = self
            .http
            .get(&self.config.base_url)
            .query(&[
                ("station", station),
                ("product", "predictions"),
                ("datum", self.config.datum.as_str()),
                ("units", self.config.units.as_str()),
                ("time_zone", self.config.time_zone.as_str()),
                ("format", "json"),
                ("interval", "hilo"),
            ])
            .query(&date.query_params());

        let body = fetch_body(request).await?;
        parse_predictions(&body)
    }
}
