//! Moon phase client (farmsense).

use std::time::Duration;

use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;

use super::error::ProviderError;
use super::fetch_body;

/// Default farmsense moon phase endpoint.
const DEFAULT_BASE_URL: &str = "https://api.farmsense.net/v1/moonphases/";

/// Phase reported when the provider has no answer.
pub const UNKNOWN_PHASE: &str = "Unknown";

/// Configuration for the moon phase client.
#[derive(Debug, Clone)]
pub struct MoonConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl MoonConfig {
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for MoonConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Deserialize)]
struct MoonPhaseDto {
    #[serde(rename = "Error", default)]
    error: i64,
    #[serde(rename = "ErrorMsg", default)]
    error_msg: String,
    #[serde(rename = "Phase")]
    phase: Option<String>,
}

/// The provider takes a Unix timestamp; noon UTC keeps it inside the day
/// for every US time zone.
fn noon_timestamp(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp() + 12 * 60 * 60
}

fn parse_phase(body: &str) -> Result<String, ProviderError> {
    let entries: Vec<MoonPhaseDto> =
        serde_json::from_str(body).map_err(|e| ProviderError::Json {
            message: e.to_string(),
        })?;

    let Some(first) = entries.into_iter().next() else {
        return Ok(UNKNOWN_PHASE.to_string());
    };

    if first.error != 0 {
        return Err(ProviderError::Upstream(first.error_msg));
    }

    Ok(first.phase.unwrap_or_else(|| UNKNOWN_PHASE.to_string()))
}

/// Client for the farmsense moon phase API.
#[derive(Debug, Clone)]
pub struct MoonClient {
    http: reqwest::Client,
    base_url: String,
}

impl MoonClient {
    pub fn new(config: MoonConfig) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url,
        })
    }

    /// Phase name for `date`, e.g. "Waxing Crescent".
    pub async fn phase(&self, date: NaiveDate) -> Result<String, ProviderError> {
        let request = self
            .http
            .get(&self.base_url)
            .query(&[("d", noon_timestamp(date))]);

        let body = fetch_body(request).await?;
        parse_phase(&body)
    }
}
