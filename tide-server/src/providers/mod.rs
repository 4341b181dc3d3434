//! External data providers.
//!
//! Thin clients for the NOAA CO-OPS tide predictions API and the farmsense
//! moon-phase API. Each lookup is a single GET returning JSON; there is no
//! retry and no caching.

mod error;
mod moon;
mod tides;

#[cfg(test)]
pub(crate) mod stub;

pub use error::ProviderError;
pub use moon::{MoonClient, MoonConfig, UNKNOWN_PHASE};
pub use tides::{TideClient, TideConfig, TideDate, TideDay, TidePrediction};

/// Send a request and return the body of a successful response.
async fn fetch_body(request: reqwest::RequestBuilder) -> Result<String, ProviderError> {
    let response = request.send().await?;
    let status = response.status();

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ProviderError::Api {
            status: status.as_u16(),
            message: body,
        });
    }

    Ok(response.text().await?)
}
