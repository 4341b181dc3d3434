//! Provider error types.

/// Errors from the tide and moon-phase providers.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Provider returned a non-success status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Provider answered 200 but reported an error in the body
    #[error("provider error: {0}")]
    Upstream(String),

    /// Failed to parse response JSON
    #[error("JSON parse error: {message}")]
    Json { message: String },
}
