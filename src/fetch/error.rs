use thiserror::Error;

/// Transport-level failures. HTTP error statuses are not errors here; they
/// come back as a [`FetchResponse`](super::FetchResponse) with `ok() == false`.
#[derive(Debug, Error)]
pub enum FetchError {
    /// reqwest failed to send the request or read the body
    #[error("Request to '{url}' failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Request exceeded the configured total timeout
    #[error("Request to '{url}' timed out after {duration}s")]
    Timeout { url: String, duration: u64 },

    /// Any other network failure, e.g. from a test double
    #[error("Network error for '{url}': {message}")]
    Network { url: String, message: String },
}

impl FetchError {
    /// URL of the request that failed.
    pub fn url(&self) -> &str {
        match self {
            FetchError::Request { url, .. }
            | FetchError::Timeout { url, .. }
            | FetchError::Network { url, .. } => url,
        }
    }
}
