//! Remote asset fetching.
//!
//! A fetch is a single HTTP GET whose result is one of three things: the
//! payload, a known absence (404 or malformed URL), or a transient
//! [`FetchError`] that the caller should surface but not cache.
//!
//! Cancellation is dropping the fetch future: the request is aborted and
//! nothing is reported.

mod http;

pub use http::{HttpFetcher, HttpFetcherConfig};

use async_trait::async_trait;
use thiserror::Error;

/// Successful result of a fetch attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Response body, whatever the status code (except 404).
    Payload(Vec<u8>),
    /// The resource does not exist.
    KnownAbsent,
}

impl FetchOutcome {
    /// Payload bytes, if any.
    pub fn into_payload(self) -> Option<Vec<u8>> {
        match self {
            FetchOutcome::Payload(bytes) => Some(bytes),
            FetchOutcome::KnownAbsent => None,
        }
    }
}

/// Transient failure while fetching.
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP client error (DNS, TLS, timeout, connection reset, body read).
    #[error("Request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Any other transport failure.
    #[error("Request to {url} failed: {message}")]
    Transport { url: String, message: String },
}

impl FetchError {
    /// URL of the failed request.
    pub fn url(&self) -> &str {
        match self {
            FetchError::Http { url, .. } | FetchError::Transport { url, .. } => url,
        }
    }
}

/// Performs single GET requests for asset bytes.
#[async_trait]
pub trait RemoteFetcher: Send + Sync {
    /// Fetch `url` once.
    ///
    /// Dropping the returned future aborts the request.
    async fn fetch(&self, url: &str) -> Result<FetchOutcome, FetchError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_payload() {
        assert_eq!(
            FetchOutcome::Payload(vec![1, 2]).into_payload(),
            Some(vec![1, 2])
        );
        assert_eq!(FetchOutcome::KnownAbsent.into_payload(), None);
    }

    #[test]
    fn test_error_url() {
        let err = FetchError::Transport {
            url: "http://example.com/a.gif".to_string(),
            message: "connection reset".to_string(),
        };
        assert_eq!(err.url(), "http://example.com/a.gif");
        assert!(err.to_string().contains("connection reset"));
    }
}
