//! reqwest-based fetcher.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{FetchError, FetchOutcome, RemoteFetcher};

/// HTTP fetcher configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpFetcherConfig {
    /// Request timeout in seconds (default: 30).
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// User-Agent header sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("pokedex/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for HttpFetcherConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

/// Fetches assets over HTTP.
///
/// Every call builds its own client with no connection pooling, so nothing
/// (cookies, connections, credentials) carries over between requests.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    config: HttpFetcherConfig,
}

impl HttpFetcher {
    pub fn new(config: HttpFetcherConfig) -> Self {
        Self { config }
    }

    pub fn with_defaults() -> Self {
        Self::new(HttpFetcherConfig::default())
    }

    fn session(&self, url: &str) -> Result<Client, FetchError> {
        Client::builder()
            .user_agent(&self.config.user_agent)
            .timeout(Duration::from_secs(self.config.timeout_secs))
            .pool_max_idle_per_host(0)
            .build()
            .map_err(|source| FetchError::Http {
                url: url.to_string(),
                source,
            })
    }
}

#[async_trait]
impl RemoteFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchOutcome, FetchError> {
        let parsed = match Url::parse(url) {
            Ok(parsed) => parsed,
            Err(e) => {
                debug!(url = %url, error = %e, "Malformed asset URL, treating as absent");
                return Ok(FetchOutcome::KnownAbsent);
            }
        };

        let client = self.session(url)?;
        let response = client
            .get(parsed)
            .send()
            .await
            .map_err(|source| FetchError::Http {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            debug!(url = %url, "Asset not found");
            return Ok(FetchOutcome::KnownAbsent);
        }

        let body = response.bytes().await.map_err(|source| FetchError::Http {
            url: url.to_string(),
            source,
        })?;

        debug!(url = %url, status = status.as_u16(), bytes = body.len(), "Fetched asset");
        Ok(FetchOutcome::Payload(body.to_vec()))
    }
}
