//! Mock remote fetcher for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Notify, RwLock, Semaphore};

use crate::fetcher::{FetchError, FetchOutcome, RemoteFetcher};

use super::fixtures;

/// Canned response for one URL.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Body returned as a payload.
    Payload(Vec<u8>),
    /// 404.
    NotFound,
    /// Transport failure with this message.
    Error(String),
}

impl MockResponse {
    pub fn payload(bytes: Vec<u8>) -> Self {
        Self::Payload(bytes)
    }

    /// A valid PNG of the given size.
    pub fn png(width: u32, height: u32) -> Self {
        Self::Payload(fixtures::png_bytes(width, height))
    }

    /// A valid GIF with `frames` frames.
    pub fn gif(frames: usize) -> Self {
        Self::Payload(fixtures::gif_bytes(frames))
    }

    pub fn error(message: &str) -> Self {
        Self::Error(message.to_string())
    }
}

/// Handle on a gate installed with [`MockFetcher::hold`].
///
/// While a gate is installed every fetch parks after recording its call,
/// until [`FetchGate::release`] is called.
#[derive(Debug, Clone)]
pub struct FetchGate {
    entered: Arc<Notify>,
    released: Arc<Semaphore>,
}

impl FetchGate {
    fn new() -> Self {
        Self {
            entered: Arc::new(Notify::new()),
            released: Arc::new(Semaphore::new(0)),
        }
    }

    /// Wait until at least one fetch has reached the gate.
    pub async fn entered(&self) {
        self.entered.notified().await;
    }

    /// Let every parked and future fetch through.
    pub fn release(&self) {
        self.released.add_permits(1 << 20);
    }

    async fn pass(&self) {
        self.entered.notify_one();
        // The semaphore is never closed.
        let _ = self.released.acquire().await;
    }
}

/// Mock implementation of the RemoteFetcher trait.
///
/// Provides controllable behavior for testing:
/// - Route URLs to payloads, 404s or transport errors
/// - Count and record requested URLs
/// - Park requests in flight to exercise cancellation
///
/// Unrouted URLs answer 404.
///
/// # Example
///
/// ```rust,ignore
/// use pokedex_core::testing::{MockFetcher, MockResponse};
///
/// let fetcher = MockFetcher::new();
/// fetcher.respond("http://sprites.test/025MS.png", MockResponse::png(2, 2)).await;
///
/// let outcome = fetcher.fetch("http://sprites.test/025MS.png").await?;
/// assert_eq!(fetcher.call_count("http://sprites.test/025MS.png").await, 1);
/// ```
#[derive(Debug)]
pub struct MockFetcher {
    /// Responses by URL.
    routes: Arc<RwLock<HashMap<String, MockResponse>>>,
    /// Requested URLs in call order.
    calls: Arc<RwLock<Vec<String>>>,
    /// Installed gate, if any.
    gate: Arc<RwLock<Option<FetchGate>>>,
}

impl Default for MockFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl MockFetcher {
    /// Create a mock that answers 404 for everything.
    pub fn new() -> Self {
        Self {
            routes: Arc::new(RwLock::new(HashMap::new())),
            calls: Arc::new(RwLock::new(Vec::new())),
            gate: Arc::new(RwLock::new(None)),
        }
    }

    // =========================================================================
    // Configuration
    // =========================================================================

    /// Route `url` to `response`.
    pub async fn respond(&self, url: &str, response: MockResponse) {
        self.routes.write().await.insert(url.to_string(), response);
    }

    /// Remove every route.
    pub async fn clear_routes(&self) {
        self.routes.write().await.clear();
    }

    /// Park all subsequent fetches until the returned gate is released.
    pub async fn hold(&self) -> FetchGate {
        let gate = FetchGate::new();
        *self.gate.write().await = Some(gate.clone());
        gate
    }

    // =========================================================================
    // Assertions
    // =========================================================================

    /// All requested URLs in call order.
    pub async fn calls(&self) -> Vec<String> {
        self.calls.read().await.clone()
    }

    /// Number of requests for `url`.
    pub async fn call_count(&self, url: &str) -> usize {
        self.calls.read().await.iter().filter(|c| *c == url).count()
    }

    /// Number of requests overall.
    pub async fn total_calls(&self) -> usize {
        self.calls.read().await.len()
    }

    /// Forget recorded calls.
    pub async fn clear_calls(&self) {
        self.calls.write().await.clear();
    }
}

#[async_trait]
impl RemoteFetcher for MockFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchOutcome, FetchError> {
        self.calls.write().await.push(url.to_string());

        let gate = self.gate.read().await.clone();
        if let Some(gate) = gate {
            gate.pass().await;
        }

        match self.routes.read().await.get(url).cloned() {
            Some(MockResponse::Payload(bytes)) => Ok(FetchOutcome::Payload(bytes)),
            Some(MockResponse::NotFound) | None => Ok(FetchOutcome::KnownAbsent),
            Some(MockResponse::Error(message)) => Err(FetchError::Transport {
                url: url.to_string(),
                message,
            }),
        }
    }
}
