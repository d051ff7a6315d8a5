//! Cache-then-fetch-then-cache resolution for each asset kind.

use std::sync::Arc;
use std::time::Instant;

use futures::future::try_join_all;
use tracing::{debug, warn};

use crate::cache::{AssetCaches, BlobCache, CacheError, CacheKey, CacheStore};
use crate::fetcher::{FetchError, FetchOutcome, RemoteFetcher};
use crate::metrics::{ASSET_FETCHES, ASSET_FETCH_DURATION, CACHE_LOOKUPS, DECODE_FAILURES};

use super::decode::{decode_animation, decode_sprite, AnimatedImage, Sprite};
use super::urls::{AssetUrls, SECONDARY_VARIANTS};
use super::{AssetError, AssetKind};

/// Resolves assets through the disk cache and a remote fetcher.
///
/// Holds no state of its own besides the shared caches, so concurrent calls
/// are independent. Dropping a returned future drops any in-flight request
/// and skips the cache write for that attempt.
#[derive(Clone)]
pub struct AssetResolver {
    caches: Arc<AssetCaches>,
    fetcher: Arc<dyn RemoteFetcher>,
    urls: AssetUrls,
}

impl AssetResolver {
    pub fn new(caches: Arc<AssetCaches>, fetcher: Arc<dyn RemoteFetcher>, urls: AssetUrls) -> Self {
        Self {
            caches,
            fetcher,
            urls,
        }
    }

    pub fn caches(&self) -> &AssetCaches {
        &self.caches
    }

    pub fn urls(&self) -> &AssetUrls {
        &self.urls
    }

    /// Static sprite for a Pokédex number.
    pub async fn sprite(&self, number: u32) -> Result<Option<Sprite>, AssetError> {
        let kind = AssetKind::Sprite;
        let key = CacheKey::from_number(number);
        let url = self.urls.sprite(number);

        let bytes = self
            .cached_or_fetched(&self.caches.sprites, kind, &key, &url)
            .await?;

        Ok(bytes.and_then(|bytes| decoded(kind, &key, decode_sprite(&bytes))))
    }

    /// Primary animation for an alias name.
    pub async fn primary_animation(&self, alias: &str) -> Result<Option<AnimatedImage>, AssetError> {
        let kind = AssetKind::PrimaryAnimation;
        let key = CacheKey::from_alias(alias);
        let url = self.urls.primary_animation(alias);

        let bytes = self
            .cached_or_fetched(&self.caches.primary_animations, kind, &key, &url)
            .await?;

        Ok(bytes.and_then(|bytes| decoded(kind, &key, decode_animation(&bytes))))
    }

    /// Secondary animations (variants 2 to 6) for an alias name.
    ///
    /// All variants are requested at once. Missing variants are skipped; the
    /// first transport error fails the whole batch and drops the remaining
    /// requests. Whatever was found, including nothing, is cached as one set.
    pub async fn secondary_animations(&self, alias: &str) -> Result<Vec<AnimatedImage>, AssetError> {
        let kind = AssetKind::SecondaryAnimation;
        let key = CacheKey::from_alias(alias);
        let cache = &self.caches.secondary_animations;

        if let Some(blobs) = lookup(cache, kind, &key)? {
            return Ok(decode_all(kind, &key, &blobs));
        }

        let requests = SECONDARY_VARIANTS.map(|variant| {
            let url = self.urls.secondary_animation(alias, variant);
            async move {
                self.fetch(kind, &url)
                    .await
                    .map(FetchOutcome::into_payload)
            }
        });

        let payloads: Vec<Vec<u8>> = try_join_all(requests)
            .await?
            .into_iter()
            .flatten()
            .collect();

        debug!(alias = %alias, found = payloads.len(), "Secondary animations fetched");
        cache.put(&key, &payloads)?;

        Ok(decode_all(kind, &key, &payloads))
    }

    async fn cached_or_fetched(
        &self,
        cache: &BlobCache,
        kind: AssetKind,
        key: &CacheKey,
        url: &str,
    ) -> Result<Option<Vec<u8>>, AssetError> {
        if let Some(bytes) = lookup(cache, kind, key)? {
            return Ok(Some(bytes));
        }

        match self.fetch(kind, url).await? {
            FetchOutcome::Payload(bytes) => {
                cache.put(key, &bytes)?;
                Ok(Some(bytes))
            }
            FetchOutcome::KnownAbsent => Ok(None),
        }
    }

    async fn fetch(&self, kind: AssetKind, url: &str) -> Result<FetchOutcome, FetchError> {
        let start = Instant::now();
        let result = self.fetcher.fetch(url).await;
        ASSET_FETCH_DURATION
            .with_label_values(&[kind.label()])
            .observe(start.elapsed().as_secs_f64());

        let outcome = match &result {
            Ok(FetchOutcome::Payload(_)) => "payload",
            Ok(FetchOutcome::KnownAbsent) => "absent",
            Err(e) => {
                warn!(kind = %kind, url = %url, error = %e, "Asset fetch failed");
                "error"
            }
        };
        ASSET_FETCHES
            .with_label_values(&[kind.label(), outcome])
            .inc();

        result
    }
}

fn lookup<C: CacheStore>(
    cache: &C,
    kind: AssetKind,
    key: &CacheKey,
) -> Result<Option<C::Value>, CacheError> {
    let value = cache.get(key)?;
    let result = if value.is_some() { "hit" } else { "miss" };
    CACHE_LOOKUPS
        .with_label_values(&[kind.namespace(), result])
        .inc();
    debug!(kind = %kind, key = %key, result, "Cache lookup");
    Ok(value)
}

fn decoded<T>(kind: AssetKind, key: &CacheKey, value: Option<T>) -> Option<T> {
    if value.is_none() {
        warn!(kind = %kind, key = %key, "Asset bytes could not be decoded");
        DECODE_FAILURES.with_label_values(&[kind.label()]).inc();
    }
    value
}

fn decode_all(kind: AssetKind, key: &CacheKey, blobs: &[Vec<u8>]) -> Vec<AnimatedImage> {
    blobs
        .iter()
        .filter_map(|blob| decoded(kind, key, decode_animation(blob)))
        .collect()
}
