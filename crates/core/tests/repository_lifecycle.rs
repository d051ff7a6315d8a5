//! Repository lifecycle integration tests.
//!
//! These tests drive the public repository and use-case streams against a
//! mock fetcher and a temporary cache root:
//! - Dataset loading and lookups over the bundled data
//! - Cache-then-fetch behavior for every asset kind
//! - Fail-fast secondary batches
//! - Cancellation through `Subscription` and by dropping streams

use std::sync::Arc;
use std::time::Duration;

use futures::{StreamExt, TryStreamExt};
use tempfile::TempDir;

use pokedex_core::{
    subscribe, AssetCaches, AssetResolver, AssetUrls, CacheKey, CacheStore, CatalogRepository,
    DatasetSource, DetailUseCase, RemoteFetcher, Repository, RepositoryError, RepositoryState,
    TableUseCase,
    testing::{fixtures, MockFetcher, MockResponse},
};

const SPRITES: &str = "http://sprites.test";
const GIFS: &str = "http://gifs.test";

/// Test helper wiring a repository to a mock fetcher.
struct TestHarness {
    repository: Arc<CatalogRepository>,
    fetcher: Arc<MockFetcher>,
    caches: Arc<AssetCaches>,
    _cache_dir: TempDir,
}

impl TestHarness {
    fn new() -> Self {
        Self::with_source(DatasetSource::Bundled)
    }

    fn with_source(source: DatasetSource) -> Self {
        let cache_dir = TempDir::new().expect("Failed to create cache dir");
        let caches = Arc::new(AssetCaches::new(cache_dir.path()));
        let fetcher = Arc::new(MockFetcher::new());
        let resolver = AssetResolver::new(
            Arc::clone(&caches),
            Arc::clone(&fetcher) as Arc<dyn RemoteFetcher>,
            AssetUrls::new(SPRITES, GIFS),
        );

        Self {
            repository: Arc::new(CatalogRepository::new(source, resolver)),
            fetcher,
            caches,
            _cache_dir: cache_dir,
        }
    }

    fn shared(&self) -> Arc<dyn Repository> {
        Arc::clone(&self.repository) as Arc<dyn Repository>
    }
}

fn gif(alias: &str) -> String {
    format!("{}/{}.gif", GIFS, alias)
}

fn secondary_gif(alias: &str, variant: u8) -> String {
    format!("{}/{}-{}.gif", GIFS, alias, variant)
}

// =============================================================================
// Datasets
// =============================================================================

#[tokio::test]
async fn test_bundled_find_matches_find_all() {
    let harness = TestHarness::new();

    let entries = harness
        .repository
        .find_all()
        .try_next()
        .await
        .unwrap()
        .unwrap();

    assert!(!entries.is_empty());
    for entry in &entries {
        let found = harness
            .repository
            .find(entry.number)
            .try_next()
            .await
            .unwrap()
            .unwrap()
            .expect("entry should be found by its number");
        assert_eq!(found.number, entry.number);
        assert_eq!(found.name, entry.name);

        let again = harness
            .repository
            .find(entry.number)
            .try_next()
            .await
            .unwrap()
            .unwrap();
        assert_eq!(again, Some(found));
    }
}

#[tokio::test]
async fn test_bundled_find_all_has_no_duplicates() {
    let harness = TestHarness::new();

    let entries = harness
        .repository
        .find_all()
        .try_next()
        .await
        .unwrap()
        .unwrap();

    let mut numbers: Vec<u32> = entries.iter().map(|e| e.number).collect();
    let in_order = numbers.clone();
    numbers.sort_unstable();
    numbers.dedup();
    assert_eq!(numbers.len(), entries.len());
    assert_eq!(in_order, numbers, "bundled data is in number order");

    // No. 26 appears twice in the bundled data; the first record wins.
    let raichu = entries.iter().find(|e| e.number == 26).unwrap();
    assert_eq!(raichu.name, "ライチュウ");
}

#[tokio::test]
async fn test_state_machine_over_load() {
    let harness = TestHarness::new();
    assert_eq!(harness.repository.state(), RepositoryState::Uninitialized);

    let loaded: Vec<_> = harness.repository.load_all().collect().await;

    assert!(loaded.is_empty(), "load_all completes without an item");
    assert_eq!(harness.repository.state(), RepositoryState::DatasetsReady);
}

// =============================================================================
// Alias overrides
// =============================================================================

#[tokio::test]
async fn test_alias_override_on_bundled_data() {
    let harness = TestHarness::new();

    let _ = harness
        .repository
        .find_primary_animation(29)
        .collect::<Vec<_>>()
        .await;
    let _ = harness
        .repository
        .find_primary_animation(32)
        .collect::<Vec<_>>()
        .await;

    let calls = harness.fetcher.calls().await;
    assert_eq!(calls, vec![gif("nidoranf"), gif("nidoranm")]);
}

#[tokio::test]
async fn test_alias_override_ignores_dataset_names() {
    let harness = TestHarness::with_source(fixtures::dataset_source(
        &[fixtures::entry(29, "Nidoran F"), fixtures::entry(32, "Nidoran M")],
        &[(29, "Nidoran♀"), (32, "Nidoran♂")],
    ));
    harness
        .fetcher
        .respond(&gif("nidoranm"), MockResponse::gif(2))
        .await;

    let animation = harness
        .repository
        .find_primary_animation(32)
        .try_next()
        .await
        .unwrap()
        .unwrap();

    assert_eq!(animation.unwrap().frame_count(), 2);
    assert_eq!(harness.fetcher.calls().await, vec![gif("nidoranm")]);
}

// =============================================================================
// Cache-then-fetch
// =============================================================================

#[tokio::test]
async fn test_each_asset_fetched_at_most_once() {
    let harness = TestHarness::new();
    harness
        .fetcher
        .respond(&format!("{}/025MS.png", SPRITES), MockResponse::png(8, 8))
        .await;
    harness
        .fetcher
        .respond(&gif("pikachu"), MockResponse::gif(2))
        .await;
    harness
        .fetcher
        .respond(&secondary_gif("pikachu", 2), MockResponse::gif(1))
        .await;

    for _ in 0..2 {
        let sprite = harness.repository.find_sprite(25).try_next().await.unwrap();
        assert!(sprite.unwrap().is_some());

        let primary = harness
            .repository
            .find_primary_animation(25)
            .try_next()
            .await
            .unwrap();
        assert!(primary.unwrap().is_some());

        let others = harness
            .repository
            .find_other_animations(25)
            .try_next()
            .await
            .unwrap();
        assert_eq!(others.unwrap().len(), 1);
    }

    // 1 sprite + 1 primary + 5 secondary variants, all from the first pass.
    assert_eq!(harness.fetcher.total_calls().await, 7);
}

#[tokio::test]
async fn test_404_is_absence_for_every_kind() {
    let harness = TestHarness::new();

    let sprite = harness.repository.find_sprite(1).try_next().await.unwrap();
    let primary = harness
        .repository
        .find_primary_animation(1)
        .try_next()
        .await
        .unwrap();
    let others = harness
        .repository
        .find_other_animations(1)
        .try_next()
        .await
        .unwrap();

    assert!(matches!(sprite, Some(None)));
    assert!(matches!(primary, Some(None)));
    assert!(others.unwrap().is_empty());

    assert!(!harness.caches.sprites.contains(&CacheKey::from_number(1)));
    assert!(!harness
        .caches
        .primary_animations
        .contains(&CacheKey::from_alias("bulbasaur")));
}

#[tokio::test]
async fn test_secondary_batch_fails_fast() {
    let harness = TestHarness::new();
    harness
        .fetcher
        .respond(&secondary_gif("pikachu", 4), MockResponse::error("connection reset"))
        .await;

    let result = harness
        .repository
        .find_other_animations(25)
        .try_next()
        .await;

    let err = result.unwrap_err();
    assert!(matches!(err, RepositoryError::Asset(_)));
    assert!(!err.is_fatal());
    assert!(!harness
        .caches
        .secondary_animations
        .contains(&CacheKey::from_alias("pikachu")));
}

#[tokio::test]
async fn test_detail_images_combine_primary_and_secondaries() {
    let harness = TestHarness::new();
    harness
        .fetcher
        .respond(&gif("charmander"), MockResponse::gif(1))
        .await;
    harness
        .fetcher
        .respond(&secondary_gif("charmander", 2), MockResponse::gif(2))
        .await;
    let detail = DetailUseCase::new(harness.shared());

    let images = detail.find_all_images(4).try_next().await.unwrap().unwrap();

    let frames: Vec<_> = images.iter().map(|a| a.frame_count()).collect();
    assert_eq!(frames, vec![1, 2]);
}

#[tokio::test]
async fn test_table_sorted_by_total_stats() {
    let harness = TestHarness::new();
    let table = TableUseCase::new(harness.shared());

    let entries = table
        .find_all_sorted(pokedex_core::CatalogOrder::TotalStats)
        .try_next()
        .await
        .unwrap()
        .unwrap();

    let totals: Vec<u32> = entries.iter().map(|e| e.base_stats.total()).collect();
    assert!(totals.windows(2).all(|w| w[0] >= w[1]));
}

// =============================================================================
// Cancellation
// =============================================================================

#[tokio::test]
async fn test_cancel_mid_fetch_writes_nothing() {
    let harness = TestHarness::new();
    harness
        .fetcher
        .respond(&format!("{}/025MS.png", SPRITES), MockResponse::png(2, 2))
        .await;
    let gate = harness.fetcher.hold().await;

    let (subscription, mut rx) = subscribe(harness.repository.find_sprite(25));
    gate.entered().await;

    subscription.cancel();
    subscription.join().await;
    gate.release();

    assert!(rx.recv().await.is_none());
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(!harness.caches.sprites.contains(&CacheKey::from_number(25)));
    assert_eq!(harness.fetcher.total_calls().await, 1);
}

#[tokio::test]
async fn test_dropping_stream_mid_batch_writes_nothing() {
    let harness = TestHarness::new();
    harness
        .fetcher
        .respond(&secondary_gif("pikachu", 2), MockResponse::gif(1))
        .await;
    let gate = harness.fetcher.hold().await;

    let mut stream = harness.repository.find_other_animations(25);
    let pending = tokio::time::timeout(Duration::from_millis(50), stream.next()).await;
    assert!(pending.is_err(), "batch should still be in flight");
    drop(stream);

    gate.release();
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(!harness
        .caches
        .secondary_animations
        .contains(&CacheKey::from_alias("pikachu")));
}

#[tokio::test]
async fn test_resubscribe_after_cancel_fetches_again() {
    let harness = TestHarness::new();
    harness
        .fetcher
        .respond(&gif("pikachu"), MockResponse::gif(3))
        .await;
    let gate = harness.fetcher.hold().await;

    let (subscription, _rx) = subscribe(harness.repository.find_primary_animation(25));
    gate.entered().await;
    drop(subscription);
    gate.release();

    let (subscription, mut rx) = subscribe(harness.repository.find_primary_animation(25));
    let animation = rx.recv().await.unwrap().unwrap().unwrap();
    subscription.join().await;

    assert_eq!(animation.frame_count(), 3);
    assert_eq!(harness.fetcher.call_count(&gif("pikachu")).await, 2);
    assert!(harness
        .caches
        .primary_animations
        .contains(&CacheKey::from_alias("pikachu")));
}
