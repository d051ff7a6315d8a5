use std::sync::Arc;

use futures::future;
use futures::stream::{StreamExt, TryStreamExt};

use crate::assets::{AnimatedImage, Sprite};
use crate::catalog::{CatalogEntry, CatalogOrder};
use crate::repository::{RepoStream, Repository};

/// Queries behind the entry list screen.
#[derive(Clone)]
pub struct TableUseCase {
    repository: Arc<dyn Repository>,
}

impl TableUseCase {
    pub fn new(repository: Arc<dyn Repository>) -> Self {
        Self { repository }
    }

    /// Every entry in dataset order.
    pub fn find_all(&self) -> RepoStream<Vec<CatalogEntry>> {
        self.repository.find_all()
    }

    /// Every entry in the given order.
    pub fn find_all_sorted(&self, order: CatalogOrder) -> RepoStream<Vec<CatalogEntry>> {
        self.repository
            .find_all()
            .map_ok(move |mut entries| {
                order.sort(&mut entries);
                entries
            })
            .boxed()
    }

    /// Primary animation shown next to an entry.
    pub fn find_image(&self, number: u32) -> RepoStream<Option<AnimatedImage>> {
        self.repository.find_primary_animation(number)
    }
}

/// Per-row sprite loading for the entry list.
#[derive(Clone)]
pub struct TableDataSourceUseCase {
    repository: Arc<dyn Repository>,
}

impl TableDataSourceUseCase {
    pub fn new(repository: Arc<dyn Repository>) -> Self {
        Self { repository }
    }

    /// The row's sprite. Emits nothing when the host has no sprite.
    pub fn find_sprite(&self, number: u32) -> RepoStream<Sprite> {
        self.repository
            .find_sprite(number)
            .try_filter_map(|sprite| future::ready(Ok(sprite)))
            .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{AssetResolver, AssetUrls};
    use crate::cache::AssetCaches;
    use crate::fetcher::RemoteFetcher;
    use crate::repository::CatalogRepository;
    use crate::testing::{fixtures, MockFetcher, MockResponse};
    use tempfile::TempDir;

    struct Harness {
        repository: Arc<dyn Repository>,
        fetcher: Arc<MockFetcher>,
        _temp: TempDir,
    }

    fn harness() -> Harness {
        let temp = TempDir::new().unwrap();
        let fetcher = Arc::new(MockFetcher::new());
        let resolver = AssetResolver::new(
            Arc::new(AssetCaches::new(temp.path())),
            Arc::clone(&fetcher) as Arc<dyn RemoteFetcher>,
            AssetUrls::new("http://sprites.test", "http://gifs.test"),
        );
        let source = fixtures::dataset_source(
            &[
                fixtures::entry_with_stats(2, "Ivysaur", 60),
                fixtures::entry_with_stats(1, "Bulbasaur", 45),
                fixtures::entry_with_stats(3, "Venusaur", 80),
            ],
            &[(1, "Bulbasaur"), (2, "Ivysaur"), (3, "Venusaur")],
        );
        Harness {
            repository: Arc::new(CatalogRepository::new(source, resolver)),
            fetcher,
            _temp: temp,
        }
    }

    fn numbers(entries: &[CatalogEntry]) -> Vec<u32> {
        entries.iter().map(|e| e.number).collect()
    }

    #[tokio::test]
    async fn test_find_all_keeps_dataset_order() {
        let h = harness();
        let table = TableUseCase::new(Arc::clone(&h.repository));

        let entries = table.find_all().try_next().await.unwrap().unwrap();

        assert_eq!(numbers(&entries), vec![2, 1, 3]);
    }

    #[tokio::test]
    async fn test_find_all_sorted_each_order() {
        let h = harness();
        let table = TableUseCase::new(Arc::clone(&h.repository));

        let by_number = table
            .find_all_sorted(CatalogOrder::Number)
            .try_next()
            .await
            .unwrap()
            .unwrap();
        let by_name = table
            .find_all_sorted(CatalogOrder::Name)
            .try_next()
            .await
            .unwrap()
            .unwrap();
        let by_total = table
            .find_all_sorted(CatalogOrder::TotalStats)
            .try_next()
            .await
            .unwrap()
            .unwrap();

        assert_eq!(numbers(&by_number), vec![1, 2, 3]);
        assert_eq!(numbers(&by_name), vec![1, 2, 3]);
        assert_eq!(numbers(&by_total), vec![3, 2, 1]);
    }

    #[tokio::test]
    async fn test_find_image_is_primary_animation() {
        let h = harness();
        h.fetcher
            .respond("http://gifs.test/ivysaur.gif", MockResponse::gif(2))
            .await;
        let table = TableUseCase::new(Arc::clone(&h.repository));

        let image = table.find_image(2).try_next().await.unwrap().unwrap();

        assert_eq!(image.unwrap().frame_count(), 2);
    }

    #[tokio::test]
    async fn test_data_source_filters_missing_sprites() {
        let h = harness();
        h.fetcher
            .respond("http://sprites.test/001MS.png", MockResponse::png(4, 4))
            .await;
        let data_source = TableDataSourceUseCase::new(Arc::clone(&h.repository));

        let present: Vec<_> = data_source.find_sprite(1).collect().await;
        let missing: Vec<_> = data_source.find_sprite(2).collect().await;

        assert_eq!(present.len(), 1);
        assert_eq!(present[0].as_ref().unwrap().width(), 4);
        assert!(missing.is_empty());
    }
}
