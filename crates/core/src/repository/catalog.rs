//! Repository backed by the two datasets and the asset resolver.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use futures::future;
use futures::stream::{self, StreamExt, TryStreamExt};
use once_cell::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::assets::{AnimatedImage, AssetResolver, Sprite};
use crate::cache::AssetCaches;
use crate::catalog::{
    parse_aliases, parse_entries, CatalogEntry, DatasetError, DatasetSource, IdentityAliasMap,
};
use crate::config::{Config, ConfigError};
use crate::fetcher::{HttpFetcher, RemoteFetcher};
use crate::metrics::DATASET_LOADS;

use super::{RepoStream, Repository, RepositoryError, RepositoryState};

/// Parsed entries with a number index.
#[derive(Debug)]
struct EntryTable {
    entries: Vec<CatalogEntry>,
    by_number: HashMap<u32, usize>,
}

impl EntryTable {
    fn new(entries: Vec<CatalogEntry>) -> Self {
        let by_number = entries
            .iter()
            .enumerate()
            .map(|(i, e)| (e.number, i))
            .collect();
        Self { entries, by_number }
    }

    fn get(&self, number: u32) -> Option<&CatalogEntry> {
        self.by_number
            .get(&number)
            .and_then(|&i| self.entries.get(i))
    }
}

struct Inner {
    source: DatasetSource,
    entries: OnceCell<EntryTable>,
    aliases: OnceCell<IdentityAliasMap>,
    loads_in_flight: AtomicUsize,
    resolver: AssetResolver,
}

impl Inner {
    fn entries(&self) -> Result<&EntryTable, DatasetError> {
        self.entries.get_or_try_init(|| {
            self.load("entries", || {
                let raw = self.source.read_entries()?;
                parse_entries(&raw).map(EntryTable::new)
            })
        })
    }

    fn aliases(&self) -> Result<&IdentityAliasMap, DatasetError> {
        self.aliases.get_or_try_init(|| {
            self.load("aliases", || {
                let raw = self.source.read_aliases()?;
                parse_aliases(&raw)
            })
        })
    }

    fn load<T>(
        &self,
        dataset: &'static str,
        parse: impl FnOnce() -> Result<T, DatasetError>,
    ) -> Result<T, DatasetError> {
        self.loads_in_flight.fetch_add(1, Ordering::SeqCst);
        let result = parse();
        self.loads_in_flight.fetch_sub(1, Ordering::SeqCst);

        match &result {
            Ok(_) => {
                info!(dataset, "Dataset loaded");
                DATASET_LOADS.with_label_values(&[dataset, "success"]).inc();
            }
            Err(e) => {
                warn!(dataset, error = %e, "Dataset load failed");
                DATASET_LOADS.with_label_values(&[dataset, "failure"]).inc();
            }
        }
        result
    }

    fn alias(&self, number: u32) -> Result<Option<String>, DatasetError> {
        let alias = self.aliases()?.get(number).map(str::to_string);
        if alias.is_none() {
            debug!(number, "No alias for entry");
        }
        Ok(alias)
    }

    fn state(&self) -> RepositoryState {
        if self.entries.get().is_some() && self.aliases.get().is_some() {
            RepositoryState::DatasetsReady
        } else if self.loads_in_flight.load(Ordering::SeqCst) > 0 {
            RepositoryState::DatasetsLoading
        } else {
            RepositoryState::Uninitialized
        }
    }
}

/// The catalog repository.
///
/// Cheap to clone; clones share datasets and caches. Datasets are parsed on
/// first use and kept for the lifetime of the repository. A failed parse is
/// not remembered, so the next query retries it.
#[derive(Clone)]
pub struct CatalogRepository {
    inner: Arc<Inner>,
}

impl CatalogRepository {
    pub fn new(source: DatasetSource, resolver: AssetResolver) -> Self {
        Self {
            inner: Arc::new(Inner {
                source,
                entries: OnceCell::new(),
                aliases: OnceCell::new(),
                loads_in_flight: AtomicUsize::new(0),
                resolver,
            }),
        }
    }

    /// Build a repository with an HTTP fetcher from configuration.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let fetcher: Arc<dyn RemoteFetcher> = Arc::new(HttpFetcher::new(config.fetcher.clone()));
        Self::with_fetcher(config, fetcher)
    }

    /// Build a repository from configuration with a caller-supplied fetcher.
    pub fn with_fetcher(
        config: &Config,
        fetcher: Arc<dyn RemoteFetcher>,
    ) -> Result<Self, ConfigError> {
        let caches = Arc::new(AssetCaches::new(&config.cache.root_dir()?));
        let resolver = AssetResolver::new(caches, fetcher, config.endpoints.urls());
        Ok(Self::new(config.datasets.source(), resolver))
    }

    /// Current dataset lifecycle state.
    pub fn state(&self) -> RepositoryState {
        self.inner.state()
    }

    pub fn resolver(&self) -> &AssetResolver {
        &self.inner.resolver
    }

    /// Stream of one value computed from `inner`, started on first poll.
    fn once<T, F, Fut>(&self, f: F) -> RepoStream<T>
    where
        T: Send + 'static,
        F: FnOnce(Arc<Inner>) -> Fut + Send + 'static,
        Fut: future::Future<Output = Result<T, RepositoryError>> + Send + 'static,
    {
        let inner = Arc::clone(&self.inner);
        stream::once(async move { f(inner).await }).boxed()
    }

    /// Like [`once`](Self::once), but `None` completes the stream empty.
    fn once_if_aliased<T, F, Fut>(&self, number: u32, f: F) -> RepoStream<T>
    where
        T: Send + 'static,
        F: FnOnce(Arc<Inner>, String) -> Fut + Send + 'static,
        Fut: future::Future<Output = Result<T, RepositoryError>> + Send + 'static,
    {
        self.once(move |inner| async move {
            match inner.alias(number)? {
                Some(alias) => f(inner, alias).await.map(Some),
                None => Ok(None),
            }
        })
        .try_filter_map(|value| future::ready(Ok(value)))
        .boxed()
    }
}

impl Repository for CatalogRepository {
    fn load_all(&self) -> RepoStream<()> {
        self.once(|inner| async move {
            inner.entries()?;
            inner.aliases()?;
            Ok::<_, RepositoryError>(())
        })
        .try_filter_map(|()| future::ready(Ok(None::<()>)))
        .boxed()
    }

    fn find_all(&self) -> RepoStream<Vec<CatalogEntry>> {
        self.once(|inner| async move {
            Ok::<_, RepositoryError>(inner.entries()?.entries.clone())
        })
    }

    fn find(&self, number: u32) -> RepoStream<Option<CatalogEntry>> {
        self.once(move |inner| async move {
            Ok::<_, RepositoryError>(inner.entries()?.get(number).cloned())
        })
    }

    fn find_sprite(&self, number: u32) -> RepoStream<Option<Sprite>> {
        self.once(move |inner| async move {
            Ok::<_, RepositoryError>(inner.resolver.sprite(number).await?)
        })
    }

    fn find_primary_animation(&self, number: u32) -> RepoStream<Option<AnimatedImage>> {
        self.once_if_aliased(number, |inner, alias| async move {
            Ok::<_, RepositoryError>(inner.resolver.primary_animation(&alias).await?)
        })
    }

    fn find_other_animations(&self, number: u32) -> RepoStream<Vec<AnimatedImage>> {
        self.once_if_aliased(number, |inner, alias| async move {
            Ok::<_, RepositoryError>(inner.resolver.secondary_animations(&alias).await?)
        })
    }
}
