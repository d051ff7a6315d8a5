pub mod assets;
pub mod cache;
pub mod catalog;
pub mod config;
pub mod fetcher;
pub mod metrics;
pub mod repository;
pub mod streams;
pub mod subscription;
pub mod testing;
pub mod usecase;

pub use assets::{AnimatedImage, AssetError, AssetKind, AssetResolver, AssetUrls, Sprite};
pub use cache::{AssetCaches, BlobCache, BlobSetCache, CacheError, CacheKey, CacheStore};
pub use catalog::{
    BaseStats, Categories, CatalogEntry, CatalogOrder, CategoryTag, DatasetError, DatasetSource,
    IdentityAliasMap,
};
pub use config::{
    load_config, load_config_from_str, validate_config, CacheConfig, Config, ConfigError,
    DatasetsConfig, EndpointsConfig,
};
pub use fetcher::{FetchError, FetchOutcome, HttpFetcher, HttpFetcherConfig, RemoteFetcher};
pub use repository::{
    CatalogRepository, RepoStream, Repository, RepositoryError, RepositoryState,
};
pub use streams::{materialize, zip2, StreamEvent};
pub use subscription::{subscribe, Subscription};
pub use usecase::{DetailUseCase, LaunchUseCase, TableDataSourceUseCase, TableUseCase};
