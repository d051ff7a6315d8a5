//! The catalog repository: datasets plus asset resolution behind cold streams.
//!
//! Every query returns a [`RepoStream`] that does nothing until polled and
//! re-runs its lookup for each subscriber. Datasets are loaded at most once
//! per repository; assets go through the disk cache on every call.

mod catalog;

pub use catalog::CatalogRepository;

use std::fmt;

use futures::stream::BoxStream;
use thiserror::Error;

use crate::assets::{AnimatedImage, AssetError, Sprite};
use crate::cache::CacheError;
use crate::catalog::{CatalogEntry, DatasetError};

/// A cold, fallible stream of repository results.
pub type RepoStream<T> = BoxStream<'static, Result<T, RepositoryError>>;

/// Errors surfaced by repository streams.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// A dataset could not be loaded.
    #[error(transparent)]
    Dataset(#[from] DatasetError),

    /// An asset could not be resolved.
    #[error(transparent)]
    Asset(#[from] AssetError),
}

impl RepositoryError {
    /// Whether retrying cannot help.
    ///
    /// Dataset and cache failures are fatal; network failures are not.
    pub fn is_fatal(&self) -> bool {
        match self {
            RepositoryError::Dataset(_) => true,
            RepositoryError::Asset(e) => !e.is_transient(),
        }
    }
}

impl From<CacheError> for RepositoryError {
    fn from(e: CacheError) -> Self {
        RepositoryError::Asset(AssetError::Cache(e))
    }
}

/// Dataset lifecycle of a repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryState {
    /// Nothing loaded yet, or the last load failed.
    Uninitialized,
    /// A dataset parse is running. Parsing is synchronous, so only other
    /// threads (or the parse itself) observe this.
    DatasetsLoading,
    /// Both datasets are resident.
    DatasetsReady,
}

impl fmt::Display for RepositoryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RepositoryState::Uninitialized => "uninitialized",
            RepositoryState::DatasetsLoading => "datasets_loading",
            RepositoryState::DatasetsReady => "datasets_ready",
        };
        f.write_str(s)
    }
}

/// Read access to the catalog and its assets.
///
/// All methods return cold streams. Dropping a stream before it finishes
/// cancels any in-flight fetch; nothing is written to the cache for that
/// attempt.
pub trait Repository: Send + Sync {
    /// Load both datasets. Completes without emitting once they are
    /// resident; a load failure is the only item.
    fn load_all(&self) -> RepoStream<()>;

    /// Every entry, de-duplicated by number, in dataset order.
    fn find_all(&self) -> RepoStream<Vec<CatalogEntry>>;

    /// The entry with this number, or `None`.
    fn find(&self, number: u32) -> RepoStream<Option<CatalogEntry>>;

    /// Static sprite for this number, or `None` if the host has none.
    fn find_sprite(&self, number: u32) -> RepoStream<Option<Sprite>>;

    /// Primary animation for this number.
    ///
    /// Completes without emitting if the number has no alias.
    fn find_primary_animation(&self, number: u32) -> RepoStream<Option<AnimatedImage>>;

    /// Secondary animations for this number, possibly empty.
    ///
    /// Completes without emitting if the number has no alias.
    fn find_other_animations(&self, number: u32) -> RepoStream<Vec<AnimatedImage>>;
}
