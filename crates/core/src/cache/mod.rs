//! Disk cache for downloaded asset bytes.
//!
//! Each cache lives in a namespace directory under a common root. Entries
//! are addressed by a [`CacheKey`] and are never expired or evicted: the
//! presence of the file (or directory, for blob sets) is the only signal
//! that an entry exists.
//!
//! # Layout
//!
//! ```text
//! <root>/Pokemon Sprites/25                 single blob
//! <root>/Primary Pokemon GIFs/pikachu       single blob
//! <root>/Other Pokemon GIFs/pikachu/0       blob set, one file per element
//! <root>/Other Pokemon GIFs/pikachu/1
//! ```

mod disk;

pub use disk::{AssetCaches, BlobCache, BlobSetCache, DiskNamespace};

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Namespace directory for static sprites.
pub const SPRITE_NAMESPACE: &str = "Pokemon Sprites";
/// Namespace directory for primary animations.
pub const PRIMARY_ANIMATION_NAMESPACE: &str = "Primary Pokemon GIFs";
/// Namespace directory for secondary animation sets.
pub const SECONDARY_ANIMATION_NAMESPACE: &str = "Other Pokemon GIFs";

/// Errors from the disk cache.
///
/// Absence is not an error; these only cover structural failures, which the
/// caller should treat as fatal.
#[derive(Debug, Error)]
pub enum CacheError {
    /// Namespace or key directory could not be created.
    #[error("Failed to create cache directory: {path}")]
    DirectoryCreationFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Existing entry could not be read.
    #[error("Failed to read cache entry: {path}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Entry could not be written.
    #[error("Failed to write cache entry: {path}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Name of a cache entry inside a namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Build a key from an arbitrary string.
    ///
    /// Path separators are replaced so the key always names a single entry
    /// directly inside its namespace.
    pub fn new(raw: impl AsRef<str>) -> Self {
        let key: String = raw
            .as_ref()
            .chars()
            .map(|c| if c == '/' || c == '\\' { '_' } else { c })
            .collect();
        match key.as_str() {
            "" | "." | ".." => Self(format!("_{}", key)),
            _ => Self(key),
        }
    }

    /// Key for assets addressed by Pokédex number.
    pub fn from_number(number: u32) -> Self {
        Self(number.to_string())
    }

    /// Key for assets addressed by alias name (lower-cased).
    pub fn from_alias(alias: &str) -> Self {
        Self::new(alias.to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Key/value persistence for one kind of value.
pub trait CacheStore: Send + Sync {
    /// Stored value type.
    type Value;

    /// Store a value under `key`.
    fn put(&self, key: &CacheKey, value: &Self::Value) -> Result<(), CacheError>;

    /// Fetch the value under `key`, or `None` if it was never stored.
    fn get(&self, key: &CacheKey) -> Result<Option<Self::Value>, CacheError>;

    /// Check whether an entry exists without reading it.
    fn contains(&self, key: &CacheKey) -> bool;
}
