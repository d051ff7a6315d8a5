//! File system backed cache namespaces.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::debug;

use super::{
    CacheError, CacheKey, CacheStore, PRIMARY_ANIMATION_NAMESPACE, SECONDARY_ANIMATION_NAMESPACE,
    SPRITE_NAMESPACE,
};

/// A directory under the cache root holding one kind of entry.
///
/// The directory is created on the first write, not on construction.
#[derive(Debug)]
pub struct DiskNamespace {
    dir: PathBuf,
    created: AtomicBool,
}

impl DiskNamespace {
    /// Namespace `name` under `root`.
    pub fn new(root: &Path, name: &str) -> Self {
        Self {
            dir: root.join(name),
            created: AtomicBool::new(false),
        }
    }

    /// Directory backing this namespace.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn entry_path(&self, key: &CacheKey) -> PathBuf {
        self.dir.join(key.as_str())
    }

    /// Create the namespace directory if it does not exist yet.
    ///
    /// Check-then-create; two processes racing here is not guarded against.
    fn ensure_dir(&self) -> Result<(), CacheError> {
        if self.created.load(Ordering::Acquire) {
            return Ok(());
        }
        if !self.dir.is_dir() {
            debug!(path = %self.dir.display(), "Creating cache namespace");
            fs::create_dir_all(&self.dir).map_err(|source| {
                CacheError::DirectoryCreationFailed {
                    path: self.dir.clone(),
                    source,
                }
            })?;
        }
        self.created.store(true, Ordering::Release);
        Ok(())
    }
}

/// Cache storing one blob per key as a single file.
#[derive(Debug)]
pub struct BlobCache {
    namespace: DiskNamespace,
}

impl BlobCache {
    pub fn new(root: &Path, name: &str) -> Self {
        Self {
            namespace: DiskNamespace::new(root, name),
        }
    }

    pub fn namespace(&self) -> &DiskNamespace {
        &self.namespace
    }
}

impl CacheStore for BlobCache {
    type Value = Vec<u8>;

    fn put(&self, key: &CacheKey, value: &Vec<u8>) -> Result<(), CacheError> {
        self.namespace.ensure_dir()?;
        let path = self.namespace.entry_path(key);
        fs::write(&path, value).map_err(|source| CacheError::WriteFailed { path, source })
    }

    fn get(&self, key: &CacheKey) -> Result<Option<Vec<u8>>, CacheError> {
        let path = self.namespace.entry_path(key);
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(CacheError::ReadFailed { path, source }),
        }
    }

    fn contains(&self, key: &CacheKey) -> bool {
        self.namespace.entry_path(key).is_file()
    }
}

/// Cache storing an ordered list of blobs per key.
///
/// Each key is a directory whose files are named `0`, `1`, ... in list
/// order. Writing a shorter list over a longer one leaves the extra files in
/// place, so a later read returns them too.
#[derive(Debug)]
pub struct BlobSetCache {
    namespace: DiskNamespace,
}

impl BlobSetCache {
    pub fn new(root: &Path, name: &str) -> Self {
        Self {
            namespace: DiskNamespace::new(root, name),
        }
    }

    pub fn namespace(&self) -> &DiskNamespace {
        &self.namespace
    }
}

impl CacheStore for BlobSetCache {
    type Value = Vec<Vec<u8>>;

    fn put(&self, key: &CacheKey, value: &Vec<Vec<u8>>) -> Result<(), CacheError> {
        self.namespace.ensure_dir()?;
        let dir = self.namespace.entry_path(key);
        if !dir.is_dir() {
            fs::create_dir_all(&dir).map_err(|source| CacheError::DirectoryCreationFailed {
                path: dir.clone(),
                source,
            })?;
        }

        for (index, blob) in value.iter().enumerate() {
            let path = dir.join(index.to_string());
            fs::write(&path, blob).map_err(|source| CacheError::WriteFailed { path, source })?;
        }

        Ok(())
    }

    fn get(&self, key: &CacheKey) -> Result<Option<Vec<Vec<u8>>>, CacheError> {
        let dir = self.namespace.entry_path(key);
        let read_dir = match fs::read_dir(&dir) {
            Ok(read_dir) => read_dir,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(CacheError::ReadFailed { path: dir, source }),
        };

        let mut indexed = Vec::new();
        for dir_entry in read_dir {
            let dir_entry = dir_entry.map_err(|source| CacheError::ReadFailed {
                path: dir.clone(),
                source,
            })?;
            // Anything that is not a numbered sibling is not ours.
            let index = match dir_entry.file_name().to_str().map(str::parse::<usize>) {
                Some(Ok(index)) => index,
                _ => continue,
            };
            indexed.push((index, dir_entry.path()));
        }
        indexed.sort_by_key(|(index, _)| *index);

        let mut blobs = Vec::with_capacity(indexed.len());
        for (_, path) in indexed {
            let blob = fs::read(&path).map_err(|source| CacheError::ReadFailed { path, source })?;
            blobs.push(blob);
        }

        Ok(Some(blobs))
    }

    fn contains(&self, key: &CacheKey) -> bool {
        self.namespace.entry_path(key).is_dir()
    }
}

/// The three asset caches, sharing one root directory.
#[derive(Debug)]
pub struct AssetCaches {
    pub sprites: BlobCache,
    pub primary_animations: BlobCache,
    pub secondary_animations: BlobSetCache,
}

impl AssetCaches {
    pub fn new(root: &Path) -> Self {
        Self {
            sprites: BlobCache::new(root, SPRITE_NAMESPACE),
            primary_animations: BlobCache::new(root, PRIMARY_ANIMATION_NAMESPACE),
            secondary_animations: BlobSetCache::new(root, SECONDARY_ANIMATION_NAMESPACE),
        }
    }
}
