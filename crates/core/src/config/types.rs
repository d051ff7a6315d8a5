use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::assets::{AssetUrls, DEFAULT_ANIMATION_BASE_URL, DEFAULT_SPRITE_BASE_URL};
use crate::catalog::DatasetSource;
use crate::fetcher::HttpFetcherConfig;

use super::ConfigError;

/// Directory created under the platform cache directory.
const CACHE_DIR_NAME: &str = "pokedex";

/// Root configuration
///
/// Every section is optional; an empty file yields the defaults.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub datasets: DatasetsConfig,
    #[serde(default)]
    pub endpoints: EndpointsConfig,
    #[serde(default)]
    pub fetcher: HttpFetcherConfig,
}

/// Disk cache configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Cache root directory. Unset means `pokedex` under the platform cache
    /// directory; a leading `~` is expanded to the home directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,
}

impl CacheConfig {
    /// Resolved cache root.
    pub fn root_dir(&self) -> Result<PathBuf, ConfigError> {
        resolve_cache_root(self.root.as_deref(), dirs::cache_dir(), dirs::home_dir())
    }
}

fn resolve_cache_root(
    root: Option<&Path>,
    cache_dir: Option<PathBuf>,
    home: Option<PathBuf>,
) -> Result<PathBuf, ConfigError> {
    match root {
        Some(root) => expand_home(root, home.as_deref()).ok_or_else(|| {
            ConfigError::ValidationError(format!(
                "cache.root {:?} needs a home directory, but none is known",
                root
            ))
        }),
        None => cache_dir.map(|dir| dir.join(CACHE_DIR_NAME)).ok_or_else(|| {
            ConfigError::ValidationError(
                "no platform cache directory; set cache.root".to_string(),
            )
        }),
    }
}

/// Dataset locations. Both unset means the bundled datasets.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DatasetsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entries_path: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aliases_path: Option<PathBuf>,
}

impl DatasetsConfig {
    /// Where the repository should read its datasets from.
    ///
    /// Falls back to the bundled datasets unless both paths are set;
    /// [`validate_config`](super::validate_config) rejects a lone path.
    pub fn source(&self) -> DatasetSource {
        let home = dirs::home_dir();
        let expand = |path: &PathBuf| {
            expand_home(path, home.as_deref()).unwrap_or_else(|| path.clone())
        };
        match (&self.entries_path, &self.aliases_path) {
            (Some(entries), Some(aliases)) => DatasetSource::Files {
                entries: expand(entries),
                aliases: expand(aliases),
            },
            _ => DatasetSource::Bundled,
        }
    }
}

/// Remote asset hosts
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EndpointsConfig {
    #[serde(default = "default_sprite_base_url")]
    pub sprite_base_url: String,
    #[serde(default = "default_animation_base_url")]
    pub animation_base_url: String,
}

impl EndpointsConfig {
    pub fn urls(&self) -> AssetUrls {
        AssetUrls::new(&self.sprite_base_url, &self.animation_base_url)
    }
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            sprite_base_url: default_sprite_base_url(),
            animation_base_url: default_animation_base_url(),
        }
    }
}

fn default_sprite_base_url() -> String {
    DEFAULT_SPRITE_BASE_URL.to_string()
}

fn default_animation_base_url() -> String {
    DEFAULT_ANIMATION_BASE_URL.to_string()
}

/// `None` when `path` starts with `~` and there is no home directory.
fn expand_home(path: &Path, home: Option<&Path>) -> Option<PathBuf> {
    match path.strip_prefix("~") {
        Ok(rest) => home.map(|home| home.join(rest)),
        Err(_) => Some(path.to_path_buf()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(config.cache.root.is_none());
        assert_eq!(config.datasets.source(), DatasetSource::Bundled);
        assert_eq!(config.endpoints.urls(), AssetUrls::default());
        assert_eq!(config.fetcher.timeout_secs, 30);
    }

    #[test]
    fn test_default_root_is_under_platform_cache_dir() {
        let root = resolve_cache_root(None, Some(PathBuf::from("/var/tmp/xdg-cache")), None)
            .unwrap();
        assert_eq!(root, PathBuf::from("/var/tmp/xdg-cache/pokedex"));
    }

    #[test]
    fn test_default_root_matches_dirs_cache_dir() {
        let Some(cache_dir) = dirs::cache_dir() else {
            return;
        };
        let root = CacheConfig::default().root_dir().unwrap();
        assert_eq!(root, cache_dir.join("pokedex"));
        assert!(root.is_absolute());
    }

    #[test]
    fn test_no_platform_cache_dir_is_error() {
        let result = resolve_cache_root(None, None, None);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_absolute_root_is_untouched() {
        let root = resolve_cache_root(Some(Path::new("/var/cache/pokedex")), None, None).unwrap();
        assert_eq!(root, PathBuf::from("/var/cache/pokedex"));
    }

    #[test]
    fn test_home_is_expanded() {
        let root = resolve_cache_root(
            Some(Path::new("~/pokedex-cache")),
            None,
            Some(PathBuf::from("/home/ash")),
        )
        .unwrap();
        assert_eq!(root, PathBuf::from("/home/ash/pokedex-cache"));
    }

    #[test]
    fn test_home_root_without_home_is_error() {
        let result = resolve_cache_root(
            Some(Path::new("~/pokedex-cache")),
            Some(PathBuf::from("/var/tmp/xdg-cache")),
            None,
        );
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
        assert!(err.to_string().contains("cache.root"));
    }

    #[test]
    fn test_dataset_paths_need_both() {
        let only_entries = DatasetsConfig {
            entries_path: Some(PathBuf::from("/data/entries.json")),
            aliases_path: None,
        };
        assert_eq!(only_entries.source(), DatasetSource::Bundled);

        let both = DatasetsConfig {
            entries_path: Some(PathBuf::from("/data/entries.json")),
            aliases_path: Some(PathBuf::from("/data/aliases.json")),
        };
        assert_eq!(
            both.source(),
            DatasetSource::Files {
                entries: PathBuf::from("/data/entries.json"),
                aliases: PathBuf::from("/data/aliases.json"),
            }
        );
    }
}
