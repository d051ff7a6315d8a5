//! Asset resolution: cache first, then network, then cache again.
//!
//! Three kinds of asset are resolved:
//!
//! - **Sprite**: a static PNG keyed by Pokédex number.
//! - **Primary animation**: a GIF keyed by the lower-cased alias name.
//! - **Secondary animations**: up to five extra GIFs (`-2` .. `-6`) for the
//!   same alias, fetched concurrently and cached together as a blob set.
//!
//! Only successful payloads are written to the cache. A 404 resolves to
//! absence and is retried on the next request; a transport failure is
//! returned as an error and nothing is cached.

mod decode;
mod resolver;
mod urls;

pub use decode::{decode_animation, decode_sprite, AnimatedImage, Sprite};
pub use resolver::AssetResolver;
pub use urls::{AssetUrls, DEFAULT_ANIMATION_BASE_URL, DEFAULT_SPRITE_BASE_URL, SECONDARY_VARIANTS};

use std::fmt;

use thiserror::Error;

use crate::cache::{
    CacheError, PRIMARY_ANIMATION_NAMESPACE, SECONDARY_ANIMATION_NAMESPACE, SPRITE_NAMESPACE,
};
use crate::fetcher::FetchError;

/// The kinds of remote asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    Sprite,
    PrimaryAnimation,
    SecondaryAnimation,
}

impl AssetKind {
    /// Short label used in logs and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            AssetKind::Sprite => "sprite",
            AssetKind::PrimaryAnimation => "primary_animation",
            AssetKind::SecondaryAnimation => "secondary_animation",
        }
    }

    /// Cache namespace holding this kind.
    pub fn namespace(&self) -> &'static str {
        match self {
            AssetKind::Sprite => SPRITE_NAMESPACE,
            AssetKind::PrimaryAnimation => PRIMARY_ANIMATION_NAMESPACE,
            AssetKind::SecondaryAnimation => SECONDARY_ANIMATION_NAMESPACE,
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Errors from asset resolution.
#[derive(Debug, Error)]
pub enum AssetError {
    /// Network failure; nothing was cached.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Disk cache failure.
    #[error(transparent)]
    Cache(#[from] CacheError),
}

impl AssetError {
    /// Whether a later attempt may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Fetch(_))
    }
}
