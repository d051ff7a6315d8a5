//! Static catalog data: entry types and the two bundled datasets.
//!
//! Both datasets are parsed once by the repository and never change
//! afterwards. Entries are de-duplicated by number (first occurrence wins)
//! and category labels are checked against the closed [`CategoryTag`] set.

mod dataset;
mod types;

pub use dataset::{
    parse_aliases, parse_entries, DatasetSource, IdentityAliasMap, ALIAS_OVERRIDES,
    BUNDLED_ALIASES, BUNDLED_ENTRIES,
};
pub use types::*;

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading a dataset.
///
/// All of these are fatal: the repository cannot serve anything without its
/// datasets.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// Dataset file could not be read.
    #[error("Failed to read dataset {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Dataset is not valid JSON for its schema.
    #[error("Failed to parse {dataset} dataset: {source}")]
    Parse {
        dataset: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// Entry uses a category label outside the known set.
    #[error("Entry {number} has unknown category '{label}'")]
    UnknownCategory { number: u32, label: String },

    /// Entry violates a structural invariant.
    #[error("Entry {number} is invalid: {reason}")]
    InvalidEntry { number: u32, reason: String },
}
