//! Parsing of the bundled entry and alias datasets.

use std::borrow::Cow;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use super::types::{BaseStats, Categories, CatalogEntry, CategoryTag};
use super::DatasetError;

/// Entry dataset compiled into the library.
pub const BUNDLED_ENTRIES: &str = include_str!("../../data/pokemon_data.json");

/// Alias dataset compiled into the library.
pub const BUNDLED_ALIASES: &str = include_str!("../../data/pokedex.json");

/// Alias names that must not come from the feed.
///
/// The feed names for these two contain gender symbols that do not survive
/// lower-casing into the animation host's file names.
pub const ALIAS_OVERRIDES: [(u32, &str); 2] = [(29, "Nidoranf"), (32, "Nidoranm")];

/// Where the two datasets are read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetSource {
    /// The datasets compiled into the library.
    Bundled,
    /// Datasets read from disk on first access.
    Files { entries: PathBuf, aliases: PathBuf },
    /// Inline JSON documents (useful for testing).
    Inline { entries: String, aliases: String },
}

impl DatasetSource {
    /// Read the raw entry dataset.
    pub fn read_entries(&self) -> Result<Cow<'_, str>, DatasetError> {
        match self {
            DatasetSource::Bundled => Ok(Cow::Borrowed(BUNDLED_ENTRIES)),
            DatasetSource::Files { entries, .. } => read_file(entries),
            DatasetSource::Inline { entries, .. } => Ok(Cow::Borrowed(entries.as_str())),
        }
    }

    /// Read the raw alias dataset.
    pub fn read_aliases(&self) -> Result<Cow<'_, str>, DatasetError> {
        match self {
            DatasetSource::Bundled => Ok(Cow::Borrowed(BUNDLED_ALIASES)),
            DatasetSource::Files { aliases, .. } => read_file(aliases),
            DatasetSource::Inline { aliases, .. } => Ok(Cow::Borrowed(aliases.as_str())),
        }
    }
}

fn read_file(path: &Path) -> Result<Cow<'static, str>, DatasetError> {
    std::fs::read_to_string(path)
        .map(Cow::Owned)
        .map_err(|source| DatasetError::Io {
            path: path.to_path_buf(),
            source,
        })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EntryJson {
    no: u32,
    name: String,
    types: Vec<String>,
    abilities: Vec<String>,
    #[serde(default)]
    hidden_abilities: Vec<String>,
    stats: BaseStats,
}

#[derive(Debug, Deserialize)]
struct AliasJson {
    id: u32,
    name: AliasNamesJson,
}

#[derive(Debug, Deserialize)]
struct AliasNamesJson {
    english: String,
}

impl TryFrom<EntryJson> for CatalogEntry {
    type Error = DatasetError;

    fn try_from(raw: EntryJson) -> Result<Self, Self::Error> {
        let mut tags = Vec::with_capacity(raw.types.len());
        for label in &raw.types {
            let tag = label
                .parse::<CategoryTag>()
                .map_err(|_| DatasetError::UnknownCategory {
                    number: raw.no,
                    label: label.clone(),
                })?;
            tags.push(tag);
        }

        let categories = match tags.as_slice() {
            [primary] => Categories {
                primary: *primary,
                secondary: None,
            },
            [primary, secondary] => Categories {
                primary: *primary,
                secondary: Some(*secondary),
            },
            _ => {
                return Err(DatasetError::InvalidEntry {
                    number: raw.no,
                    reason: format!("expected 1 or 2 types, got {}", tags.len()),
                })
            }
        };

        if raw.abilities.is_empty() {
            return Err(DatasetError::InvalidEntry {
                number: raw.no,
                reason: "abilities must not be empty".to_string(),
            });
        }

        Ok(CatalogEntry {
            number: raw.no,
            name: raw.name,
            categories,
            abilities: raw.abilities,
            hidden_abilities: raw.hidden_abilities,
            base_stats: raw.stats,
        })
    }
}

/// Parse the entry dataset, keeping only the first entry for each number.
pub fn parse_entries(json: &str) -> Result<Vec<CatalogEntry>, DatasetError> {
    let raw: Vec<EntryJson> =
        serde_json::from_str(json).map_err(|source| DatasetError::Parse {
            dataset: "entries",
            source,
        })?;

    let total = raw.len();
    let mut seen = HashSet::with_capacity(total);
    let mut entries = Vec::with_capacity(total);

    for raw_entry in raw {
        let entry = CatalogEntry::try_from(raw_entry)?;
        if seen.insert(entry.number) {
            entries.push(entry);
        }
    }

    debug!(
        parsed = total,
        kept = entries.len(),
        "Parsed entry dataset"
    );

    Ok(entries)
}

/// Number to alias name lookup used to build animation URLs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentityAliasMap {
    names: HashMap<u32, String>,
}

impl IdentityAliasMap {
    /// Alias for a number, if the feed had one.
    pub fn get(&self, number: u32) -> Option<&str> {
        self.names.get(&number).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl FromIterator<(u32, String)> for IdentityAliasMap {
    fn from_iter<T: IntoIterator<Item = (u32, String)>>(iter: T) -> Self {
        Self {
            names: iter.into_iter().collect(),
        }
    }
}

/// Parse the alias dataset and apply [`ALIAS_OVERRIDES`].
pub fn parse_aliases(json: &str) -> Result<IdentityAliasMap, DatasetError> {
    let raw: Vec<AliasJson> =
        serde_json::from_str(json).map_err(|source| DatasetError::Parse {
            dataset: "aliases",
            source,
        })?;

    let map: IdentityAliasMap = raw
        .into_iter()
        .map(|alias| {
            let name = ALIAS_OVERRIDES
                .iter()
                .find(|(id, _)| *id == alias.id)
                .map(|(_, name)| name.to_string())
                .unwrap_or(alias.name.english);
            (alias.id, name)
        })
        .collect();

    debug!(aliases = map.len(), "Parsed alias dataset");

    Ok(map)
}
