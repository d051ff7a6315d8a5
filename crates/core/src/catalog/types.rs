//! Catalog entry types.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Elemental category of a catalog entry.
///
/// The set is closed: the bundled feed labels categories in Japanese and any
/// label outside these 18 is rejected at load time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryTag {
    Normal,
    Fighting,
    Flying,
    Poison,
    Ground,
    Rock,
    Bug,
    Ghost,
    Steel,
    Fire,
    Water,
    Grass,
    Electric,
    Psychic,
    Ice,
    Dragon,
    Dark,
    Fairy,
}

impl CategoryTag {
    /// All categories, in feed order.
    pub const ALL: [CategoryTag; 18] = [
        CategoryTag::Normal,
        CategoryTag::Fighting,
        CategoryTag::Flying,
        CategoryTag::Poison,
        CategoryTag::Ground,
        CategoryTag::Rock,
        CategoryTag::Bug,
        CategoryTag::Ghost,
        CategoryTag::Steel,
        CategoryTag::Fire,
        CategoryTag::Water,
        CategoryTag::Grass,
        CategoryTag::Electric,
        CategoryTag::Psychic,
        CategoryTag::Ice,
        CategoryTag::Dragon,
        CategoryTag::Dark,
        CategoryTag::Fairy,
    ];

    /// Label used by the bundled dataset.
    pub fn label(&self) -> &'static str {
        match self {
            CategoryTag::Normal => "ノーマル",
            CategoryTag::Fighting => "かくとう",
            CategoryTag::Flying => "ひこう",
            CategoryTag::Poison => "どく",
            CategoryTag::Ground => "じめん",
            CategoryTag::Rock => "いわ",
            CategoryTag::Bug => "むし",
            CategoryTag::Ghost => "ゴースト",
            CategoryTag::Steel => "はがね",
            CategoryTag::Fire => "ほのお",
            CategoryTag::Water => "みず",
            CategoryTag::Grass => "くさ",
            CategoryTag::Electric => "でんき",
            CategoryTag::Psychic => "エスパー",
            CategoryTag::Ice => "こおり",
            CategoryTag::Dragon => "ドラゴン",
            CategoryTag::Dark => "あく",
            CategoryTag::Fairy => "フェアリー",
        }
    }

    /// Lowercase English name.
    pub fn name(&self) -> &'static str {
        match self {
            CategoryTag::Normal => "normal",
            CategoryTag::Fighting => "fighting",
            CategoryTag::Flying => "flying",
            CategoryTag::Poison => "poison",
            CategoryTag::Ground => "ground",
            CategoryTag::Rock => "rock",
            CategoryTag::Bug => "bug",
            CategoryTag::Ghost => "ghost",
            CategoryTag::Steel => "steel",
            CategoryTag::Fire => "fire",
            CategoryTag::Water => "water",
            CategoryTag::Grass => "grass",
            CategoryTag::Electric => "electric",
            CategoryTag::Psychic => "psychic",
            CategoryTag::Ice => "ice",
            CategoryTag::Dragon => "dragon",
            CategoryTag::Dark => "dark",
            CategoryTag::Fairy => "fairy",
        }
    }
}

impl fmt::Display for CategoryTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a category label is not one of the 18 known ones.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown category label: {0}")]
pub struct UnknownCategory(pub String);

impl FromStr for CategoryTag {
    type Err = UnknownCategory;

    /// Accepts the dataset label or the English name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CategoryTag::ALL
            .iter()
            .copied()
            .find(|tag| tag.label() == s || tag.name() == s)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// Primary and optional secondary category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Categories {
    pub primary: CategoryTag,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary: Option<CategoryTag>,
}

impl Categories {
    /// Iterate over the present categories, primary first.
    pub fn iter(&self) -> impl Iterator<Item = CategoryTag> {
        std::iter::once(self.primary).chain(self.secondary)
    }
}

/// Fixed six-field statistics block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseStats {
    pub hp: u16,
    pub attack: u16,
    pub defence: u16,
    pub sp_attack: u16,
    pub sp_defence: u16,
    pub speed: u16,
}

impl BaseStats {
    /// Sum of the six stats.
    pub fn total(&self) -> u32 {
        [
            self.hp,
            self.attack,
            self.defence,
            self.sp_attack,
            self.sp_defence,
            self.speed,
        ]
        .iter()
        .map(|&v| u32::from(v))
        .sum()
    }
}

/// A single catalog entry.
///
/// Two entries are equal when their `number` is equal; the rest of the value
/// does not take part in comparisons.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Pokédex number. Unique and stable.
    pub number: u32,
    /// Display name.
    pub name: String,
    pub categories: Categories,
    /// Regular abilities, never empty.
    pub abilities: Vec<String>,
    #[serde(default)]
    pub hidden_abilities: Vec<String>,
    pub base_stats: BaseStats,
}

impl PartialEq for CatalogEntry {
    fn eq(&self, other: &Self) -> bool {
        self.number == other.number
    }
}

impl Eq for CatalogEntry {}

impl Hash for CatalogEntry {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.number.hash(state);
    }
}

/// Orderings offered for the full entry list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogOrder {
    /// Ascending Pokédex number.
    #[default]
    Number,
    /// Lexicographic display name.
    Name,
    /// Highest stat total first.
    TotalStats,
}

impl CatalogOrder {
    /// Comparison rule for this ordering.
    pub fn compare(&self, a: &CatalogEntry, b: &CatalogEntry) -> Ordering {
        match self {
            CatalogOrder::Number => a.number.cmp(&b.number),
            CatalogOrder::Name => a.name.cmp(&b.name),
            CatalogOrder::TotalStats => b.base_stats.total().cmp(&a.base_stats.total()),
        }
    }

    /// Sort entries in place. The sort is stable.
    pub fn sort(&self, entries: &mut [CatalogEntry]) {
        entries.sort_by(|a, b| self.compare(a, b));
    }
}

impl FromStr for CatalogOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "number" => Ok(CatalogOrder::Number),
            "name" => Ok(CatalogOrder::Name),
            "total" | "total_stats" => Ok(CatalogOrder::TotalStats),
            other => Err(format!("unknown order '{}'", other)),
        }
    }
}
