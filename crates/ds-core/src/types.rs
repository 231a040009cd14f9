//! Common data types for DemoStat

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Observed event count for one category (e.g. one NYC borough).
///
/// Non-negativity is enforced by the type: counts are `u64`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    /// Category label.
    pub category: String,
    /// Number of observed events in this category.
    pub observed: u64,
}

impl CategoryCount {
    /// Create a new per-category count.
    pub fn new(category: impl Into<String>, observed: u64) -> Self {
        Self { category: category.into(), observed }
    }
}

/// Reference population per category, validated once at construction.
///
/// Replaces repeated per-row conditional lookups with a single map built
/// up front: duplicate categories and non-positive populations are rejected
/// here, so downstream consumers can assume every entry is usable.
///
/// Iteration order is lexicographic by category, so anything derived from
/// this table is deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, u64>", into = "BTreeMap<String, u64>")]
pub struct PopulationWeights {
    entries: BTreeMap<String, u64>,
}

impl PopulationWeights {
    /// Build a validated population table.
    ///
    /// # Errors
    /// `Validation` if any population is zero or a category appears twice.
    pub fn new(entries: impl IntoIterator<Item = (String, u64)>) -> Result<Self> {
        let mut map = BTreeMap::new();
        for (category, population) in entries {
            if population == 0 {
                return Err(Error::Validation(format!(
                    "population for category '{category}' must be positive"
                )));
            }
            if map.insert(category.clone(), population).is_some() {
                return Err(Error::Validation(format!(
                    "duplicate population entry for category '{category}'"
                )));
            }
        }
        Ok(Self { entries: map })
    }

    /// Population for `category`, if present.
    pub fn get(&self, category: &str) -> Option<u64> {
        self.entries.get(category).copied()
    }

    /// Sum of all populations.
    pub fn total(&self) -> u64 {
        self.entries.values().sum()
    }

    /// Number of categories.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Category labels in lexicographic order.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl TryFrom<BTreeMap<String, u64>> for PopulationWeights {
    type Error = Error;

    fn try_from(map: BTreeMap<String, u64>) -> Result<Self> {
        // BTreeMap keys are already unique; only positivity can fail.
        Self::new(map)
    }
}

impl From<PopulationWeights> for BTreeMap<String, u64> {
    fn from(w: PopulationWeights) -> Self {
        w.entries
    }
}
