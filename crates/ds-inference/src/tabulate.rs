//! Tabulation of raw event labels into per-category counts.

use std::collections::BTreeMap;

use ds_core::types::CategoryCount;

/// Count occurrences of each distinct label.
///
/// Returns one [`CategoryCount`] per label, sorted by category name. Empty
/// labels are counted like any other; callers are expected to filter rows
/// with missing fields before tabulating.
pub fn count_by_category<I, S>(labels: I) -> Vec<CategoryCount>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut counts: BTreeMap<String, u64> = BTreeMap::new();
    for label in labels {
        *counts.entry(label.as_ref().to_string()).or_insert(0) += 1;
    }
    counts.into_iter().map(|(category, observed)| CategoryCount { category, observed }).collect()
}
