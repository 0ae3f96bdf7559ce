//! Filter to keep only the selected rarity tiers.

use crate::config::SearchConfig;
use crate::traits::Filter;
use anyhow::Result;
use catalog::Item;

/// Keeps marks whose quality is in `quality_filter`; an empty set keeps everything.
pub struct QualityFilter;

impl Filter for QualityFilter {
    fn name(&self) -> &str {
        "QualityFilter"
    }

    fn apply(&self, candidates: Vec<Item>, config: &SearchConfig) -> Result<Vec<Item>> {
        if config.quality_filter.is_empty() {
            return Ok(candidates);
        }
        let filtered: Vec<Item> = candidates
            .into_iter()
            .filter(|item| config.quality_filter.contains(&item.quality))
            .collect();
        Ok(filtered)
    }
}
