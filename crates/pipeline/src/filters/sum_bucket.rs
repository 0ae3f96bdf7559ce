//! Filter on the cached total of top-tier marks.

use crate::config::SearchConfig;
use crate::traits::Filter;
use anyhow::Result;
use catalog::{Item, Quality};

/// Keeps top-tier marks whose `total_sum` falls in one of the selected buckets.
///
/// Lower tiers are never affected. An empty bucket selection disables the check.
pub struct SumBucketFilter;

impl Filter for SumBucketFilter {
    fn name(&self) -> &str {
        "SumBucketFilter"
    }

    fn apply(&self, candidates: Vec<Item>, config: &SearchConfig) -> Result<Vec<Item>> {
        if config.sum_buckets.is_empty() {
            return Ok(candidates);
        }
        let filtered: Vec<Item> = candidates
            .into_iter()
            .filter(|item| {
                item.quality != Quality::HIGHEST
                    || config
                        .sum_buckets
                        .iter()
                        .any(|bucket| bucket.matches(item.total_sum))
            })
            .collect();
        Ok(filtered)
    }
}
