//! Efficiency pruning: the lossy step that keeps enumeration tractable.
//!
//! Enumeration grows with the cube of the candidate count. When the search
//! asks for a minimum on two or more stats, the marks that contribute most to
//! those stats are very likely to be the ones that matter, so only the best
//! `top_n` of them are kept.
//!
//! This can lose valid combinations: a mark that ranks low on the combined
//! score can still complete a combination whose other two marks carry the
//! stats it lacks.

use crate::config::SearchConfig;
use crate::traits::Filter;
use anyhow::Result;
use catalog::Item;
use std::cmp::Reverse;
use tracing::debug;

/// Pruning only starts once this many attributes have a positive minimum
const MIN_RELEVANT_ATTRIBUTES: usize = 2;

/// Ranks marks by the sum of the attributes with a positive minimum target
/// and truncates to `top_n`.
///
/// Ties keep catalog order (the sort is stable).
pub struct EfficiencyPruningFilter;

impl Filter for EfficiencyPruningFilter {
    fn name(&self) -> &str {
        "EfficiencyPruningFilter"
    }

    fn apply(&self, mut candidates: Vec<Item>, config: &SearchConfig) -> Result<Vec<Item>> {
        if !config.improve_efficiency {
            return Ok(candidates);
        }
        let relevant = config.targets.positive_min_attributes();
        if relevant.len() < MIN_RELEVANT_ATTRIBUTES {
            return Ok(candidates);
        }

        candidates.sort_by_key(|item| Reverse(item.attributes.sum_of(&relevant)));
        if candidates.len() > config.top_n {
            debug!(
                "Pruning {} marks down to the top {} by {:?}",
                candidates.len(),
                config.top_n,
                relevant
            );
            candidates.truncate(config.top_n);
        }
        Ok(candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AttributeTargets, TargetRange};
    use catalog::{Attribute, AttributeVector, Quality};

    fn item(id: u32, values: [i32; 6]) -> Item {
        Item::new(id, Quality::Five, "m", AttributeVector::new(values), "1")
    }

    fn config(targets: AttributeTargets, top_n: usize) -> SearchConfig {
        SearchConfig {
            targets,
            top_n,
            ..SearchConfig::default()
        }
    }

    #[test]
    fn test_keeps_highest_relevant_sum() {
        let targets = AttributeTargets::new()
            .with(Attribute::Attack, TargetRange::at_least(10))
            .with(Attribute::Speed, TargetRange::at_least(10));
        let candidates = vec![
            item(1, [10, 0, 0, 0, 10, 90]),
            item(2, [30, 0, 0, 0, 20, 0]),
            item(3, [5, 0, 0, 0, 5, 0]),
        ];

        let filtered = EfficiencyPruningFilter
            .apply(candidates, &config(targets, 1))
            .unwrap();

        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, 2);
    }

    #[test]
    fn test_single_positive_min_does_not_prune() {
        let targets = AttributeTargets::new()
            .with(Attribute::Attack, TargetRange::at_least(10))
            .with(Attribute::Speed, TargetRange::at_most(50));
        let candidates = vec![item(1, [1; 6]), item(2, [2; 6]), item(3, [3; 6])];

        let filtered = EfficiencyPruningFilter
            .apply(candidates, &config(targets, 1))
            .unwrap();

        // Untouched, including order
        let ids: Vec<u32> = filtered.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_disabled_does_not_prune() {
        let targets = AttributeTargets::new()
            .with(Attribute::Attack, TargetRange::at_least(10))
            .with(Attribute::Speed, TargetRange::at_least(10));
        let mut config = config(targets, 1);
        config.improve_efficiency = false;

        let filtered = EfficiencyPruningFilter
            .apply(vec![item(1, [1; 6]), item(2, [2; 6])], &config)
            .unwrap();
        assert_eq!(filtered.len(), 2);
    }

    #[test]
    fn test_ties_keep_catalog_order() {
        let targets = AttributeTargets::new()
            .with(Attribute::Defense, TargetRange::at_least(1))
            .with(Attribute::Hp, TargetRange::at_least(1));
        let candidates = vec![
            item(7, [0, 10, 0, 0, 0, 10]),
            item(3, [0, 20, 0, 0, 0, 0]),
            item(5, [0, 0, 0, 0, 0, 25]),
        ];

        let filtered = EfficiencyPruningFilter
            .apply(candidates, &config(targets, 2))
            .unwrap();

        let ids: Vec<u32> = filtered.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![5, 7]);
    }
}
