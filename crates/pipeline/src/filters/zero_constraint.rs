//! Filter for attributes that must be exactly zero.
//!
//! A `(0, 0)` target means "no mark may touch this stat", which is stricter
//! than a zero sum: `+10` and `-10` would cancel out on the sum. The check is
//! therefore done per mark, before enumeration.

use crate::config::SearchConfig;
use crate::traits::Filter;
use anyhow::Result;
use catalog::Item;

/// Removes marks with a non-zero value on any exact-zero attribute.
pub struct ZeroConstraintFilter;

impl Filter for ZeroConstraintFilter {
    fn name(&self) -> &str {
        "ZeroConstraintFilter"
    }

    fn apply(&self, candidates: Vec<Item>, config: &SearchConfig) -> Result<Vec<Item>> {
        let zero_attributes = config.targets.zero_attributes();
        if zero_attributes.is_empty() {
            return Ok(candidates);
        }
        let filtered: Vec<Item> = candidates
            .into_iter()
            .filter(|item| {
                zero_attributes
                    .iter()
                    .all(|&attribute| item.attributes.get(attribute) == 0)
            })
            .collect();
        Ok(filtered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AttributeTargets, TargetRange};
    use catalog::{Attribute, AttributeVector, Quality};

    #[test]
    fn test_zero_constraint_filter() {
        let config = SearchConfig {
            targets: AttributeTargets::new()
                .with(Attribute::Hp, TargetRange::exact_zero())
                .with(Attribute::Attack, TargetRange::at_least(0)),
            ..SearchConfig::default()
        };
        let candidates = vec![
            Item::new(1, Quality::Five, "a", AttributeVector::new([10, 0, 0, 0, 0, 0]), "1"),
            Item::new(2, Quality::Five, "b", AttributeVector::new([10, 0, 0, 0, 0, 5]), "1"),
            Item::new(3, Quality::Five, "c", AttributeVector::new([0, 0, 0, 0, 0, -5]), "1"),
        ];

        let filtered = ZeroConstraintFilter.apply(candidates, &config).unwrap();

        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, 1);
        assert!(filtered.iter().all(|i| i.attributes.get(Attribute::Hp) == 0));
    }

    #[test]
    fn test_no_zero_targets_keeps_all() {
        let candidates = vec![Item::new(
            1,
            Quality::Five,
            "a",
            AttributeVector::new([1, 1, 1, 1, 1, 1]),
            "1",
        )];
        let filtered = ZeroConstraintFilter
            .apply(candidates, &SearchConfig::default())
            .unwrap();
        assert_eq!(filtered.len(), 1);
    }
}
