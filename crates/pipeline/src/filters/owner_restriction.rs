//! Filter for creature-exclusive marks.
//!
//! Exclusive marks only make sense on their own creature, and a creature can
//! carry only one of them.

use crate::config::SearchConfig;
use crate::traits::Filter;
use anyhow::Result;
use catalog::Item;
use std::collections::HashSet;

/// Handles marks that carry an `owner_restriction`.
///
/// ## Algorithm
/// - Unrestricted marks pass through
/// - Without an owner filter, every restricted mark is dropped
/// - With one, only marks for that owner are kept, and only the first
///   occurrence per owner
pub struct OwnerRestrictionFilter;

impl Filter for OwnerRestrictionFilter {
    fn name(&self) -> &str {
        "OwnerRestrictionFilter"
    }

    fn apply(&self, candidates: Vec<Item>, config: &SearchConfig) -> Result<Vec<Item>> {
        let wanted = config.owner();
        let mut used_owners: HashSet<String> = HashSet::new();

        let filtered: Vec<Item> = candidates
            .into_iter()
            .filter(|item| match item.owner_restriction.as_deref() {
                None => true,
                Some(owner) => match wanted {
                    Some(wanted) if wanted == owner => used_owners.insert(owner.to_string()),
                    _ => false,
                },
            })
            .collect();
        Ok(filtered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog::{AttributeVector, Quality};

    fn item(id: u32, owner: Option<&str>) -> Item {
        let item = Item::new(id, Quality::Five, "m", AttributeVector::default(), "1");
        match owner {
            Some(owner) => item.with_owner(owner),
            None => item,
        }
    }

    #[test]
    fn test_restricted_dropped_without_owner_filter() {
        let candidates = vec![item(1, None), item(2, Some("3021")), item(3, None)];

        let filtered = OwnerRestrictionFilter
            .apply(candidates, &SearchConfig::default())
            .unwrap();

        let ids: Vec<u32> = filtered.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_first_matching_owner_kept() {
        let config = SearchConfig {
            owner_filter: Some("3021".to_string()),
            ..SearchConfig::default()
        };
        let candidates = vec![
            item(1, Some("3021")),
            item(2, Some("4000")),
            item(3, Some("3021")),
            item(4, None),
        ];

        let filtered = OwnerRestrictionFilter.apply(candidates, &config).unwrap();

        let ids: Vec<u32> = filtered.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![1, 4]);
    }
}
