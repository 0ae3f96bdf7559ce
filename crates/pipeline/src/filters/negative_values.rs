//! Filter to drop marks that trade one stat away for another.

use crate::config::SearchConfig;
use crate::traits::Filter;
use anyhow::Result;
use catalog::Item;

/// When `drop_negative` is set, removes marks with any negative attribute.
pub struct NegativeValueFilter;

impl Filter for NegativeValueFilter {
    fn name(&self) -> &str {
        "NegativeValueFilter"
    }

    fn apply(&self, candidates: Vec<Item>, config: &SearchConfig) -> Result<Vec<Item>> {
        if !config.drop_negative {
            return Ok(candidates);
        }
        let filtered: Vec<Item> = candidates
            .into_iter()
            .filter(|item| !item.attributes.has_negative())
            .collect();
        Ok(filtered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog::{AttributeVector, Quality};

    #[test]
    fn test_negative_value_filter() {
        let candidates = vec![
            Item::new(1, Quality::Five, "a", AttributeVector::new([50, -10, 0, 0, 0, 0]), "1"),
            Item::new(2, Quality::Five, "b", AttributeVector::new([50, 0, 0, 0, 0, 0]), "1"),
        ];

        let dropping = NegativeValueFilter
            .apply(candidates.clone(), &SearchConfig::default())
            .unwrap();
        assert_eq!(dropping.len(), 1);
        assert_eq!(dropping[0].id, 2);

        let keeping_config = SearchConfig {
            drop_negative: false,
            ..SearchConfig::default()
        };
        let keeping = NegativeValueFilter.apply(candidates, &keeping_config).unwrap();
        assert_eq!(keeping.len(), 2);
    }
}
