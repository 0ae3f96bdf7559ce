//! The FilterPipeline orchestrates multiple filters.
//!
//! This module provides the main FilterPipeline struct that chains
//! multiple filters together using the builder pattern, plus the two
//! standard chains a search run uses.

use crate::config::SearchConfig;
use crate::filters::{
    EfficiencyPruningFilter, NegativeValueFilter, OwnerRestrictionFilter, QualityFilter,
    SumBucketFilter, ZeroConstraintFilter,
};
use crate::traits::Filter;
use anyhow::Result;
use catalog::Item;

/// Chains multiple filters together into a processing pipeline.
///
/// ## Usage
/// ```ignore
/// let pipeline = FilterPipeline::new()
///     .add_filter(OwnerRestrictionFilter)
///     .add_filter(QualityFilter);
///
/// let candidates = pipeline.apply(catalog.items().to_vec(), &config)?;
/// ```
pub struct FilterPipeline {
    filters: Vec<Box<dyn Filter>>,
}

impl FilterPipeline {
    /// Create a new empty FilterPipeline.
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
        }
    }

    /// The scalar eligibility rules followed by efficiency pruning.
    ///
    /// Order matters: the owner rule keeps the first mark per creature before
    /// any other rule looks at it, and pruning ranks only what survived.
    pub fn prefilter() -> Self {
        Self::new()
            .add_filter(OwnerRestrictionFilter)
            .add_filter(SumBucketFilter)
            .add_filter(QualityFilter)
            .add_filter(NegativeValueFilter)
            .add_filter(EfficiencyPruningFilter)
    }

    /// `prefilter` plus the per-item exact-zero check
    pub fn standard() -> Self {
        Self::prefilter().add_filter(ZeroConstraintFilter)
    }

    /// Add a filter to the pipeline (builder pattern).
    ///
    /// # Arguments
    /// * `filter` - Any type implementing the Filter trait
    ///
    /// # Returns
    /// Self for method chaining
    pub fn add_filter(mut self, filter: impl Filter + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    /// Names of the filters in application order
    pub fn filter_names(&self) -> Vec<&str> {
        self.filters.iter().map(|filter| filter.name()).collect()
    }

    /// Apply all filters in sequence to the candidates.
    ///
    /// # Arguments
    /// * `candidates` - The marks to filter
    /// * `config` - Search configuration for this run
    ///
    /// # Returns
    /// * `Ok(Vec<Item>)` - The marks left after all filters
    /// * `Err` - If any filter fails
    pub fn apply(&self, candidates: Vec<Item>, config: &SearchConfig) -> Result<Vec<Item>> {
        let mut current = candidates;
        for filter in &self.filters {
            tracing::debug!(
                "Applying filter: {} (input count: {})",
                filter.name(),
                current.len()
            );
            current = filter.apply(current, config)?;
            tracing::debug!(
                "Filter applied: {} (output count: {})",
                filter.name(),
                current.len()
            );
        }
        Ok(current)
    }
}

impl Default for FilterPipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog::{AttributeVector, Quality};

    fn item(id: u32, quality: Quality, values: [i32; 6]) -> Item {
        Item::new(id, quality, format!("mark {}", id), AttributeVector::new(values), "1")
    }

    #[test]
    fn test_empty_pipeline() {
        let pipeline = FilterPipeline::new();
        let config = SearchConfig::default();

        let candidates = vec![
            item(1, Quality::Two, [1, 0, 0, 0, 0, 0]),
            item(2, Quality::Three, [-1, 0, 0, 0, 0, 0]),
        ];

        let filtered = pipeline.apply(candidates, &config).unwrap();
        assert_eq!(filtered.len(), 2);
    }

    #[test]
    fn test_single_filter() {
        let config = SearchConfig::default();
        let pipeline = FilterPipeline::new().add_filter(NegativeValueFilter);

        let candidates = vec![
            item(1, Quality::Five, [10, -1, 0, 0, 0, 0]),
            item(2, Quality::Five, [10, 0, 0, 0, 0, 0]),
        ];

        let filtered = pipeline.apply(candidates, &config).unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, 2);
    }

    #[test]
    fn test_standard_chain_order() {
        assert_eq!(
            FilterPipeline::standard().filter_names(),
            vec![
                "OwnerRestrictionFilter",
                "SumBucketFilter",
                "QualityFilter",
                "NegativeValueFilter",
                "EfficiencyPruningFilter",
                "ZeroConstraintFilter",
            ]
        );
    }
}
