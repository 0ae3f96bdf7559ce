//! Core traits for the filtering pipeline.
//!
//! This module defines the Filter trait that allows composable,
//! extensible filters to be applied to the candidate marks.

use crate::config::SearchConfig;
use anyhow::Result;
use catalog::Item;

/// Core trait for filtering candidate marks.
///
/// All filters must implement this trait to be used in the FilterPipeline.
///
/// ## Design Note
/// - Filters take ownership of the Vec<Item> and return a filtered Vec
/// - Filter parameters come from the shared, read-only `SearchConfig`
pub trait Filter: Send + Sync {
    /// Returns the name of this filter (for logging/debugging)
    fn name(&self) -> &str;

    /// Apply this filter to a set of candidates.
    ///
    /// # Arguments
    /// * `candidates` - The marks to filter (takes ownership)
    /// * `config` - Search configuration for this run
    ///
    /// # Returns
    /// * `Ok(Vec<Item>)` - The retained marks
    /// * `Err` - If filtering fails
    fn apply(&self, candidates: Vec<Item>, config: &SearchConfig) -> Result<Vec<Item>>;
}
