//! # Search Orchestrator
//!
//! This module coordinates a complete search run:
//! 1. Validate the search configuration
//! 2. Load the catalog and resolve the limited-to-one set
//! 3. Prefilter and zero-constraint filter the marks
//! 4. Enumerate combinations and write the snapshot
//! 5. Re-validate the snapshot and append to the result log
//!
//! A run either completes every stage or fails at a stage boundary; the
//! snapshot is only written once enumeration has finished.

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use tracing::info;

use catalog::{Catalog, DataPaths, ExclusivitySet, Item};
use pipeline::snapshot;
use pipeline::{
    CombinationEnumerator, EnumerationStats, FilterPipeline, ResultRow, SearchConfig, Validator,
};

/// Everything a search run produced
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// Marks handed to the prefilter
    pub catalog_size: usize,
    /// Marks left after filtering
    pub candidate_count: usize,
    pub stats: EnumerationStats,
    /// Validated rows, ranked
    pub rows: Vec<ResultRow>,
    pub elapsed: Duration,
}

/// Runs searches against one data directory
pub struct SearchOrchestrator {
    paths: DataPaths,
    filter_pipeline: FilterPipeline,
}

impl SearchOrchestrator {
    /// Create an orchestrator with the standard filter chain
    pub fn new(paths: DataPaths) -> Self {
        Self {
            paths,
            filter_pipeline: FilterPipeline::standard(),
        }
    }

    pub fn paths(&self) -> &DataPaths {
        &self.paths
    }

    /// Load everything from the data directory and run a search.
    ///
    /// The limited-to-one set is only resolved when the config asks for it.
    pub fn run(&self, config: &SearchConfig) -> Result<SearchOutcome> {
        config.validate().context("Invalid search configuration")?;

        let catalog = Catalog::load(&self.paths).context("Failed to load mark catalog")?;
        let exclusivity = if config.use_exclusivity {
            let set = ExclusivitySet::resolve(&self.paths, &catalog)
                .context("Failed to load limited-to-one ids")?;
            info!("Resolved {} limited-to-one marks", set.len());
            Some(set)
        } else {
            None
        };

        self.execute(catalog.into_items(), config, exclusivity.as_ref())
    }

    /// Run a search over already-loaded marks.
    ///
    /// # Arguments
    /// * `items` - The marks to search over
    /// * `config` - Targets and filter switches
    /// * `exclusivity` - Limited-to-one ids, ignored unless the config enables them
    pub fn search(
        &self,
        items: Vec<Item>,
        config: &SearchConfig,
        exclusivity: Option<&ExclusivitySet>,
    ) -> Result<SearchOutcome> {
        config.validate().context("Invalid search configuration")?;
        self.execute(items, config, exclusivity)
    }

    /// Filter, enumerate, snapshot and validate; `config` is already validated
    fn execute(
        &self,
        items: Vec<Item>,
        config: &SearchConfig,
        exclusivity: Option<&ExclusivitySet>,
    ) -> Result<SearchOutcome> {
        let start_time = Instant::now();

        let catalog_size = items.len();
        let candidates = self
            .filter_pipeline
            .apply(items, config)
            .context("Failed to apply filters")?;
        info!(
            "Filtering complete, {} of {} marks remain",
            candidates.len(),
            catalog_size
        );

        let enumeration = CombinationEnumerator::from_config(config, exclusivity).enumerate(&candidates);

        snapshot::write_snapshot(&self.paths.snapshot, &enumeration.rows)
            .context("Failed to write combination snapshot")?;
        info!(
            "Wrote {} combinations to {}",
            enumeration.rows.len(),
            self.paths.snapshot.display()
        );

        let rows = Validator::from_config(config)
            .validate(&self.paths.snapshot, &self.paths.result_log)
            .context("Failed to validate combinations")?;

        let elapsed = start_time.elapsed();
        info!(
            "Search finished with {} results in {:.2?}",
            rows.len(),
            elapsed
        );

        Ok(SearchOutcome {
            catalog_size,
            candidate_count: candidates.len(),
            stats: enumeration.stats,
            rows,
            elapsed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog::{Attribute, AttributeVector, Quality};
    use pipeline::{AttributeTargets, TargetRange};
    use tempfile::TempDir;

    fn item(id: u32, class: &str, attack: i32) -> Item {
        Item::new(
            id,
            Quality::Five,
            format!("Mark {}", id),
            AttributeVector::new([attack, 0, 0, 0, 0, 0]),
            class,
        )
    }

    #[test]
    fn test_search_writes_snapshot_and_log() {
        let dir = TempDir::new().unwrap();
        let orchestrator = SearchOrchestrator::new(DataPaths::new(dir.path()));
        let config = SearchConfig {
            targets: AttributeTargets::new().with(Attribute::Attack, TargetRange::at_least(25)),
            sum_buckets: Default::default(),
            ..SearchConfig::default()
        };

        let outcome = orchestrator
            .search(vec![item(1, "A", 10), item(2, "B", 5)], &config, None)
            .unwrap();

        assert_eq!(outcome.catalog_size, 2);
        assert_eq!(outcome.candidate_count, 2);
        assert_eq!(outcome.stats.raw, 4);
        // 1+1+2 = 25 and 1+1+1 = 30 (rejected, three of series A)
        assert_eq!(outcome.rows.len(), 1);
        assert!(orchestrator.paths().snapshot.exists());
        assert!(orchestrator.paths().result_log.exists());
    }

    #[test]
    fn test_invalid_config_fails_before_io() {
        let dir = TempDir::new().unwrap();
        let orchestrator = SearchOrchestrator::new(DataPaths::new(dir.path()));
        let config = SearchConfig {
            targets: AttributeTargets::new().with(Attribute::Attack, TargetRange::between(30, 10)),
            ..SearchConfig::default()
        };

        assert!(orchestrator.search(vec![item(1, "A", 10)], &config, None).is_err());
        assert!(!orchestrator.paths().snapshot.exists());
    }
}
