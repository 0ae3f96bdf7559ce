//! Filtering, enumeration and validation of mark combinations.
//!
//! This crate provides:
//! - `SearchConfig` and the target-range types
//! - Filter trait and implementations for candidate filtering
//! - FilterPipeline for composing filters
//! - CombinationEnumerator for the three-mark search
//! - Validator for the second pass over the persisted snapshot
//!
//! ## Architecture
//! A search processes marks in stages:
//! 1. The prefilter removes marks by scalar rules and optionally prunes to the top N
//! 2. The zero-constraint filter removes marks touching an exact-zero stat
//! 3. The enumerator walks all three-mark combinations and writes the snapshot
//! 4. The validator re-checks the snapshot and appends to the result log
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::{CombinationEnumerator, FilterPipeline, SearchConfig, Validator};
//!
//! let config = SearchConfig::load("search.toml")?;
//! config.validate()?;
//!
//! let candidates = FilterPipeline::standard().apply(catalog.items().to_vec(), &config)?;
//! let enumeration = CombinationEnumerator::from_config(&config, Some(&exclusivity))
//!     .enumerate(&candidates);
//! snapshot::write_snapshot(&paths.snapshot, &enumeration.rows)?;
//!
//! let rows = Validator::from_config(&config).validate(&paths.snapshot, &paths.result_log)?;
//! ```

pub mod config;
pub mod error;
pub mod traits;
pub mod filters;
pub mod filter_pipeline;
pub mod rules;
pub mod enumerator;
pub mod snapshot;
pub mod validator;

// Re-export main types
pub use config::{AttributeTargets, SearchConfig, SumBucket, TargetRange};
pub use enumerator::{Combination, CombinationEnumerator, Enumeration, EnumerationStats};
pub use error::ConfigError;
pub use filter_pipeline::FilterPipeline;
pub use snapshot::{ResultRow, RESULT_COLUMNS};
pub use traits::Filter;
pub use validator::Validator;
