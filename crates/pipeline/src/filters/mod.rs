//! Filter implementations for the candidate pipeline.
//!
//! This module contains all the concrete filter implementations
//! that can be composed into a FilterPipeline.

pub mod owner_restriction;
pub mod sum_bucket;
pub mod quality;
pub mod negative_values;
pub mod efficiency;
pub mod zero_constraint;

// Re-export for convenience
pub use owner_restriction::OwnerRestrictionFilter;
pub use sum_bucket::SumBucketFilter;
pub use quality::QualityFilter;
pub use negative_values::NegativeValueFilter;
pub use efficiency::EfficiencyPruningFilter;
pub use zero_constraint::ZeroConstraintFilter;
