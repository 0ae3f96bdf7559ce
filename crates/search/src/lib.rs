//! Search crate for the mark combination finder.
//!
//! This crate contains the orchestrator that runs a search end to end,
//! from the catalog on disk to the validated result log.

pub mod orchestrator;

pub use orchestrator::{SearchOrchestrator, SearchOutcome};
