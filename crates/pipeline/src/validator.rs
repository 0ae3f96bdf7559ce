//! Second-pass validation of the snapshot.
//!
//! The validator does not trust the snapshot: it may come from an older run,
//! a different configuration, or a hand-edited file. Each row is checked
//! again against the series cap and the target ranges, and the rows that pass
//! are appended to the cumulative result log.
//!
//! The log is not deduplicated by default. Running the same search twice
//! appends the same rows twice; `dedup_log` opts out of that.

use crate::config::{AttributeTargets, SearchConfig};
use crate::rules;
use crate::snapshot::{self, ResultRow};
use anyhow::{Context, Result};
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info};

pub struct Validator<'a> {
    targets: &'a AttributeTargets,
    dedup_log: bool,
}

impl<'a> Validator<'a> {
    pub fn new(targets: &'a AttributeTargets) -> Self {
        Self {
            targets,
            dedup_log: false,
        }
    }

    pub fn from_config(config: &'a SearchConfig) -> Self {
        Self::new(&config.targets).dedup_log(config.dedup_log)
    }

    pub fn dedup_log(mut self, dedup_log: bool) -> Self {
        self.dedup_log = dedup_log;
        self
    }

    /// Whether a row passes the series cap and every target range.
    ///
    /// The snapshot has no series column, so the cap is applied to the three
    /// descriptions.
    pub fn accepts(&self, row: &ResultRow) -> bool {
        !rules::exceeds_series_cap(&row.descriptions()) && self.targets.accepts(&row.sums())
    }

    /// Re-check the snapshot at `snapshot_path` and append survivors to `log_path`.
    ///
    /// Returns the surviving rows in snapshot order. A missing snapshot means
    /// nothing was enumerated: the result is empty and the log is untouched.
    pub fn validate(&self, snapshot_path: &Path, log_path: &Path) -> Result<Vec<ResultRow>> {
        let rows = match snapshot::read_rows(snapshot_path)? {
            Some(rows) => rows,
            None => {
                info!(
                    "No snapshot at {}, nothing to validate",
                    snapshot_path.display()
                );
                return Ok(Vec::new());
            }
        };

        let total = rows.len();
        let valid: Vec<ResultRow> = rows.into_iter().filter(|row| self.accepts(row)).collect();
        debug!("{} of {} snapshot rows passed validation", valid.len(), total);

        let to_append = if self.dedup_log {
            self.unseen_rows(&valid, log_path)?
        } else {
            valid.clone()
        };
        snapshot::append_to_log(log_path, &to_append)
            .with_context(|| format!("Failed to append to {}", log_path.display()))?;
        info!(
            "Appended {} rows to {}",
            to_append.len(),
            log_path.display()
        );

        Ok(valid)
    }

    /// Rows not yet present in the log
    fn unseen_rows(&self, rows: &[ResultRow], log_path: &Path) -> Result<Vec<ResultRow>> {
        let mut seen: HashSet<ResultRow> = snapshot::read_rows(log_path)?
            .unwrap_or_default()
            .into_iter()
            .collect();
        Ok(rows
            .iter()
            .filter(|row| seen.insert((*row).clone()))
            .cloned()
            .collect())
    }
}
