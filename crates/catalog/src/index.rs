//! Catalog loading and the side files that shape it.
//!
//! Loading a catalog means:
//! 1. Parse `mintmark_data.csv`, recovering from malformed rows
//! 2. Drop the marks listed in `missing_mintmark_ids.txt`
//! 3. Index the rest by id and series
//!
//! This module also reads and writes the restricted-series list and the
//! derived exclusivity id list.

use crate::error::Result;
use crate::parser;
use crate::paths::{DataPaths, DEFAULT_RESTRICTED_CLASSES};
use crate::types::*;
use std::collections::HashSet;
use std::fs;
use std::io::Write;
use std::path::Path;
use tracing::{debug, info, warn};

impl Catalog {
    /// Load the catalog described by `paths`.
    ///
    /// Fails with `CatalogUnavailable` when the catalog file is missing.
    /// Malformed rows and duplicate ids are skipped and reported through
    /// `Catalog::skipped`.
    pub fn load(paths: &DataPaths) -> Result<Self> {
        info!("Loading mark catalog from {}", paths.catalog.display());

        let mut parsed = parser::parse_catalog(&paths.catalog)?;
        let missing: HashSet<String> = parser::parse_id_list(&paths.missing_ids)?
            .into_iter()
            .collect();

        let mut catalog = Catalog::new();
        catalog.skipped = std::mem::take(&mut parsed.skipped);

        let mut excluded = 0;
        for (line, item) in parsed.into_lined_items() {
            if missing.contains(&item.id.to_string()) {
                excluded += 1;
                continue;
            }
            let id = item.id;
            if !catalog.insert_item(item) {
                warn!("Duplicate mark id {} at line {} ignored", id, line);
                catalog.skipped.push(SkippedRecord {
                    line,
                    reason: format!("Duplicate id {}", id),
                });
            }
        }

        info!(
            "Loaded {} marks ({} not owned, {} skipped)",
            catalog.len(),
            excluded,
            catalog.skipped.len()
        );
        Ok(catalog)
    }
}

impl ExclusivitySet {
    /// Read the id list file; a missing file yields an empty set
    pub fn load(path: &Path) -> Result<Self> {
        let ids = parser::parse_item_ids(path)?;
        debug!("Loaded {} limited-to-one ids from {}", ids.len(), path.display());
        Ok(ids.into_iter().collect())
    }

    /// Resolve the set the way a search run needs it.
    ///
    /// The id file wins when it exists; otherwise the set is derived from the
    /// restricted series list (or the built-in list if that file is absent too).
    pub fn resolve(paths: &DataPaths, catalog: &Catalog) -> Result<Self> {
        if paths.exclusivity_ids.exists() {
            return Self::load(&paths.exclusivity_ids);
        }
        let classes = load_restricted_classes(&paths.restricted_classes)?;
        Ok(catalog.exclusivity_set(&classes))
    }

    /// Write the set as one id per line unless the file already exists.
    ///
    /// Returns whether the file was written.
    pub fn write_if_absent(&self, path: &Path) -> Result<bool> {
        let lines: Vec<String> = self.sorted_ids().iter().map(|id| id.to_string()).collect();
        write_lines_if_absent(path, None, &lines)
    }
}

/// Read the restricted series ids, falling back to the built-in list
pub fn load_restricted_classes(path: &Path) -> Result<HashSet<ClassId>> {
    if !path.exists() {
        return Ok(DEFAULT_RESTRICTED_CLASSES
            .iter()
            .map(|class| class.to_string())
            .collect());
    }
    Ok(parser::parse_id_list(path)?.into_iter().collect())
}

/// Create `path` with an optional comment header and one entry per line.
///
/// Never overwrites: returns `Ok(false)` when the file is already there.
pub fn write_lines_if_absent(path: &Path, header: Option<&str>, lines: &[String]) -> Result<bool> {
    if path.exists() {
        debug!("{} already exists, leaving it untouched", path.display());
        return Ok(false);
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut file = fs::File::create(path)?;
    if let Some(header) = header {
        writeln!(file, "# {}", header)?;
    }
    for line in lines {
        writeln!(file, "{}", line)?;
    }
    info!("Created {}", path.display());
    Ok(true)
}

/// Lay down the user-editable side files that do not exist yet.
///
/// - the restricted series list (built-in defaults)
/// - the exclusivity id list derived from `catalog`
/// - an empty, commented missing-ids template
pub fn initialize_side_files(paths: &DataPaths, catalog: &Catalog) -> Result<Vec<String>> {
    let mut created = Vec::new();

    let classes: Vec<String> = DEFAULT_RESTRICTED_CLASSES
        .iter()
        .map(|class| class.to_string())
        .collect();
    if write_lines_if_absent(&paths.restricted_classes, None, &classes)? {
        created.push(paths.restricted_classes.display().to_string());
    }

    let restricted = load_restricted_classes(&paths.restricted_classes)?;
    let exclusivity = catalog.exclusivity_set(&restricted);
    if exclusivity.is_empty() {
        warn!("No catalog marks belong to a restricted series");
    } else if exclusivity.write_if_absent(&paths.exclusivity_ids)? {
        created.push(paths.exclusivity_ids.display().to_string());
    }

    if write_lines_if_absent(
        &paths.missing_ids,
        Some("Ids of marks you do not own (or do not want to use), one per line"),
        &[],
    )? {
        created.push(paths.missing_ids.display().to_string());
    }

    Ok(created)
}
