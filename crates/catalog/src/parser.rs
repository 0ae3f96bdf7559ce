//! Parsers for the catalog CSV and the plain-text id lists.
//!
//! Catalog format (`mintmark_data.csv`):
//! `id,quality,description,total_attr_value,total_sum,monster_id,mintmark_class`
//!
//! - `total_attr_value` holds six space-separated integers
//! - an empty `monster_id` means the mark is not bound to a creature
//! - the file may start with a UTF-8 BOM (the tool that writes it adds one)
//!
//! A row that cannot be turned into an `Item` is recorded as a `SkippedRecord`
//! and parsing continues. Only a file that cannot be read at all is an error.

use crate::error::{DataLoadError, Result};
use crate::types::*;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::warn;

/// Columns the catalog file must provide
const REQUIRED_COLUMNS: [&str; 7] = [
    "id",
    "quality",
    "description",
    "total_attr_value",
    "total_sum",
    "monster_id",
    "mintmark_class",
];

/// Result of parsing the catalog file
#[derive(Debug, Default)]
pub struct ParsedCatalog {
    pub items: Vec<Item>,
    /// Source line of each entry in `items`
    pub lines: Vec<usize>,
    pub skipped: Vec<SkippedRecord>,
}

impl ParsedCatalog {
    /// Items paired with the line they were read from
    pub fn into_lined_items(self) -> impl Iterator<Item = (usize, Item)> {
        self.lines.into_iter().zip(self.items)
    }
}

/// One catalog row before validation.
///
/// Every field is read as text so a bad value in one column becomes a
/// `MalformedItem` for that row instead of a reader error.
#[derive(Debug, Deserialize)]
struct RawItemRecord {
    id: String,
    quality: String,
    description: String,
    total_attr_value: String,
    #[serde(default)]
    total_sum: String,
    #[serde(default)]
    monster_id: String,
    mintmark_class: String,
}

/// Read a text file, dropping a leading byte-order mark
fn read_text(path: &Path) -> Result<String> {
    let content = fs::read_to_string(path)?;
    Ok(match content.strip_prefix('\u{feff}') {
        Some(stripped) => stripped.to_string(),
        None => content,
    })
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Parse the catalog file at `path`.
///
/// Returns `CatalogUnavailable` if the file does not exist and `ParseError`
/// if the header lacks a required column.
pub fn parse_catalog(path: &Path) -> Result<ParsedCatalog> {
    if !path.is_file() {
        return Err(DataLoadError::CatalogUnavailable {
            path: path.display().to_string(),
        });
    }
    let content = read_text(path)?;
    parse_catalog_str(&content, &file_label(path))
}

/// Parse catalog CSV held in memory. `file` is only used in error messages.
pub fn parse_catalog_str(content: &str, file: &str) -> Result<ParsedCatalog> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers = reader.headers()?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|header| header == column) {
            return Err(DataLoadError::ParseError {
                file: file.to_string(),
                line: 1,
                reason: format!("Missing column {}", column),
            });
        }
    }

    let mut parsed = ParsedCatalog::default();

    for (idx, record) in reader.records().enumerate() {
        // Header is line 1, first record line 2
        let fallback_line = idx + 2;

        let record = match record {
            Ok(record) => record,
            Err(e) => {
                let line = e
                    .position()
                    .map(|p| p.line() as usize)
                    .unwrap_or(fallback_line);
                skip(&mut parsed, file, line, e.to_string());
                continue;
            }
        };
        let line = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(fallback_line);

        let raw: RawItemRecord = match record.deserialize(Some(&headers)) {
            Ok(raw) => raw,
            Err(e) => {
                skip(&mut parsed, file, line, e.to_string());
                continue;
            }
        };

        match parse_item(raw) {
            Ok(item) => {
                parsed.items.push(item);
                parsed.lines.push(line);
            }
            Err(e) => skip(&mut parsed, file, line, e.to_string()),
        }
    }

    Ok(parsed)
}

fn skip(parsed: &mut ParsedCatalog, file: &str, line: usize, reason: String) {
    warn!("Skipping record at line {} in {}: {}", line, file, reason);
    parsed.skipped.push(SkippedRecord { line, reason });
}

/// Validate one raw row into an `Item`
fn parse_item(raw: RawItemRecord) -> Result<Item> {
    let malformed = |reason: String| DataLoadError::MalformedItem {
        id: raw.id.clone(),
        reason,
    };

    let id = raw
        .id
        .parse::<ItemId>()
        .map_err(|e| malformed(format!("Invalid id: {}", e)))?;
    let quality = raw
        .quality
        .parse::<Quality>()
        .map_err(|e: DataLoadError| malformed(e.to_string()))?;
    let attributes = raw
        .total_attr_value
        .parse::<AttributeVector>()
        .map_err(|e: DataLoadError| malformed(e.to_string()))?;

    let computed_total = attributes
        .checked_total()
        .ok_or_else(|| malformed(format!("Attribute total of {} overflows", attributes)))?;
    // The cached sum is optional; recompute when it is absent or garbled
    let total_sum = raw.total_sum.parse::<i32>().unwrap_or(computed_total);

    let owner_restriction = if raw.monster_id.is_empty() {
        None
    } else {
        Some(raw.monster_id)
    };

    Ok(Item {
        id,
        quality,
        description: raw.description,
        attributes,
        total_sum,
        class_id: raw.mintmark_class,
        owner_restriction,
    })
}

/// Parse a one-entry-per-line list file.
///
/// Blank lines and lines starting with `#` are ignored. A missing file is an
/// empty list: these files are optional user input.
pub fn parse_id_list(path: &Path) -> Result<Vec<String>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let content = read_text(path)?;
    Ok(parse_id_list_str(&content))
}

pub fn parse_id_list_str(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

/// Parse a list file whose entries must be item ids
pub fn parse_item_ids(path: &Path) -> Result<Vec<ItemId>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let content = read_text(path)?;
    let file = file_label(path);

    let mut ids = Vec::new();
    for (idx, line) in content.lines().enumerate() {
        let line_trimmed = line.trim();
        if line_trimmed.is_empty() || line_trimmed.starts_with('#') {
            continue;
        }
        let id = line_trimmed.parse::<ItemId>().map_err(|e| DataLoadError::ParseError {
            file: file.clone(),
            line: idx + 1,
            reason: format!("Invalid item id: {}", e),
        })?;
        ids.push(id);
    }
    Ok(ids)
}
