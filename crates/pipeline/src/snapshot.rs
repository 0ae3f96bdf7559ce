//! Result rows and the two files they are stored in.
//!
//! - The snapshot (`combinations_data.csv`) holds every combination the
//!   enumerator accepted and is rewritten on each run.
//! - The result log (`process.csv`) is append-only: the header is written
//!   once, then each run adds its validated rows.
//!
//! Both share the same ten columns. The header labels are what the existing
//! spreadsheet exports look for, so they are fixed. Files are written with a
//! UTF-8 byte-order mark so spreadsheet programs detect the encoding.

use anyhow::{Context, Result, bail};
use catalog::{Attribute, AttributeVector, ATTRIBUTE_COUNT};
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::Path;
use tracing::debug;

const BOM: &str = "\u{feff}";

/// Column headers, in file order
pub const RESULT_COLUMNS: [&str; 10] = [
    "刻印1", "刻印2", "刻印3", "攻击", "防御", "特攻", "特防", "速度", "体力", "选项总和",
];

const DESCRIPTION_COLUMNS: [&str; 3] = ["刻印1", "刻印2", "刻印3"];
const SCORE_COLUMN: &str = "选项总和";

/// One accepted combination: three mark descriptions, six summed stats, a score.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResultRow {
    #[serde(rename = "刻印1")]
    pub description_1: String,
    #[serde(rename = "刻印2")]
    pub description_2: String,
    #[serde(rename = "刻印3")]
    pub description_3: String,
    #[serde(rename = "攻击")]
    pub attack_sum: i32,
    #[serde(rename = "防御")]
    pub defense_sum: i32,
    #[serde(rename = "特攻")]
    pub sp_atk_sum: i32,
    #[serde(rename = "特防")]
    pub sp_def_sum: i32,
    #[serde(rename = "速度")]
    pub speed_sum: i32,
    #[serde(rename = "体力")]
    pub hp_sum: i32,
    /// Sum of the summed stats that carry a non-zero target
    #[serde(rename = "选项总和")]
    pub score: i32,
}

impl ResultRow {
    pub fn new(descriptions: [String; 3], sums: AttributeVector, score: i32) -> Self {
        let [description_1, description_2, description_3] = descriptions;
        let [attack_sum, defense_sum, sp_atk_sum, sp_def_sum, speed_sum, hp_sum] = sums.0;
        Self {
            description_1,
            description_2,
            description_3,
            attack_sum,
            defense_sum,
            sp_atk_sum,
            sp_def_sum,
            speed_sum,
            hp_sum,
            score,
        }
    }

    pub fn descriptions(&self) -> [&str; 3] {
        [
            self.description_1.as_str(),
            self.description_2.as_str(),
            self.description_3.as_str(),
        ]
    }

    pub fn sums(&self) -> AttributeVector {
        AttributeVector::new([
            self.attack_sum,
            self.defense_sum,
            self.sp_atk_sum,
            self.sp_def_sum,
            self.speed_sum,
            self.hp_sum,
        ])
    }

    pub fn sum(&self, attribute: Attribute) -> i32 {
        self.sums().get(attribute)
    }
}

// =============================================================================
// Writing
// =============================================================================

fn csv_writer<W: Write>(writer: W) -> csv::Writer<W> {
    csv::WriterBuilder::new().has_headers(false).from_writer(writer)
}

fn write_header<W: Write>(file: &mut W) -> Result<()> {
    file.write_all(BOM.as_bytes())?;
    let mut writer = csv_writer(file);
    writer.write_record(RESULT_COLUMNS)?;
    writer.flush()?;
    Ok(())
}

/// Replace the snapshot with `rows`. The header is written even when `rows` is empty.
pub fn write_snapshot(path: &Path, rows: &[ResultRow]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)
        .with_context(|| format!("Failed to create snapshot {}", path.display()))?;
    write_header(&mut file)?;

    let mut writer = csv_writer(file);
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    debug!("Wrote {} rows to {}", rows.len(), path.display());
    Ok(())
}

/// Append `rows` to the result log, creating it with a header if it is new or empty
pub fn append_to_log(path: &Path, rows: &[ResultRow]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open result log {}", path.display()))?;

    if file.metadata()?.len() == 0 {
        write_header(&mut file)?;
    }

    let mut writer = csv_writer(file);
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

// =============================================================================
// Reading
// =============================================================================

/// Where each field lives in a result file, resolved from its header.
///
/// Reading by header name instead of position means a file whose columns were
/// reordered (by a spreadsheet round-trip, say) still reads correctly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMap {
    descriptions: [usize; 3],
    attributes: [usize; ATTRIBUTE_COUNT],
    score: usize,
}

impl ColumnMap {
    pub fn from_headers(headers: &csv::StringRecord) -> Result<Self> {
        let find = |label: &str| -> Result<usize> {
            match headers.iter().position(|header| header == label) {
                Some(position) => Ok(position),
                None => bail!("Missing column {}", label),
            }
        };

        let mut descriptions = [0; 3];
        for (slot, label) in descriptions.iter_mut().zip(DESCRIPTION_COLUMNS) {
            *slot = find(label)?;
        }
        let mut attributes = [0; ATTRIBUTE_COUNT];
        for (slot, attribute) in attributes.iter_mut().zip(Attribute::ALL) {
            *slot = find(attribute.column_label())?;
        }
        Ok(Self {
            descriptions,
            attributes,
            score: find(SCORE_COLUMN)?,
        })
    }

    /// Column holding the summed value of `attribute`
    pub fn attribute_column(&self, attribute: Attribute) -> usize {
        self.attributes[attribute.index()]
    }

    /// Build a row from a record; `None` if any field is missing or not numeric
    pub fn row(&self, record: &csv::StringRecord) -> Option<ResultRow> {
        let text = |column: usize| record.get(column).map(str::to_string);
        let number = |column: usize| record.get(column)?.trim().parse::<i32>().ok();

        let descriptions = [
            text(self.descriptions[0])?,
            text(self.descriptions[1])?,
            text(self.descriptions[2])?,
        ];
        let mut sums = [0; ATTRIBUTE_COUNT];
        for attribute in Attribute::ALL {
            sums[attribute.index()] = number(self.attribute_column(attribute))?;
        }
        let score = number(self.score)?;
        Some(ResultRow::new(descriptions, AttributeVector::new(sums), score))
    }
}

/// Read every well-formed row of a result file.
///
/// Returns `Ok(None)` if the file does not exist. Rows that cannot be read
/// are dropped; a header without the expected columns is an error.
pub fn read_rows(path: &Path) -> Result<Option<Vec<ResultRow>>> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let content = content.strip_prefix(BOM).unwrap_or(&content);
    if content.trim().is_empty() {
        return Ok(Some(Vec::new()));
    }

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(content.as_bytes());
    let columns = ColumnMap::from_headers(reader.headers()?)
        .with_context(|| format!("Unexpected header in {}", path.display()))?;

    let mut rows = Vec::new();
    let mut unreadable = 0;
    for record in reader.records() {
        match record.ok().and_then(|record| columns.row(&record)) {
            Some(row) => rows.push(row),
            None => unreadable += 1,
        }
    }
    if unreadable > 0 {
        debug!("Dropped {} unreadable rows from {}", unreadable, path.display());
    }
    Ok(Some(rows))
}
