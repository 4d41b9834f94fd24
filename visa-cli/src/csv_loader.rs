//! CSV loader for batches of estimate scenarios.
//!
//! ## CSV Format
//!
//! Column order does **not** matter (headers are matched by name). Header
//! names are case-sensitive. Every cell goes through the same defaulting as
//! interactive input, so a blank or unreadable number becomes zero.
//!
//! | Column        | Required | Notes                                      |
//! |---------------|----------|--------------------------------------------|
//! | `label`       | no       | Free text shown with the result            |
//! | `married`     | yes      | `yes`/`no`, `y`/`n`, `true`/`false`, `1`/`0` |
//! | `children`    | no       | Ignored unless married                     |
//! | `duration`    | no       | Years, may be fractional (`2.5` → 3)       |
//! | `priority`    | no       | Same spellings as `married`; blank is no   |
//! | `flight`      | no       | Per person                                 |
//! | `rent`        | no       | Per month                                  |
//! | `rent_months` | no       | Blank or `0` means 1                       |
//! | `misc`        | no       |                                            |
//! | `currency`    | no       | Blank uses the configured default          |
//! | `rate`        | no       | Blank or `0` means no conversion           |
//!
//! ### Minimal example
//!
//! ```csv
//! married,duration
//! yes,3
//! ```
//!
//! ### Full example
//!
//! ```csv
//! label,married,children,duration,priority,flight,rent,rent_months,misc,currency,rate
//! couple,yes,0,1,no,0,0,1,0,$,1.27
//! family,yes,2,3,yes,500,1000,6,200,₹,104.5
//! ```
use serde::Deserialize;
use visa_core::EstimatorInput;

use crate::collector::{InputCollector, RawFields, parse_flag};

// ---------------------------------------------------------------------------
// Serde-compatible row that mirrors the CSV layout exactly
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(default)]
    label: Option<String>,
    married: String,
    #[serde(default)]
    children: Option<String>,
    #[serde(default)]
    duration: Option<String>,
    #[serde(default)]
    priority: Option<String>,
    #[serde(default)]
    flight: Option<String>,
    #[serde(default)]
    rent: Option<String>,
    #[serde(default)]
    rent_months: Option<String>,
    #[serde(default)]
    misc: Option<String>,
    #[serde(default)]
    currency: Option<String>,
    #[serde(default)]
    rate: Option<String>,
}

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Errors that can occur while loading scenario CSV data.
#[derive(Debug, thiserror::Error)]
pub enum CsvLoadError {
    /// The underlying CSV deserialisation failed (bad structure, missing
    /// `married` column, etc.).
    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),

    /// A yes/no column held something else. `row` is 1-based (header = row 0).
    #[error("unrecognised {column} value '{value}' on row {row}")]
    InvalidFlag {
        column: &'static str,
        value: String,
        row: usize,
    },

    #[error("cannot read '{path}': {source}")]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// One loaded scenario, already defaulted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scenario {
    /// The row's label, or `row N` when the cell is blank.
    pub label: String,
    pub input: EstimatorInput,
}

// ---------------------------------------------------------------------------
// Core loader
// ---------------------------------------------------------------------------

fn flag(
    column: &'static str,
    value: Option<String>,
    row: usize,
) -> Result<bool, CsvLoadError> {
    let value = value.unwrap_or_default();
    parse_flag(&value).ok_or(CsvLoadError::InvalidFlag { column, value, row })
}

/// Convert a single CSV row into a Scenario.
///
/// row_number is 1-based (for error messages).
fn convert_row(
    row: CsvRow,
    row_number: usize,
    collector: &InputCollector,
) -> Result<Scenario, CsvLoadError> {
    let raw = RawFields {
        married: flag("married", Some(row.married), row_number)?,
        children: row.children.unwrap_or_default(),
        duration: row.duration.unwrap_or_default(),
        priority: flag("priority", row.priority, row_number)?,
        flight: row.flight.unwrap_or_default(),
        rent: row.rent.unwrap_or_default(),
        rent_months: row.rent_months.unwrap_or_default(),
        misc: row.misc.unwrap_or_default(),
        currency: row.currency.unwrap_or_default(),
        rate: row.rate.unwrap_or_default(),
    };

    let label = row
        .label
        .filter(|l| !l.trim().is_empty())
        .unwrap_or_else(|| format!("row {row_number}"));

    Ok(Scenario {
        label,
        input: collector.collect(&raw),
    })
}

/// Parse CSV text and return the scenarios in file order.
///
/// # Errors
///
/// * [CsvLoadError::Parse] – if the CSV is structurally invalid or the
///   `married` column is missing.
/// * [CsvLoadError::InvalidFlag] – if a yes/no cell is unrecognised.
pub fn load_from_str(
    input: &str,
    collector: &InputCollector,
) -> Result<Vec<Scenario>, CsvLoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All) // tolerate whitespace around values
        .flexible(false) // strict column count
        .from_reader(input.as_bytes());

    reader
        .deserialize::<CsvRow>()
        .enumerate()
        .map(|(idx, result)| {
            let row = result?;
            let row_number = idx + 1; // 1-based for user-facing messages
            convert_row(row, row_number, collector)
        })
        .collect()
}

/// Convenience wrapper: read a file from disk and delegate to [load_from_str].
pub fn load_from_file(
    path: &std::path::Path,
    collector: &InputCollector,
) -> Result<Vec<Scenario>, CsvLoadError> {
    let contents = std::fs::read_to_string(path).map_err(|source| CsvLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_from_str(&contents, collector)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
