//! CSV readers resilient to spreadsheet-export quirks.
//!
//! Position and target files arrive as whatever the upstream desk exported:
//! cover rows above the real header, arbitrarily labeled columns, the odd
//! blank or non-numeric cell. The readers here locate the header by
//! content, match columns by normalized name, and skip (while counting)
//! rows that cannot be parsed. Quantities are parsed as exact decimal text;
//! they never pass through binary floating point.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use csv::StringRecord;
use tracing::{debug, warn};

use crate::application::batch::TargetRow;
use crate::domain::Quantity;
use crate::error::InputError;

/// Rows inspected for the real header before falling back to row zero.
const HEADER_SCAN_ROWS: usize = 20;

/// Header names accepted for the asset-code column.
const CODE_NAMES: [&str; 3] = ["ticker", "symbol", "code"];

/// Header names accepted for an optional per-row truncation scale.
const SCALE_NAMES: [&str; 3] = ["scale", "decimals", "decimal places"];

/// Parsed base-position file: code to quantity lookup.
#[derive(Debug)]
pub struct PositionTable {
    pub lookup: HashMap<String, Quantity>,
    /// Rows skipped as malformed.
    pub skipped: u32,
}

/// Parsed target-portfolio file.
#[derive(Debug)]
pub struct TargetTable {
    pub rows: Vec<TargetRow>,
    /// Rows skipped as malformed.
    pub skipped: u32,
}

/// Read a positions file into a code -> quantity lookup.
///
/// The quantity column is any header containing `qty`, `quantity` or
/// `position`.
pub fn read_positions(path: &Path) -> Result<PositionTable, InputError> {
    let records = read_records(path)?;
    let layout = detect_layout(&records, &["qty", "quantity", "position"], path)?;

    let mut lookup = HashMap::new();
    let mut skipped = 0u32;
    for (line, record) in records.iter().enumerate().skip(layout.header + 1) {
        match parse_code_and_quantity(record, &layout, path, line) {
            Some((code, quantity)) => {
                lookup.insert(code, quantity);
            }
            None => skipped += 1,
        }
    }

    Ok(PositionTable { lookup, skipped })
}

/// Read a target-portfolio file into solver rows.
///
/// The quantity column is any header containing `quantity`, `qty` or
/// `theoretical`. A `scale`/`decimals` column, when present, overrides the
/// batch truncation scale per row.
pub fn read_targets(path: &Path) -> Result<TargetTable, InputError> {
    let records = read_records(path)?;
    let layout = detect_layout(&records, &["quantity", "qty", "theoretical"], path)?;

    let mut rows = Vec::new();
    let mut skipped = 0u32;
    for (line, record) in records.iter().enumerate().skip(layout.header + 1) {
        let Some((code, theoretical)) = parse_code_and_quantity(record, &layout, path, line) else {
            skipped += 1;
            continue;
        };
        let scale = match layout.scale.map(|idx| cell(record, idx)) {
            None | Some("") => None,
            Some(text) => match text.parse::<u32>() {
                Ok(scale) => Some(scale),
                Err(_) => {
                    warn!(
                        path = %path.display(),
                        line = line + 1,
                        scale = text,
                        "skipping row with a non-numeric scale"
                    );
                    skipped += 1;
                    continue;
                }
            },
        };
        rows.push(TargetRow {
            code,
            theoretical,
            scale,
        });
    }

    Ok(TargetTable { rows, skipped })
}

/// Column positions resolved for one file.
struct Layout {
    header: usize,
    code: usize,
    quantity: usize,
    scale: Option<usize>,
}

fn read_records(path: &Path) -> Result<Vec<StringRecord>, InputError> {
    let read_err = |source| InputError::Read {
        path: PathBuf::from(path),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(read_err)?;

    let mut records = Vec::new();
    for record in reader.records() {
        records.push(record.map_err(read_err)?);
    }
    if records.is_empty() {
        return Err(InputError::Empty {
            path: PathBuf::from(path),
        });
    }
    Ok(records)
}

/// Locate the header row and the code/quantity columns by name, tolerating
/// cover rows above the real header. Falls back to the first row and the
/// first two columns when nothing is labeled.
fn detect_layout(
    records: &[StringRecord],
    quantity_keys: &[&str],
    path: &Path,
) -> Result<Layout, InputError> {
    for (idx, record) in records.iter().take(HEADER_SCAN_ROWS).enumerate() {
        let names: Vec<String> = record.iter().map(normalize).collect();
        let Some(code) = names.iter().position(|n| CODE_NAMES.contains(&n.as_str())) else {
            continue;
        };
        let Some(quantity) = names
            .iter()
            .position(|n| quantity_keys.iter().any(|key| n.contains(key)))
        else {
            continue;
        };
        let scale = names
            .iter()
            .position(|n| SCALE_NAMES.contains(&n.as_str()));
        debug!(path = %path.display(), header = idx, "header row located");
        return Ok(Layout {
            header: idx,
            code,
            quantity,
            scale,
        });
    }

    if records[0].len() < 2 {
        return Err(InputError::NoColumns {
            path: PathBuf::from(path),
        });
    }
    warn!(
        path = %path.display(),
        "no labeled columns found, using the first two columns"
    );
    Ok(Layout {
        header: 0,
        code: 0,
        quantity: 1,
        scale: None,
    })
}

fn parse_code_and_quantity(
    record: &StringRecord,
    layout: &Layout,
    path: &Path,
    line: usize,
) -> Option<(String, Quantity)> {
    let code = cell(record, layout.code);
    if code.is_empty() {
        debug!(path = %path.display(), line = line + 1, "skipping row without a code");
        return None;
    }
    let text = cell(record, layout.quantity);
    match text.parse::<Quantity>() {
        Ok(quantity) => Some((code.to_string(), quantity)),
        Err(_) => {
            warn!(
                path = %path.display(),
                line = line + 1,
                code,
                quantity = text,
                "skipping row with a non-numeric quantity"
            );
            None
        }
    }
}

fn cell<'r>(record: &'r StringRecord, index: usize) -> &'r str {
    record.get(index).unwrap_or_default().trim()
}

/// Lowercased, whitespace-collapsed header text.
fn normalize(cell: &str) -> String {
    cell.trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
