use std::path::Path;

use anyhow::{Context, Result, bail};
use calamine::{Data, Reader, open_workbook_auto};

use super::model::Field;

// ---------------------------------------------------------------------------
// RawTable – file contents before validation
// ---------------------------------------------------------------------------

/// Header row plus string cells, exactly as read from the input file.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of each raw field's column, or the names of the missing ones.
    pub fn field_columns(&self) -> std::result::Result<Vec<(Field, usize)>, Vec<String>> {
        let mut found = Vec::with_capacity(Field::ALL.len());
        let mut missing = Vec::new();
        for field in Field::ALL {
            match self.headers.iter().position(|h| h == field.name()) {
                Some(idx) => found.push((field, idx)),
                None => missing.push(field.name().to_string()),
            }
        }
        if missing.is_empty() {
            Ok(found)
        } else {
            Err(missing)
        }
    }
}

/// The file extension is neither `.csv` nor `.xlsx`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Invalid file format. Please upload CSV or XLSX.")]
pub struct UnsupportedFormat;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load an order table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`  – header row, one order per line
/// * `.xlsx` – first worksheet, header row first
pub fn load_file(path: &Path) -> Result<RawTable> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "csv" => load_csv(path)?,
        "xlsx" => load_xlsx(path)?,
        _ => return Err(UnsupportedFormat.into()),
    };
    log::info!(
        "Read {} rows with columns {:?} from {}",
        table.len(),
        table.headers,
        path.display()
    );
    Ok(table)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<RawTable> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_path(path)
        .context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let line = row_no + 2;
        let record = result.with_context(|| format!("CSV row {line}"))?;
        if record.len() > headers.len() {
            bail!(
                "Row {line} has {} fields but the header has {}.",
                record.len(),
                headers.len()
            );
        }
        rows.push(pad_row(record.iter().map(|c| c.to_string()).collect(), headers.len()));
    }

    Ok(RawTable { headers, rows })
}

// ---------------------------------------------------------------------------
// XLSX loader
// ---------------------------------------------------------------------------

fn load_xlsx(path: &Path) -> Result<RawTable> {
    let mut workbook = open_workbook_auto(path).context("opening workbook")?;
    let range = workbook
        .worksheet_range_at(0)
        .context("workbook has no worksheets")?
        .context("reading first worksheet")?;

    let mut rows_iter = range.rows();
    let headers: Vec<String> = match rows_iter.next() {
        Some(row) => row.iter().map(cell_to_string).collect(),
        None => return Ok(RawTable::default()),
    };

    let rows = rows_iter
        .map(|row| pad_row(row.iter().map(cell_to_string).collect(), headers.len()))
        .collect();

    Ok(RawTable { headers, rows })
}

/// Render a spreadsheet cell the way it would appear in a CSV export.
/// Whole-number floats lose their fractional part (`3.0` → `3`).
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

fn pad_row(mut row: Vec<String>, width: usize) -> Vec<String> {
    if row.len() < width {
        row.resize(width, String::new());
    }
    row
}
