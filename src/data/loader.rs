use std::io::Cursor;
use std::path::Path;

use anyhow::{Context, Result, bail};
use calamine::{Data, Reader, open_workbook_auto_from_rs};
use thiserror::Error;

use super::model::{CellValue, Column, Dataset, is_missing_marker};

// ---------------------------------------------------------------------------
// Errors surfaced to the UI
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum LoadError {
    /// The file extension is not one of the accepted formats.
    #[error("unsupported file extension: .{extension}")]
    UnsupportedFormat { extension: String },

    /// The extension was accepted but the content could not be parsed.
    #[error("could not parse {name}: {reason}")]
    Parse { name: String, reason: String },

    #[error("could not read {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Extensions offered by the file picker.
pub const ACCEPTED_EXTENSIONS: &[&str] = &["csv", "xlsx", "xls"];

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a dataset from disk. The whole file is read into memory first.
pub fn load_file(path: &Path) -> Result<Dataset, LoadError> {
    let bytes = std::fs::read(path).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();
    load_bytes(name, &bytes)
}

/// Parse an in-memory file.  Dispatch by extension of `name`.
///
/// Supported formats:
/// * `.csv`          – header row followed by data rows
/// * `.xlsx` / `.xls` – first worksheet, first row is the header
pub fn load_bytes(name: &str, bytes: &[u8]) -> Result<Dataset, LoadError> {
    let ext = Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let parsed = match ext.as_str() {
        "csv" => load_csv(bytes),
        "xlsx" | "xls" => load_spreadsheet(bytes),
        _ => return Err(LoadError::UnsupportedFormat { extension: ext }),
    };

    parsed
        .map(|columns| Dataset::new(Some(name.to_string()), columns))
        .map_err(|e| LoadError::Parse {
            name: name.to_string(),
            reason: format!("{e:#}"),
        })
}

// ---------------------------------------------------------------------------
// Header normalisation
// ---------------------------------------------------------------------------

/// Blank names become `Unnamed: <index>`, repeated names get `.1`, `.2`, ...
fn normalize_headers(raw: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(raw.len());
    for (i, name) in raw.into_iter().enumerate() {
        let base = if name.trim().is_empty() {
            format!("Unnamed: {i}")
        } else {
            name
        };
        let mut candidate = base.clone();
        let mut n = 1;
        while out.contains(&candidate) {
            candidate = format!("{base}.{n}");
            n += 1;
        }
        out.push(candidate);
    }
    out
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, then one record per row.
/// Short records are padded with missing cells; long records are an error.
fn load_csv(bytes: &[u8]) -> Result<Vec<Column>> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(bytes);

    let raw_headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();
    if raw_headers.is_empty() {
        bail!("no columns to parse from file");
    }
    let headers = normalize_headers(raw_headers);
    let width = headers.len();

    let mut cells: Vec<Vec<String>> = vec![Vec::new(); width];

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        if record.len() > width {
            bail!(
                "CSV row {row_no}: expected {width} fields, saw {}",
                record.len()
            );
        }
        for (col_idx, column) in cells.iter_mut().enumerate() {
            column.push(record.get(col_idx).unwrap_or("").to_string());
        }
    }

    Ok(headers
        .into_iter()
        .zip(cells)
        .map(|(name, raw)| Column::from_text(name, raw))
        .collect())
}

// ---------------------------------------------------------------------------
// Spreadsheet loader
// ---------------------------------------------------------------------------

/// Read the first worksheet of an `.xlsx`/`.xls` workbook.
fn load_spreadsheet(bytes: &[u8]) -> Result<Vec<Column>> {
    let mut workbook =
        open_workbook_auto_from_rs(Cursor::new(bytes.to_vec())).context("opening workbook")?;
    let range = workbook
        .worksheet_range_at(0)
        .context("workbook has no worksheets")?
        .context("reading first worksheet")?;

    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        bail!("worksheet is empty");
    };

    let headers = normalize_headers(
        header_row
            .iter()
            .map(|cell| match cell {
                Data::Empty => String::new(),
                Data::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect(),
    );
    let width = headers.len();

    let mut cells: Vec<Vec<CellValue>> = vec![Vec::new(); width];
    for row in rows {
        for (col_idx, column) in cells.iter_mut().enumerate() {
            column.push(row.get(col_idx).map_or(CellValue::Null, spreadsheet_cell));
        }
    }

    Ok(headers
        .into_iter()
        .zip(cells)
        .map(|(name, values)| Column::from_cells(name, values))
        .collect())
}

/// Integral numbers become integers, like a dataframe reader would do.
fn spreadsheet_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Int(i) => CellValue::Integer(*i),
        Data::Float(f) if f.is_nan() => CellValue::Null,
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 9.0e15 => CellValue::Integer(*f as i64),
        Data::Float(f) => CellValue::Float(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::String(s) if is_missing_marker(s) => CellValue::Null,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Empty | Data::Error(_) => CellValue::Null,
        other => CellValue::Text(other.to_string()),
    }
}
