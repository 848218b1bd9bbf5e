//! Excel workbook reading.
//!
//! Each worksheet becomes one sheet of the [`Workbook`](super::Workbook), in
//! workbook order. The first row holds the column names. Column types are
//! settled per column: all-integer cells give `Int64`, all-numeric cells give
//! `Float64`, anything else is rendered as text so the cell parsers can read
//! dates and hours out of it.

use anyhow::{Context, Result};
use calamine::{open_workbook_auto, open_workbook_auto_from_rs, Data, Range, Reader, Sheets};
use polars::prelude::*;
use std::collections::HashSet;
use std::io::{Cursor, Read, Seek};
use std::path::Path;

/// File extensions handed to the Excel reader.
pub const EXCEL_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods"];

pub fn is_excel_extension(extension: &str) -> bool {
    EXCEL_EXTENSIONS
        .iter()
        .any(|ext| ext.eq_ignore_ascii_case(extension))
}

/// Read every worksheet of an Excel file on disk.
pub fn read_excel_file(path: &Path) -> Result<Vec<(String, DataFrame)>> {
    let mut sheets = open_workbook_auto(path)
        .with_context(|| format!("Failed to open workbook {}", path.display()))?;
    read_sheets(&mut sheets)
}

/// Read every worksheet of an in-memory Excel file, e.g. an HTTP upload.
pub fn read_excel_bytes(bytes: Vec<u8>) -> Result<Vec<(String, DataFrame)>> {
    let mut sheets =
        open_workbook_auto_from_rs(Cursor::new(bytes)).context("Failed to open workbook")?;
    read_sheets(&mut sheets)
}

fn read_sheets<RS>(sheets: &mut Sheets<RS>) -> Result<Vec<(String, DataFrame)>>
where
    RS: Read + Seek,
{
    let mut frames = Vec::new();
    for name in sheets.sheet_names() {
        let range = sheets
            .worksheet_range(&name)
            .with_context(|| format!("Failed to read worksheet '{}'", name))?;
        let frame = range_to_frame(&range)
            .with_context(|| format!("Failed to convert worksheet '{}'", name))?;
        frames.push((name, frame));
    }
    Ok(frames)
}

fn is_blank(cell: &Data) -> bool {
    match cell {
        Data::Empty | Data::Error(_) => true,
        Data::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::String(s) if s.trim().is_empty() => None,
        Data::String(s) => Some(s.clone()),
        Data::Int(v) => Some(v.to_string()),
        Data::Float(v) => Some(v.to_string()),
        Data::Bool(v) => Some(v.to_string()),
        Data::DateTime(dt) => Some(match dt.as_datetime() {
            Some(dt) if dt.time() == chrono::NaiveTime::MIN => dt.format("%Y-%m-%d").to_string(),
            Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => dt.as_f64().to_string(),
        }),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Some(s.clone()),
    }
}

/// Unique, non-empty column names from the header row.
fn header_names(header: &[Data], width: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    (0..width)
        .map(|i| {
            let base = header
                .get(i)
                .and_then(cell_text)
                .map(|s| s.trim().to_string())
                .unwrap_or_else(|| format!("column_{}", i + 1));
            let mut name = base.clone();
            let mut suffix = 1;
            while !seen.insert(name.clone()) {
                name = format!("{}_{}", base, suffix);
                suffix += 1;
            }
            name
        })
        .collect()
}

fn build_column(name: &str, cells: &[&Data]) -> Column {
    let filled = cells.iter().filter(|c| !is_blank(c));

    let all_int = filled.clone().all(|c| matches!(c, Data::Int(_)));
    if all_int {
        let values: Vec<Option<i64>> = cells
            .iter()
            .map(|c| match c {
                Data::Int(v) => Some(*v),
                _ => None,
            })
            .collect();
        return Column::new(name.into(), values);
    }

    let all_numeric = filled.clone().all(|c| matches!(c, Data::Int(_) | Data::Float(_)));
    if all_numeric {
        let values: Vec<Option<f64>> = cells
            .iter()
            .map(|c| match c {
                Data::Int(v) => Some(*v as f64),
                Data::Float(v) => Some(*v),
                _ => None,
            })
            .collect();
        return Column::new(name.into(), values);
    }

    let values: Vec<Option<String>> = cells.iter().map(|c| cell_text(c)).collect();
    Column::new(name.into(), values)
}

/// Convert a worksheet range into a DataFrame, skipping blank rows.
pub fn range_to_frame(range: &Range<Data>) -> PolarsResult<DataFrame> {
    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Ok(DataFrame::empty());
    };

    let width = range.width();
    let names = header_names(header, width);
    let body: Vec<&[Data]> = rows
        .filter(|row| !row.iter().all(is_blank))
        .collect();

    let columns = names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let cells: Vec<&Data> = body
                .iter()
                .map(|row| row.get(i).unwrap_or(&Data::Empty))
                .collect();
            build_column(name, &cells)
        })
        .collect();

    DataFrame::new(columns)
}
