use anyhow::{Context, Result};
use polars::prelude::*;
use std::io::Cursor;
use std::path::Path;

use super::excel::{is_excel_extension, read_excel_bytes, read_excel_file};
use crate::error::{AnalyticsError, AnalyticsResult};

/// One named worksheet.
#[derive(Debug, Clone)]
pub struct Sheet {
    pub name: String,
    pub frame: DataFrame,
}

/// Ordered collection of named sheets from a single upload.
#[derive(Debug, Clone, Default)]
pub struct Workbook {
    sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a workbook from already-tabular sheets, preserving order.
    pub fn from_frames<I, S>(frames: I) -> AnalyticsResult<Self>
    where
        I: IntoIterator<Item = (S, DataFrame)>,
        S: Into<String>,
    {
        let mut workbook = Self::new();
        for (name, frame) in frames {
            workbook.push_sheet(name, frame)?;
        }
        Ok(workbook)
    }

    /// Append a sheet; names must be non-empty and unique.
    pub fn push_sheet(&mut self, name: impl Into<String>, frame: DataFrame) -> AnalyticsResult<()> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(AnalyticsError::load("sheet name must not be empty"));
        }
        if self.sheets.iter().any(|s| s.name == name) {
            return Err(AnalyticsError::load(format!("duplicate sheet name '{}'", name)));
        }
        self.sheets.push(Sheet { name, frame });
        Ok(())
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn sheet(&self, name: &str) -> AnalyticsResult<&Sheet> {
        self.sheets
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| AnalyticsError::UnknownSheet(name.to_string()))
    }

    pub fn first_sheet(&self) -> Option<&Sheet> {
        self.sheets.first()
    }

    pub fn len(&self) -> usize {
        self.sheets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }
}

/// Parse CSV bytes into a DataFrame.
///
/// The whole input is scanned for schema inference so a late non-numeric
/// value does not abort the read.
pub fn read_csv_bytes(bytes: Vec<u8>) -> PolarsResult<DataFrame> {
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(None)
        .into_reader_with_file_handle(Cursor::new(bytes))
        .finish()
}

/// Parse a CSV file into a DataFrame.
pub fn read_csv_file(path: &Path) -> Result<DataFrame> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(None)
        .try_into_reader_with_file_path(Some(path.into()))?
        .finish()
        .with_context(|| format!("Failed to parse CSV {}", path.display()))?;
    Ok(df)
}

fn sheet_name_for(path: &Path) -> Result<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(str::to_string)
        .with_context(|| format!("Cannot derive a sheet name from {}", path.display()))
}

fn is_csv(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("csv"))
        .unwrap_or(false)
}

/// Unified interface for loading ticket workbooks.
pub struct WorkbookLoader;

impl WorkbookLoader {
    /// Load a workbook from a CSV file, an Excel workbook or a directory of CSV files.
    pub fn load_from_path(path: &Path) -> Result<Workbook> {
        if path.is_dir() {
            return Self::load_from_dir(path);
        }

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .context("File has no extension")?;

        match extension.to_lowercase().as_str() {
            "csv" => Self::load_from_csv(path),
            ext if is_excel_extension(ext) => Self::load_from_excel(path),
            _ => anyhow::bail!("Unsupported file format: {}", extension),
        }
    }

    /// Load every worksheet of an Excel workbook, in workbook order.
    pub fn load_from_excel(path: &Path) -> Result<Workbook> {
        let frames = read_excel_file(path)?;
        Self::workbook_from_excel(frames)
            .with_context(|| format!("Failed to load workbook {}", path.display()))
    }

    /// Load an in-memory Excel workbook, e.g. from an HTTP upload.
    pub fn load_from_excel_bytes(bytes: Vec<u8>) -> Result<Workbook> {
        let frames = read_excel_bytes(bytes)?;
        Self::workbook_from_excel(frames)
    }

    fn workbook_from_excel(frames: Vec<(String, DataFrame)>) -> Result<Workbook> {
        let mut workbook = Workbook::new();
        for (name, frame) in frames {
            log::info!("Loaded worksheet '{}' ({} rows)", name, frame.height());
            workbook.push_sheet(name, frame)?;
        }

        if workbook.is_empty() {
            anyhow::bail!("Workbook contains no worksheets");
        }
        Ok(workbook)
    }

    /// Load a single CSV file as a one-sheet workbook named after the file stem.
    pub fn load_from_csv(path: &Path) -> Result<Workbook> {
        let frame = read_csv_file(path)?;
        let name = sheet_name_for(path)?;
        log::info!("Loaded sheet '{}' ({} rows)", name, frame.height());

        let mut workbook = Workbook::new();
        workbook.push_sheet(name, frame)?;
        Ok(workbook)
    }

    /// Load every `*.csv` file in a directory, one sheet per file, sorted by name.
    pub fn load_from_dir(dir: &Path) -> Result<Workbook> {
        let mut paths: Vec<_> = std::fs::read_dir(dir)
            .with_context(|| format!("Failed to read directory {}", dir.display()))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.is_file() && is_csv(p))
            .collect();
        paths.sort();

        if paths.is_empty() {
            anyhow::bail!("No CSV sheets found in {}", dir.display());
        }

        let mut workbook = Workbook::new();
        for path in paths {
            let frame = read_csv_file(&path)?;
            let name = sheet_name_for(&path)?;
            log::info!("Loaded sheet '{}' ({} rows)", name, frame.height());
            workbook.push_sheet(name, frame)?;
        }
        Ok(workbook)
    }

    /// Load in-memory CSV sheets, e.g. from an HTTP upload.
    pub fn load_from_csv_sheets<I, S, B>(sheets: I) -> Result<Workbook>
    where
        I: IntoIterator<Item = (S, B)>,
        S: Into<String>,
        B: Into<Vec<u8>>,
    {
        let mut workbook = Workbook::new();
        for (name, bytes) in sheets {
            let name = name.into();
            let frame = read_csv_bytes(bytes.into())
                .with_context(|| format!("Failed to parse CSV for sheet '{}'", name))?;
            workbook.push_sheet(name, frame)?;
        }

        if workbook.is_empty() {
            anyhow::bail!("Upload contains no sheets");
        }
        Ok(workbook)
    }
}
