//! Workbook loading and CSV export.
//!
//! Loaders turn uploaded tabular data (Excel workbooks or CSV sheets) into a
//! [`Workbook`] of named polars sheets. Exporters render the shift plan and
//! forecast as the CSV files the front end offers for download.
//!
//! # Example
//!
//! ```no_run
//! use desk_analytics::io::WorkbookLoader;
//! use std::path::Path;
//!
//! let workbook = WorkbookLoader::load_from_path(Path::new("tickets.xlsx"))
//!     .expect("Failed to load");
//! println!("Sheets: {:?}", workbook.sheet_names());
//! ```

pub mod excel;
pub mod export;
pub mod loaders;

#[cfg(test)]
mod loaders_tests;

pub use excel::{is_excel_extension, range_to_frame};
pub use export::{forecast_csv, shift_plan_csv, write_csv, FORECAST_FILE, SHIFT_PLAN_FILE};
pub use loaders::{read_csv_bytes, Sheet, Workbook, WorkbookLoader};
