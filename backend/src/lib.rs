//! # Service Desk Analytics Backend
//!
//! Ticket-volume analytics for service desks: load a workbook of tickets,
//! pick a sheet, and get a 14-day volume forecast, a staffing plan and
//! workload heatmaps.
//!
//! ## Features
//!
//! - **Data Loading**: CSV files, directories of CSV sheets, or in-memory uploads
//! - **Aggregation**: Contiguous daily series from raw timestamps, date/hour grids
//!   or processed-ticket ratios
//! - **Forecasting**: Additive Holt and Holt-Winters smoothing
//! - **Staffing**: Agents per day from per-agent throughput, always rounded up
//! - **Heatmaps**: Weekday × hour counts and employee × region means
//! - **HTTP API**: RESTful session endpoints for a dashboard front end
//!
//! ## Architecture
//!
//! - [`io`]: Workbook loaders and CSV exports
//! - [`parsing`]: Cell-level date, hour and number parsing
//! - [`services`]: Aggregation, forecasting, staffing, heatmaps and the report pipeline
//! - [`models`]: Serializable result types
//! - [`config`]: TOML configuration
//! - `http`: Axum-based HTTP server (feature `http-server`)
//! - `python`: PyO3 bindings (feature `python`)
//!
//! ## Example
//!
//! ```no_run
//! use desk_analytics::config::AnalyticsConfig;
//! use desk_analytics::io::WorkbookLoader;
//! use desk_analytics::services::DashboardSession;
//! use std::path::Path;
//!
//! let workbook = WorkbookLoader::load_from_path(Path::new("tickets.csv")).unwrap();
//! let mut session = DashboardSession::new(workbook);
//! let report = session.run(&AnalyticsConfig::default()).unwrap();
//! println!("{}", serde_json::to_string_pretty(report).unwrap());
//! ```

pub mod config;
pub mod error;
pub mod io;
pub mod models;
pub mod parsing;
pub mod services;

#[cfg(feature = "http-server")]
pub mod http;

#[cfg(feature = "python")]
pub mod python;

pub use config::AnalyticsConfig;
pub use error::{AnalyticsError, AnalyticsResult};

#[cfg(feature = "python")]
use pyo3::prelude::*;

/// Python module definition.
#[cfg(feature = "python")]
#[pymodule]
fn desk_analytics(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(python::build_report_json, m)?)?;
    m.add_function(wrap_pyfunction!(python::forecast_json, m)?)?;
    m.add_function(wrap_pyfunction!(python::shift_plan_csv, m)?)?;
    Ok(())
}
