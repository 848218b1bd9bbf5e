//! Analytical services over a loaded sheet.
//!
//! The modules follow the data flow of the dashboard: aggregate daily
//! volume, forecast it, derive staffing, and cross-tabulate heatmaps.
//! [`pipeline`] wires them together per sheet.

pub mod aggregator;
pub mod forecast;
pub mod heatmap;
pub mod optimizer;
pub mod pipeline;
pub mod schema;
pub mod staffing;


pub use aggregator::{aggregate_daily, daily_volume, VolumeSource};
pub use forecast::{forecast, forecast_daily, select_model};
pub use heatmap::{build_heatmap, Dimension, HeatmapSpec};
pub use pipeline::{build_report, DailyVolume, DashboardReport, DashboardSession};
pub use staffing::{agents_needed, plan_staffing};
