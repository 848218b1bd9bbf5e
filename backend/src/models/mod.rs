//! Derived, read-only artifacts of the analytics pipeline.
//!
//! Everything here is recomputed per upload or sheet selection; nothing is
//! persisted across sessions.

pub mod forecast;
pub mod heatmap;
pub mod region;
pub mod report;
pub mod series;
pub mod staffing;

pub use forecast::{ForecastPoint, ForecastResult, ModelKind, SmoothingParams};
pub use heatmap::{Aggregation, HeatmapCell, HeatmapMatrix};
pub use region::{RegionMap, FALLBACK_REGION};
pub use report::{IssueKind, Section, SectionIssue, TablePreview};
pub use series::{DailySeries, SeriesOrigin};
pub use staffing::{StaffingPlan, StaffingRow, StaffingSummary, Throughput};
