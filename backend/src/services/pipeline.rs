//! End-to-end dashboard computation for one selected sheet.
//!
//! Every analytical section is gated on its own inputs. A missing column or a
//! short history marks that section (and the sections fed by it) as
//! unavailable; the rest of the report still renders.

use polars::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::AnalyticsConfig;
use crate::error::{AnalyticsError, AnalyticsResult};
use crate::io::Workbook;
use crate::models::{
    DailySeries, ForecastResult, HeatmapMatrix, Section, SectionIssue, StaffingPlan, TablePreview,
};
use crate::services::aggregator::{daily_volume, VolumeSource};
use crate::services::forecast::forecast_daily;
use crate::services::heatmap::{build_heatmap, HeatmapSpec};
use crate::services::staffing::plan_staffing;

/// Aggregated history and the input mode it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyVolume {
    pub source: VolumeSource,
    pub series: DailySeries,
}

/// Everything the dashboard shows for one sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardReport {
    pub sheet: String,
    pub preview: TablePreview,
    pub volume: Section<DailyVolume>,
    pub forecast: Section<ForecastResult>,
    pub staffing: Section<StaffingPlan>,
    pub workload_heatmap: Section<HeatmapMatrix>,
    pub region_heatmap: Section<HeatmapMatrix>,
}

impl DashboardReport {
    /// Issues of every unavailable section, keyed by section name.
    pub fn issues(&self) -> Vec<(&'static str, &SectionIssue)> {
        [
            ("volume", self.volume.issue()),
            ("forecast", self.forecast.issue()),
            ("staffing", self.staffing.issue()),
            ("workload_heatmap", self.workload_heatmap.issue()),
            ("region_heatmap", self.region_heatmap.issue()),
        ]
        .into_iter()
        .filter_map(|(name, issue)| issue.map(|issue| (name, issue)))
        .collect()
    }
}

fn log_unavailable<T>(section: &str, value: &Section<T>) {
    if let Some(issue) = value.issue() {
        log::warn!("Section '{}' unavailable: {}", section, issue.message);
    }
}

/// Compute the full report for `frame`.
///
/// Only a failure to render the preview is returned as an error.
pub fn build_report(
    sheet: &str,
    frame: &DataFrame,
    config: &AnalyticsConfig,
) -> AnalyticsResult<DashboardReport> {
    let preview = TablePreview::from_frame(frame, config.preview.rows)?;

    let volume = Section::from_result(
        daily_volume(frame, config).map(|(source, series)| DailyVolume { source, series }),
    );

    let forecast = match &volume {
        Section::Ready { data } => {
            Section::from_result(forecast_daily(&data.series, &config.forecast))
        }
        Section::Unavailable { issue } => Section::Unavailable {
            issue: issue.clone(),
        },
    };

    let staffing = match &forecast {
        Section::Ready { data } => Section::from_result(plan_staffing(data, config.throughput())),
        Section::Unavailable { .. } => Section::Unavailable {
            issue: SectionIssue::upstream("forecast"),
        },
    };

    let regions = config.region_map();
    let workload_heatmap = Section::from_result(build_heatmap(
        frame,
        &HeatmapSpec::workload(&config.columns),
        &regions,
    ));
    let region_heatmap = Section::from_result(build_heatmap(
        frame,
        &HeatmapSpec::region(&config.columns),
        &regions,
    ));

    log_unavailable("volume", &volume);
    log_unavailable("forecast", &forecast);
    log_unavailable("staffing", &staffing);
    log_unavailable("workload_heatmap", &workload_heatmap);
    log_unavailable("region_heatmap", &region_heatmap);

    Ok(DashboardReport {
        sheet: sheet.to_string(),
        preview,
        volume,
        forecast,
        staffing,
        workload_heatmap,
        region_heatmap,
    })
}

/// Caller-owned state of one dashboard session.
///
/// Holds the uploaded workbook, the selected sheet and the last computed
/// report. Selecting another sheet discards the report.
#[derive(Debug, Clone)]
pub struct DashboardSession {
    workbook: Workbook,
    selected: Option<String>,
    last_report: Option<DashboardReport>,
}

impl DashboardSession {
    /// Start a session with the first sheet selected.
    pub fn new(workbook: Workbook) -> Self {
        let selected = workbook.first_sheet().map(|s| s.name.clone());
        Self {
            workbook,
            selected,
            last_report: None,
        }
    }

    pub fn workbook(&self) -> &Workbook {
        &self.workbook
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.workbook.sheet_names()
    }

    pub fn select_sheet(&mut self, name: &str) -> AnalyticsResult<()> {
        self.workbook.sheet(name)?;
        log::info!("Selected sheet '{}'", name);
        self.selected = Some(name.to_string());
        self.last_report = None;
        Ok(())
    }

    pub fn selected_sheet(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Recompute the report for the selected sheet.
    pub fn run(&mut self, config: &AnalyticsConfig) -> AnalyticsResult<&DashboardReport> {
        let name = self
            .selected
            .as_deref()
            .ok_or_else(|| AnalyticsError::load("workbook has no sheets"))?;
        let sheet = self.workbook.sheet(name)?;
        let report = build_report(&sheet.name, &sheet.frame, config)?;
        Ok(self.last_report.insert(report))
    }

    pub fn last_report(&self) -> Option<&DashboardReport> {
        self.last_report.as_ref()
    }
}
