//! Command-line dashboard report.
//!
//! Loads a CSV file (or a directory of CSV sheets), computes the dashboard
//! report for one sheet, prints a summary and writes both CSV exports.
//!
//! # Usage
//!
//! ```bash
//! desk-report tickets.csv --tickets-per-hour 5 --shift-hours 8 --out-dir out/
//! desk-report workbook/ --sheet indira --json
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use desk_analytics::config::{AnalyticsConfig, SeasonalityPolicy};
use desk_analytics::io::{self, WorkbookLoader};
use desk_analytics::models::Section;
use desk_analytics::services::{DashboardReport, DashboardSession};

#[derive(Parser, Debug)]
#[command(name = "desk-report", version, about = "Service desk forecast and staffing report")]
struct Args {
    /// CSV file or directory of CSV sheets
    path: PathBuf,

    /// Sheet to analyse (default: the first one)
    #[arg(long)]
    sheet: Option<String>,

    /// Analytics configuration file (default: analytics.toml if present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Flat tickets per agent per day
    #[arg(long, conflicts_with_all = ["tickets_per_hour", "shift_hours"])]
    tickets_per_day: Option<f64>,

    /// Tickets per agent per hour
    #[arg(long)]
    tickets_per_hour: Option<f64>,

    /// Shift duration in hours
    #[arg(long)]
    shift_hours: Option<f64>,

    /// Seasonality policy: auto, weekly or none
    #[arg(long)]
    seasonality: Option<SeasonalityPolicy>,

    /// Directory for shift_plan.csv and forecast.csv
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Print the full report as JSON instead of a summary
    #[arg(long)]
    json: bool,
}

fn load_config(args: &Args) -> Result<AnalyticsConfig> {
    let mut config = match &args.config {
        Some(path) => AnalyticsConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => AnalyticsConfig::from_default_location()?,
    };

    if let Some(tickets) = args.tickets_per_day {
        config.staffing.tickets_per_day = Some(tickets);
    }
    if args.tickets_per_hour.is_some() || args.shift_hours.is_some() {
        config.staffing.tickets_per_day = None;
    }
    if let Some(rate) = args.tickets_per_hour {
        config.staffing.tickets_per_hour = rate;
    }
    if let Some(hours) = args.shift_hours {
        config.staffing.shift_hours = hours;
    }
    if let Some(policy) = args.seasonality {
        config.forecast.seasonality = policy;
    }
    Ok(config)
}

fn status<T>(section: &Section<T>) -> String {
    match section.issue() {
        None => "ok".to_string(),
        Some(issue) => format!("unavailable ({})", issue.message),
    }
}

fn print_summary(report: &DashboardReport) {
    println!("Sheet: {}", report.sheet);
    println!(
        "Rows: {} ({} columns)",
        report.preview.total_rows,
        report.preview.columns.len()
    );
    println!();

    if let Some(volume) = report.volume.ready() {
        println!(
            "History: {} .. {} ({} days, {} tickets, {} rows dropped)",
            volume.series.start(),
            volume.series.end(),
            volume.series.len(),
            volume.series.total(),
            volume.series.dropped_rows
        );
    }

    match (report.forecast.ready(), report.staffing.ready()) {
        (Some(forecast), Some(plan)) => {
            println!("Model: {}", forecast.model);
            println!();
            println!("{:<12} {:>18} {:>14}", "Date", "Forecasted Tickets", "Agents Needed");
            for row in &plan.rows {
                println!(
                    "{:<12} {:>18.2} {:>14}",
                    row.date, row.forecasted_tickets, row.agents_needed
                );
            }
            println!();
            println!(
                "Estimated daily volume: {:.1} tickets -> {} agents per day (peak {})",
                plan.summary.estimated_daily_volume,
                plan.summary.agents_per_day,
                plan.summary.peak_agents
            );
        }
        _ => {
            println!("Forecast: {}", status(&report.forecast));
            println!("Staffing: {}", status(&report.staffing));
        }
    }

    println!("Workload heatmap: {}", status(&report.workload_heatmap));
    println!("Region heatmap: {}", status(&report.region_heatmap));
}

fn write_exports(report: &DashboardReport, out_dir: &Path) -> Result<()> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create {}", out_dir.display()))?;

    if let Some(forecast) = report.forecast.ready() {
        io::write_csv(&out_dir.join(io::FORECAST_FILE), &io::forecast_csv(forecast)?)?;
    }
    if let Some(plan) = report.staffing.ready() {
        io::write_csv(&out_dir.join(io::SHIFT_PLAN_FILE), &io::shift_plan_csv(plan)?)?;
    }
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = load_config(&args)?;

    let workbook = WorkbookLoader::load_from_path(&args.path)
        .with_context(|| format!("Failed to load {}", args.path.display()))?;
    let mut session = DashboardSession::new(workbook);
    if let Some(sheet) = &args.sheet {
        session.select_sheet(sheet)?;
    }

    let report = session.run(&config)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        print_summary(report);
    }

    if let Some(out_dir) = &args.out_dir {
        write_exports(report, out_dir)?;
    }
    Ok(())
}
