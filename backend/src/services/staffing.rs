use crate::error::{AnalyticsError, AnalyticsResult};
use crate::models::{ForecastResult, StaffingPlan, StaffingRow, StaffingSummary, Throughput};

/// Agents needed to clear `tickets` at `capacity` tickets per agent per day.
///
/// Negative volumes plan as zero; the division always rounds up.
pub fn agents_needed(tickets: f64, capacity: f64) -> u32 {
    let agents = (tickets.max(0.0) / capacity).ceil();
    if agents >= u32::MAX as f64 {
        u32::MAX
    } else {
        agents as u32
    }
}

fn validated_capacity(throughput: &Throughput) -> AnalyticsResult<f64> {
    let capacity = throughput.daily_capacity();
    if !capacity.is_finite() || capacity <= 0.0 {
        return Err(AnalyticsError::configuration(format!(
            "daily capacity per agent must be positive, got {}",
            capacity
        )));
    }
    Ok(capacity)
}

/// Convert a forecast into per-day agent requirements.
///
/// Rows carry the forecast clamped at zero, so a declining forecast never
/// plans negative tickets.
pub fn plan_staffing(
    forecast: &ForecastResult,
    throughput: Throughput,
) -> AnalyticsResult<StaffingPlan> {
    let capacity = validated_capacity(&throughput)?;

    let rows: Vec<StaffingRow> = forecast
        .points
        .iter()
        .map(|point| {
            let tickets = point.planning_value();
            StaffingRow {
                date: point.date,
                forecasted_tickets: tickets,
                agents_needed: agents_needed(tickets, capacity),
            }
        })
        .collect();

    let estimated_daily_volume = forecast.mean_planning_value();
    let summary = StaffingSummary {
        estimated_daily_volume,
        agents_per_day: agents_needed(estimated_daily_volume, capacity),
        peak_agents: rows.iter().map(|r| r.agents_needed).max().unwrap_or(0),
    };

    log::info!(
        "Staffing: {:.1} tickets/day at {:.1} per agent -> {} agents (peak {})",
        summary.estimated_daily_volume,
        capacity,
        summary.agents_per_day,
        summary.peak_agents
    );

    Ok(StaffingPlan {
        throughput,
        daily_capacity: capacity,
        rows,
        summary,
    })
}
