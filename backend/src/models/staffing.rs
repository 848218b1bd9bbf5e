use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// How much work one agent gets through.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Throughput {
    /// Flat tickets per agent per day.
    PerDay { tickets: f64 },
    /// Tickets per agent per hour over a shift of `shift_hours`.
    Hourly {
        tickets_per_hour: f64,
        shift_hours: f64,
    },
}

impl Throughput {
    /// Tickets one agent resolves in one working day.
    pub fn daily_capacity(&self) -> f64 {
        match *self {
            Throughput::PerDay { tickets } => tickets,
            Throughput::Hourly {
                tickets_per_hour,
                shift_hours,
            } => tickets_per_hour * shift_hours,
        }
    }
}

impl Default for Throughput {
    fn default() -> Self {
        Throughput::Hourly {
            tickets_per_hour: 5.0,
            shift_hours: 8.0,
        }
    }
}

/// Agents required on one forecasted day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StaffingRow {
    pub date: NaiveDate,
    pub forecasted_tickets: f64,
    pub agents_needed: u32,
}

/// Headline figures for the whole horizon.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StaffingSummary {
    /// Mean of the forecasted daily volumes
    pub estimated_daily_volume: f64,
    /// Agents needed to cover `estimated_daily_volume`
    pub agents_per_day: u32,
    pub peak_agents: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaffingPlan {
    pub throughput: Throughput,
    pub daily_capacity: f64,
    pub rows: Vec<StaffingRow>,
    pub summary: StaffingSummary,
}
