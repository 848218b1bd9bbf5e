use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Exponential-smoothing model family used for a forecast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelKind {
    /// Additive level + trend.
    Holt,
    /// Additive level + trend + seasonal component of the given period.
    HoltWinters { period: usize },
}

impl ModelKind {
    /// Smallest history the model can be fitted on.
    pub fn min_history(&self) -> usize {
        match self {
            ModelKind::Holt => 2,
            ModelKind::HoltWinters { period } => 2 * period,
        }
    }

    pub fn seasonal_period(&self) -> Option<usize> {
        match self {
            ModelKind::Holt => None,
            ModelKind::HoltWinters { period } => Some(*period),
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelKind::Holt => write!(f, "holt"),
            ModelKind::HoltWinters { period } => write!(f, "holt-winters({})", period),
        }
    }
}

/// Fitted smoothing weights, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SmoothingParams {
    pub alpha: f64,
    pub beta: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gamma: Option<f64>,
}

/// A single forecasted day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub predicted: f64,
}

impl ForecastPoint {
    /// Predicted volume clamped at zero, as used for staffing.
    ///
    /// Negative zero and NaN also plan as `0.0`.
    pub fn planning_value(&self) -> f64 {
        if self.predicted > 0.0 {
            self.predicted
        } else {
            0.0
        }
    }
}

/// Forecast for the days immediately following the last historical date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    pub model: ModelKind,
    pub params: SmoothingParams,
    /// In-sample sum of squared one-step-ahead errors
    pub sse: f64,
    pub history_end: NaiveDate,
    pub points: Vec<ForecastPoint>,
}

impl ForecastResult {
    pub fn horizon(&self) -> usize {
        self.points.len()
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.predicted).collect()
    }

    /// Mean of the predicted values, clamped at zero.
    pub fn mean_planning_value(&self) -> f64 {
        if self.points.is_empty() {
            return 0.0;
        }
        let total: f64 = self.points.iter().map(ForecastPoint::planning_value).sum();
        total / self.points.len() as f64
    }
}
