//! Additive exponential-smoothing forecasts.
//!
//! Two models are supported:
//!
//! - **Holt**: level + trend.
//! - **Holt-Winters**: level + trend + seasonal component with a fixed period.
//!
//! Smoothing weights are estimated by minimising the in-sample one-step-ahead
//! squared error, first on a coarse grid and then with a bounded Nelder-Mead
//! refinement. The whole fit is deterministic.

use chrono::Duration;

use crate::config::{ForecastSettings, SeasonalityPolicy, FORECAST_HORIZON};
use crate::error::{AnalyticsError, AnalyticsResult};
use crate::models::{
    DailySeries, ForecastPoint, ForecastResult, ModelKind, SeriesOrigin, SmoothingParams,
};
use crate::services::optimizer::{minimize_in_unit_box, NelderMeadOptions};

/// Starting values tried for every smoothing weight before refinement.
const GRID: [f64; 5] = [0.1, 0.3, 0.5, 0.7, 0.9];

/// Relative spread below which a series counts as constant.
const VARIANCE_EPSILON: f64 = 1e-12;

/// Pick the model for `series` under `policy`.
///
/// `Auto` only models seasonality when the dates were observed and the history
/// covers two full periods; synthetic ratio series never get a seasonal term.
pub fn select_model(policy: SeasonalityPolicy, period: usize, series: &DailySeries) -> ModelKind {
    match policy {
        SeasonalityPolicy::None => ModelKind::Holt,
        SeasonalityPolicy::Weekly => ModelKind::HoltWinters { period },
        SeasonalityPolicy::Auto => {
            if series.origin() == SeriesOrigin::Observed && series.len() >= 2 * period {
                ModelKind::HoltWinters { period }
            } else {
                ModelKind::Holt
            }
        }
    }
}

/// Smoother state after running over the whole history.
#[derive(Debug, Clone)]
struct Smoothed {
    level: f64,
    trend: f64,
    /// Seasonal terms indexed by `t % period`
    seasonal: Vec<f64>,
    sse: f64,
}

impl Smoothed {
    /// Point forecast `h` steps past the last observation at index `n - 1`.
    fn predict(&self, n: usize, h: usize) -> f64 {
        let seasonal = if self.seasonal.is_empty() {
            0.0
        } else {
            self.seasonal[(n + h - 1) % self.seasonal.len()]
        };
        self.level + h as f64 * self.trend + seasonal
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Run the smoothing recursions with fixed weights.
///
/// Holt starts from `level = y0`, `trend = y1 - y0` and updates from `t = 1`.
/// Holt-Winters starts from the first-season mean, the per-step change between
/// the first two season means and first-season deviations, updating from
/// `t = period`.
fn smooth(values: &[f64], model: ModelKind, params: &SmoothingParams) -> Smoothed {
    let (alpha, beta) = (params.alpha, params.beta);
    let gamma = params.gamma.unwrap_or(0.0);

    let (mut level, mut trend, mut seasonal, first) = match model {
        ModelKind::Holt => (values[0], values[1] - values[0], Vec::new(), 1),
        ModelKind::HoltWinters { period } => {
            let first_season = mean(&values[..period]);
            let second_season = mean(&values[period..2 * period]);
            let seasonal: Vec<f64> = values[..period].iter().map(|y| y - first_season).collect();
            (
                first_season,
                (second_season - first_season) / period as f64,
                seasonal,
                period,
            )
        }
    };

    let period = seasonal.len();
    let mut sse = 0.0;
    for (t, &y) in values.iter().enumerate().skip(first) {
        let season = if period == 0 { 0.0 } else { seasonal[t % period] };
        let error = y - (level + trend + season);
        sse += error * error;

        let previous_level = level;
        level = alpha * (y - season) + (1.0 - alpha) * (level + trend);
        trend = beta * (level - previous_level) + (1.0 - beta) * trend;
        if period > 0 {
            seasonal[t % period] = gamma * (y - level) + (1.0 - gamma) * season;
        }
    }

    Smoothed {
        level,
        trend,
        seasonal,
        sse,
    }
}

fn params_from(point: &[f64]) -> SmoothingParams {
    SmoothingParams {
        alpha: point[0],
        beta: point[1],
        gamma: point.get(2).copied(),
    }
}

/// Estimate smoothing weights for `model` by minimising in-sample SSE.
fn estimate_params(values: &[f64], model: ModelKind) -> SmoothingParams {
    let dims = if model.seasonal_period().is_some() { 3 } else { 2 };
    let sse_at = |point: &[f64]| smooth(values, model, &params_from(point)).sse;

    let mut best_start = vec![GRID[0]; dims];
    let mut best_sse = f64::INFINITY;
    let mut candidate = vec![0.0; dims];
    let combos = GRID.len().pow(dims as u32);
    for index in 0..combos {
        let mut rest = index;
        for slot in candidate.iter_mut() {
            *slot = GRID[rest % GRID.len()];
            rest /= GRID.len();
        }
        let sse = sse_at(&candidate);
        if sse < best_sse {
            best_sse = sse;
            best_start.clone_from(&candidate);
        }
    }

    let (point, sse) = minimize_in_unit_box(sse_at, &best_start, NelderMeadOptions::default());
    if sse < best_sse {
        params_from(&point)
    } else {
        params_from(&best_start)
    }
}

/// Reject series the smoother cannot be fitted on.
fn check_history(values: &[f64], model: ModelKind) -> AnalyticsResult<()> {
    if values.len() < 2 {
        return Err(AnalyticsError::degenerate(format!(
            "need at least 2 daily points, got {}",
            values.len()
        )));
    }

    let (min, max) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    if !min.is_finite() || !max.is_finite() {
        return Err(AnalyticsError::degenerate("series contains non-finite values"));
    }
    if max - min <= VARIANCE_EPSILON * (1.0 + max.abs().max(min.abs())) {
        return Err(AnalyticsError::degenerate(format!(
            "series is constant at {}",
            min
        )));
    }

    if values.len() < model.min_history() {
        return Err(AnalyticsError::insufficient(
            model.to_string(),
            model.min_history(),
            values.len(),
        ));
    }
    Ok(())
}

/// Fit `model` to the full history and forecast `horizon` days past its end.
pub fn forecast(
    series: &DailySeries,
    model: ModelKind,
    horizon: usize,
) -> AnalyticsResult<ForecastResult> {
    let values = series.values();
    check_history(values, model)?;

    let params = estimate_params(values, model);
    let fitted = smooth(values, model, &params);
    if !fitted.sse.is_finite() {
        return Err(AnalyticsError::degenerate(
            "smoothing weights could not be estimated",
        ));
    }

    let n = values.len();
    let history_end = series.end();
    let points = (1..=horizon)
        .map(|h| ForecastPoint {
            date: history_end + Duration::days(h as i64),
            predicted: fitted.predict(n, h),
        })
        .collect();

    log::info!(
        "Fitted {} on {} days: alpha={:.3} beta={:.3} gamma={:?} sse={:.3}",
        model,
        n,
        params.alpha,
        params.beta,
        params.gamma,
        fitted.sse
    );

    Ok(ForecastResult {
        model,
        params,
        sse: fitted.sse,
        history_end,
        points,
    })
}

/// Forecast the standard 14-day horizon with the configured seasonality policy.
pub fn forecast_daily(
    series: &DailySeries,
    settings: &ForecastSettings,
) -> AnalyticsResult<ForecastResult> {
    let model = select_model(settings.seasonality, settings.season_length, series);
    forecast(series, model, FORECAST_HORIZON)
}
