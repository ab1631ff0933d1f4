use chrono::NaiveDate;
use serde::Serialize;

use crate::{AlignedTable, Frequency, SerieError};

/// Risk-free rate, in percent per year, assumed by the simplified Sharpe ratio.
pub const DEFAULT_RISK_FREE_PCT: f64 = 2.0;

const DAYS_PER_YEAR: f64 = 365.25;

/// Descriptive statistics for one column of an aligned table.
///
/// Percentages are expressed in percent (10.0 means 10%). Values are computed
/// at full precision; rounding is a presentation concern.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsRecord {
    /// Column label.
    pub symbol: String,
    /// Number of rows the statistics were computed from.
    pub observations: usize,
    /// Last price in the column.
    pub last_price: f64,
    /// `(last / first - 1) * 100`; `None` when the first price is zero.
    pub total_return_pct: Option<f64>,
    /// Compound annual growth rate in percent; `None` when the first price is zero.
    pub cagr_pct: Option<f64>,
    /// Annualized sample volatility of period returns; `None` with fewer than two returns.
    pub volatility_pct: Option<f64>,
    /// Worst peak-to-trough decline in percent (always `<= 0`).
    pub max_drawdown_pct: f64,
    /// `(CAGR - rf) / volatility`; `None` when volatility is missing or zero.
    pub sharpe: Option<f64>,
}

/// Result of computing metrics for one column.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MetricsOutcome {
    /// Enough observations to compute every statistic.
    Computed(MetricsRecord),
    /// Fewer than two observations.
    Degenerate {
        /// Column label.
        symbol: String,
        /// Observations available.
        observations: usize,
    },
}

impl MetricsOutcome {
    /// Column label for either outcome.
    #[must_use]
    pub fn symbol(&self) -> &str {
        match self {
            Self::Computed(r) => &r.symbol,
            Self::Degenerate { symbol, .. } => symbol,
        }
    }

    /// The computed record, if any.
    #[must_use]
    pub const fn record(&self) -> Option<&MetricsRecord> {
        match self {
            Self::Computed(r) => Some(r),
            Self::Degenerate { .. } => None,
        }
    }

    /// Convert into a `Result`, mapping the degenerate case to `SerieError::Degenerate`.
    ///
    /// # Errors
    /// Returns `Degenerate` when the column had fewer than two observations.
    pub fn into_result(self) -> Result<MetricsRecord, SerieError> {
        match self {
            Self::Computed(r) => Ok(r),
            Self::Degenerate {
                symbol,
                observations,
            } => Err(SerieError::Degenerate {
                symbol,
                observations,
            }),
        }
    }
}

/// Simple period-over-period returns (`p[i] / p[i-1] - 1`).
///
/// A return whose previous price is zero is not finite and is skipped.
#[must_use]
pub fn period_returns(prices: &[f64]) -> Vec<f64> {
    prices
        .windows(2)
        .map(|w| w[1] / w[0] - 1.0)
        .filter(|r| r.is_finite())
        .collect()
}

fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    Some(var.sqrt())
}

fn max_drawdown_pct(prices: &[f64]) -> f64 {
    let mut peak = f64::NEG_INFINITY;
    let mut worst = 0.0_f64;
    for &p in prices {
        peak = peak.max(p);
        if peak > 0.0 {
            worst = worst.min((p - peak) / peak);
        }
    }
    worst * 100.0
}

/// Compute statistics for one price column.
///
/// `dates` and `prices` must have the same length and describe the column in
/// ascending date order. `freq` selects the annualization factor and
/// `risk_free_pct` is the yearly risk-free rate used by the Sharpe ratio.
#[must_use]
pub fn compute_metrics(
    symbol: &str,
    dates: &[NaiveDate],
    prices: &[f64],
    freq: Frequency,
    risk_free_pct: f64,
) -> MetricsOutcome {
    let observations = prices.len().min(dates.len());
    if observations < 2 {
        return MetricsOutcome::Degenerate {
            symbol: symbol.to_string(),
            observations,
        };
    }
    let prices = &prices[..observations];
    let first = prices[0];
    let last = prices[observations - 1];

    let growth = (first != 0.0).then(|| last / first);
    let total_return_pct = growth.map(|g| (g - 1.0) * 100.0);

    let elapsed_days = (dates[observations - 1] - dates[0]).num_days();
    let cagr_pct = growth.map(|g| {
        if elapsed_days <= 0 {
            0.0
        } else {
            (g.powf(DAYS_PER_YEAR / elapsed_days as f64) - 1.0) * 100.0
        }
    });

    let returns = period_returns(prices);
    let volatility_pct =
        sample_std(&returns).map(|s| s * f64::from(freq.periods_per_year()).sqrt() * 100.0);

    let sharpe = match (cagr_pct, volatility_pct) {
        (Some(c), Some(v)) if v > 0.0 => Some((c - risk_free_pct) / v),
        _ => None,
    };

    MetricsOutcome::Computed(MetricsRecord {
        symbol: symbol.to_string(),
        observations,
        last_price: last,
        total_return_pct,
        cagr_pct,
        volatility_pct,
        max_drawdown_pct: max_drawdown_pct(prices),
        sharpe,
    })
}

/// Compute statistics for every column of an aligned table, in column order.
#[must_use]
pub fn column_metrics(
    table: &AlignedTable,
    freq: Frequency,
    risk_free_pct: f64,
) -> Vec<MetricsOutcome> {
    table
        .columns()
        .iter()
        .map(|c| compute_metrics(&c.name, table.index(), &c.values, freq, risk_free_pct))
        .collect()
}
