use serde::Serialize;

use crate::timeseries::table::{AlignedTable, Column};

/// Rebase every column so its first row equals `base`.
///
/// Columns whose first value is zero cannot be rebased and are omitted.
#[must_use]
pub fn rebase(table: &AlignedTable, base: f64) -> AlignedTable {
    let columns = table
        .columns()
        .iter()
        .filter_map(|c| {
            let first = *c.values.first()?;
            if first == 0.0 {
                return None;
            }
            Some(Column {
                name: c.name.clone(),
                values: c.values.iter().map(|v| v / first * base).collect(),
            })
        })
        .collect();
    AlignedTable::from_parts(table.index().to_vec(), columns)
}

/// Symmetric matrix of pairwise Pearson correlations of period returns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    /// Row and column labels, in table column order.
    pub labels: Vec<String>,
    /// `values[i][j]` is the correlation between `labels[i]` and `labels[j]`;
    /// `None` when either return series has no variance.
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    /// Correlation between two labels, if both exist and it is defined.
    #[must_use]
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.labels.iter().position(|l| l == a)?;
        let j = self.labels.iter().position(|l| l == b)?;
        self.values[i][j]
    }
}

/// Returns over consecutive rows, one per row pair; undefined returns stay non-finite
/// so every column keeps the same row positions.
fn row_returns(prices: &[f64]) -> Vec<f64> {
    prices.windows(2).map(|w| w[1] / w[0] - 1.0).collect()
}

/// Pearson correlation over the rows where both returns are finite.
fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
    let pairs: Vec<(f64, f64)> = x
        .iter()
        .zip(y)
        .filter(|(a, b)| a.is_finite() && b.is_finite())
        .map(|(&a, &b)| (a, b))
        .collect();
    let n = pairs.len();
    if n < 2 {
        return None;
    }
    let mx = pairs.iter().map(|p| p.0).sum::<f64>() / n as f64;
    let my = pairs.iter().map(|p| p.1).sum::<f64>() / n as f64;
    let mut sxy = 0.0;
    let mut sxx = 0.0;
    let mut syy = 0.0;
    for (a, b) in &pairs {
        let (dx, dy) = (a - mx, b - my);
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    if sxx <= 0.0 || syy <= 0.0 {
        return None;
    }
    Some((sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0))
}

/// Correlation matrix of period returns; `None` with fewer than two columns.
#[must_use]
pub fn correlation_matrix(table: &AlignedTable) -> Option<CorrelationMatrix> {
    if table.width() < 2 {
        return None;
    }
    let returns: Vec<Vec<f64>> = table
        .columns()
        .iter()
        .map(|c| row_returns(&c.values))
        .collect();
    let values = returns
        .iter()
        .map(|a| returns.iter().map(|b| pearson(a, b)).collect())
        .collect();
    Some(CorrelationMatrix {
        labels: table.names().map(str::to_string).collect(),
        values,
    })
}
