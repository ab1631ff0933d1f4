//! Plain-text rendering of an analysis report.

use std::fmt::Write as _;

use serie::{AlignedTable, AnalysisReport, CorrelationMatrix, MetricsOutcome, Resolution};

use crate::cli::DateFormatArg;

const SPARK_LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];
const HEAT_LEVELS: [char; 5] = [' ', '░', '▒', '▓', '█'];
const SPARK_WIDTH: usize = 48;

fn na(v: Option<f64>) -> String {
    v.map_or_else(|| "n/a".to_string(), |x| format!("{x:.2}"))
}

fn label_width(names: impl Iterator<Item = usize>, min: usize) -> usize {
    names.fold(min, usize::max)
}

/// Which connector and field answered each symbol.
pub fn sources(resolutions: &[Resolution]) -> String {
    let mut out = String::from("Sources\n");
    let w = label_width(resolutions.iter().map(|r| r.requested.as_str().len()), 6);
    for r in resolutions {
        let matched = if r.matched == r.requested {
            String::new()
        } else {
            format!(" as {}", r.matched)
        };
        let currency = r
            .currency
            .as_deref()
            .map_or_else(String::new, |c| format!(", {c}"));
        let _ = writeln!(
            out,
            "  {:<w$}  {}{matched} ({}{currency})",
            r.requested.as_str(),
            r.connector,
            r.field,
        );
    }
    out
}

/// Aligned prices, newest row first, two decimals.
pub fn prices(table: &AlignedTable, dates: DateFormatArg, limit: Option<usize>) -> String {
    let names: Vec<&str> = table.names().collect();
    let widths: Vec<usize> = names.iter().map(|n| n.len().max(10)).collect();
    let mut out = String::new();
    let _ = write!(out, "{:<10}", "Date");
    for (n, &w) in names.iter().zip(&widths) {
        let _ = write!(out, "  {n:>w$}");
    }
    out.push('\n');
    let shown = limit.unwrap_or(table.len()).min(table.len());
    for i in (0..table.len()).rev().take(shown) {
        let _ = write!(out, "{:<10}", dates.render(table.index()[i]));
        for (c, &w) in table.columns().iter().zip(&widths) {
            let _ = write!(out, "  {:>w$.2}", c.values[i]);
        }
        out.push('\n');
    }
    if shown < table.len() {
        let _ = writeln!(out, "... {} older rows", table.len() - shown);
    }
    out
}

/// One line of statistics per column; degenerate columns print `n/a`.
pub fn metrics(outcomes: &[MetricsOutcome]) -> String {
    let w = label_width(outcomes.iter().map(|m| m.symbol().len()), 6);
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<w$}  {:>5}  {:>10}  {:>9}  {:>8}  {:>8}  {:>8}  {:>6}",
        "Symbol", "Obs", "Last", "Return %", "CAGR %", "Vol %", "MaxDD %", "Sharpe"
    );
    for m in outcomes {
        match m {
            MetricsOutcome::Computed(r) => {
                let _ = writeln!(
                    out,
                    "{:<w$}  {:>5}  {:>10.2}  {:>9}  {:>8}  {:>8}  {:>8.2}  {:>6}",
                    r.symbol,
                    r.observations,
                    r.last_price,
                    na(r.total_return_pct),
                    na(r.cagr_pct),
                    na(r.volatility_pct),
                    r.max_drawdown_pct,
                    na(r.sharpe),
                );
            }
            MetricsOutcome::Degenerate {
                symbol,
                observations,
            } => {
                let _ = writeln!(
                    out,
                    "{symbol:<w$}  {observations:>5}  {:>10}  {:>9}  {:>8}  {:>8}  {:>8}  {:>6}",
                    "n/a", "n/a", "n/a", "n/a", "n/a", "n/a"
                );
            }
        }
    }
    out
}

/// Resample `values` to at most `width` evenly spaced points and draw them.
pub fn sparkline(values: &[f64], width: usize) -> String {
    if values.is_empty() || width == 0 {
        return String::new();
    }
    let picked: Vec<f64> = if values.len() <= width {
        values.to_vec()
    } else {
        (0..width)
            .map(|i| values[i * (values.len() - 1) / (width - 1).max(1)])
            .collect()
    };
    let lo = picked.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = picked.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let top = SPARK_LEVELS.len() - 1;
    picked
        .iter()
        .map(|v| {
            if hi > lo {
                let idx = ((v - lo) / (hi - lo) * top as f64).round() as usize;
                SPARK_LEVELS[idx.min(top)]
            } else {
                SPARK_LEVELS[top / 2]
            }
        })
        .collect()
}

/// Base-100 performance, one sparkline per column with first and last value.
pub fn performance(table: &AlignedTable) -> String {
    let w = label_width(table.names().map(str::len), 6);
    let mut out = String::new();
    for c in table.columns() {
        let (Some(first), Some(last)) = (c.values.first(), c.values.last()) else {
            continue;
        };
        let _ = writeln!(
            out,
            "{:<w$}  {}  {first:.2} -> {last:.2}",
            c.name,
            sparkline(&c.values, SPARK_WIDTH)
        );
    }
    out
}

fn shade(v: f64) -> char {
    let top = HEAT_LEVELS.len() - 1;
    let idx = (v.abs().clamp(0.0, 1.0) * top as f64).round() as usize;
    HEAT_LEVELS[idx.min(top)]
}

/// Correlation heatmap: a shade for the strength plus the signed value.
pub fn correlation(m: &CorrelationMatrix) -> String {
    let w = label_width(m.labels.iter().map(String::len), 6);
    let cell = w.max(7);
    let mut out = String::new();
    let _ = write!(out, "{:<w$}", "");
    for l in &m.labels {
        let _ = write!(out, "  {l:>cell$}");
    }
    out.push('\n');
    for (label, row) in m.labels.iter().zip(&m.values) {
        let _ = write!(out, "{label:<w$}");
        for v in row {
            let text = match v {
                Some(x) => format!("{}{x:+.2}", shade(*x)),
                None => "n/a".to_string(),
            };
            let _ = write!(out, "  {text:>cell$}");
        }
        out.push('\n');
    }
    out
}

/// Everything printed on stdout for a report.
pub fn report(r: &AnalysisReport, dates: DateFormatArg, limit: Option<usize>) -> String {
    let mut out = String::new();
    out.push_str(&sources(&r.resolutions));
    let _ = writeln!(out, "\nPrices ({}, newest first)", r.frequency);
    out.push_str(&prices(&r.table, dates, limit));
    out.push_str("\nMetrics\n");
    out.push_str(&metrics(&r.metrics));
    out.push_str("\nPerformance (base 100)\n");
    out.push_str(&performance(&r.performance));
    if let Some(c) = &r.correlation {
        out.push_str("\nCorrelation of returns\n");
        out.push_str(&correlation(c));
    }
    out
}
