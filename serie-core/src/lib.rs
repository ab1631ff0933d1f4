//! serie-core
//!
//! Core types, traits, and utilities shared across the serie workspace.
//!
//! - `types`: symbols, price points, time series, requests and fetch reports.
//! - `connector`: the `SerieConnector` trait and the `HistoryProvider` role trait.
//! - `normalize`: turns free-form user text into candidate symbols.
//! - `timeseries`: aligns independently sourced series and resamples the result.
//! - `metrics` and `analytics`: per-column statistics, correlation and rebasing.
//! - `export`: delimited text export/import for regional spreadsheet conventions.
#![warn(missing_docs)]

/// Derived analytics over an aligned table (rebasing, correlation).
pub mod analytics;
/// Connector capability traits and the primary `SerieConnector` interface.
pub mod connector;
/// Delimited text export and re-import of aligned tables.
pub mod export;
/// Per-column descriptive statistics.
pub mod metrics;
/// Identifier normalization from free-form text.
pub mod normalize;
/// Time-series alignment and resampling.
pub mod timeseries;
pub mod types;

pub use analytics::{CorrelationMatrix, correlation_matrix, rebase};
pub use connector::{HistoryProvider, SerieConnector};
pub use export::{DateFormat, DecimalMark, Delimiter, ExportOptions, from_delimited, to_delimited};
pub use metrics::{
    DEFAULT_RISK_FREE_PCT, MetricsOutcome, MetricsRecord, column_metrics, compute_metrics,
    period_returns,
};
pub use normalize::{dedup_symbols, normalize_symbols};
pub use timeseries::align::align;
pub use timeseries::resample::resample;
pub use timeseries::table::{AlignedTable, Column};
pub use types::*;
