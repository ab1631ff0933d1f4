//! Serie fetches daily price histories for a batch of symbols across prioritized
//! providers and turns them into an aligned, analyzable table.
//!
//! Overview
//! - Routes history requests to connectors implementing the `serie_core` contracts.
//! - Walks a prioritized fallback plan per symbol: every connector verbatim, then
//!   optional exchange-suffix guesses. The first non-empty series wins.
//! - Batches fan out with bounded concurrency; a failing symbol is reported, never fatal.
//! - The analysis pipeline aligns (forward fill, drop incomplete rows), resamples
//!   (keep last per period) and derives metrics, correlation and base-100 performance.
//!
//! Key behaviors and trade-offs
//! - No reconciliation across sources: units, currency and adjustment policy are
//!   whatever the winning provider reports (see `Resolution::field`/`currency`).
//! - No retries, caching or rate limiting. Each provider call is bounded by a timeout.
//!
//! Examples
//! ```rust,ignore
//! use std::sync::Arc;
//! use serie::{AnalysisRequest, Frequency, Horizon, Serie};
//!
//! let serie = Serie::builder()
//!     .with_connector(yahoo)
//!     .with_connector(morningstar)
//!     .suffix_guesses(&[".MI", ".PA", ".DE"])
//!     .build()?;
//!
//! let req = AnalysisRequest::from_text("SWDA.MI, LU1287022708, AAPL", Horizon::Y5, Frequency::Monthly);
//! let report = serie.analyze(&req).await?;
//! for u in &report.unresolved {
//!     eprintln!("{}: {}", u.symbol, u.error);
//! }
//! ```
#![warn(missing_docs)]

mod analysis;
pub(crate) mod core;
mod router;

pub use analysis::{AnalysisReport, AnalysisRequest, PERFORMANCE_BASE, Window};
pub use core::{Serie, SerieBuilder};
pub use router::download::DownloadBuilder;
pub use router::util::collapse_errors;

// Re-export core types for convenience
pub use serie_core::{
    AlignedTable, Capability, Column, ConnectorKey, CorrelationMatrix, DEFAULT_RISK_FREE_PCT,
    DateFormat, DecimalMark, Delimiter, ExportOptions, FetchReport, Frequency, HistoryProvider,
    HistoryRequest, HistoryResponse, Horizon, MetricsOutcome, MetricsRecord, PriceField,
    PricePoint, Resolution, SerieConfig, SerieConnector, SerieError, Symbol, TimeSeries,
    Unresolved, from_delimited, to_delimited,
};
