use chrono::NaiveDate;
use serie_core::{
    AlignedTable, CorrelationMatrix, DEFAULT_RISK_FREE_PCT, Frequency, Horizon, MetricsOutcome,
    Resolution, SerieError, Symbol, Unresolved, align, column_metrics, correlation_matrix,
    dedup_symbols, normalize_symbols, rebase, resample,
};

use crate::Serie;

/// Base value of the normalized performance table.
pub const PERFORMANCE_BASE: f64 = 100.0;

/// Time window of an analysis run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Window {
    /// Fixed lookback ending on the reference date.
    Horizon(Horizon),
    /// Explicit `[start, end]`; an open end means up to the reference date.
    Period {
        /// First date.
        start: NaiveDate,
        /// Last date, if bounded.
        end: Option<NaiveDate>,
    },
}

/// Everything one analysis run needs. Built per run and passed explicitly.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisRequest {
    symbols: Vec<Symbol>,
    window: Window,
    frequency: Frequency,
    risk_free_pct: f64,
}

impl AnalysisRequest {
    /// Request for `symbols` (duplicates dropped, first occurrence kept) with a
    /// three-year daily window and the default risk-free rate.
    #[must_use]
    pub fn new(symbols: Vec<Symbol>) -> Self {
        Self {
            symbols: dedup_symbols(symbols),
            window: Window::Horizon(Horizon::default()),
            frequency: Frequency::default(),
            risk_free_pct: DEFAULT_RISK_FREE_PCT,
        }
    }

    /// Normalize free-form text into symbols and build a request from them.
    #[must_use]
    pub fn from_text(raw: &str, horizon: Horizon, frequency: Frequency) -> Self {
        Self::new(normalize_symbols(raw))
            .horizon(horizon)
            .frequency(frequency)
    }

    /// Use a fixed lookback horizon.
    #[must_use]
    pub const fn horizon(mut self, horizon: Horizon) -> Self {
        self.window = Window::Horizon(horizon);
        self
    }

    /// Use an explicit window.
    #[must_use]
    pub const fn period(mut self, start: NaiveDate, end: Option<NaiveDate>) -> Self {
        self.window = Window::Period { start, end };
        self
    }

    /// Output sampling frequency.
    #[must_use]
    pub const fn frequency(mut self, frequency: Frequency) -> Self {
        self.frequency = frequency;
        self
    }

    /// Yearly risk-free rate in percent used by the Sharpe ratio.
    #[must_use]
    pub const fn risk_free_pct(mut self, pct: f64) -> Self {
        self.risk_free_pct = pct;
        self
    }

    /// Requested symbols after deduplication.
    #[must_use]
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    /// Requested window.
    #[must_use]
    pub const fn window(&self) -> Window {
        self.window
    }

    /// Requested frequency.
    #[must_use]
    pub const fn sampling(&self) -> Frequency {
        self.frequency
    }
}

/// Outputs of one analysis run.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisReport {
    /// Frequency the tables were resampled to.
    pub frequency: Frequency,
    /// Aligned prices at the requested frequency, oldest row first.
    pub table: AlignedTable,
    /// The same table rebased to 100 on its first row.
    pub performance: AlignedTable,
    /// One entry per column of `table`, in column order.
    pub metrics: Vec<MetricsOutcome>,
    /// Pairwise correlation of period returns; present with two or more columns.
    pub correlation: Option<CorrelationMatrix>,
    /// Where each resolved symbol came from.
    pub resolutions: Vec<Resolution>,
    /// Symbols that produced no series, with the reason.
    pub unresolved: Vec<Unresolved>,
}

impl AnalysisReport {
    /// False when no symbol resolved or alignment left no rows.
    #[must_use]
    pub fn has_data(&self) -> bool {
        !self.resolutions.is_empty() && !self.table.is_empty()
    }
}

impl Serie {
    /// Run the whole pipeline for `req` with today's UTC date as reference.
    ///
    /// # Errors
    /// See [`Serie::analyze_as_of`].
    pub async fn analyze(&self, req: &AnalysisRequest) -> Result<AnalysisReport, SerieError> {
        self.analyze_as_of(req, chrono::Utc::now().date_naive())
            .await
    }

    /// Run the whole pipeline with an explicit reference date.
    ///
    /// Fetch every symbol (gather all, then align), align on the union of dates
    /// with forward fill, resample, then derive metrics, correlation and the
    /// base-100 performance table. Symbols that fail to resolve are reported in
    /// `unresolved` and never abort the run.
    ///
    /// # Errors
    /// `EmptyBatch` when the request carries no symbols (nothing is fetched),
    /// `InvalidArg` for an invalid window and `RequestTimeout` when the overall
    /// deadline elapses.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "serie::analysis::analyze",
            skip(self, req),
            fields(symbols = req.symbols.len(), frequency = %req.frequency),
        )
    )]
    pub async fn analyze_as_of(
        &self,
        req: &AnalysisRequest,
        today: NaiveDate,
    ) -> Result<AnalysisReport, SerieError> {
        if req.symbols.is_empty() {
            return Err(SerieError::EmptyBatch);
        }
        let mut builder = self.download().symbols(&req.symbols)?.as_of(today);
        builder = match req.window {
            Window::Horizon(h) => builder.horizon(h),
            Window::Period { start, end } => builder.period(start, end.or(Some(today))),
        };
        let fetched = builder.run().await?;

        let aligned = align(&fetched.labeled_series());
        let table = resample(&aligned, req.frequency);
        let metrics = column_metrics(&table, req.frequency, req.risk_free_pct);
        let correlation = correlation_matrix(&table);
        let performance = rebase(&table, PERFORMANCE_BASE);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            resolved = fetched.resolved.len(),
            unresolved = fetched.unresolved.len(),
            rows = table.len(),
            "analysis complete"
        );

        Ok(AnalysisReport {
            frequency: req.frequency,
            table,
            performance,
            metrics,
            correlation,
            resolutions: fetched.resolved,
            unresolved: fetched.unresolved,
        })
    }
}
