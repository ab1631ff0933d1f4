use std::collections::HashSet;

use chrono::NaiveDate;
use futures::stream::{self, StreamExt};
use serie_core::{
    Capability, FetchReport, HistoryRequest, Horizon, Resolution, SerieError, Symbol, Unresolved,
};

use crate::Serie;
use crate::router::util::with_request_deadline;

/// Builder to orchestrate history downloads for a batch of symbols.
pub struct DownloadBuilder<'a> {
    pub(crate) serie: &'a Serie,
    pub(crate) symbols: Vec<Symbol>,
    pub(crate) horizon: Horizon,
    // Explicit window; validated at run() so setters never fail.
    pub(crate) period: Option<(NaiveDate, Option<NaiveDate>)>,
    pub(crate) today: Option<NaiveDate>,
}

impl<'a> DownloadBuilder<'a> {
    /// Create a new builder bound to a `Serie` instance.
    ///
    /// Starts with an empty symbol list and the default three-year horizon.
    #[must_use]
    pub fn new(serie: &'a Serie) -> Self {
        Self {
            serie,
            symbols: Vec::new(),
            horizon: Horizon::default(),
            period: None,
            today: None,
        }
    }

    /// Replace the symbol list.
    ///
    /// # Errors
    /// Returns an error if the list repeats a symbol.
    pub fn symbols(mut self, symbols: &[Symbol]) -> Result<Self, SerieError> {
        let mut seen = HashSet::new();
        for s in symbols {
            if !seen.insert(s.as_str()) {
                return Err(SerieError::InvalidArg(format!(
                    "duplicate symbol '{s}' in symbols list"
                )));
            }
        }
        self.symbols = symbols.to_vec();
        Ok(self)
    }

    /// Append one symbol.
    ///
    /// # Errors
    /// Returns an error if the symbol is already in the list.
    pub fn add_symbol(mut self, symbol: Symbol) -> Result<Self, SerieError> {
        if self.symbols.contains(&symbol) {
            return Err(SerieError::InvalidArg(format!(
                "duplicate symbol '{symbol}' already exists in symbols list"
            )));
        }
        self.symbols.push(symbol);
        Ok(self)
    }

    /// Look back over a fixed horizon ending today and clear any explicit period.
    #[must_use]
    pub const fn horizon(mut self, horizon: Horizon) -> Self {
        self.horizon = horizon;
        self.period = None;
        self
    }

    /// Set an explicit `[start, end]` window and clear the horizon; `end` defaults to today.
    #[must_use]
    pub const fn period(mut self, start: NaiveDate, end: Option<NaiveDate>) -> Self {
        self.period = Some((start, end));
        self
    }

    /// Pin the reference date horizons are computed from (defaults to the current UTC date).
    #[must_use]
    pub const fn as_of(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    fn request(&self) -> Result<HistoryRequest, SerieError> {
        match self.period {
            Some((start, end)) => HistoryRequest::new(start, end),
            None => {
                let today = self
                    .today
                    .unwrap_or_else(|| chrono::Utc::now().date_naive());
                Ok(HistoryRequest::from_horizon(self.horizon, today))
            }
        }
    }

    /// Fetch every symbol and sort the outcomes into resolved and unresolved.
    ///
    /// Behavior:
    /// - Symbols walk the same fallback plan as [`Serie::history`], at most
    ///   `concurrency` at a time. Output order follows input order.
    /// - The request deadline bounds the whole batch once; individual symbols
    ///   are not given their own deadline.
    /// - A failing symbol becomes an [`Unresolved`] entry and never aborts the batch.
    /// - The report is assembled only after every fetch finished.
    ///
    /// # Errors
    /// Returns `EmptyBatch` when no symbols were given (nothing is fetched),
    /// `InvalidArg` for an invalid window and `RequestTimeout` if the overall
    /// deadline elapses.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "serie::router::download",
            skip(self),
            fields(symbols = self.symbols.len(), concurrency = self.serie.cfg.concurrency),
        )
    )]
    pub async fn run(self) -> Result<FetchReport, SerieError> {
        if self.symbols.is_empty() {
            return Err(SerieError::EmptyBatch);
        }
        let req = self.request()?;
        let serie = self.serie;

        let fetches = stream::iter(self.symbols.iter().cloned())
            .map(|symbol| async move {
                let res = serie.run_attempts(&symbol, &req).await;
                (symbol, res)
            })
            .buffered(serie.cfg.concurrency.max(1))
            .collect::<Vec<(Symbol, Result<Resolution, SerieError>)>>();

        let joined = with_request_deadline(
            serie.cfg.request_timeout,
            Capability::DownloadHistory,
            fetches,
        )
        .await?;

        let mut report = FetchReport::default();
        for (symbol, result) in joined {
            match result {
                Ok(resolution) => report.resolved.push(resolution),
                Err(error) => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(symbol = %symbol, error = %error, "symbol not resolved");
                    report.unresolved.push(Unresolved { symbol, error });
                }
            }
        }
        Ok(report)
    }
}

impl Serie {
    /// Begin building a batch download.
    ///
    /// Typical usage: chain `symbols`/`horizon` then call `run()`.
    #[must_use]
    pub fn download(&'_ self) -> DownloadBuilder<'_> {
        DownloadBuilder::new(self)
    }
}
