//! serie-yahoo
//!
//! Primary price source: daily adjusted close (falling back to close) from the
//! Yahoo Finance v8 chart endpoint, keyed by exchange ticker (`AAPL`, `ENI.MI`).
#![warn(missing_docs)]

/// Adapter definitions and the production adapter backed by `reqwest`.
pub mod adapter;
mod chart;

use std::sync::Arc;

use adapter::{ChartWindow, HttpAdapter, YahooApi};
use async_trait::async_trait;
use chrono::{Days, NaiveDate, Utc};
use serie_core::{
    ConnectorKey, HistoryProvider, HistoryRequest, HistoryResponse, SerieConnector, SerieError,
    Symbol,
};

pub(crate) const NAME: &str = "serie-yahoo";

/// Public connector type. Production users will construct with `YahooConnector::new_default()`.
pub struct YahooConnector {
    api: Arc<dyn YahooApi>,
}

impl YahooConnector {
    /// Static connector key for orchestrator priority configuration.
    pub const KEY: ConnectorKey = ConnectorKey::new(NAME);

    fn looks_like_not_found(msg: &str) -> bool {
        let m = msg.to_ascii_lowercase();
        m.contains("not found") || m.contains("no data") || m.contains("delisted")
    }

    fn normalize_error(e: SerieError, what: &str) -> SerieError {
        match e {
            SerieError::Connector { connector: _, msg } => {
                if Self::looks_like_not_found(&msg) {
                    SerieError::not_found(what.to_string())
                } else {
                    SerieError::connector(NAME, msg)
                }
            }
            SerieError::Other(msg) => SerieError::connector(NAME, msg),
            other => other,
        }
    }

    /// Build against the public endpoint.
    ///
    /// # Errors
    /// Returns `Connector` if the HTTP client cannot be built.
    pub fn try_new_default() -> Result<Self, SerieError> {
        Ok(Self::from_adapter(Arc::new(HttpAdapter::new_default()?)))
    }

    /// Build against the public endpoint, panicking only if TLS initialization fails.
    ///
    /// # Panics
    /// Panics if the underlying HTTP client cannot be constructed.
    #[must_use]
    pub fn new_default() -> Self {
        match Self::try_new_default() {
            Ok(c) => c,
            Err(e) => panic!("failed to build Yahoo HTTP client: {e}"),
        }
    }

    /// Build against another host, e.g. a local mock server.
    ///
    /// # Errors
    /// Returns `InvalidArg` for an unparsable URL.
    pub fn with_base_url(base: &str) -> Result<Self, SerieError> {
        Ok(Self::from_adapter(Arc::new(HttpAdapter::with_base_url(
            base,
        )?)))
    }

    /// Build from a provided `reqwest::Client`.
    ///
    /// # Errors
    /// Returns `InvalidArg` for an unparsable URL.
    pub fn try_new_with_reqwest_client(http: reqwest::Client) -> Result<Self, SerieError> {
        Ok(Self::from_adapter(Arc::new(HttpAdapter::with_client(
            http,
            adapter::DEFAULT_BASE_URL,
        )?)))
    }

    /// For tests/injection: wrap any chart adapter.
    #[must_use]
    pub fn from_adapter(api: Arc<dyn YahooApi>) -> Self {
        Self { api }
    }

    /// Convert a date window into chart bounds: `start` at UTC midnight through
    /// the end of `end` (or now when open-ended).
    fn window(req: &HistoryRequest) -> ChartWindow {
        let midnight = |d: NaiveDate| d.and_time(chrono::NaiveTime::MIN).and_utc().timestamp();
        let period2 = req
            .end()
            .and_then(|e| e.checked_add_days(Days::new(1)))
            .map_or_else(|| Utc::now().timestamp(), midnight);
        ChartWindow {
            period1: midnight(req.start()),
            period2,
        }
    }
}

#[async_trait]
impl HistoryProvider for YahooConnector {
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "serie_yahoo::history",
            skip(self, req),
            fields(symbol = %symbol, start = %req.start()),
        )
    )]
    async fn history(
        &self,
        symbol: &Symbol,
        req: &HistoryRequest,
    ) -> Result<HistoryResponse, SerieError> {
        let what = format!("history for {symbol}");
        let body = self
            .api
            .chart(symbol.as_str(), Self::window(req))
            .await
            .map_err(|e| Self::normalize_error(e, &what))?;
        chart::parse_chart(symbol.as_str(), &body)
    }
}

impl SerieConnector for YahooConnector {
    fn name(&self) -> &'static str {
        NAME
    }

    fn vendor(&self) -> &'static str {
        "Yahoo Finance"
    }

    fn accepts_suffix_guesses(&self) -> bool {
        true
    }

    fn as_history_provider(&self) -> Option<&dyn HistoryProvider> {
        Some(self as &dyn HistoryProvider)
    }
}
