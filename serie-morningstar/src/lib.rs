//! serie-morningstar
//!
//! Secondary price source for funds: resolves a term (ISIN or ticker) through the
//! Morningstar security screener, then fetches the daily NAV series.
#![warn(missing_docs)]

/// Adapter definitions and the production adapter backed by `reqwest`.
pub mod adapter;
mod config;
mod payload;

use std::sync::Arc;

use adapter::{HttpAdapter, MorningstarApi, NavQuery};
use async_trait::async_trait;
use chrono::Utc;
use serie_core::{
    ConnectorKey, HistoryProvider, HistoryRequest, HistoryResponse, PriceField, SerieConnector,
    SerieError, Symbol,
};

pub use config::{DEFAULT_BASE_URL, MorningstarConfig};

pub(crate) const NAME: &str = "serie-morningstar";

/// Public connector type. Production users will construct with `MorningstarConnector::new_default()`.
pub struct MorningstarConnector {
    api: Arc<dyn MorningstarApi>,
    default_currency: String,
}

impl MorningstarConnector {
    /// Static connector key for orchestrator priority configuration.
    pub const KEY: ConnectorKey = ConnectorKey::new(NAME);

    fn looks_like_not_found(msg: &str) -> bool {
        let m = msg.to_ascii_lowercase();
        m.contains("not found") || m.contains("no data")
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

    /// Build for `cfg` with a fresh HTTP client.
    ///
    /// # Errors
    /// Returns `InvalidArg` for an unusable base URL and `Connector` if the HTTP
    /// client cannot be built.
    pub fn with_config(cfg: MorningstarConfig) -> Result<Self, SerieError> {
        let default_currency = cfg.default_currency.clone();
        Ok(Self {
            api: Arc::new(HttpAdapter::new(cfg)?),
            default_currency,
        })
    }

    /// Build against the Italian fund universe.
    ///
    /// # Panics
    /// Panics if the underlying HTTP client cannot be constructed.
    #[must_use]
    pub fn new_default() -> Self {
        match Self::with_config(MorningstarConfig::default()) {
            Ok(c) => c,
            Err(e) => panic!("failed to build Morningstar HTTP client: {e}"),
        }
    }

    /// For tests/injection: wrap any fund adapter, using the default configuration's currency.
    #[must_use]
    pub fn from_adapter(api: Arc<dyn MorningstarApi>) -> Self {
        Self {
            api,
            default_currency: MorningstarConfig::default().default_currency,
        }
    }
}

#[async_trait]
impl HistoryProvider for MorningstarConnector {
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "serie_morningstar::history",
            skip(self, req),
            fields(symbol = %symbol, start = %req.start()),
        )
    )]
    async fn history(
        &self,
        symbol: &Symbol,
        req: &HistoryRequest,
    ) -> Result<HistoryResponse, SerieError> {
        let what = payload::lookup_label(symbol);
        let body = self
            .api
            .screener(symbol.as_str())
            .await
            .map_err(|e| Self::normalize_error(e, &what))?;
        let fund = payload::parse_screener(symbol, &body)?;
        #[cfg(feature = "tracing")]
        tracing::debug!(sec_id = %fund.sec_id, name = ?fund.name, "matched fund");

        let currency = fund
            .currency
            .clone()
            .unwrap_or_else(|| self.default_currency.clone());
        let query = NavQuery {
            sec_id: fund.sec_id.clone(),
            currency: currency.clone(),
            start: req.start(),
            end: req.end().unwrap_or_else(|| Utc::now().date_naive()),
        };
        let body = self
            .api
            .nav(&query)
            .await
            .map_err(|e| Self::normalize_error(e, &what))?;
        let points = payload::parse_nav(&fund.sec_id, &body)?;
        if points.is_empty() {
            return Err(SerieError::not_found(what));
        }
        Ok(HistoryResponse {
            points,
            field: PriceField::Nav,
            currency: Some(currency),
        })
    }
}

impl SerieConnector for MorningstarConnector {
    fn name(&self) -> &'static str {
        NAME
    }

    fn vendor(&self) -> &'static str {
        "Morningstar"
    }

    fn as_history_provider(&self) -> Option<&dyn HistoryProvider> {
        Some(self as &dyn HistoryProvider)
    }
}
