//! Mock serie connectors for CI-safe tests and offline demos.
//!
//! - [`MockConnector`]: exchange tickers (`AAPL`, `MSFT`, `SPY`, `ENI.MI`, `SWDA.MI`, `SAP.DE`),
//!   accepts suffix guesses so `ENI` resolves as `ENI.MI`.
//! - [`MockFundConnector`]: fund NAVs keyed by ISIN (`LU1287022708`, `IE00B4L5Y983`).
//! - [`DynamicMockConnector`]: behavior scripted per symbol from the test.
//!
//! The static mocks recognize two sentinel symbols: `FAIL` returns a connector
//! error and `TIMEOUT` sleeps before answering `NotFound`.
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use serie_core::{
    HistoryProvider, HistoryRequest, HistoryResponse, PriceField, SerieConnector, SerieError,
    Symbol,
};

mod dynamic;
mod fixtures;

pub use dynamic::{DynamicMockConnector, DynamicMockController, MockBehavior};

/// How long the `TIMEOUT` sentinel stalls.
pub const TIMEOUT_SENTINEL_DELAY: Duration = Duration::from_millis(200);

async fn maybe_fail_or_timeout(
    connector: &'static str,
    symbol: &str,
) -> Result<(), SerieError> {
    match symbol {
        "FAIL" => Err(SerieError::connector(
            connector,
            "forced failure: history",
        )),
        "TIMEOUT" => {
            tokio::time::sleep(TIMEOUT_SENTINEL_DELAY).await;
            Ok(())
        }
        _ => Ok(()),
    }
}

fn synthesize(
    fixture: Option<fixtures::Fixture>,
    symbol: &Symbol,
    req: &HistoryRequest,
    field: PriceField,
) -> Result<HistoryResponse, SerieError> {
    let what = format!("history for {symbol}");
    let f = fixture.ok_or_else(|| SerieError::not_found(what.clone()))?;
    let end = req.end().unwrap_or_else(|| Utc::now().date_naive());
    let points = f.points(req.start(), end);
    if points.is_empty() {
        return Err(SerieError::not_found(what));
    }
    Ok(HistoryResponse {
        points,
        field,
        currency: Some(f.currency.to_string()),
    })
}

/// Mock equity connector. Provides deterministic data from synthetic fixtures.
pub struct MockConnector;

impl Default for MockConnector {
    fn default() -> Self {
        Self::new()
    }
}

impl MockConnector {
    /// Stable connector name.
    pub const NAME: &'static str = "serie-mock";

    /// Create the connector.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl SerieConnector for MockConnector {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn vendor(&self) -> &'static str {
        "Mock"
    }

    fn accepts_suffix_guesses(&self) -> bool {
        true
    }

    fn as_history_provider(&self) -> Option<&dyn HistoryProvider> {
        Some(self as &dyn HistoryProvider)
    }
}

#[async_trait]
impl HistoryProvider for MockConnector {
    async fn history(
        &self,
        symbol: &Symbol,
        req: &HistoryRequest,
    ) -> Result<HistoryResponse, SerieError> {
        let s = symbol.as_str();
        maybe_fail_or_timeout(Self::NAME, s).await?;
        synthesize(fixtures::equity(s), symbol, req, PriceField::AdjClose)
    }
}

/// Mock fund connector answering NAV series for known ISINs only.
pub struct MockFundConnector;

impl Default for MockFundConnector {
    fn default() -> Self {
        Self::new()
    }
}

impl MockFundConnector {
    /// Stable connector name.
    pub const NAME: &'static str = "serie-mock-funds";

    /// Create the connector.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl SerieConnector for MockFundConnector {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn vendor(&self) -> &'static str {
        "Mock funds"
    }

    fn as_history_provider(&self) -> Option<&dyn HistoryProvider> {
        Some(self as &dyn HistoryProvider)
    }
}

#[async_trait]
impl HistoryProvider for MockFundConnector {
    async fn history(
        &self,
        symbol: &Symbol,
        req: &HistoryRequest,
    ) -> Result<HistoryResponse, SerieError> {
        let s = symbol.as_str();
        maybe_fail_or_timeout(Self::NAME, s).await?;
        synthesize(fixtures::fund(s), symbol, req, PriceField::Nav)
    }
}
