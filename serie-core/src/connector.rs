use async_trait::async_trait;

use crate::{ConnectorKey, HistoryRequest, HistoryResponse, SerieError, Symbol};

/// Focused role trait for connectors that provide daily price history.
#[async_trait]
pub trait HistoryProvider: Send + Sync {
    /// Fetch daily history for `symbol` over the requested window.
    ///
    /// Implementations report "no data" as `NotFound`, transport failures as
    /// `Connector` and undecodable payloads as `Data`. An `Ok` response with no
    /// points is treated by the orchestrator like `NotFound`.
    async fn history(
        &self,
        symbol: &Symbol,
        req: &HistoryRequest,
    ) -> Result<HistoryResponse, SerieError>;
}

/// Main connector trait implemented by provider crates. Exposes capability discovery.
pub trait SerieConnector: Send + Sync {
    /// A stable identifier for priority lists (e.g., "serie-yahoo").
    fn name(&self) -> &'static str;

    /// Canonical connector key constructed from the static name.
    fn key(&self) -> ConnectorKey {
        ConnectorKey::new(self.name())
    }

    /// Human-friendly vendor string.
    fn vendor(&self) -> &'static str {
        "unknown"
    }

    /// Whether exchange-suffixed variants (`{symbol}.MI`, ...) are worth retrying here.
    ///
    /// Default: `false`. Ticker-keyed providers opt in; fund lookups keyed by ISIN do not.
    fn accepts_suffix_guesses(&self) -> bool {
        false
    }

    /// Advertise history capability by returning a usable trait object reference when supported.
    fn as_history_provider(&self) -> Option<&dyn HistoryProvider> {
        None
    }
}
