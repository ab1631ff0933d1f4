use serde::{Deserialize, Serialize};

/// Default host serving both the screener and the price time series.
pub const DEFAULT_BASE_URL: &str = "https://tools.morningstar.it";

/// Where and how fund lookups are performed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MorningstarConfig {
    /// Scheme and host of the REST service.
    pub base_url: String,
    /// Screener universe to search (e.g. `FOITA$$ALL` for funds sold in Italy).
    pub universe_ids: String,
    /// Language of returned names.
    pub language_id: String,
    /// Currency requested for the NAV series when the screener reports none.
    pub default_currency: String,
}

impl Default for MorningstarConfig {
    fn default() -> Self {
        Self::for_universe("FOITA$$ALL", "it-IT", "EUR")
    }
}

impl MorningstarConfig {
    /// Configuration for another fund universe on the default host.
    #[must_use]
    pub fn for_universe(universe_ids: &str, language_id: &str, default_currency: &str) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            universe_ids: universe_ids.to_string(),
            language_id: language_id.to_string(),
            default_currency: default_currency.to_string(),
        }
    }

    /// Same lookups against another host.
    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}
