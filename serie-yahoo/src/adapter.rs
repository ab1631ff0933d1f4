use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serie_core::SerieError;
use url::Url;

/// Default host of the chart endpoint.
pub const DEFAULT_BASE_URL: &str = "https://query2.finance.yahoo.com";

const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36";

/// Window of a chart request in UNIX seconds, `period2` exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartWindow {
    /// Start of the window.
    pub period1: i64,
    /// End of the window.
    pub period2: i64,
}

/// Chart endpoint abstraction (so we can inject fixtures in tests).
#[async_trait]
pub trait YahooApi: Send + Sync {
    /// Fetch the raw JSON body of a daily chart for `symbol`.
    ///
    /// A "not found" answer must still be returned as a body so the connector
    /// can read the provider's error code.
    async fn chart(&self, symbol: &str, window: ChartWindow) -> Result<String, SerieError>;
}

/// Production adapter talking to the chart endpoint over `reqwest`.
#[derive(Clone)]
pub struct HttpAdapter {
    http: reqwest::Client,
    base: Url,
}

impl HttpAdapter {
    /// Adapter against the public endpoint.
    ///
    /// # Errors
    /// Returns `Connector` if the HTTP client cannot be built.
    pub fn new_default() -> Result<Self, SerieError> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Adapter against another host (a proxy or a local mock server).
    ///
    /// # Errors
    /// Returns `InvalidArg` for an unparsable URL and `Connector` if the HTTP
    /// client cannot be built.
    pub fn with_base_url(base: &str) -> Result<Self, SerieError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| SerieError::connector(crate::NAME, e.to_string()))?;
        Self::with_client(http, base)
    }

    /// Adapter sharing an existing `reqwest::Client`.
    ///
    /// # Errors
    /// Returns `InvalidArg` for an unparsable URL.
    pub fn with_client(http: reqwest::Client, base: &str) -> Result<Self, SerieError> {
        let base = Url::parse(base)
            .map_err(|e| SerieError::InvalidArg(format!("invalid base url '{base}': {e}")))?;
        Ok(Self { http, base })
    }

    pub(crate) fn chart_url(&self, symbol: &str, window: ChartWindow) -> Result<Url, SerieError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| SerieError::InvalidArg(format!("base url cannot be a base: {}", self.base)))?
            .pop_if_empty()
            .extend(["v8", "finance", "chart", symbol]);
        url.query_pairs_mut()
            .append_pair("period1", &window.period1.to_string())
            .append_pair("period2", &window.period2.to_string())
            .append_pair("interval", "1d")
            .append_pair("includeAdjustedClose", "true")
            .append_pair("events", "div,split");
        Ok(url)
    }
}

#[async_trait]
impl YahooApi for HttpAdapter {
    async fn chart(&self, symbol: &str, window: ChartWindow) -> Result<String, SerieError> {
        let url = self.chart_url(symbol, window)?;
        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| SerieError::connector(crate::NAME, e.to_string()))?;
        let status = resp.status();
        // 404 carries a chart error body ("Not Found") worth decoding
        if !status.is_success() && status != reqwest::StatusCode::NOT_FOUND {
            return Err(SerieError::connector(crate::NAME, format!("HTTP {status}")));
        }
        resp.text()
            .await
            .map_err(|e| SerieError::connector(crate::NAME, e.to_string()))
    }
}

impl dyn YahooApi {
    /// Test helper that builds a `YahooApi` from a closure returning a JSON body.
    pub fn from_fn<F>(f: F) -> Arc<dyn YahooApi>
    where
        F: Send + Sync + 'static + Fn(String, ChartWindow) -> Result<String, SerieError>,
    {
        struct FnChart<F>(F);
        #[async_trait]
        impl<F> YahooApi for FnChart<F>
        where
            F: Send + Sync + 'static + Fn(String, ChartWindow) -> Result<String, SerieError>,
        {
            async fn chart(
                &self,
                symbol: &str,
                window: ChartWindow,
            ) -> Result<String, SerieError> {
                (self.0)(symbol.to_string(), window)
            }
        }
        Arc::new(FnChart(f))
    }
}
