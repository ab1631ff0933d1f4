use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use serie_core::SerieError;
use url::Url;

use crate::MorningstarConfig;

const SCREENER_PATH: [&str; 5] = ["api", "rest.svc", "klr5zyak8x", "security", "screener"];
const TIMESERIES_PATH: [&str; 4] = ["api", "rest.svc", "timeseries_price", "t92wz0sj7c"];
const SECURITY_FIELDS: &str = "SecId|Name|PriceCurrency|LegalName|isin";

/// One daily NAV request for a resolved security.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavQuery {
    /// Provider security id returned by the screener.
    pub sec_id: String,
    /// Currency the series is requested in.
    pub currency: String,
    /// First date, inclusive.
    pub start: NaiveDate,
    /// Last date, inclusive.
    pub end: NaiveDate,
}

/// Fund endpoints abstraction (so we can inject fixtures in tests).
#[async_trait]
pub trait MorningstarApi: Send + Sync {
    /// Raw JSON body of a screener search for `term`.
    async fn screener(&self, term: &str) -> Result<String, SerieError>;

    /// Raw `COMPACTJSON` body of a daily NAV series.
    async fn nav(&self, query: &NavQuery) -> Result<String, SerieError>;
}

/// Production adapter talking to the REST service over `reqwest`.
#[derive(Clone)]
pub struct HttpAdapter {
    http: reqwest::Client,
    base: Url,
    cfg: MorningstarConfig,
}

impl HttpAdapter {
    /// Adapter for `cfg`.
    ///
    /// # Errors
    /// Returns `InvalidArg` for an unparsable base URL and `Connector` if the
    /// HTTP client cannot be built.
    pub fn new(cfg: MorningstarConfig) -> Result<Self, SerieError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| SerieError::connector(crate::NAME, e.to_string()))?;
        Self::with_client(http, cfg)
    }

    /// Adapter sharing an existing `reqwest::Client`.
    ///
    /// # Errors
    /// Returns `InvalidArg` for an unparsable base URL.
    pub fn with_client(http: reqwest::Client, cfg: MorningstarConfig) -> Result<Self, SerieError> {
        let base = Url::parse(&cfg.base_url).map_err(|e| {
            SerieError::InvalidArg(format!("invalid base url '{}': {e}", cfg.base_url))
        })?;
        if base.cannot_be_a_base() {
            return Err(SerieError::InvalidArg(format!(
                "base url cannot be a base: {base}"
            )));
        }
        Ok(Self { http, base, cfg })
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    pub(crate) fn screener_url(&self, term: &str) -> Url {
        let mut url = self.endpoint(&SCREENER_PATH);
        url.query_pairs_mut()
            .append_pair("page", "1")
            .append_pair("pageSize", "10")
            .append_pair("outputType", "json")
            .append_pair("version", "1")
            .append_pair("languageId", &self.cfg.language_id)
            .append_pair("securityDataPoints", SECURITY_FIELDS)
            .append_pair("universeIds", &self.cfg.universe_ids)
            .append_pair("term", term);
        url
    }

    pub(crate) fn nav_url(&self, q: &NavQuery) -> Url {
        let mut url = self.endpoint(&TIMESERIES_PATH);
        url.query_pairs_mut()
            .append_pair("currencyId", &q.currency)
            .append_pair("idtype", "Morningstar")
            .append_pair("frequency", "daily")
            .append_pair("startDate", &q.start.format("%Y-%m-%d").to_string())
            .append_pair("endDate", &q.end.format("%Y-%m-%d").to_string())
            .append_pair("outputType", "COMPACTJSON")
            .append_pair("id", &format!("{}]2]0]", q.sec_id));
        url
    }

    async fn get(&self, url: Url) -> Result<String, SerieError> {
        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| SerieError::connector(crate::NAME, e.to_string()))?;
        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(SerieError::connector(crate::NAME, "HTTP 404 Not Found"));
        }
        if !status.is_success() {
            return Err(SerieError::connector(crate::NAME, format!("HTTP {status}")));
        }
        resp.text()
            .await
            .map_err(|e| SerieError::connector(crate::NAME, e.to_string()))
    }
}

#[async_trait]
impl MorningstarApi for HttpAdapter {
    async fn screener(&self, term: &str) -> Result<String, SerieError> {
        self.get(self.screener_url(term)).await
    }

    async fn nav(&self, query: &NavQuery) -> Result<String, SerieError> {
        self.get(self.nav_url(query)).await
    }
}

impl dyn MorningstarApi {
    /// Test helper that builds a `MorningstarApi` from two closures returning JSON bodies.
    pub fn from_fns<S, N>(screener: S, nav: N) -> Arc<dyn MorningstarApi>
    where
        S: Send + Sync + 'static + Fn(String) -> Result<String, SerieError>,
        N: Send + Sync + 'static + Fn(NavQuery) -> Result<String, SerieError>,
    {
        struct FnFunds<S, N> {
            screener: S,
            nav: N,
        }
        #[async_trait]
        impl<S, N> MorningstarApi for FnFunds<S, N>
        where
            S: Send + Sync + 'static + Fn(String) -> Result<String, SerieError>,
            N: Send + Sync + 'static + Fn(NavQuery) -> Result<String, SerieError>,
        {
            async fn screener(&self, term: &str) -> Result<String, SerieError> {
                (self.screener)(term.to_string())
            }

            async fn nav(&self, query: &NavQuery) -> Result<String, SerieError> {
                (self.nav)(query.clone())
            }
        }
        Arc::new(FnFunds { screener, nav })
    }
}
