//! Domain types for price histories plus re-exports from `serie-types`.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::{Serialize, Serializer};

pub use serie_types::{Capability, ConnectorKey, Frequency, Horizon, SerieConfig, SerieError};

static SYMBOL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\w.\-]+$").expect("static symbol pattern compiles"));

/// Case-normalized security identifier (ticker or ISIN).
///
/// Only the character class is validated: word characters, `.` and `-`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(String);

impl Symbol {
    /// Build a symbol from user input, trimming and uppercasing it.
    ///
    /// # Errors
    /// Returns `InvalidArg` when the input is empty or contains characters outside
    /// `[\w.\-]`.
    pub fn new(raw: &str) -> Result<Self, SerieError> {
        let upper = raw.trim().to_uppercase();
        if upper.is_empty() || !SYMBOL_PATTERN.is_match(&upper) {
            return Err(SerieError::InvalidArg(format!("invalid symbol '{raw}'")));
        }
        Ok(Self(upper))
    }

    /// Wrap a token that already matched the normalizer pattern.
    pub(crate) fn from_normalized(token: &str) -> Self {
        Self(token.to_string())
    }

    /// Borrow the symbol text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Append an exchange suffix such as `.MI`.
    ///
    /// # Errors
    /// Returns `InvalidArg` if the suffix introduces characters outside the symbol class.
    pub fn with_suffix(&self, suffix: &str) -> Result<Self, SerieError> {
        Self::new(&format!("{}{}", self.0, suffix))
    }

    /// True for strings shaped like an ISIN: two letters, nine alphanumerics, one digit.
    #[must_use]
    pub fn looks_like_isin(&self) -> bool {
        let b = self.0.as_bytes();
        b.len() == 12
            && b[..2].iter().all(u8::is_ascii_uppercase)
            && b[2..11].iter().all(u8::is_ascii_alphanumeric)
            && b[11].is_ascii_digit()
    }
}

impl core::fmt::Display for Symbol {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Serialize for Symbol {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// One dated price observation in the security's native currency.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PricePoint {
    /// Calendar date (no intraday component).
    pub date: NaiveDate,
    /// Non-negative price.
    pub price: f64,
}

impl PricePoint {
    /// Construct a price point.
    #[must_use]
    pub const fn new(date: NaiveDate, price: f64) -> Self {
        Self { date, price }
    }

    fn is_usable(&self) -> bool {
        self.price.is_finite() && self.price >= 0.0
    }
}

/// Which provider field a series was extracted from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceField {
    /// Dividend/split-adjusted close.
    AdjClose,
    /// Raw close.
    Close,
    /// Fund net asset value.
    Nav,
}

impl PriceField {
    /// Stable label for logs and tables.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AdjClose => "adj_close",
            Self::Close => "close",
            Self::Nav => "nav",
        }
    }
}

impl core::fmt::Display for PriceField {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered daily price history for one symbol from a single source.
///
/// Dates are strictly increasing; there are no duplicates.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct TimeSeries {
    points: Vec<PricePoint>,
}

impl TimeSeries {
    /// Normalize raw provider points: sort by date, drop non-finite or negative
    /// prices and keep the last observation for a repeated date.
    #[must_use]
    pub fn from_points(mut points: Vec<PricePoint>) -> Self {
        points.retain(PricePoint::is_usable);
        points.sort_by_key(|p| p.date);
        let mut out: Vec<PricePoint> = Vec::with_capacity(points.len());
        for p in points {
            match out.last_mut() {
                Some(last) if last.date == p.date => *last = p,
                _ => out.push(p),
            }
        }
        Self { points: out }
    }

    /// Build from points that must already satisfy the series invariants.
    ///
    /// # Errors
    /// Returns `Data` when dates are not strictly increasing or a price is
    /// negative or non-finite.
    pub fn try_new(points: Vec<PricePoint>) -> Result<Self, SerieError> {
        if let Some(bad) = points.iter().find(|p| !p.is_usable()) {
            return Err(SerieError::Data(format!(
                "unusable price {} on {}",
                bad.price, bad.date
            )));
        }
        if let Some(w) = points.windows(2).find(|w| w[0].date >= w[1].date) {
            return Err(SerieError::Data(format!(
                "dates not strictly increasing at {} -> {}",
                w[0].date, w[1].date
            )));
        }
        Ok(Self { points })
    }

    /// Number of observations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True when the series holds no observation.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Borrow the observations in date order.
    #[must_use]
    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    /// Iterate over the dates in order.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.points.iter().map(|p| p.date)
    }

    /// First observation, if any.
    #[must_use]
    pub fn first(&self) -> Option<&PricePoint> {
        self.points.first()
    }

    /// Last observation, if any.
    #[must_use]
    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    /// Price observed exactly on `date`.
    #[must_use]
    pub fn get(&self, date: NaiveDate) -> Option<f64> {
        self.points
            .binary_search_by_key(&date, |p| p.date)
            .ok()
            .map(|i| self.points[i].price)
    }
}

/// Daily history request shared by every connector.
///
/// Providers are always asked for daily data; coarser frequencies are derived later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HistoryRequest {
    start: NaiveDate,
    end: Option<NaiveDate>,
}

impl HistoryRequest {
    /// Build a request for `[start, end]`; an open end means "up to today".
    ///
    /// # Errors
    /// Returns `InvalidArg` if `end` precedes `start`.
    pub fn new(start: NaiveDate, end: Option<NaiveDate>) -> Result<Self, SerieError> {
        if let Some(e) = end
            && e < start
        {
            return Err(SerieError::InvalidArg(format!(
                "history end {e} precedes start {start}"
            )));
        }
        Ok(Self { start, end })
    }

    /// Request covering `horizon` years back from `today`.
    #[must_use]
    pub fn from_horizon(horizon: Horizon, today: NaiveDate) -> Self {
        Self {
            start: horizon.start_from(today),
            end: Some(today),
        }
    }

    /// First date requested.
    #[must_use]
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last date requested, if bounded.
    #[must_use]
    pub const fn end(&self) -> Option<NaiveDate> {
        self.end
    }
}

/// Raw history returned by a connector before normalization into a [`TimeSeries`].
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryResponse {
    /// Observations in any order; the router normalizes them.
    pub points: Vec<PricePoint>,
    /// Field the prices were read from.
    pub field: PriceField,
    /// Currency reported by the provider, when known. Never converted.
    pub currency: Option<String>,
}

/// A symbol that produced a usable series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resolution {
    /// Symbol as submitted by the user.
    pub requested: Symbol,
    /// Symbol that actually matched (differs from `requested` after a suffix guess).
    pub matched: Symbol,
    /// Connector that supplied the series.
    pub connector: &'static str,
    /// Provider field the prices came from.
    pub field: PriceField,
    /// Currency reported by the provider, if any.
    pub currency: Option<String>,
    /// Normalized series.
    pub series: TimeSeries,
}

/// A symbol no attempt could resolve; non-fatal to the batch.
#[derive(Debug, Clone, PartialEq)]
pub struct Unresolved {
    /// Symbol as submitted by the user.
    pub symbol: Symbol,
    /// Collapsed cause across all attempts.
    pub error: SerieError,
}

/// Outcome of a batch fetch: every requested symbol lands in exactly one list.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FetchReport {
    /// Successfully resolved symbols, in request order.
    pub resolved: Vec<Resolution>,
    /// Symbols that failed, in request order.
    pub unresolved: Vec<Unresolved>,
}

impl FetchReport {
    /// Series labelled by the requested symbol, ready for alignment.
    #[must_use]
    pub fn labeled_series(&self) -> Vec<(String, TimeSeries)> {
        self.resolved
            .iter()
            .map(|r| (r.requested.to_string(), r.series.clone()))
            .collect()
    }

    /// True when no symbol resolved.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.resolved.is_empty()
    }
}
