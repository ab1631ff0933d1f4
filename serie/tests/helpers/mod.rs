// Re-export helpers so tests can `use helpers::*;`
pub mod mock_connector;

pub use mock_connector::MockConnector;

use chrono::NaiveDate;
use serie_core::{HistoryRequest, HistoryResponse, PriceField, PricePoint, Symbol};

// ---------- Lightweight fixtures and helpers for tests ----------

/// Common symbol constants used across tests.
pub const AAPL: &str = "AAPL";
pub const MSFT: &str = "MSFT";
pub const ENI: &str = "ENI";
pub const FUND_ISIN: &str = "LU1287022708";

/// Construct a `NaiveDate` from components for readability in tests.
pub fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).expect("invalid date")
}

/// Construct a `Symbol` with infallible expectations.
pub fn sym(s: &str) -> Symbol {
    Symbol::new(s).expect("valid static test symbol")
}

/// Window covering all of January 2024.
pub fn jan_2024() -> HistoryRequest {
    HistoryRequest::new(d(2024, 1, 1), Some(d(2024, 1, 31))).expect("valid window")
}

/// Build a close-price response from `(day of January 2024, price)` pairs.
pub fn jan_hist(rows: &[(u32, f64)]) -> HistoryResponse {
    hist(rows, PriceField::AdjClose)
}

pub fn hist(rows: &[(u32, f64)], field: PriceField) -> HistoryResponse {
    HistoryResponse {
        points: rows
            .iter()
            .map(|&(day, price)| PricePoint::new(d(2024, 1, day), price))
            .collect(),
        field,
        currency: Some("USD".into()),
    }
}
