//! Deterministic synthetic price paths.
//!
//! A price depends only on the symbol and the calendar date, so overlapping
//! windows always agree.

use chrono::{Datelike, Days, NaiveDate, Weekday};
use serie_core::PricePoint;

/// Which trading calendar a fixture follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Market {
    Us,
    Milan,
    Xetra,
    Fund,
}

impl Market {
    fn is_holiday(self, d: NaiveDate) -> bool {
        let (m, day) = (d.month(), d.day());
        match self {
            Self::Us => matches!((m, day), (1, 1) | (7, 4) | (12, 25)),
            Self::Milan => matches!((m, day), (1, 1) | (8, 15) | (12, 24..=26) | (12, 31)),
            Self::Xetra => matches!((m, day), (1, 1) | (5, 1) | (12, 24..=26)),
            Self::Fund => matches!((m, day), (1, 1) | (12, 25)),
        }
    }

    fn is_open(self, d: NaiveDate) -> bool {
        !matches!(d.weekday(), Weekday::Sat | Weekday::Sun) && !self.is_holiday(d)
    }
}

/// Shape of one synthetic instrument.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Fixture {
    pub market: Market,
    pub currency: &'static str,
    /// Price on the anchor date.
    base: f64,
    /// Annual log drift.
    drift: f64,
    /// Relative amplitude of the cyclical component.
    amplitude: f64,
    /// Cycle length in days.
    period: f64,
}

const fn fixture(
    market: Market,
    currency: &'static str,
    base: f64,
    drift: f64,
    amplitude: f64,
    period: f64,
) -> Fixture {
    Fixture {
        market,
        currency,
        base,
        drift,
        amplitude,
        period,
    }
}

/// Equity fixtures keyed by exchange ticker.
pub(crate) fn equity(symbol: &str) -> Option<Fixture> {
    Some(match symbol {
        "AAPL" => fixture(Market::Us, "USD", 150.0, 0.18, 0.08, 97.0),
        "MSFT" => fixture(Market::Us, "USD", 280.0, 0.16, 0.06, 131.0),
        "SPY" => fixture(Market::Us, "USD", 420.0, 0.09, 0.04, 173.0),
        "ENI.MI" => fixture(Market::Milan, "EUR", 14.0, 0.04, 0.07, 89.0),
        "SWDA.MI" => fixture(Market::Milan, "EUR", 80.0, 0.10, 0.05, 151.0),
        "SAP.DE" => fixture(Market::Xetra, "EUR", 160.0, 0.12, 0.09, 113.0),
        _ => return None,
    })
}

/// Fund fixtures keyed by ISIN.
pub(crate) fn fund(isin: &str) -> Option<Fixture> {
    Some(match isin {
        "LU1287022708" => fixture(Market::Fund, "EUR", 5.0, 0.02, 0.01, 211.0),
        "IE00B4L5Y983" => fixture(Market::Fund, "EUR", 80.0, 0.10, 0.05, 151.0),
        _ => return None,
    })
}

fn anchor() -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 1, 1).unwrap_or_default()
}

impl Fixture {
    /// Price on `date`, defined for every calendar date.
    pub(crate) fn price_on(&self, date: NaiveDate) -> f64 {
        let t = (date - anchor()).num_days() as f64;
        let trend = (self.drift * t / 365.25).exp();
        let cycle = 1.0 + self.amplitude * (t / self.period * std::f64::consts::TAU).sin();
        // two decimals, like a real close
        (self.base * trend * cycle * 100.0).round() / 100.0
    }

    /// One point per open trading day in `[start, end]`.
    pub(crate) fn points(&self, start: NaiveDate, end: NaiveDate) -> Vec<PricePoint> {
        let mut out = Vec::new();
        let mut d = start;
        while d <= end {
            if self.market.is_open(d) {
                out.push(PricePoint::new(d, self.price_on(d)));
            }
            match d.checked_add_days(Days::new(1)) {
                Some(next) => d = next,
                None => break,
            }
        }
        out
    }
}
