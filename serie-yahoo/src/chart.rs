//! Decoding of the v8 chart payload into a daily close series.

use chrono::{DateTime, NaiveDate};
use chrono_tz::Tz;
use serde::Deserialize;
use serie_core::{HistoryResponse, PriceField, PricePoint, SerieError};

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    meta: Option<ChartMeta>,
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartMeta {
    currency: Option<String>,
    exchange_timezone_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<QuoteData>,
    adjclose: Option<Vec<AdjCloseData>>,
}

#[derive(Debug, Deserialize)]
struct QuoteData {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct AdjCloseData {
    #[serde(default)]
    adjclose: Vec<Option<f64>>,
}

fn not_found(symbol: &str) -> SerieError {
    SerieError::not_found(format!("history for {symbol}"))
}

/// Calendar date of `ts` on the exchange's wall clock.
fn exchange_date(ts: i64, tz: Tz) -> Option<NaiveDate> {
    DateTime::from_timestamp(ts, 0).map(|dt| dt.with_timezone(&tz).date_naive())
}

/// Decode a chart body for `symbol`.
///
/// Adjusted close is used when the payload carries a non-empty adjusted column,
/// plain close otherwise. Null prices are forward-filled from the previous row;
/// leading nulls are dropped.
pub(crate) fn parse_chart(symbol: &str, body: &str) -> Result<HistoryResponse, SerieError> {
    let env: ChartEnvelope = serde_json::from_str(body)
        .map_err(|e| SerieError::Data(format!("chart payload for {symbol}: {e}")))?;

    let data = match env.chart.result.and_then(|r| r.into_iter().next()) {
        Some(d) => d,
        None => {
            return Err(match env.chart.error {
                Some(err) if err.code.eq_ignore_ascii_case("Not Found") => not_found(symbol),
                Some(err) => SerieError::connector(
                    crate::NAME,
                    format!(
                        "{}: {}",
                        err.code,
                        err.description.unwrap_or_default()
                    ),
                ),
                None => not_found(symbol),
            });
        }
    };

    let timestamps = data.timestamp.unwrap_or_default();
    if timestamps.is_empty() {
        return Err(not_found(symbol));
    }

    let adjusted = data
        .indicators
        .adjclose
        .and_then(|v| v.into_iter().next())
        .map(|a| a.adjclose)
        .filter(|col| col.iter().any(Option::is_some));
    let (field, column) = match adjusted {
        Some(col) => (PriceField::AdjClose, col),
        None => (
            PriceField::Close,
            data.indicators
                .quote
                .into_iter()
                .next()
                .map(|q| q.close)
                .unwrap_or_default(),
        ),
    };

    let meta = data.meta;
    let tz: Tz = meta
        .as_ref()
        .and_then(|m| m.exchange_timezone_name.as_deref())
        .and_then(|name| name.parse().ok())
        .unwrap_or(Tz::UTC);
    let currency = meta.and_then(|m| m.currency);

    let mut points = Vec::with_capacity(timestamps.len());
    let mut last: Option<f64> = None;
    for (i, &ts) in timestamps.iter().enumerate() {
        if let Some(v) = column.get(i).copied().flatten().filter(|v| v.is_finite()) {
            last = Some(v);
        }
        let Some(price) = last else { continue };
        let date = exchange_date(ts, tz)
            .ok_or_else(|| SerieError::Data(format!("invalid timestamp {ts} for {symbol}")))?;
        points.push(PricePoint::new(date, price));
    }

    if points.is_empty() {
        return Err(not_found(symbol));
    }
    Ok(HistoryResponse {
        points,
        field,
        currency,
    })
}
