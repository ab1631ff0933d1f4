//! Decoding of screener and NAV payloads.

use chrono::DateTime;
use serde::Deserialize;
use serie_core::{Capability, PricePoint, SerieError, Symbol};

#[derive(Debug, Deserialize)]
struct ScreenerPage {
    #[serde(default)]
    rows: Vec<ScreenerRow>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ScreenerRow {
    sec_id: Option<String>,
    name: Option<String>,
    price_currency: Option<String>,
    #[serde(rename = "isin")]
    isin: Option<String>,
}

/// First security the screener matched for a term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FundMatch {
    pub sec_id: String,
    pub name: Option<String>,
    pub currency: Option<String>,
}

/// Label used for lookups that found no fund.
pub(crate) fn lookup_label(term: &Symbol) -> String {
    format!("{} {term}", Capability::FundLookup)
}

/// Pick the screener row to resolve `term` with.
///
/// When `term` is shaped like an ISIN, a row carrying that exact ISIN wins over
/// earlier rows. Otherwise the first row with a security id is used.
pub(crate) fn parse_screener(term: &Symbol, body: &str) -> Result<FundMatch, SerieError> {
    let page: ScreenerPage = serde_json::from_str(body)
        .map_err(|e| SerieError::Data(format!("screener payload for {term}: {e}")))?;
    let mut rows: Vec<(String, ScreenerRow)> = page
        .rows
        .into_iter()
        .filter_map(|mut row| {
            let sec_id = row.sec_id.take().filter(|s| !s.trim().is_empty())?;
            Some((sec_id, row))
        })
        .collect();
    let exact = term
        .looks_like_isin()
        .then(|| {
            rows.iter().position(|(_, row)| {
                row.isin
                    .as_deref()
                    .is_some_and(|i| i.eq_ignore_ascii_case(term.as_str()))
            })
        })
        .flatten();
    if rows.is_empty() {
        return Err(SerieError::not_found(lookup_label(term)));
    }
    let (sec_id, row) = rows.swap_remove(exact.unwrap_or(0));
    Ok(FundMatch {
        sec_id,
        name: row.name,
        currency: row.price_currency.filter(|c| !c.is_empty()),
    })
}

/// Decode `[[epoch_ms, nav], ...]` rows into UTC calendar dates.
///
/// Rows with a null or non-finite NAV are skipped.
pub(crate) fn parse_nav(sec_id: &str, body: &str) -> Result<Vec<PricePoint>, SerieError> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }
    let rows: Vec<(i64, Option<f64>)> = serde_json::from_str(trimmed)
        .map_err(|e| SerieError::Data(format!("nav payload for {sec_id}: {e}")))?;
    rows.into_iter()
        .filter_map(|(ms, nav)| nav.filter(|v| v.is_finite()).map(|v| (ms, v)))
        .map(|(ms, nav)| {
            DateTime::from_timestamp_millis(ms)
                .map(|dt| PricePoint::new(dt.date_naive(), nav))
                .ok_or_else(|| SerieError::Data(format!("invalid epoch {ms} for {sec_id}")))
        })
        .collect()
}
