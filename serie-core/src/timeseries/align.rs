use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::timeseries::table::{AlignedTable, Column};
use crate::TimeSeries;

/// Align independently dated series on the union of their dates.
///
/// Each column is forward-filled across the union index (never interpolated,
/// never back-filled). Rows that still miss a value afterwards, typically the
/// earliest ones before every symbol has data, are dropped. A label that repeats
/// keeps its first series.
#[must_use]
pub fn align(series: &[(String, TimeSeries)]) -> AlignedTable {
    let mut labelled: Vec<&(String, TimeSeries)> = Vec::with_capacity(series.len());
    for entry in series {
        if !labelled.iter().any(|(name, _)| *name == entry.0) {
            labelled.push(entry);
        }
    }

    let union: Vec<NaiveDate> = labelled
        .iter()
        .flat_map(|(_, s)| s.dates())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let filled: Vec<Vec<Option<f64>>> = labelled
        .iter()
        .map(|(_, s)| forward_fill(s, &union))
        .collect();

    let mut index: Vec<NaiveDate> = Vec::with_capacity(union.len());
    let mut values: Vec<Vec<f64>> = vec![Vec::with_capacity(union.len()); labelled.len()];
    for (row, date) in union.iter().enumerate() {
        let cells: Option<Vec<f64>> = filled.iter().map(|col| col[row]).collect();
        if let Some(cells) = cells {
            index.push(*date);
            for (col, v) in values.iter_mut().zip(cells) {
                col.push(v);
            }
        }
    }

    let columns = labelled
        .iter()
        .zip(values)
        .map(|((name, _), values)| Column {
            name: name.clone(),
            values,
        })
        .collect();
    AlignedTable::from_parts(index, columns)
}

/// Project a series onto `dates`, carrying the last known price forward.
fn forward_fill(series: &TimeSeries, dates: &[NaiveDate]) -> Vec<Option<f64>> {
    let points = series.points();
    let mut out = Vec::with_capacity(dates.len());
    let mut next = 0usize;
    let mut last: Option<f64> = None;
    for &d in dates {
        while next < points.len() && points[next].date <= d {
            last = Some(points[next].price);
            next += 1;
        }
        out.push(last);
    }
    out
}
