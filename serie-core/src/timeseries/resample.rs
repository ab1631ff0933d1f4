use chrono::{Datelike, NaiveDate};

use crate::Frequency;
use crate::timeseries::table::AlignedTable;

/// Identity of the sampling period a date falls in.
fn period_of(date: NaiveDate, freq: Frequency) -> (i32, u32) {
    match freq {
        Frequency::Daily => (date.year(), date.ordinal()),
        Frequency::Weekly => {
            let w = date.iso_week();
            (w.year(), w.week())
        }
        Frequency::Monthly => (date.year(), date.month()),
        Frequency::Yearly => (date.year(), 0),
    }
}

/// Downsample an aligned table by keeping the last row of each period.
///
/// Weeks run Monday to Sunday, months and years are calendar periods. Each kept
/// row keeps its own date as the label. Periods without rows produce nothing, so
/// the output stays fully populated. Resampling must happen after alignment so
/// every column is cut on the same rows.
#[must_use]
pub fn resample(table: &AlignedTable, freq: Frequency) -> AlignedTable {
    if matches!(freq, Frequency::Daily) {
        return table.clone();
    }
    let index = table.index();
    let keep: Vec<usize> = (0..index.len())
        .filter(|&i| {
            index
                .get(i + 1)
                .is_none_or(|next| period_of(*next, freq) != period_of(index[i], freq))
        })
        .collect();
    table.select_rows(&keep)
}
