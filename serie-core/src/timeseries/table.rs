use chrono::NaiveDate;
use serde::Serialize;

use crate::SerieError;

/// One named price column of an [`AlignedTable`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    /// Column label (the requested symbol).
    pub name: String,
    /// One value per index row.
    pub values: Vec<f64>,
}

/// Date-indexed table with one fully populated column per resolved symbol.
///
/// Invariants: the index is strictly increasing, every column has exactly one
/// finite value per index row, and column names are unique.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct AlignedTable {
    index: Vec<NaiveDate>,
    columns: Vec<Column>,
}

impl AlignedTable {
    /// Build a table, checking every invariant.
    ///
    /// # Errors
    /// Returns `Data` when the index is not strictly increasing, a column length
    /// differs from the index length, a value is not finite, or names repeat.
    pub fn try_new(index: Vec<NaiveDate>, columns: Vec<Column>) -> Result<Self, SerieError> {
        if let Some(w) = index.windows(2).find(|w| w[0] >= w[1]) {
            return Err(SerieError::Data(format!(
                "index not strictly increasing at {} -> {}",
                w[0], w[1]
            )));
        }
        for (i, c) in columns.iter().enumerate() {
            if c.values.len() != index.len() {
                return Err(SerieError::Data(format!(
                    "column '{}' has {} values for {} rows",
                    c.name,
                    c.values.len(),
                    index.len()
                )));
            }
            if c.values.iter().any(|v| !v.is_finite()) {
                return Err(SerieError::Data(format!(
                    "column '{}' contains a missing or non-finite value",
                    c.name
                )));
            }
            if columns[..i].iter().any(|o| o.name == c.name) {
                return Err(SerieError::Data(format!("duplicate column '{}'", c.name)));
            }
        }
        Ok(Self { index, columns })
    }

    pub(crate) const fn from_parts(index: Vec<NaiveDate>, columns: Vec<Column>) -> Self {
        Self { index, columns }
    }

    /// Row dates.
    #[must_use]
    pub fn index(&self) -> &[NaiveDate] {
        &self.index
    }

    /// Columns in insertion order.
    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Look up a column by name.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Column names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// True when the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Number of columns.
    #[must_use]
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Values of row `i` across all columns, in column order.
    #[must_use]
    pub fn row(&self, i: usize) -> Option<Vec<f64>> {
        if i >= self.index.len() {
            return None;
        }
        Some(self.columns.iter().map(|c| c.values[i]).collect())
    }

    /// Keep only the rows at `rows` (ascending positions).
    pub(crate) fn select_rows(&self, rows: &[usize]) -> Self {
        let index = rows.iter().map(|&r| self.index[r]).collect();
        let columns = self
            .columns
            .iter()
            .map(|c| Column {
                name: c.name.clone(),
                values: rows.iter().map(|&r| c.values[r]).collect(),
            })
            .collect();
        Self { index, columns }
    }
}
