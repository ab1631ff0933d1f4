use std::str::FromStr;

use chrono::NaiveDate;

use crate::timeseries::table::{AlignedTable, Column};
use crate::SerieError;

const BOM: char = '\u{feff}';

/// Field separator of the delimited output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Delimiter {
    /// `;`
    #[default]
    Semicolon,
    /// `|`
    Pipe,
    /// `,`
    Comma,
    /// Horizontal tab.
    Tab,
}

impl Delimiter {
    /// The separator byte.
    #[must_use]
    pub const fn as_byte(self) -> u8 {
        match self {
            Self::Semicolon => b';',
            Self::Pipe => b'|',
            Self::Comma => b',',
            Self::Tab => b'\t',
        }
    }
}

impl FromStr for Delimiter {
    type Err = SerieError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "semicolon" | ";" => Ok(Self::Semicolon),
            "pipe" | "|" => Ok(Self::Pipe),
            "comma" | "," => Ok(Self::Comma),
            "tab" | "\t" | "\\t" => Ok(Self::Tab),
            other => Err(SerieError::InvalidArg(format!("unknown delimiter '{other}'"))),
        }
    }
}

/// Decimal separator used when writing numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecimalMark {
    /// `1234,56`
    #[default]
    Comma,
    /// `1234.56`
    Period,
}

impl DecimalMark {
    const fn as_byte(self) -> u8 {
        match self {
            Self::Comma => b',',
            Self::Period => b'.',
        }
    }
}

impl FromStr for DecimalMark {
    type Err = SerieError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "comma" | "," => Ok(Self::Comma),
            "period" | "point" | "dot" | "." => Ok(Self::Period),
            other => Err(SerieError::InvalidArg(format!("unknown decimal mark '{other}'"))),
        }
    }
}

/// Date rendering of the first column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateFormat {
    /// `YYYY-MM-DD`
    #[default]
    Iso,
    /// `DD/MM/YYYY`
    Regional,
}

impl DateFormat {
    /// `chrono` format string for this layout.
    #[must_use]
    pub const fn pattern(self) -> &'static str {
        match self {
            Self::Iso => "%Y-%m-%d",
            Self::Regional => "%d/%m/%Y",
        }
    }
}

impl FromStr for DateFormat {
    type Err = SerieError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "iso" | "ymd" => Ok(Self::Iso),
            "regional" | "dmy" => Ok(Self::Regional),
            other => Err(SerieError::InvalidArg(format!("unknown date format '{other}'"))),
        }
    }
}

/// Formatting conventions for [`to_delimited`] and [`from_delimited`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    /// Field separator.
    pub delimiter: Delimiter,
    /// Decimal separator for prices.
    pub decimal: DecimalMark,
    /// Date rendering.
    pub date_format: DateFormat,
    /// Header of the date column.
    pub date_header: String,
    /// Fixed number of decimals; shortest exact rendering when `None`.
    pub precision: Option<usize>,
    /// Prefix the output with a UTF-8 byte order mark.
    pub bom: bool,
}

impl ExportOptions {
    /// Semicolon separated, comma decimals, `DD/MM/YYYY` dates and a BOM, the
    /// layout spreadsheet applications expect under comma-decimal locales.
    #[must_use]
    pub fn regional() -> Self {
        Self {
            delimiter: Delimiter::Semicolon,
            decimal: DecimalMark::Comma,
            date_format: DateFormat::Regional,
            date_header: "Data".to_string(),
            precision: None,
            bom: true,
        }
    }

    /// Plain comma separated values with period decimals and ISO dates.
    #[must_use]
    pub fn plain() -> Self {
        Self {
            delimiter: Delimiter::Comma,
            decimal: DecimalMark::Period,
            date_format: DateFormat::Iso,
            date_header: "Date".to_string(),
            precision: None,
            bom: false,
        }
    }

    /// Builder-style setter for the delimiter.
    #[must_use]
    pub const fn delimiter(mut self, delimiter: Delimiter) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Builder-style setter for the decimal mark.
    #[must_use]
    pub const fn decimal(mut self, decimal: DecimalMark) -> Self {
        self.decimal = decimal;
        self
    }

    /// Builder-style setter for the date format.
    #[must_use]
    pub const fn date_format(mut self, date_format: DateFormat) -> Self {
        self.date_format = date_format;
        self
    }

    /// Builder-style setter for the number of decimals.
    #[must_use]
    pub const fn precision(mut self, precision: Option<usize>) -> Self {
        self.precision = precision;
        self
    }

    fn validate(&self) -> Result<(), SerieError> {
        if self.delimiter.as_byte() == self.decimal.as_byte() {
            return Err(SerieError::InvalidArg(
                "delimiter and decimal mark must differ".into(),
            ));
        }
        Ok(())
    }

    fn format_value(&self, v: f64) -> String {
        let s = match self.precision {
            Some(p) => format!("{v:.p$}"),
            None => format!("{v}"),
        };
        match self.decimal {
            DecimalMark::Period => s,
            DecimalMark::Comma => s.replace('.', ","),
        }
    }

    fn parse_value(&self, raw: &str) -> Result<f64, SerieError> {
        let raw = raw.trim();
        let normalized = match self.decimal {
            DecimalMark::Period => raw.to_string(),
            DecimalMark::Comma => raw.replace(',', "."),
        };
        normalized
            .parse::<f64>()
            .map_err(|e| SerieError::Data(format!("invalid number '{raw}': {e}")))
    }
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self::regional()
    }
}

fn csv_err(e: impl std::fmt::Display) -> SerieError {
    SerieError::Data(format!("csv: {e}"))
}

/// Render a table as delimited text: a header row (date header, then column
/// names) followed by one row per date in ascending order.
///
/// # Errors
/// Returns `InvalidArg` when the delimiter equals the decimal mark, or `Data`
/// if the writer fails.
pub fn to_delimited(table: &AlignedTable, opts: &ExportOptions) -> Result<String, SerieError> {
    opts.validate()?;
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(opts.delimiter.as_byte())
        .from_writer(Vec::new());

    let mut header = Vec::with_capacity(table.width() + 1);
    header.push(opts.date_header.clone());
    header.extend(table.names().map(str::to_string));
    wtr.write_record(&header).map_err(csv_err)?;

    let pattern = opts.date_format.pattern();
    for (i, date) in table.index().iter().enumerate() {
        let mut record = Vec::with_capacity(table.width() + 1);
        record.push(date.format(pattern).to_string());
        record.extend(table.columns().iter().map(|c| opts.format_value(c.values[i])));
        wtr.write_record(&record).map_err(csv_err)?;
    }

    let bytes = wtr.into_inner().map_err(csv_err)?;
    let body = String::from_utf8(bytes).map_err(csv_err)?;
    Ok(if opts.bom {
        format!("{BOM}{body}")
    } else {
        body
    })
}

/// Parse text produced by [`to_delimited`] back into a table.
///
/// A leading byte order mark is accepted regardless of `opts.bom`.
///
/// # Errors
/// Returns `InvalidArg` for conflicting options and `Data` for malformed input.
pub fn from_delimited(text: &str, opts: &ExportOptions) -> Result<AlignedTable, SerieError> {
    opts.validate()?;
    let text = text.strip_prefix(BOM).unwrap_or(text);
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(opts.delimiter.as_byte())
        .has_headers(true)
        .from_reader(text.as_bytes());

    let names: Vec<String> = rdr
        .headers()
        .map_err(csv_err)?
        .iter()
        .skip(1)
        .map(str::to_string)
        .collect();

    let pattern = opts.date_format.pattern();
    let mut index = Vec::new();
    let mut values: Vec<Vec<f64>> = vec![Vec::new(); names.len()];
    for record in rdr.records() {
        let record = record.map_err(csv_err)?;
        let raw_date = record
            .get(0)
            .ok_or_else(|| SerieError::Data("empty record".into()))?;
        let date = NaiveDate::parse_from_str(raw_date.trim(), pattern)
            .map_err(|e| SerieError::Data(format!("invalid date '{raw_date}': {e}")))?;
        index.push(date);
        for (col, slot) in values.iter_mut().enumerate() {
            let raw = record
                .get(col + 1)
                .ok_or_else(|| SerieError::Data(format!("missing value on {raw_date}")))?;
            slot.push(opts.parse_value(raw)?);
        }
    }

    let columns = names
        .into_iter()
        .zip(values)
        .map(|(name, values)| Column { name, values })
        .collect();
    AlignedTable::try_new(index, columns)
}
