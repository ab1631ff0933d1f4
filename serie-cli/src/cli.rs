use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use serie::{DateFormat, DecimalMark, Delimiter, Frequency, Horizon};

/// Suffixes tried by `--guess-suffixes`: Milan, Paris, Xetra.
pub const GUESSED_SUFFIXES: [&str; 3] = [".MI", ".PA", ".DE"];

#[derive(Parser)]
#[command(
    name = "serie",
    version,
    about = "Multi-source price history: fetch, align, resample and compare"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch daily histories, align them and print prices, metrics and correlation.
    Analyze(AnalyzeArgs),
}

#[derive(Args)]
pub struct AnalyzeArgs {
    /// Tickers or ISINs, in any mix of separators (e.g. "AAPL, ENI.MI LU1287022708").
    pub symbols: Vec<String>,

    /// Read more identifiers from a file, or from stdin with `-`.
    #[arg(long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Lookback in years.
    #[arg(long, default_value_t = 3, value_parser = parse_years)]
    pub years: u32,

    /// Output sampling frequency.
    #[arg(long, value_enum, default_value_t = FrequencyArg::Daily)]
    pub frequency: FrequencyArg,

    /// Retry unresolved tickers with exchange suffixes (.MI, .PA, .DE).
    #[arg(long, default_value_t = false)]
    pub guess_suffixes: bool,

    /// Query the primary source only.
    #[arg(long, default_value_t = false)]
    pub no_fallback: bool,

    /// Yearly risk-free rate in percent for the Sharpe ratio.
    #[arg(long, default_value_t = serie::DEFAULT_RISK_FREE_PCT)]
    pub risk_free: f64,

    /// Symbols fetched at once.
    #[arg(long, default_value_t = 4)]
    pub concurrency: usize,

    /// Reference date for the lookback (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_name = "DATE")]
    pub as_of: Option<NaiveDate>,

    /// Print only the newest N price rows.
    #[arg(long, value_name = "N")]
    pub rows: Option<usize>,

    /// Use built-in offline fixtures instead of the network.
    #[arg(long, default_value_t = false)]
    pub mock: bool,

    #[command(flatten)]
    pub output: ExportArgs,
}

#[derive(Args)]
pub struct ExportArgs {
    /// Write the aligned price table to FILE.
    #[arg(long, value_name = "FILE")]
    pub export: Option<PathBuf>,

    /// Field separator of the exported file.
    #[arg(long, value_enum, default_value_t = DelimiterArg::Semicolon)]
    pub delimiter: DelimiterArg,

    /// Decimal mark of the exported file.
    #[arg(long, value_enum, default_value_t = DecimalArg::Comma)]
    pub decimal: DecimalArg,

    /// Date format used in tables and the exported file.
    #[arg(long, value_enum, default_value_t = DateFormatArg::Regional)]
    pub date_format: DateFormatArg,

    /// Decimal places in the exported file (full precision when omitted).
    #[arg(long, value_name = "N")]
    pub precision: Option<usize>,
}

fn parse_years(raw: &str) -> Result<u32, String> {
    let years: u32 = raw.parse().map_err(|_| format!("'{raw}' is not a number"))?;
    Horizon::from_years(years)
        .map(Horizon::years)
        .map_err(|e| e.to_string())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum FrequencyArg {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl From<FrequencyArg> for Frequency {
    fn from(f: FrequencyArg) -> Self {
        match f {
            FrequencyArg::Daily => Self::Daily,
            FrequencyArg::Weekly => Self::Weekly,
            FrequencyArg::Monthly => Self::Monthly,
            FrequencyArg::Yearly => Self::Yearly,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum DelimiterArg {
    Semicolon,
    Pipe,
    Comma,
    Tab,
}

impl From<DelimiterArg> for Delimiter {
    fn from(d: DelimiterArg) -> Self {
        match d {
            DelimiterArg::Semicolon => Self::Semicolon,
            DelimiterArg::Pipe => Self::Pipe,
            DelimiterArg::Comma => Self::Comma,
            DelimiterArg::Tab => Self::Tab,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum DecimalArg {
    Comma,
    Period,
}

impl From<DecimalArg> for DecimalMark {
    fn from(d: DecimalArg) -> Self {
        match d {
            DecimalArg::Comma => Self::Comma,
            DecimalArg::Period => Self::Period,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum DateFormatArg {
    /// YYYY-MM-DD
    Iso,
    /// DD/MM/YYYY
    Regional,
}

impl From<DateFormatArg> for DateFormat {
    fn from(d: DateFormatArg) -> Self {
        match d {
            DateFormatArg::Iso => Self::Iso,
            DateFormatArg::Regional => Self::Regional,
        }
    }
}

impl DateFormatArg {
    pub fn render(self, date: NaiveDate) -> String {
        date.format(DateFormat::from(self).pattern()).to_string()
    }
}
