//! `serie` command line: fetch, align and compare daily price histories.
//!
//! Commands:
//! - `analyze`: resolve tickers/ISINs (Yahoo first, Morningstar as fallback),
//!   align and resample them, then print prices, metrics, base-100 performance
//!   and the correlation of returns. Optionally export the price table.
//!
//! Exit codes: `0` on success, `1` when nothing resolved or on any other
//! failure, `2` when no symbols were given.

mod cli;
mod render;

use std::io::Read;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use serie::{AnalysisRequest, ExportOptions, Horizon, Serie, SerieError, to_delimited};
use serie_mock::{MockConnector, MockFundConnector};
use serie_morningstar::{MorningstarConfig, MorningstarConnector};
use serie_yahoo::YahooConnector;
use tracing_subscriber::EnvFilter;

use cli::{AnalyzeArgs, Cli, Commands, GUESSED_SUFFIXES};

const EXIT_NO_DATA: u8 = 1;
const EXIT_EMPTY_BATCH: u8 = 2;

fn init_tracing() {
    // RUST_LOG=serie=debug shows the fallback chain per symbol
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("reading symbols from stdin")?;
        return Ok(buf);
    }
    std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

fn collect_symbols(args: &AnalyzeArgs) -> Result<String> {
    let mut text = args.symbols.join(" ");
    if let Some(path) = &args.input {
        text.push('\n');
        text.push_str(&read_input(path)?);
    }
    Ok(text)
}

fn build_serie(args: &AnalyzeArgs) -> Result<Serie> {
    let mut builder = Serie::builder().concurrency(args.concurrency);
    if args.mock {
        builder = builder.with_connector(Arc::new(MockConnector::new()));
        if !args.no_fallback {
            builder = builder.with_connector(Arc::new(MockFundConnector::new()));
        }
    } else {
        builder = builder.with_connector(Arc::new(YahooConnector::try_new_default()?));
        if !args.no_fallback {
            builder = builder.with_connector(Arc::new(MorningstarConnector::with_config(
                MorningstarConfig::default(),
            )?));
        }
    }
    if args.guess_suffixes {
        builder = builder.suffix_guesses(&GUESSED_SUFFIXES);
    }
    Ok(builder.build()?)
}

fn export(args: &AnalyzeArgs, report: &serie::AnalysisReport, path: &Path) -> Result<()> {
    let out = &args.output;
    let opts = ExportOptions::regional()
        .delimiter(out.delimiter.into())
        .decimal(out.decimal.into())
        .date_format(out.date_format.into())
        .precision(out.precision);
    let text = to_delimited(&report.table, &opts)?;
    std::fs::write(path, text).with_context(|| format!("writing {}", path.display()))?;
    eprintln!("exported {} rows to {}", report.table.len(), path.display());
    Ok(())
}

async fn run_analyze(args: AnalyzeArgs) -> Result<ExitCode> {
    let text = collect_symbols(&args)?;
    let horizon = Horizon::from_years(args.years)?;
    let req = AnalysisRequest::from_text(&text, horizon, args.frequency.into())
        .risk_free_pct(args.risk_free);
    let serie = build_serie(&args)?;
    let today = args
        .as_of
        .unwrap_or_else(|| chrono::Utc::now().date_naive());

    let report = match serie.analyze_as_of(&req, today).await {
        Ok(r) => r,
        Err(SerieError::EmptyBatch) => {
            eprintln!("error: no symbols given; pass tickers or ISINs, or --input FILE");
            return Ok(ExitCode::from(EXIT_EMPTY_BATCH));
        }
        Err(e) => return Err(e.into()),
    };

    for u in &report.unresolved {
        tracing::debug!(symbol = %u.symbol, error = ?u.error, "unresolved");
        eprintln!("warning: {}: {}", u.symbol, u.error);
    }
    if !report.has_data() {
        eprintln!("error: no data found for the requested symbols");
        return Ok(ExitCode::from(EXIT_NO_DATA));
    }

    print!(
        "{}",
        render::report(&report, args.output.date_format, args.rows)
    );
    if let Some(path) = &args.output.export {
        export(&args, &report, path)?;
    }
    Ok(ExitCode::SUCCESS)
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();
    let outcome = match cli.command {
        Commands::Analyze(args) => run_analyze(args).await,
    };
    match outcome {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
