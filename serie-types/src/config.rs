//! Configuration types shared across the orchestrator and the presentation layer.

use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{ConnectorKey, SerieError};

/// Sampling frequency of the aligned table handed to the metrics stage.
///
/// Providers are always queried at daily granularity; coarser frequencies are
/// produced by resampling after alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    /// One row per trading day.
    #[default]
    Daily,
    /// Last observation of each Monday–Sunday week.
    Weekly,
    /// Last observation of each calendar month.
    Monthly,
    /// Last observation of each calendar year.
    Yearly,
}

impl Frequency {
    /// Number of periods per year used to annualize volatility.
    #[must_use]
    pub const fn periods_per_year(self) -> u32 {
        match self {
            Self::Daily => 252,
            Self::Weekly => 52,
            Self::Monthly => 12,
            Self::Yearly => 1,
        }
    }

    /// Stable lowercase label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }
}

impl core::fmt::Display for Frequency {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = SerieError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "d" | "daily" => Ok(Self::Daily),
            "w" | "weekly" => Ok(Self::Weekly),
            "m" | "me" | "monthly" => Ok(Self::Monthly),
            "y" | "yearly" => Ok(Self::Yearly),
            other => Err(SerieError::InvalidArg(format!("unknown frequency '{other}'"))),
        }
    }
}

/// Lookback horizon drawn from the fixed set offered to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Horizon {
    /// One year.
    Y1,
    /// Three years.
    #[default]
    Y3,
    /// Five years.
    Y5,
    /// Ten years.
    Y10,
}

impl Horizon {
    /// All selectable horizons, shortest first.
    pub const ALL: [Self; 4] = [Self::Y1, Self::Y3, Self::Y5, Self::Y10];

    /// Number of years covered.
    #[must_use]
    pub const fn years(self) -> u32 {
        match self {
            Self::Y1 => 1,
            Self::Y3 => 3,
            Self::Y5 => 5,
            Self::Y10 => 10,
        }
    }

    /// Build a horizon from a year count.
    ///
    /// # Errors
    /// Returns `InvalidArg` when `years` is not one of 1, 3, 5 or 10.
    pub fn from_years(years: u32) -> Result<Self, SerieError> {
        Self::ALL
            .into_iter()
            .find(|h| h.years() == years)
            .ok_or_else(|| {
                SerieError::InvalidArg(format!(
                    "unsupported horizon of {years} years (expected 1, 3, 5 or 10)"
                ))
            })
    }

    /// Start date of the window ending at `today` (365 days per year, no leap correction).
    #[must_use]
    pub fn start_from(self, today: NaiveDate) -> NaiveDate {
        today - chrono::Duration::days(i64::from(self.years()) * 365)
    }
}

/// Global configuration for the `Serie` orchestrator.
///
/// Missing fields take their [`Default`] values when deserialized.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SerieConfig {
    /// Per-symbol connector ordering overrides; unlisted connectors keep registration order after the listed ones.
    pub per_symbol_priority: HashMap<String, Vec<ConnectorKey>>,
    /// Suffixes appended to a symbol and retried on suffix-capable connectors once every verbatim attempt failed.
    pub suffix_guesses: Vec<String>,
    /// Timeout for individual provider requests.
    pub provider_timeout: Duration,
    /// Optional overall deadline for one `history` call or one whole batch download.
    pub request_timeout: Option<Duration>,
    /// Maximum number of symbols fetched concurrently in a batch (1 = strictly sequential).
    pub concurrency: usize,
}

impl Default for SerieConfig {
    fn default() -> Self {
        Self {
            per_symbol_priority: HashMap::new(),
            suffix_guesses: Vec::new(),
            provider_timeout: Duration::from_secs(10),
            request_timeout: None,
            concurrency: 4,
        }
    }
}
