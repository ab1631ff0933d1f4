use core::fmt;
use serde::{Deserialize, Serialize};

/// High-level capability labels used in errors and telemetry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Capability {
    /// Daily price history for a single symbol.
    History,
    /// Batch download of history across symbols.
    DownloadHistory,
    /// Fund identifier lookup ahead of a NAV request.
    FundLookup,
}

impl Capability {
    /// Stable, kebab-case identifier for logs/errors.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::History => "history",
            Self::DownloadHistory => "download:history",
            Self::FundLookup => "fund-lookup",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
