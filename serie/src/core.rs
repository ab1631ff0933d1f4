use std::collections::{HashMap, HashSet};
#[cfg(feature = "tracing")]
use std::convert::TryFrom;
use std::sync::Arc;
use std::time::Duration;

use serie_core::{ConnectorKey, SerieConfig, SerieConnector, SerieError, Symbol};

/// Orchestrator that routes history requests across registered providers.
pub struct Serie {
    pub(crate) connectors: Vec<Arc<dyn SerieConnector>>,
    pub(crate) cfg: SerieConfig,
}

/// Builder for constructing a `Serie` orchestrator with custom configuration.
pub struct SerieBuilder {
    connectors: Vec<Arc<dyn SerieConnector>>,
    cfg: SerieConfig,
}

impl Default for SerieBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SerieBuilder {
    /// Create a new builder with default configuration.
    ///
    /// Starts with no connectors, no suffix guesses, a 10s provider timeout,
    /// no overall deadline and a batch concurrency of 4.
    #[must_use]
    pub fn new() -> Self {
        Self {
            connectors: vec![],
            cfg: SerieConfig::default(),
        }
    }

    /// Register a provider connector.
    ///
    /// Registration order is the fallback order: the first connector is the
    /// primary source, later ones are tried only when earlier ones fail.
    #[must_use]
    pub fn with_connector(mut self, c: Arc<dyn SerieConnector>) -> Self {
        self.connectors.push(c);
        self
    }

    /// Set preferred providers for one symbol.
    ///
    /// The list is an ordering hint; unlisted connectors are still tried after
    /// the listed ones.
    #[must_use]
    pub fn prefer_symbol(mut self, symbol: &str, connectors_desc: &[Arc<dyn SerieConnector>]) -> Self {
        let keys: Vec<ConnectorKey> = connectors_desc.iter().map(|c| c.key()).collect();
        self.cfg
            .per_symbol_priority
            .insert(symbol.trim().to_uppercase(), keys);
        self
    }

    /// Exchange suffixes retried on suffix-capable connectors after every
    /// verbatim attempt failed, in order (e.g. `[".MI", ".PA", ".DE"]`).
    #[must_use]
    pub fn suffix_guesses<S: AsRef<str>>(mut self, suffixes: &[S]) -> Self {
        self.cfg.suffix_guesses = suffixes
            .iter()
            .map(|s| s.as_ref().trim().to_uppercase())
            .filter(|s| !s.is_empty())
            .collect();
        self
    }

    /// Set the per-provider request timeout.
    #[must_use]
    pub const fn provider_timeout(mut self, timeout: Duration) -> Self {
        self.cfg.provider_timeout = timeout;
        self
    }

    /// Set an overall deadline for a history lookup or a batch download.
    ///
    /// When exceeded, returns a `RequestTimeout` error for the capability.
    #[must_use]
    pub const fn request_timeout(mut self, timeout: Duration) -> Self {
        self.cfg.request_timeout = Some(timeout);
        self
    }

    /// Maximum number of symbols fetched at once in a batch; `1` is strictly sequential.
    #[must_use]
    pub const fn concurrency(mut self, n: usize) -> Self {
        self.cfg.concurrency = n;
        self
    }

    /// Replace the whole configuration.
    #[must_use]
    pub fn config(mut self, cfg: SerieConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Build the `Serie` orchestrator.
    ///
    /// # Errors
    /// Returns `InvalidArg` if no connectors have been registered via [`with_connector`]
    /// or the batch concurrency is zero.
    ///
    /// [`with_connector`]: SerieBuilder::with_connector
    pub fn build(mut self) -> Result<Serie, SerieError> {
        // Validate connector keys against registered connectors; drop unknowns and dedup.
        let known: HashSet<&'static str> = self.connectors.iter().map(|c| c.name()).collect();
        for v in self.cfg.per_symbol_priority.values_mut() {
            let mut seen: HashSet<&'static str> = HashSet::new();
            v.retain(|k| known.contains(k.as_str()) && seen.insert(k.as_str()));
        }

        if self.connectors.is_empty() {
            return Err(SerieError::InvalidArg(
                "no connectors registered; add at least one via with_connector(...)".to_string(),
            ));
        }
        if self.cfg.concurrency == 0 {
            return Err(SerieError::InvalidArg(
                "concurrency must be at least 1".to_string(),
            ));
        }

        Ok(Serie {
            connectors: self.connectors,
            cfg: self.cfg,
        })
    }
}

/// Attribute an untyped provider error to the connector that raised it.
///
/// Malformed payloads stay `Data` with the connector name prefixed.
pub(crate) fn tag_err(connector: &str, e: SerieError) -> SerieError {
    match e {
        e @ (SerieError::NotFound { .. }
        | SerieError::ProviderTimeout { .. }
        | SerieError::Connector { .. }
        | SerieError::RequestTimeout { .. }
        | SerieError::AllProvidersTimedOut { .. }
        | SerieError::AllProvidersFailed(_)) => e,
        SerieError::Data(msg) => SerieError::Data(format!("{connector}: {msg}")),
        other => SerieError::Connector {
            connector: connector.to_string(),
            msg: other.to_string(),
        },
    }
}

impl Serie {
    /// Wrap a provider future with a timeout and standardized timeout error mapping.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "serie::core::provider_call_with_timeout",
            skip(fut),
            fields(
                connector = connector_name,
                capability = capability,
                timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            ),
        )
    )]
    pub(crate) async fn provider_call_with_timeout<T, Fut>(
        connector_name: &'static str,
        capability: &'static str,
        timeout: Duration,
        fut: Fut,
    ) -> Result<T, SerieError>
    where
        Fut: core::future::Future<Output = Result<T, SerieError>>,
    {
        (tokio::time::timeout(timeout, fut).await)
            .unwrap_or_else(|_| Err(SerieError::provider_timeout(connector_name, capability)))
    }

    /// Start building a new `Serie` instance.
    ///
    /// ```rust,ignore
    /// let serie = serie::Serie::builder()
    ///     .with_connector(yahoo.clone())
    ///     .with_connector(morningstar.clone())
    ///     .suffix_guesses(&[".MI", ".PA", ".DE"])
    ///     .build()?;
    /// ```
    #[must_use]
    pub fn builder() -> SerieBuilder {
        SerieBuilder::new()
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &SerieConfig {
        &self.cfg
    }

    /// Names of the registered connectors in registration order.
    pub fn connector_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.connectors.iter().map(|c| c.name())
    }

    pub(crate) fn ordered(&self, symbol: &Symbol) -> Vec<Arc<dyn SerieConnector>> {
        let mut out: Vec<(usize, Arc<dyn SerieConnector>)> =
            self.connectors.iter().cloned().enumerate().collect();
        if let Some(pref) = self.cfg.per_symbol_priority.get(symbol.as_str()) {
            let pos: HashMap<_, _> = pref
                .iter()
                .enumerate()
                .map(|(i, n)| (n.as_str(), i))
                .collect();
            out.sort_by_key(|(orig_i, c)| {
                (pos.get(c.name()).copied().unwrap_or(usize::MAX), *orig_i)
            });
        }
        out.into_iter().map(|(_, c)| c).collect()
    }
}
