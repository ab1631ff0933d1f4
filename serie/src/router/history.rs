use std::sync::Arc;

use serie_core::{
    Capability, HistoryRequest, HistoryResponse, Resolution, SerieConnector, SerieError, Symbol,
    TimeSeries,
};

use crate::Serie;
use crate::router::util::{collapse_errors, with_request_deadline};

/// One step of the fallback plan: ask `connector` for `lookup`.
#[derive(Clone)]
pub(crate) struct Attempt {
    pub(crate) connector: Arc<dyn SerieConnector>,
    pub(crate) lookup: Symbol,
}

impl core::fmt::Debug for Attempt {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Attempt")
            .field("connector", &self.connector.name())
            .field("lookup", &self.lookup)
            .finish()
    }
}

/// Keep only the points inside the requested window and normalize them.
fn clip(resp: HistoryResponse, req: &HistoryRequest) -> TimeSeries {
    let start = req.start();
    let end = req.end();
    TimeSeries::from_points(
        resp.points
            .into_iter()
            .filter(|p| p.date >= start && end.is_none_or(|e| p.date <= e))
            .collect(),
    )
}

impl Serie {
    /// Ordered list of lookups tried for `symbol`.
    ///
    /// Every history-capable connector is asked for the symbol verbatim, in
    /// priority order. Then each configured suffix is appended and retried on the
    /// connectors that accept suffix guesses. A suffix the symbol already carries
    /// is skipped.
    pub(crate) fn attempt_plan(&self, symbol: &Symbol) -> Vec<Attempt> {
        let eligible: Vec<Arc<dyn SerieConnector>> = self
            .ordered(symbol)
            .into_iter()
            .filter(|c| c.as_history_provider().is_some())
            .collect();

        let mut plan: Vec<Attempt> = eligible
            .iter()
            .map(|c| Attempt {
                connector: c.clone(),
                lookup: symbol.clone(),
            })
            .collect();

        for suffix in &self.cfg.suffix_guesses {
            if symbol.as_str().ends_with(suffix.as_str()) {
                continue;
            }
            let Ok(guess) = symbol.with_suffix(suffix) else {
                continue;
            };
            plan.extend(
                eligible
                    .iter()
                    .filter(|c| c.accepts_suffix_guesses())
                    .map(|c| Attempt {
                        connector: c.clone(),
                        lookup: guess.clone(),
                    }),
            );
        }
        plan
    }

    /// Walk the fallback plan without the request deadline.
    pub(crate) async fn run_attempts(
        &self,
        symbol: &Symbol,
        req: &HistoryRequest,
    ) -> Result<Resolution, SerieError> {
        let capability = Capability::History.as_str();
        let mut attempted_any = false;
        let mut errors: Vec<SerieError> = Vec::new();

        for attempt in self.attempt_plan(symbol) {
            let connector = &attempt.connector;
            let Some(provider) = connector.as_history_provider() else {
                continue;
            };
            attempted_any = true;
            let fut = provider.history(&attempt.lookup, req);
            match Self::provider_call_with_timeout(
                connector.name(),
                capability,
                self.cfg.provider_timeout,
                fut,
            )
            .await
            {
                Ok(resp) => {
                    let field = resp.field;
                    let currency = resp.currency.clone();
                    let series = clip(resp, req);
                    if series.is_empty() {
                        // empty-but-OK keeps the plan going
                        errors.push(SerieError::not_found(format!(
                            "history for {} via {}",
                            attempt.lookup,
                            connector.name()
                        )));
                        continue;
                    }
                    #[cfg(feature = "tracing")]
                    if attempt.lookup != *symbol {
                        tracing::info!(
                            symbol = %symbol,
                            matched = %attempt.lookup,
                            connector = connector.name(),
                            "resolved through suffix guess"
                        );
                    }
                    return Ok(Resolution {
                        requested: symbol.clone(),
                        matched: attempt.lookup,
                        connector: connector.name(),
                        field,
                        currency,
                        series,
                    });
                }
                Err(e) => {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(
                        symbol = %symbol,
                        lookup = %attempt.lookup,
                        connector = connector.name(),
                        error = %e,
                        "history attempt failed; falling back"
                    );
                    match e {
                        e @ (SerieError::NotFound { .. } | SerieError::ProviderTimeout { .. }) => {
                            errors.push(e);
                        }
                        other => errors.push(crate::core::tag_err(connector.name(), other)),
                    }
                }
            }
        }

        Err(collapse_errors(
            Capability::History,
            attempted_any,
            errors,
            Some(format!("history for {symbol}")),
        ))
    }

    /// Fetch the daily history of one symbol, walking the fallback plan.
    ///
    /// Behavior:
    /// - Connectors are tried one at a time in priority order, each call bounded by
    ///   the provider timeout. There are no retries.
    /// - The first attempt yielding a non-empty series (after clipping to the
    ///   request window) wins; no data from other sources is merged in.
    /// - An empty-but-OK response counts as not found and the plan continues.
    /// - Suffix guesses run only after every verbatim attempt failed, and the
    ///   returned [`Resolution`] reports which symbol actually matched.
    ///
    /// # Errors
    /// `NotFound` when every attempt found nothing, `AllProvidersTimedOut` when
    /// every attempt timed out, `AllProvidersFailed` for mixed failures,
    /// `Unsupported` when no connector provides history and `RequestTimeout` when
    /// the overall deadline elapsed.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "serie::router::history",
            skip(self, req),
            fields(symbol = %symbol, start = %req.start()),
        )
    )]
    pub async fn history(
        &self,
        symbol: &Symbol,
        req: HistoryRequest,
    ) -> Result<Resolution, SerieError> {
        with_request_deadline(
            self.cfg.request_timeout,
            Capability::History,
            self.run_attempts(symbol, &req),
        )
        .await?
    }
}
