#![allow(dead_code)]
#![allow(clippy::type_complexity)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::cast_possible_truncation)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serie_core::{
    HistoryProvider, HistoryRequest, HistoryResponse, SerieConnector, SerieError, Symbol,
};
use tokio::time::{Duration, sleep};

type HistoryFn =
    Arc<dyn Fn(&Symbol, &HistoryRequest) -> Result<HistoryResponse, SerieError> + Send + Sync>;

/// Simple in-memory connector used by integration tests.
pub struct MockConnector {
    pub name: &'static str,
    pub delay_ms: u64,
    pub suffix_guesses: bool,
    pub advertises_history: bool,
    pub history_fn: Option<HistoryFn>,
    /// Every symbol this connector was asked for, in call order.
    pub calls: Arc<Mutex<Vec<String>>>,
}

impl MockConnector {
    #[allow(dead_code)]
    pub fn builder() -> MockConnectorBuilder {
        MockConnectorBuilder::new()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl HistoryProvider for MockConnector {
    async fn history(
        &self,
        symbol: &Symbol,
        req: &HistoryRequest,
    ) -> Result<HistoryResponse, SerieError> {
        self.calls.lock().unwrap().push(symbol.to_string());
        if self.delay_ms > 0 {
            sleep(Duration::from_millis(self.delay_ms)).await;
        }
        if let Some(f) = &self.history_fn {
            return (f)(symbol, req);
        }
        Err(SerieError::connector(self.name, "no history fixture"))
    }
}

impl SerieConnector for MockConnector {
    fn name(&self) -> &'static str {
        self.name
    }

    fn accepts_suffix_guesses(&self) -> bool {
        self.suffix_guesses
    }

    fn as_history_provider(&self) -> Option<&dyn HistoryProvider> {
        if self.advertises_history {
            Some(self as &dyn HistoryProvider)
        } else {
            None
        }
    }
}

/* ---------- Tiny builder helpers used by tests ---------- */

pub struct MockConnectorBuilder {
    name: &'static str,
    delay_ms: u64,
    suffix_guesses: bool,
    advertises_history: bool,
    history_fn: Option<HistoryFn>,
}

impl Default for MockConnectorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl MockConnectorBuilder {
    pub fn new() -> Self {
        Self {
            name: "default_mock",
            delay_ms: 0,
            suffix_guesses: false,
            advertises_history: true,
            history_fn: None,
        }
    }

    pub fn name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    pub fn delay(mut self, d: Duration) -> Self {
        self.delay_ms = d.as_millis() as u64;
        self
    }

    pub fn accepts_suffix_guesses(mut self) -> Self {
        self.suffix_guesses = true;
        self
    }

    pub fn without_history(mut self) -> Self {
        self.advertises_history = false;
        self
    }

    pub fn with_history_fn<F>(mut self, f: F) -> Self
    where
        F: Fn(&Symbol, &HistoryRequest) -> Result<HistoryResponse, SerieError>
            + Send
            + Sync
            + 'static,
    {
        self.history_fn = Some(Arc::new(f));
        self
    }

    pub fn returns_history_ok(mut self, resp: HistoryResponse) -> Self {
        self.history_fn = Some(Arc::new(move |_s, _r| Ok(resp.clone())));
        self
    }

    /// Answer only for the listed symbols; everything else is `NotFound`.
    pub fn returns_history_for(mut self, fixtures: Vec<(&'static str, HistoryResponse)>) -> Self {
        let name = self.name;
        self.history_fn = Some(Arc::new(move |s, _r| {
            fixtures
                .iter()
                .find(|(sym, _)| *sym == s.as_str())
                .map(|(_, resp)| resp.clone())
                .ok_or_else(|| SerieError::not_found(format!("history for {s} via {name}")))
        }));
        self
    }

    pub fn fails_with(mut self, err: SerieError) -> Self {
        self.history_fn = Some(Arc::new(move |_s, _r| Err(err.clone())));
        self
    }

    pub fn build(self) -> Arc<MockConnector> {
        Arc::new(MockConnector {
            name: self.name,
            delay_ms: self.delay_ms,
            suffix_guesses: self.suffix_guesses,
            advertises_history: self.advertises_history,
            history_fn: self.history_fn,
            calls: Arc::new(Mutex::new(Vec::new())),
        })
    }
}
