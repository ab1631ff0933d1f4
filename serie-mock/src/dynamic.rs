use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use serie_core::{
    HistoryProvider, HistoryRequest, HistoryResponse, SerieConnector, SerieError, Symbol,
};

/// Instruction for how a method should behave for a given input.
#[derive(Clone)]
pub enum MockBehavior<T> {
    /// Return the provided value immediately.
    Return(T),
    /// Fail immediately with the provided error.
    Fail(SerieError),
    /// Hang indefinitely (simulate a timeout).
    Hang,
}

#[derive(Default)]
struct InternalState {
    history_rules: HashMap<Symbol, MockBehavior<HistoryResponse>>,
    history_requests: Vec<(Symbol, HistoryRequest)>,
}

/// Controller handle used by tests to drive the dynamic mock from the outside.
pub struct DynamicMockController {
    state: Arc<Mutex<InternalState>>,
}

impl DynamicMockController {
    /// Set the behavior for `history` calls for a specific symbol.
    pub async fn set_history_behavior(
        &self,
        symbol: Symbol,
        behavior: MockBehavior<HistoryResponse>,
    ) {
        let mut guard = self.state.lock().await;
        guard.history_rules.insert(symbol, behavior);
    }

    /// Remove any scripted behavior for `symbol`; it falls back to `NotFound`.
    pub async fn clear_history_behavior(&self, symbol: &Symbol) {
        let mut guard = self.state.lock().await;
        guard.history_rules.remove(symbol);
    }

    /// Every `history` call received so far, in arrival order.
    pub async fn history_requests(&self) -> Vec<(Symbol, HistoryRequest)> {
        let guard = self.state.lock().await;
        guard.history_requests.clone()
    }
}

/// Connector whose answers are scripted at runtime through a [`DynamicMockController`].
pub struct DynamicMockConnector {
    name: &'static str,
    suffix_guesses: bool,
    state: Arc<Mutex<InternalState>>,
}

impl DynamicMockConnector {
    /// Create a connector named `name` plus the controller that drives it.
    #[must_use]
    pub fn new_with_controller(name: &'static str) -> (Arc<Self>, DynamicMockController) {
        Self::build(name, false)
    }

    /// Same as [`Self::new_with_controller`] but opting into suffix guesses.
    #[must_use]
    pub fn new_with_controller_accepting_suffixes(
        name: &'static str,
    ) -> (Arc<Self>, DynamicMockController) {
        Self::build(name, true)
    }

    fn build(name: &'static str, suffix_guesses: bool) -> (Arc<Self>, DynamicMockController) {
        let state = Arc::new(Mutex::new(InternalState::default()));
        let connector = Arc::new(Self {
            name,
            suffix_guesses,
            state: Arc::clone(&state),
        });
        (connector, DynamicMockController { state })
    }
}

impl SerieConnector for DynamicMockConnector {
    fn name(&self) -> &'static str {
        self.name
    }

    fn vendor(&self) -> &'static str {
        "Dynamic mock"
    }

    fn accepts_suffix_guesses(&self) -> bool {
        self.suffix_guesses
    }

    fn as_history_provider(&self) -> Option<&dyn HistoryProvider> {
        Some(self as &dyn HistoryProvider)
    }
}

#[async_trait]
impl HistoryProvider for DynamicMockConnector {
    async fn history(
        &self,
        symbol: &Symbol,
        req: &HistoryRequest,
    ) -> Result<HistoryResponse, SerieError> {
        let rule = {
            let mut guard = self.state.lock().await;
            guard.history_requests.push((symbol.clone(), *req));
            guard.history_rules.get(symbol).cloned()
        };
        match rule {
            Some(MockBehavior::Return(resp)) => Ok(resp),
            Some(MockBehavior::Fail(e)) => Err(e),
            Some(MockBehavior::Hang) => std::future::pending().await,
            None => Err(SerieError::not_found(format!("history for {symbol}"))),
        }
    }
}
