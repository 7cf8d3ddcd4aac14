//! The state container for balances: what the views render from, and the
//! actions that fetch balances and reduce the outcome into that state.

use std::sync::{Arc, Mutex, PoisonError};

use crate::balance::{
    client::{BalanceClient, BalancePage, PageRequest, RequestFailure},
    core::{Balance, BalanceId},
};

/// Everything the balance views need to render.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BalanceState {
    /// Whether a fetch has been issued and not yet resolved.
    pub loading: bool,
    /// Whether a save is in flight. Balances are read-only here, so this is
    /// only ever cleared.
    pub updating: bool,
    /// Whether the last save succeeded. Cleared by every new request.
    pub update_success: bool,
    /// The most recent request failure, cleared when a new request starts.
    pub error_message: Option<RequestFailure>,
    /// The current page of balances.
    pub entities: Vec<Balance>,
    /// The balance shown by the detail view.
    pub entity: Balance,
    /// The number of balances across all pages.
    pub total_items: u64,
}

/// The lifecycle of one request.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestPhase<T> {
    /// The request has been sent.
    Requested,
    /// The response arrived and decoded.
    Succeeded(T),
    Failed(RequestFailure),
}

/// The transitions of [BalanceState].
#[derive(Debug, Clone, PartialEq)]
pub enum BalanceAction {
    /// A page of balances for the list view.
    FetchBalanceList(RequestPhase<BalancePage>),
    /// A single balance for the detail view.
    FetchBalance(RequestPhase<Balance>),
    /// Restore the initial state.
    Reset,
}

impl BalanceState {
    /// Apply `action`, producing the next state.
    pub fn reduce(self, action: BalanceAction) -> Self {
        match action {
            BalanceAction::FetchBalanceList(RequestPhase::Requested)
            | BalanceAction::FetchBalance(RequestPhase::Requested) => Self {
                error_message: None,
                update_success: false,
                loading: true,
                ..self
            },
            BalanceAction::FetchBalanceList(RequestPhase::Failed(failure))
            | BalanceAction::FetchBalance(RequestPhase::Failed(failure)) => Self {
                loading: false,
                updating: false,
                update_success: false,
                error_message: Some(failure),
                ..self
            },
            BalanceAction::FetchBalanceList(RequestPhase::Succeeded(page)) => Self {
                loading: false,
                entities: page.balances,
                total_items: page.total_items,
                ..self
            },
            BalanceAction::FetchBalance(RequestPhase::Succeeded(balance)) => Self {
                loading: false,
                entity: balance,
                ..self
            },
            BalanceAction::Reset => Self::default(),
        }
    }
}

/// A handle to the balance state and the client that feeds it.
///
/// Clones share the same state. The page handlers build one store per
/// request so that no request renders another's data.
///
/// Responses are applied in the order they resolve, not the order they were
/// requested, and nothing is cancelled: a response that resolves after a
/// newer request or after [BalanceStore::reset] still overwrites the state.
#[derive(Debug, Clone)]
pub struct BalanceStore {
    state: Arc<Mutex<BalanceState>>,
    client: BalanceClient,
}

impl BalanceStore {
    /// Create a store in the initial state that fetches through `client`.
    pub fn new(client: BalanceClient) -> Self {
        Self {
            state: Arc::new(Mutex::new(BalanceState::default())),
            client,
        }
    }

    /// A snapshot of the current state.
    pub fn state(&self) -> BalanceState {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replace the state with the result of reducing `action` into it.
    pub fn dispatch(&self, action: BalanceAction) {
        // Transitions replace the state whole, so a poisoned lock never
        // holds a partial one.
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let current = std::mem::take(&mut *state);
        *state = current.reduce(action);
    }

    /// Fetch a page of balances.
    ///
    /// `page` is zero-based and `sort` has the form `field,order`.
    pub async fn get_entities(&self, page: u64, size: u64, sort: Option<String>) {
        self.dispatch(BalanceAction::FetchBalanceList(RequestPhase::Requested));

        let request = PageRequest { page, size, sort };
        let phase = match self.client.get_page(&request).await {
            Ok(page) => RequestPhase::Succeeded(page),
            Err(failure) => {
                tracing::error!("could not get balances for {request:?}: {failure}");
                RequestPhase::Failed(failure)
            }
        };

        self.dispatch(BalanceAction::FetchBalanceList(phase));
    }

    /// Fetch the balance with `id` into [BalanceState::entity].
    pub async fn get_entity(&self, id: BalanceId) {
        self.dispatch(BalanceAction::FetchBalance(RequestPhase::Requested));

        let phase = match self.client.get(id).await {
            Ok(balance) => RequestPhase::Succeeded(balance),
            Err(failure) => {
                tracing::error!("could not get balance {id}: {failure}");
                RequestPhase::Failed(failure)
            }
        };

        self.dispatch(BalanceAction::FetchBalance(phase));
    }

    /// Restore the initial state.
    pub fn reset(&self) {
        self.dispatch(BalanceAction::Reset);
    }
}


#[cfg(test)]
mod balance_store_tests {
    use crate::{
        balance::{Balance, BalanceClient},
        test_utils::{MockApi, MockResponse},
    };

    use super::{BalanceState, BalanceStore};

    fn balance(id: i64, name: &str) -> Balance {
        Balance {
            id: Some(id),
            name: Some(name.to_owned()),
            ..Default::default()
        }
    }

    fn store_for(mock: &MockApi) -> BalanceStore {
        BalanceStore::new(BalanceClient::new(&mock.base_url()).expect("Could not create client"))
    }

    #[tokio::test]
    async fn get_entities_loads_page() {
        let mock = MockApi::start().await;
        let balances = vec![balance(1, "foo"), balance(2, "bar")];
        mock.enqueue(MockResponse::page(&balances, 2)).await;
        let store = store_for(&mock);

        store.get_entities(0, 20, Some("id,asc".to_owned())).await;

        let state = store.state();
        assert!(!state.loading);
        assert_eq!(state.entities, balances);
        assert_eq!(state.total_items, 2);
        assert_eq!(state.error_message, None);
        let requests = mock.captured_requests().await;
        assert_eq!(requests[0].method, "GET");
        assert_eq!(requests[0].param("sort"), Some("id,asc"));
    }

    #[tokio::test]
    async fn failed_list_keeps_previous_entities() {
        let mock = MockApi::start().await;
        let balances = vec![balance(1, "foo")];
        mock.enqueue(MockResponse::page(&balances, 1)).await;
        mock.enqueue(MockResponse::error(500, "boom")).await;
        let store = store_for(&mock);

        store.get_entities(0, 20, Some("id,asc".to_owned())).await;
        store.get_entities(1, 20, Some("id,asc".to_owned())).await;

        let state = store.state();
        assert!(!state.loading);
        assert_eq!(state.entities, balances);
        assert_eq!(state.total_items, 1);
        let failure = state.error_message.expect("want stored failure");
        assert_eq!(failure.status, Some(500));
    }

    #[tokio::test]
    async fn get_entity_accepts_mismatched_id() {
        let mock = MockApi::start().await;
        mock.enqueue(MockResponse::entity(&balance(7, "seven"))).await;
        let store = store_for(&mock);

        store.get_entity(42).await;

        assert_eq!(store.state().entity, balance(7, "seven"));
    }

    #[tokio::test]
    async fn entity_failure_does_not_touch_list() {
        let mock = MockApi::start().await;
        let balances = vec![balance(1, "foo")];
        mock.enqueue(MockResponse::page(&balances, 1)).await;
        mock.enqueue(MockResponse::error(404, "not found")).await;
        let store = store_for(&mock);

        store.get_entities(0, 20, Some("id,asc".to_owned())).await;
        store.get_entity(99).await;

        let state = store.state();
        assert_eq!(state.entities, balances);
        assert_eq!(state.entity, Balance::default());
        assert_eq!(state.error_message.map(|failure| failure.status), Some(Some(404)));
    }

    #[tokio::test]
    async fn reset_discards_loaded_state() {
        let mock = MockApi::start().await;
        mock.enqueue(MockResponse::page(&[balance(1, "foo")], 1)).await;
        mock.enqueue(MockResponse::entity(&balance(1, "foo"))).await;
        let store = store_for(&mock);
        store.get_entities(0, 20, Some("id,asc".to_owned())).await;
        store.get_entity(1).await;

        store.reset();

        assert_eq!(store.state(), BalanceState::default());
    }

    #[tokio::test]
    async fn last_resolved_response_wins() {
        let mock = MockApi::start().await;
        let slow_page = vec![balance(1, "slow")];
        let fast_page = vec![balance(2, "fast")];
        mock.enqueue(MockResponse::page(&slow_page, 40).with_delay(300))
            .await;
        mock.enqueue(MockResponse::page(&fast_page, 41)).await;
        let store = store_for(&mock);

        let slow = {
            let store = store.clone();
            tokio::spawn(async move { store.get_entities(0, 20, Some("id,asc".to_owned())).await })
        };
        // Let the slow request reach the mock first so it takes the delayed response.
        while mock.captured_requests().await.is_empty() {
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        }
        store.get_entities(1, 20, Some("id,asc".to_owned())).await;
        assert_eq!(store.state().entities, fast_page);

        slow.await.expect("slow request panicked");

        let state = store.state();
        assert_eq!(state.entities, slow_page);
        assert_eq!(state.total_items, 40);
    }
}
