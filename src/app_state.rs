//! Implements a struct that holds the state of the web server.

use axum::extract::FromRef;

use crate::{
    Error,
    balance::BalanceClient,
    pagination::PaginationConfig,
};

/// The state of the web server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The client for the balances REST backend. Each request builds its own
    /// [BalanceStore](crate::BalanceStore) around a clone of it.
    pub balance_client: BalanceClient,

    /// The config that controls how to display pages of data.
    pub pagination_config: PaginationConfig,
}

impl AppState {
    /// Create a new [AppState] that fetches balances from the REST backend at
    /// `api_base_url`, e.g. "http://localhost:8080".
    ///
    /// # Errors
    /// Returns an error if `api_base_url` is not an absolute URL or the HTTP
    /// client cannot be created.
    pub fn new(api_base_url: &str, pagination_config: PaginationConfig) -> Result<Self, Error> {
        Ok(Self {
            balance_client: BalanceClient::new(api_base_url)?,
            pagination_config,
        })
    }
}

impl FromRef<AppState> for BalanceClient {
    fn from_ref(state: &AppState) -> Self {
        state.balance_client.clone()
    }
}
