//! Fizz Balances is a web front end for browsing the balances recorded by
//! the Fizz REST backend.
//!
//! This library serves HTML pages that list balances one sortable page at a
//! time and display a single balance, fetching the data from the backend's
//! `/api/balances` endpoints.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod app_state;
mod balance;
mod endpoints;
mod html;
mod internal_server_error;
mod logging;
mod not_found;
mod pagination;
mod routing;

pub use app_state::AppState;
pub use balance::{Balance, BalanceClient, BalanceId, BalanceState, BalanceStore};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use pagination::PaginationConfig;
pub use routing::build_router;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl+C: {error}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                tracing::error!("failed to install SIGTERM handler: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur while setting up the application.
///
/// Failed requests to the REST backend are not errors in this sense: they
/// are recorded in the [BalanceState].
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The REST backend URL could not be used as a base URL.
    ///
    /// Callers should pass in the offending URL and the reason it was rejected.
    #[error("invalid API URL \"{0}\": {1}")]
    InvalidApiUrl(String, String),

    /// The HTTP client for the REST backend could not be created.
    #[error("could not create HTTP client: {0}")]
    HttpClient(String),
}

#[cfg(test)]
mod test_utils;
