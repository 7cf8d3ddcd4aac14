//! An in-process stand-in for the balances REST backend.

use std::{collections::VecDeque, net::SocketAddr, sync::Arc, time::Duration};

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{Request, Response},
    routing::any,
};
use tokio::{net::TcpListener, sync::Mutex};

use crate::balance::Balance;

/// A request received by [MockApi].
#[derive(Debug, Clone)]
pub(crate) struct CapturedRequest {
    pub method: String,
    pub path: String,
    pub query: Vec<(String, String)>,
}

impl CapturedRequest {
    /// The decoded value of the query parameter `name`.
    pub(crate) fn param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// A canned response for [MockApi].
#[derive(Debug, Clone)]
pub(crate) struct MockResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
    pub delay_ms: u64,
}

impl MockResponse {
    pub(crate) fn json(body: &str) -> Self {
        Self {
            status: 200,
            headers: vec![("content-type".to_owned(), "application/json".to_owned())],
            body: body.to_owned(),
            delay_ms: 0,
        }
    }

    /// A page of balances with the `x-total-count` header set to `total`.
    pub(crate) fn page(balances: &[Balance], total: u64) -> Self {
        let body = serde_json::to_string(balances).expect("Could not serialize balances");
        let mut response = Self::json(&body);
        response
            .headers
            .push(("x-total-count".to_owned(), total.to_string()));
        response
    }

    pub(crate) fn entity(balance: &Balance) -> Self {
        let body = serde_json::to_string(balance).expect("Could not serialize balance");
        Self::json(&body)
    }

    pub(crate) fn error(status: u16, message: &str) -> Self {
        Self {
            status,
            body: format!(r#"{{"error": "{message}"}}"#),
            ..Self::json("")
        }
    }

    pub(crate) fn with_delay(mut self, ms: u64) -> Self {
        self.delay_ms = ms;
        self
    }
}

#[derive(Clone, Default)]
struct MockState {
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
    responses: Arc<Mutex<VecDeque<MockResponse>>>,
}

/// Serves queued responses in the order they were enqueued and records
/// every request it receives.
pub(crate) struct MockApi {
    addr: SocketAddr,
    state: MockState,
    shutdown: tokio::sync::watch::Sender<bool>,
}

impl MockApi {
    pub(crate) async fn start() -> Self {
        let state = MockState::default();
        let (shutdown_tx, mut shutdown_rx) = tokio::sync::watch::channel(false);

        let app = Router::new()
            .route("/{*path}", any(handle_request))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Could not bind mock API");
        let addr = listener.local_addr().expect("Could not get mock API address");

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.changed().await;
                })
                .await
                .ok();
        });

        Self {
            addr,
            state,
            shutdown: shutdown_tx,
        }
    }

    pub(crate) fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub(crate) async fn enqueue(&self, response: MockResponse) {
        self.state.responses.lock().await.push_back(response);
    }

    pub(crate) async fn captured_requests(&self) -> Vec<CapturedRequest> {
        self.state.requests.lock().await.clone()
    }
}

impl Drop for MockApi {
    fn drop(&mut self) {
        let _ = self.shutdown.send(true);
    }
}

async fn handle_request(State(state): State<MockState>, request: Request<Body>) -> Response<Body> {
    let query = request
        .uri()
        .query()
        .map(|query| serde_urlencoded::from_str(query).unwrap_or_default())
        .unwrap_or_default();

    // A recorded request has always been assigned its response.
    let response = state
        .responses
        .lock()
        .await
        .pop_front()
        .unwrap_or_else(|| MockResponse::error(404, "no response queued"));

    state.requests.lock().await.push(CapturedRequest {
        method: request.method().to_string(),
        path: request.uri().path().to_owned(),
        query,
    });

    if response.delay_ms > 0 {
        tokio::time::sleep(Duration::from_millis(response.delay_ms)).await;
    }

    let mut builder = Response::builder().status(response.status);
    for (name, value) in &response.headers {
        builder = builder.header(name, value);
    }

    builder
        .body(Body::from(response.body))
        .expect("Could not build mock response")
}
