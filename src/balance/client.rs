//! The HTTP client for the balances REST API.

use std::fmt::Display;

use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;
use time::OffsetDateTime;

use crate::{
    Error,
    balance::core::{Balance, BalanceId},
    endpoints::{self, format_endpoint},
};

/// The response header carrying the number of balances across all pages.
pub const TOTAL_COUNT_HEADER: &str = "x-total-count";

/// The parameters for requesting one page of balances.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// The zero-based page index.
    pub page: u64,
    /// The maximum number of balances in the page.
    pub size: u64,
    /// The sort key as `field,order`, e.g. `name,desc`.
    ///
    /// When `None`, no pagination parameters are sent and the backend
    /// defaults apply.
    pub sort: Option<String>,
}

/// One page of balances and the total across all pages.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BalancePage {
    /// The balances in this page, in the order the backend returned them.
    pub balances: Vec<Balance>,
    /// The number of balances across all pages, from `x-total-count`.
    pub total_items: u64,
}

/// A failed request to the balances API.
///
/// Failures are not classified: transport errors, error statuses and
/// malformed responses all end up here with whatever the client could
/// observe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestFailure {
    /// The HTTP status, if a response was received.
    pub status: Option<u16>,
    /// The response body or transport error, for logging.
    pub message: String,
}

impl RequestFailure {
    fn new(status: Option<u16>, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl Display for RequestFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.status {
            Some(status) => write!(f, "request failed with status {status}: {}", self.message),
            None => write!(f, "request failed: {}", self.message),
        }
    }
}

impl From<reqwest::Error> for RequestFailure {
    fn from(error: reqwest::Error) -> Self {
        Self::new(error.status().map(|status| status.as_u16()), error.to_string())
    }
}

/// Fetches balances from the REST backend.
#[derive(Debug, Clone)]
pub struct BalanceClient {
    http: Client,
    /// The API base URL without a trailing slash.
    base_url: String,
}

impl BalanceClient {
    /// Create a client for the backend at `api_base_url`, e.g. `http://localhost:8080`.
    ///
    /// # Errors
    /// Returns [Error::InvalidApiUrl] if `api_base_url` is not an absolute
    /// URL, or [Error::HttpClient] if the HTTP client cannot be built.
    pub fn new(api_base_url: &str) -> Result<Self, Error> {
        let url = Url::parse(api_base_url)
            .map_err(|error| Error::InvalidApiUrl(api_base_url.to_owned(), error.to_string()))?;

        if url.cannot_be_a_base() {
            return Err(Error::InvalidApiUrl(
                api_base_url.to_owned(),
                "URL cannot be used as a base".to_owned(),
            ));
        }

        let http = Client::builder()
            .build()
            .map_err(|error| Error::HttpClient(error.to_string()))?;

        Ok(Self {
            http,
            base_url: url.as_str().trim_end_matches('/').to_owned(),
        })
    }

    /// The URL for a page of balances.
    ///
    /// `cache_buster` is appended so that intermediate caches never serve a
    /// stale page.
    pub fn page_url(&self, request: &PageRequest, cache_buster: i128) -> String {
        let collection_url = format!("{}{}", self.base_url, endpoints::BALANCES_API);

        match &request.sort {
            Some(sort) => format!(
                "{collection_url}?page={}&size={}&sort={sort}&cacheBuster={cache_buster}",
                request.page, request.size
            ),
            None => format!("{collection_url}?cacheBuster={cache_buster}"),
        }
    }

    /// The URL for a single balance.
    pub fn entity_url(&self, id: BalanceId) -> String {
        format!(
            "{}{}",
            self.base_url,
            format_endpoint(endpoints::BALANCE_API, id)
        )
    }

    /// Get a page of balances along with the total count from the
    /// `x-total-count` header.
    pub async fn get_page(&self, request: &PageRequest) -> Result<BalancePage, RequestFailure> {
        let url = self.page_url(request, cache_buster());
        tracing::debug!("GET {url}");

        let response = ok_response(self.http.get(&url).send().await?).await?;
        let total_items = parse_total_count(&response)?;
        let balances: Vec<Balance> = decode_json(response).await?;

        Ok(BalancePage {
            balances,
            total_items,
        })
    }

    /// Get the balance with `id`.
    ///
    /// The id in the response body is taken as is, even if it differs from
    /// `id`.
    pub async fn get(&self, id: BalanceId) -> Result<Balance, RequestFailure> {
        let url = self.entity_url(id);
        tracing::debug!("GET {url}");

        let response = ok_response(self.http.get(&url).send().await?).await?;

        decode_json(response).await
    }
}

/// Milliseconds since the Unix epoch.
fn cache_buster() -> i128 {
    OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000
}

async fn ok_response(response: Response) -> Result<Response, RequestFailure> {
    let status = response.status();

    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();

    Err(RequestFailure::new(Some(status.as_u16()), body))
}

fn parse_total_count(response: &Response) -> Result<u64, RequestFailure> {
    let status = Some(response.status().as_u16());
    let header = response
        .headers()
        .get(TOTAL_COUNT_HEADER)
        .ok_or_else(|| RequestFailure::new(status, format!("missing {TOTAL_COUNT_HEADER} header")))?;

    header
        .to_str()
        .ok()
        .and_then(|text| text.trim().parse::<u64>().ok())
        .ok_or_else(|| {
            RequestFailure::new(
                status,
                format!("invalid {TOTAL_COUNT_HEADER} header {header:?}"),
            )
        })
}

async fn decode_json<T: DeserializeOwned>(response: Response) -> Result<T, RequestFailure> {
    let status = Some(response.status().as_u16());

    response
        .json::<T>()
        .await
        .map_err(|error| RequestFailure::new(status, format!("invalid response body: {error}")))
}


#[cfg(test)]
mod get_page_tests {
    use time::macros::date;

    use crate::{
        balance::core::Balance,
        test_utils::{MockApi, MockResponse},
    };

    use super::{BalanceClient, BalancePage, PageRequest};

    fn balance(id: i64) -> Balance {
        Balance {
            id: Some(id),
            name: Some(format!("Company {id}")),
            final_accounting_date: Some(date!(2020 - 12 - 31)),
            value: Some(id as f64 * 10.5),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn returns_body_and_total_count() {
        let mock = MockApi::start().await;
        let balances = vec![balance(1), balance(2)];
        mock.enqueue(MockResponse::page(&balances, 45)).await;
        let client = BalanceClient::new(&mock.base_url()).unwrap();

        let got = client
            .get_page(&PageRequest {
                page: 2,
                size: 2,
                sort: Some("value,desc".to_owned()),
            })
            .await;

        assert_eq!(
            got,
            Ok(BalancePage {
                balances,
                total_items: 45
            })
        );
        let requests = mock.captured_requests().await;
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, "GET");
        assert_eq!(requests[0].path, "/api/balances");
        assert_eq!(requests[0].param("page"), Some("2"));
        assert_eq!(requests[0].param("size"), Some("2"));
        assert_eq!(requests[0].param("sort"), Some("value,desc"));
        assert!(
            requests[0].param("cacheBuster").is_some(),
            "want cacheBuster query parameter"
        );
    }

    #[tokio::test]
    async fn error_status_is_failure() {
        let mock = MockApi::start().await;
        mock.enqueue(MockResponse::error(500, "boom")).await;
        let client = BalanceClient::new(&mock.base_url()).unwrap();

        let got = client
            .get_page(&PageRequest {
                page: 0,
                size: 20,
                sort: None,
            })
            .await
            .expect_err("want request failure");

        assert_eq!(got.status, Some(500));
        assert!(got.message.contains("boom"), "got message {:?}", got.message);
    }

    #[tokio::test]
    async fn missing_total_count_is_failure() {
        let mock = MockApi::start().await;
        mock.enqueue(MockResponse::json("[]")).await;
        let client = BalanceClient::new(&mock.base_url()).unwrap();

        let got = client
            .get_page(&PageRequest {
                page: 0,
                size: 20,
                sort: None,
            })
            .await
            .expect_err("want request failure");

        assert!(
            got.message.contains("x-total-count"),
            "got message {:?}",
            got.message
        );
    }

    #[tokio::test]
    async fn unreachable_backend_is_failure() {
        // Port 9 (discard) is not expected to accept HTTP connections.
        let client = BalanceClient::new("http://127.0.0.1:9").unwrap();

        let got = client.get(1).await.expect_err("want request failure");

        assert_eq!(got.status, None);
    }

    #[tokio::test]
    async fn get_does_not_check_returned_id() {
        let mock = MockApi::start().await;
        mock.enqueue(MockResponse::entity(&balance(7))).await;
        let client = BalanceClient::new(&mock.base_url()).unwrap();

        let got = client.get(42).await;

        assert_eq!(got, Ok(balance(7)));
        assert_eq!(mock.captured_requests().await[0].path, "/api/balances/42");
    }
}
