#![allow(missing_docs)]

pub(crate) mod html;
pub(crate) mod http;
pub(crate) mod mock_api;

pub(crate) use html::{assert_valid_html, link_targets, must_get_text, parse_html_document};
pub(crate) use http::assert_content_type;
pub(crate) use mock_api::{MockApi, MockResponse};
