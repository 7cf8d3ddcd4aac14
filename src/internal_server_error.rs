//! Defines the templates and route handlers for the page to display for an internal server error.
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::html::error_view;

/// The generic 500 page served at `/error`.
pub async fn get_internal_server_error_page() -> Response {
    let page = error_view(
        "Internal Server Error",
        "500",
        "Sorry, something went wrong.",
        "Try again later or check the server logs",
    );

    (StatusCode::INTERNAL_SERVER_ERROR, Html(page.into_string())).into_response()
}
