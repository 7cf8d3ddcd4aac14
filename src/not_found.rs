//! The page to display when no route matches the request path.
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::html::error_view;

pub async fn get_404_not_found() -> Response {
    let page = error_view(
        "Not Found",
        "404",
        "Something's missing.",
        "Sorry, we can't find that page. You'll find lots to explore on the balances page.",
    );

    (StatusCode::NOT_FOUND, Html(page.into_string())).into_response()
}
