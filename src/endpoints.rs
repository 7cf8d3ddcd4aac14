//! The page and API endpoint URIs.
//!
//! For endpoints that take a parameter, e.g., '/balance/{balance_id}', use [format_endpoint].

/// The root route which redirects to the balances page.
pub const ROOT: &str = "/";
/// The page listing balances one page at a time.
pub const BALANCES_VIEW: &str = "/balance";
/// The page displaying a single balance.
pub const BALANCE_VIEW: &str = "/balance/{balance_id}";
/// The page for editing a balance. Only linked to, not served.
pub const EDIT_BALANCE_VIEW: &str = "/balance/{balance_id}/edit";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The backend route listing balances, relative to the API base URL.
pub const BALANCES_API: &str = "/api/balances";
/// The backend route for a single balance, relative to the API base URL.
pub const BALANCE_API: &str = "/api/balances/{balance_id}";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/users/{user_id}', '{user_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let mut param_start = None;
    let mut param_end = None;

    for (i, c) in endpoint_path.chars().enumerate() {
        if c == '{' {
            param_start = Some(i);
        } else if param_start.is_some() && c == '}' {
            param_end = Some(i + 1);
            break;
        }
    }

    let param_start = match param_start {
        Some(start) => start,
        None => return endpoint_path.to_string(),
    };

    let param_end = param_end.unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
