//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/delete_transaction/{transaction_id}', use [format_endpoint].

/// The landing page, which redirects logged in users to the dashboard.
pub const ROOT: &str = "/";
/// The page showing a user's totals and transactions.
pub const DASHBOARD_VIEW: &str = "/dashboard";
/// The route for getting the registration page and registering a new user.
pub const REGISTER_VIEW: &str = "/register";
/// The route for getting the log in page and logging in.
pub const LOG_IN_VIEW: &str = "/login";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";

/// The route for the client to log out the current user.
pub const LOG_OUT: &str = "/logout";
/// The route that receives the form for adding a transaction.
pub const ADD_TRANSACTION: &str = "/add_transaction";
/// The route for deleting one of the user's transactions.
pub const DELETE_TRANSACTION: &str = "/delete_transaction/{transaction_id}";

/// The route that lists the database tables (diagnostics only).
pub const TEST_DB: &str = "/test-db";
/// The route that summarises the registered users (diagnostics only).
pub const CHECK_DB: &str = "/check-db";

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
