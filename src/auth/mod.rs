//! Session cookies and the middleware that protects pages from anonymous clients.

mod cookie;
mod identity;
mod middleware;
mod token;

pub use cookie::{DEFAULT_SESSION_DURATION, invalidate_session_cookie, set_session_cookie};
pub use identity::{AuthState, Identity};
pub use middleware::{LOG_IN_REQUIRED_MSG, auth_guard};

#[cfg(test)]
pub(crate) use cookie::COOKIE_TOKEN;
