//! Resolves the session cookie of a request into the identity of the client.

use std::{
    convert::Infallible,
    sync::{Arc, Mutex},
};

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use rusqlite::Connection;
use time::OffsetDateTime;

use crate::{
    AppState, Error, User,
    auth::cookie::get_token_from_cookies,
    user::get_user_by_id,
};

/// Who is making a request.
#[derive(Debug, Clone, PartialEq)]
pub enum Identity {
    /// The client has not logged in, or their session is no longer valid.
    Anonymous,
    /// The client holds a valid session for a registered user.
    Authenticated(User),
}

/// The state needed to resolve the identity of a client.
#[derive(Debug, Clone)]
pub struct AuthState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The database connection used to look up the user in the session.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<AuthState> for Key {
    fn from_ref(state: &AuthState) -> Self {
        state.cookie_key.clone()
    }
}

/// Resolve the session cookie in `jar` to a user, treating `now` as the current time.
///
/// Resolution fails closed: a missing, unreadable or expired session, a
/// session for a user that no longer exists, and database errors all result
/// in [Identity::Anonymous].
pub fn resolve_identity(
    jar: &PrivateCookieJar,
    connection: &Connection,
    now: OffsetDateTime,
) -> Identity {
    let token = match get_token_from_cookies(jar) {
        Ok(token) => token,
        Err(Error::NotFound) => return Identity::Anonymous,
        Err(error) => {
            tracing::debug!("Ignoring unreadable session cookie: {error}");
            return Identity::Anonymous;
        }
    };

    if token.is_expired(now) {
        tracing::debug!("Session for user {} expired at {}", token.user_id, token.expires_at);
        return Identity::Anonymous;
    }

    match get_user_by_id(token.user_id, connection) {
        Ok(user) => Identity::Authenticated(user),
        Err(Error::NotFound) => {
            tracing::warn!("Session refers to user {} who does not exist", token.user_id);
            Identity::Anonymous
        }
        Err(error) => {
            tracing::error!("Could not look up user {}: {error}", token.user_id);
            Identity::Anonymous
        }
    }
}

impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
    AuthState: FromRef<S>,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AuthState::from_ref(state);
        let jar = PrivateCookieJar::from_request_parts(parts, &state)
            .await
            .unwrap_or_else(|never| match never {});

        let connection = match state.db_connection.lock() {
            Ok(connection) => connection,
            Err(error) => {
                tracing::error!("Could not acquire database lock: {error}");
                return Ok(Identity::Anonymous);
            }
        };

        Ok(resolve_identity(&jar, &connection, OffsetDateTime::now_utc()))
    }
}
