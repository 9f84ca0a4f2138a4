//! This file defines the routes for displaying the log-in page and handling log-in requests.
//! The auth module handles the lower level session cookie logic.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{Form, PrivateCookieJar, cookie::Key};
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;
use time::Duration;

use crate::{
    AppState, Error,
    alert::alert_view,
    auth::set_session_cookie,
    endpoints,
    flash::take_flash,
    html::{BUTTON_PRIMARY_STYLE, base, link, log_in_register, password_input, text_input},
    user::{User, get_user_by_email},
};

fn log_in_form(email: &str, error_message: Option<&str>) -> Markup {
    html! {
        form
            method="post"
            action=(endpoints::LOG_IN_VIEW)
            class="space-y-4 md:space-y-6"
        {
            (text_input("email", "Email", "email", email))

            (password_input(error_message))

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Log in" }

            p class="text-sm font-light text-gray-500 dark:text-gray-400"
            {
                "Don't have an account? "
                (link(endpoints::REGISTER_VIEW, "Register here"))
            }
        }
    }
}

fn log_in_page(email: &str, alert: Option<Markup>, error_message: Option<&str>) -> Markup {
    let content = log_in_register(
        "Log in to your account",
        alert,
        &log_in_form(email, error_message),
    );

    base("Log In", &[], &content)
}

/// Display the log-in page along with any pending flash message.
pub async fn get_log_in_page(jar: PrivateCookieJar) -> Response {
    let (jar, flash) = take_flash(jar);
    let alert = flash.as_ref().map(alert_view);

    (jar, log_in_page("", alert, None)).into_response()
}

/// The state needed to perform a login.
#[derive(Debug, Clone)]
pub struct LoginState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// How long a session lasts after logging in.
    pub session_duration: Duration,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for LoginState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            session_duration: state.session_duration,
            db_connection: state.db_connection.clone(),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<LoginState> for Key {
    fn from_ref(state: &LoginState) -> Self {
        state.cookie_key.clone()
    }
}

pub const INVALID_CREDENTIALS_ERROR_MSG: &str = "Invalid email or password";
pub const LOG_IN_FAILED_ERROR_MSG: &str = "Login failed. Please try again.";

/// Check `email` and `password` against the registered users.
///
/// # Errors
///
/// Returns an:
/// - [Error::InvalidCredentials] if no user registered with `email` or the password does not match,
/// - [Error::DatabaseLockError] or [Error::SqlError] if the user could not be looked up.
fn verify_credentials(
    email: &str,
    password: &str,
    db_connection: &Mutex<Connection>,
) -> Result<User, Error> {
    let user = {
        let connection = db_connection.lock().map_err(|error| {
            tracing::error!("Could not acquire database lock: {error}");
            Error::DatabaseLockError
        })?;

        match get_user_by_email(email, &connection) {
            Ok(user) => user,
            Err(Error::NotFound) => return Err(Error::InvalidCredentials),
            Err(error) => return Err(error),
        }
    };

    // Verify outside the lock, bcrypt is slow on purpose.
    if user.password_hash.verify(password) {
        Ok(user)
    } else {
        Err(Error::InvalidCredentials)
    }
}

/// Handler for log-in requests via the POST method.
///
/// On a successful log-in request, the session cookie is set and the client is redirected to the dashboard page.
/// Otherwise, the log-in page is returned with an error message explaining the problem.
/// The message does not say whether the email or the password was wrong.
pub async fn post_log_in(
    State(state): State<LoginState>,
    jar: PrivateCookieJar,
    Form(user_data): Form<LogInData>,
) -> Response {
    let email = user_data.email.trim();

    let user = match verify_credentials(email, &user_data.password, &state.db_connection) {
        Ok(user) => user,
        Err(Error::InvalidCredentials) => {
            tracing::warn!("Failed log-in attempt for {email}");
            return log_in_page(email, None, Some(INVALID_CREDENTIALS_ERROR_MSG)).into_response();
        }
        Err(error) => {
            tracing::error!("Unhandled error while verifying credentials: {error}");
            return log_in_page(email, None, Some(LOG_IN_FAILED_ERROR_MSG)).into_response();
        }
    };

    match set_session_cookie(jar, user.id, state.session_duration) {
        Ok(jar) => {
            tracing::info!("User {} logged in", user.id);
            (jar, Redirect::to(endpoints::DASHBOARD_VIEW)).into_response()
        }
        Err(error) => {
            tracing::error!("Error setting session cookie: {error}");
            log_in_page(email, None, Some(LOG_IN_FAILED_ERROR_MSG)).into_response()
        }
    }
}

/// The raw data entered by the user in the log-in form.
///
/// The email and password are stored as plain strings. There is no need for validation here since
/// they will be compared against the email and password in the database.
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct LogInData {
    /// Email entered during log-in.
    pub email: String,
    /// Password entered during log-in.
    pub password: String,
}
