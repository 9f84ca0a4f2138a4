//! The registration page for creating an account.
use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{Form, PrivateCookieJar, cookie::Key};
use email_address::EmailAddress;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error, PasswordHash,
    alert::alert_view,
    endpoints,
    flash::{Flash, set_flash, take_flash},
    html::{BUTTON_PRIMARY_STYLE, base, link, log_in_register, password_input, text_input},
    user::{NewUser, User, create_user, get_user_by_email},
};

fn registration_form() -> Markup {
    html! {
        form
            method="post"
            action=(endpoints::REGISTER_VIEW)
            class="space-y-4 md:space-y-6"
        {
            (text_input("username", "Username", "text", ""))
            (text_input("email", "Email", "email", ""))
            (password_input(None))

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Register" }

            p class="text-sm font-light text-gray-500 dark:text-gray-400"
            {
                "Already have an account? "
                (link(endpoints::LOG_IN_VIEW, "Log in here"))
            }
        }
    }
}

/// Display the registration page along with any pending flash message.
pub async fn get_register_page(jar: PrivateCookieJar) -> Response {
    let (jar, flash) = take_flash(jar);
    let content = log_in_register(
        "Create an account",
        flash.as_ref().map(alert_view),
        &registration_form(),
    );

    (jar, base("Register", &[], &content)).into_response()
}

/// The state needed for creating a new user.
#[derive(Debug, Clone)]
pub struct RegistrationState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The bcrypt cost used when hashing the new user's password.
    pub password_hash_cost: u32,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for RegistrationState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            password_hash_cost: state.password_hash_cost,
            db_connection: state.db_connection.clone(),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<RegistrationState> for Key {
    fn from_ref(state: &RegistrationState) -> Self {
        state.cookie_key.clone()
    }
}

/// The raw data entered by the user in the registration form.
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password: String,
}

pub const REGISTRATION_SUCCESS_MSG: &str = "Registration successful! Please login.";
pub const DUPLICATE_EMAIL_MSG: &str = "Email already registered";
pub const INVALID_EMAIL_MSG: &str = "Please enter a valid email address.";
pub const EMPTY_PASSWORD_MSG: &str = "Please enter a password.";
pub const REGISTRATION_FAILED_MSG: &str = "Registration failed. Please try again.";

fn lock_connection(
    db_connection: &Mutex<Connection>,
) -> Result<std::sync::MutexGuard<'_, Connection>, Error> {
    db_connection.lock().map_err(|error| {
        tracing::error!("Could not acquire database lock: {error}");
        Error::DatabaseLockError
    })
}

/// Validate the registration form and store the new user.
///
/// # Errors
///
/// Returns an:
/// - [Error::InvalidEmail] if the email address is not valid,
/// - [Error::EmptyPassword] if no password was entered,
/// - [Error::DuplicateEmail] if the email address has already been registered,
/// - or another error if the password could not be hashed or the user could not be stored.
fn register(
    form: &RegisterForm,
    password_hash_cost: u32,
    db_connection: &Mutex<Connection>,
) -> Result<User, Error> {
    let email = form.email.trim();

    if !EmailAddress::is_valid(email) {
        return Err(Error::InvalidEmail(email.to_owned()));
    }

    if form.password.is_empty() {
        return Err(Error::EmptyPassword);
    }

    match get_user_by_email(email, &*lock_connection(db_connection)?) {
        Ok(_) => return Err(Error::DuplicateEmail),
        Err(Error::NotFound) => {}
        Err(error) => return Err(error),
    }

    // Hash without holding the lock. The unique constraint on the email
    // column catches a registration that slips in meanwhile.
    let password_hash = PasswordHash::new(&form.password, password_hash_cost)?;

    create_user(
        NewUser {
            username: form.username.trim().to_owned(),
            email: email.to_owned(),
            password_hash,
        },
        &*lock_connection(db_connection)?,
    )
}

/// Handler for registration requests via the POST method.
///
/// On success the client is redirected to the log-in page, otherwise back to
/// the registration page. Either way a flash message explains what happened.
pub async fn register_user(
    State(state): State<RegistrationState>,
    jar: PrivateCookieJar,
    Form(form): Form<RegisterForm>,
) -> Response {
    let (flash, redirect_to) =
        match register(&form, state.password_hash_cost, &state.db_connection) {
            Ok(user) => {
                tracing::info!("Registered user {}", user.id);
                (
                    Flash::success(REGISTRATION_SUCCESS_MSG),
                    endpoints::LOG_IN_VIEW,
                )
            }
            Err(error) => {
                let message = match error {
                    Error::DuplicateEmail => {
                        tracing::info!("Registration rejected: {error}");
                        DUPLICATE_EMAIL_MSG
                    }
                    Error::InvalidEmail(_) => {
                        tracing::info!("Registration rejected: {error}");
                        INVALID_EMAIL_MSG
                    }
                    Error::EmptyPassword => {
                        tracing::info!("Registration rejected: {error}");
                        EMPTY_PASSWORD_MSG
                    }
                    error => {
                        tracing::error!("Registration failed: {error}");
                        REGISTRATION_FAILED_MSG
                    }
                };

                (Flash::error(message), endpoints::REGISTER_VIEW)
            }
        };

    (set_flash(jar, flash), Redirect::to(redirect_to)).into_response()
}


#[cfg(test)]
mod register_user_tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::State;
    use axum_extra::extract::{Form, PrivateCookieJar};
    use rusqlite::Connection;

    use crate::{
        app_state::create_cookie_key,
        db::initialize,
        endpoints,
        flash::Flash,
        test_utils::{TEST_COOKIE_SECRET, assert_redirect, get_flash},
        user::{count_users, get_user_by_email},
    };

    use super::{
        DUPLICATE_EMAIL_MSG, EMPTY_PASSWORD_MSG, INVALID_EMAIL_MSG, REGISTRATION_SUCCESS_MSG,
        RegisterForm, RegistrationState, register_user,
    };

    fn get_test_state() -> RegistrationState {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();

        RegistrationState {
            cookie_key: create_cookie_key(TEST_COOKIE_SECRET),
            password_hash_cost: 4,
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    fn form(email: &str, password: &str) -> RegisterForm {
        RegisterForm {
            username: "Alice".to_owned(),
            email: email.to_owned(),
            password: password.to_owned(),
        }
    }

    async fn post_register(
        state: &RegistrationState,
        form: RegisterForm,
    ) -> axum::response::Response {
        let jar = PrivateCookieJar::new(state.cookie_key.clone());

        register_user(State(state.clone()), jar, Form(form)).await
    }

    fn user_count(state: &RegistrationState) -> usize {
        count_users(&state.db_connection.lock().unwrap()).unwrap()
    }

    #[tokio::test]
    async fn register_succeeds_and_redirects_to_log_in() {
        let state = get_test_state();

        let response = post_register(&state, form("alice@example.com", "hunter2")).await;

        assert_redirect(&response, endpoints::LOG_IN_VIEW);
        assert_eq!(
            get_flash(&response),
            Some(Flash::success(REGISTRATION_SUCCESS_MSG))
        );

        let user = get_user_by_email("alice@example.com", &state.db_connection.lock().unwrap())
            .expect("Could not get registered user");
        assert_eq!(user.username, "Alice");
        assert!(user.password_hash.verify("hunter2"));
    }

    #[tokio::test]
    async fn register_users_with_distinct_emails_succeeds() {
        let state = get_test_state();

        post_register(&state, form("alice@example.com", "hunter2")).await;
        post_register(&state, form("bob@example.com", "hunter3")).await;

        assert_eq!(user_count(&state), 2);
    }

    #[tokio::test]
    async fn register_fails_with_duplicate_email() {
        let state = get_test_state();
        post_register(&state, form("alice@example.com", "hunter2")).await;

        let response = post_register(&state, form("alice@example.com", "different")).await;

        assert_redirect(&response, endpoints::REGISTER_VIEW);
        assert_eq!(get_flash(&response), Some(Flash::error(DUPLICATE_EMAIL_MSG)));
        assert_eq!(user_count(&state), 1);
    }

    #[tokio::test]
    async fn register_fails_with_invalid_email() {
        let state = get_test_state();

        let response = post_register(&state, form("not-an-email", "hunter2")).await;

        assert_redirect(&response, endpoints::REGISTER_VIEW);
        assert_eq!(get_flash(&response), Some(Flash::error(INVALID_EMAIL_MSG)));
        assert_eq!(user_count(&state), 0);
    }

    #[tokio::test]
    async fn register_fails_with_empty_password() {
        let state = get_test_state();

        let response = post_register(&state, form("alice@example.com", "")).await;

        assert_redirect(&response, endpoints::REGISTER_VIEW);
        assert_eq!(get_flash(&response), Some(Flash::error(EMPTY_PASSWORD_MSG)));
        assert_eq!(user_count(&state), 0);
    }
}
