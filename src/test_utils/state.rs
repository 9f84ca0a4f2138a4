use rusqlite::Connection;

use crate::AppState;

pub(crate) const TEST_COOKIE_SECRET: &str = "foobar";

/// An app state backed by an in-memory database.
///
/// Passwords are hashed with the minimum bcrypt cost to keep tests fast.
pub(crate) fn get_test_app_state() -> AppState {
    let connection = Connection::open_in_memory().expect("Could not open in-memory database");
    let mut state =
        AppState::new(connection, TEST_COOKIE_SECRET).expect("Could not create app state");
    state.password_hash_cost = 4;

    state
}
