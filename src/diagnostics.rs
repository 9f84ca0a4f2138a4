//! Database introspection routes for checking a deployment.
//!
//! These routes are only served when diagnostics are enabled on the command line.
//! They never include password hashes in their output.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::Serialize;
use serde_json::json;

use crate::{
    AppState, Error,
    user::{User, count_users, list_users},
};

/// The name reported for the application database.
const DATABASE_NAME: &str = "sqlite";

/// The state needed for the diagnostics routes.
#[derive(Debug, Clone)]
pub struct DiagnosticsState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DiagnosticsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The public details of a user. Leaves out the password hash.
#[derive(Debug, Serialize, PartialEq)]
struct UserSummary {
    id: i64,
    username: String,
    email: String,
}

impl From<User> for UserSummary {
    fn from(user: User) -> Self {
        Self {
            id: user.id.as_i64(),
            username: user.username,
            email: user.email,
        }
    }
}

/// Get the names of the tables in the database, in alphabetical order.
fn list_tables(connection: &Connection) -> Result<Vec<String>, Error> {
    connection
        .prepare(
            "SELECT name FROM sqlite_master
             WHERE type = 'table' AND name NOT LIKE 'sqlite_%'
             ORDER BY name",
        )?
        .query_map([], |row| row.get(0))?
        .map(|maybe_name| maybe_name.map_err(Error::from))
        .collect()
}

fn error_response(error: Error) -> Response {
    tracing::error!("Database check failed: {error}");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "status": "error",
            "message": error.to_string(),
        })),
    )
        .into_response()
}

/// Report whether the database can be queried and which tables it holds.
pub async fn test_db(State(state): State<DiagnosticsState>) -> Response {
    let tables = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)
        .and_then(|connection| list_tables(&connection));

    match tables {
        Ok(tables) => Json(json!({
            "status": "success",
            "message": "Database connection is working!",
            "database": DATABASE_NAME,
            "collections": tables,
        }))
        .into_response(),
        Err(error) => error_response(error),
    }
}

/// Report the tables in the database along with the registered users.
pub async fn check_db(State(state): State<DiagnosticsState>) -> Response {
    let result = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)
        .and_then(|connection| {
            let tables = list_tables(&connection)?;
            let users_count = count_users(&connection)?;
            let users = list_users(&connection)?
                .into_iter()
                .map(UserSummary::from)
                .collect::<Vec<_>>();

            Ok((tables, users_count, users))
        });

    match result {
        Ok((tables, users_count, users)) => Json(json!({
            "status": "success",
            "database": DATABASE_NAME,
            "collections": tables,
            "users_count": users_count,
            "users": users,
        }))
        .into_response(),
        Err(error) => error_response(error),
    }
}
