//! Defines the endpoint for adding a transaction from the dashboard.
use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{Form, PrivateCookieJar};
use rusqlite::Connection;

use crate::{
    AppState, Error, User, endpoints,
    flash::{Flash, set_flash},
    transaction::form::{TransactionForm, add_transaction},
};

/// The state needed to add or delete a transaction.
#[derive(Debug, Clone)]
pub struct TransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for TransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

pub const ADD_SUCCESS_MSG: &str = "Transaction added successfully!";
pub const ADD_FAILED_MSG: &str = "Error adding transaction. Please try again.";

/// A route handler for adding a transaction for the logged in user.
///
/// Always redirects back to the dashboard with a flash message saying whether
/// the transaction was added.
pub async fn add_transaction_endpoint(
    State(state): State<TransactionState>,
    Extension(user): Extension<User>,
    jar: PrivateCookieJar,
    Form(form): Form<TransactionForm>,
) -> Response {
    let flash = match state.db_connection.lock() {
        Ok(connection) => match add_transaction(user.id, &form, &connection) {
            Ok(transaction) => {
                tracing::info!(
                    "User {} added {} transaction {}",
                    user.id,
                    transaction.kind,
                    transaction.id
                );
                Flash::success(ADD_SUCCESS_MSG)
            }
            Err(Error::Validation(error)) => {
                tracing::debug!("Rejected transaction from user {}: {error}", user.id);
                Flash::error(format!("Error adding transaction: {error}"))
            }
            Err(error) => {
                tracing::error!("Could not add transaction for user {}: {error}", user.id);
                Flash::error(ADD_FAILED_MSG)
            }
        },
        Err(error) => {
            tracing::error!("Could not acquire database lock: {error}");
            Flash::error(ADD_FAILED_MSG)
        }
    };

    (
        set_flash(jar, flash),
        Redirect::to(endpoints::DASHBOARD_VIEW),
    )
        .into_response()
}
