//! Defines the endpoint for deleting one of the user's transactions.

use axum::{
    Extension,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::PrivateCookieJar;

use crate::{
    User, endpoints,
    flash::{Flash, set_flash},
    transaction::{core::delete_transaction, create_endpoint::TransactionState},
};

pub const DELETE_SUCCESS_MSG: &str = "Transaction deleted successfully!";
pub const DELETE_NOT_FOUND_MSG: &str =
    "Transaction not found or you do not have permission to delete it.";
pub const DELETE_FAILED_MSG: &str = "Error deleting transaction. Please try again.";

/// A route handler for deleting one of the logged in user's transactions,
/// redirects to the dashboard with a flash message.
///
/// An ID that does not parse as an integer is treated like a transaction that
/// does not exist.
pub async fn delete_transaction_endpoint(
    State(state): State<TransactionState>,
    Extension(user): Extension<User>,
    jar: PrivateCookieJar,
    Path(raw_transaction_id): Path<String>,
) -> Response {
    let flash = match raw_transaction_id.parse::<i64>() {
        Err(_) => {
            tracing::debug!(
                "User {} tried to delete transaction with invalid ID {raw_transaction_id:?}",
                user.id
            );
            Flash::error(DELETE_NOT_FOUND_MSG)
        }
        Ok(transaction_id) => match state.db_connection.lock() {
            Ok(connection) => match delete_transaction(user.id, transaction_id, &connection) {
                Ok(true) => {
                    tracing::info!("User {} deleted transaction {transaction_id}", user.id);
                    Flash::success(DELETE_SUCCESS_MSG)
                }
                Ok(false) => {
                    tracing::warn!(
                        "User {} tried to delete transaction {transaction_id} which is missing or not theirs",
                        user.id
                    );
                    Flash::error(DELETE_NOT_FOUND_MSG)
                }
                Err(error) => {
                    tracing::error!("Could not delete transaction {transaction_id}: {error}");
                    Flash::error(DELETE_FAILED_MSG)
                }
            },
            Err(error) => {
                tracing::error!("Could not acquire database lock: {error}");
                Flash::error(DELETE_FAILED_MSG)
            }
        },
    };

    (
        set_flash(jar, flash),
        Redirect::to(endpoints::DASHBOARD_VIEW),
    )
        .into_response()
}
