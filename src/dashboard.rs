//! This file defines the dashboard route, which shows the user's totals and transactions.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::PrivateCookieJar;
use maud::{Markup, html};
use rusqlite::Connection;
use time::OffsetDateTime;

use crate::{
    AppState, Error, User,
    alert::alert_view,
    endpoints::{self, format_endpoint},
    flash::{Flash, take_flash},
    html::{
        BUTTON_DELETE_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE,
        TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, dollar_input_styles, format_currency,
    },
    transaction::{
        Totals, Transaction, TransactionKind, add_transaction_form, get_transactions_for_user,
        totals,
    },
};

/// The state needed for the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection for reading the user's transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

fn total_card(title: &str, amount: f64, id: &str) -> Markup {
    html! {
        div
            id=(id)
            class="flex-1 p-6 bg-white border border-gray-200 rounded-lg shadow
                dark:bg-gray-800 dark:border-gray-700"
        {
            h2 class="mb-2 text-sm font-medium text-gray-500 dark:text-gray-400" { (title) }
            p class="text-2xl font-bold tracking-tight" { (format_currency(amount)) }
        }
    }
}

fn totals_view(totals: &Totals) -> Markup {
    html! {
        section class="flex flex-col md:flex-row gap-4 w-full"
        {
            (total_card("Total Income", totals.income, "total-income"))
            (total_card("Total Expenses", totals.expenses, "total-expenses"))
            (total_card("Savings", totals.savings, "savings"))
        }
    }
}

fn transactions_table(transactions: &[Transaction]) -> Markup {
    html! {
        div class="w-full overflow-x-auto shadow-md rounded-lg"
        {
            table class="w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Type" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Amount" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Notes" }
                        th scope="col" class=(TABLE_CELL_STYLE) { span class="sr-only" { "Actions" } }
                    }
                }

                tbody
                {
                    @for transaction in transactions
                    {
                        tr class=(TABLE_ROW_STYLE) data-transaction-id=(transaction.id)
                        {
                            td class=(TABLE_CELL_STYLE) { (transaction.date) }
                            td class=(TABLE_CELL_STYLE)
                            {
                                @match transaction.kind {
                                    TransactionKind::Income => { "Income" }
                                    TransactionKind::Expense => { "Expense" }
                                }
                            }
                            td class=(TABLE_CELL_STYLE) { (transaction.category) }
                            td class=(TABLE_CELL_STYLE) { (format_currency(transaction.amount)) }
                            td class=(TABLE_CELL_STYLE) { (transaction.notes.as_deref().unwrap_or_default()) }
                            td class=(TABLE_CELL_STYLE)
                            {
                                a
                                    href=(format_endpoint(endpoints::DELETE_TRANSACTION, transaction.id))
                                    class=(BUTTON_DELETE_STYLE)
                                {
                                    "Delete"
                                }
                            }
                        }
                    }

                    @if transactions.is_empty()
                    {
                        tr class=(TABLE_ROW_STYLE)
                        {
                            td colspan="6" class="px-6 py-4 text-center"
                            {
                                "No transactions yet. Add one above to get started."
                            }
                        }
                    }
                }
            }
        }
    }
}

fn dashboard_view(
    user: &User,
    flash: Option<&Flash>,
    totals: &Totals,
    transactions: &[Transaction],
) -> Markup {
    let today = OffsetDateTime::now_utc().date();

    let content = html! {
        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-5xl space-y-6"
            {
                header class="flex items-center justify-between"
                {
                    h1 class="text-2xl font-bold" { "Welcome, " (user.username) }
                    a href=(endpoints::LOG_OUT) class=(LINK_STYLE) { "Log out" }
                }

                @if let Some(flash) = flash
                {
                    (alert_view(flash))
                }

                (totals_view(totals))

                section class="w-full p-6 bg-white rounded-lg shadow dark:bg-gray-800"
                {
                    h2 class="mb-4 text-xl font-semibold" { "Add Transaction" }
                    (add_transaction_form(today))
                }

                section class="w-full"
                {
                    h2 class="mb-4 text-xl font-semibold" { "Transactions" }
                    (transactions_table(transactions))
                }
            }
        }
    };

    base("Dashboard", &[dollar_input_styles()], &content)
}

/// Display a page with the user's totals, the form for adding a transaction
/// and the list of their transactions.
pub async fn get_dashboard_page(
    State(state): State<DashboardState>,
    Extension(user): Extension<User>,
    jar: PrivateCookieJar,
) -> Response {
    let transactions = {
        let connection = match state.db_connection.lock() {
            Ok(connection) => connection,
            Err(error) => {
                tracing::error!("Could not acquire database lock: {error}");
                return Error::DatabaseLockError.into_response();
            }
        };

        match get_transactions_for_user(user.id, &connection) {
            Ok(transactions) => transactions,
            Err(error) => return error.into_response(),
        }
    };

    let user_totals = totals(&transactions);
    let (jar, flash) = take_flash(jar);

    (
        jar,
        dashboard_view(&user, flash.as_ref(), &user_totals, &transactions),
    )
        .into_response()
}
