//! Transaction management for the finance tracker.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and the database functions for storing, listing and deleting them
//! - Parsing and validation of the form for adding a transaction
//! - Summing transactions into totals
//! - The route handlers for adding and deleting transactions

mod core;
mod create_endpoint;
mod delete_endpoint;
mod form;
mod totals;

pub use core::{
    NewTransaction, Transaction, TransactionKind, create_transaction, create_transaction_table,
    get_transactions_for_user,
};
pub use create_endpoint::add_transaction_endpoint;
pub use delete_endpoint::delete_transaction_endpoint;
pub use form::{ValidationError, add_transaction_form};
pub use totals::{Totals, totals};
