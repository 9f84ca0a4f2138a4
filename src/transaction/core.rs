//! Defines the core data models and database queries for transactions.

use std::{fmt::Display, str::FromStr};

use rusqlite::{
    Connection, Row, ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{Error, UserID};

// ============================================================================
// MODELS
// ============================================================================

/// Whether money was earned or spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money earned, e.g. a salary.
    Income,
    /// Money spent.
    Expense,
}

impl TransactionKind {
    /// The name used for the kind in forms and in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }
}

impl Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(TransactionKind::Income),
            "expense" => Ok(TransactionKind::Expense),
            other => Err(other.to_owned()),
        }
    }
}

impl ToSql for TransactionKind {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionKind {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let text = value.as_str()?;

        text.parse()
            .map_err(|kind| FromSqlError::Other(format!("unknown transaction kind {kind:?}").into()))
    }
}

/// An income or expense recorded by a user.
///
/// The amount is always positive, the kind says which way the money moved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: i64,
    /// The user that recorded the transaction.
    pub user_id: UserID,
    /// Whether the money was earned or spent.
    pub kind: TransactionKind,
    /// How much money was earned or spent.
    pub amount: f64,
    /// A free-form label, e.g. "Groceries".
    pub category: String,
    /// When the transaction happened.
    pub date: Date,
    /// Anything else the user wanted to note down.
    pub notes: Option<String>,
}

/// A validated transaction that has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    /// Whether the money was earned or spent.
    pub kind: TransactionKind,
    /// The amount of money, always positive.
    pub amount: f64,
    /// A free-form label, e.g. "Groceries".
    pub category: String,
    /// When the transaction happened.
    pub date: Date,
    /// Optional notes.
    pub notes: Option<String>,
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                kind TEXT NOT NULL CHECK (kind IN ('income', 'expense')),
                amount REAL NOT NULL,
                category TEXT NOT NULL,
                date TEXT NOT NULL,
                notes TEXT
                )",
        (),
    )?;

    // Every query filters on the owner.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_user_id ON \"transaction\"(user_id);",
        (),
    )?;

    Ok(())
}

/// Create a new transaction owned by `user_id`.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is some SQL error.
pub fn create_transaction(
    user_id: UserID,
    new_transaction: NewTransaction,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(
            "INSERT INTO \"transaction\" (user_id, kind, amount, category, date, notes)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             RETURNING id, user_id, kind, amount, category, date, notes",
        )?
        .query_row(
            (
                user_id.as_i64(),
                new_transaction.kind,
                new_transaction.amount,
                new_transaction.category,
                new_transaction.date,
                new_transaction.notes,
            ),
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Get every transaction recorded by `user_id`, oldest entry first.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is some SQL error.
pub fn get_transactions_for_user(
    user_id: UserID,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(
            "SELECT id, user_id, kind, amount, category, date, notes FROM \"transaction\"
             WHERE user_id = :user_id ORDER BY id",
        )?
        .query_map(&[(":user_id", &user_id.as_i64())], map_transaction_row)?
        .map(|maybe_transaction| maybe_transaction.map_err(Error::from))
        .collect()
}

/// Delete the transaction `transaction_id` if it belongs to `user_id`.
///
/// Returns whether a transaction was deleted. A transaction that does not
/// exist and one owned by another user both give `false`.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is some SQL error.
pub fn delete_transaction(
    user_id: UserID,
    transaction_id: i64,
    connection: &Connection,
) -> Result<bool, Error> {
    let rows_affected = connection.execute(
        "DELETE FROM \"transaction\" WHERE id = ?1 AND user_id = ?2",
        (transaction_id, user_id.as_i64()),
    )?;

    Ok(rows_affected > 0)
}

/// Get the total number of transactions in the database.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
#[cfg(test)]
pub fn count_transactions(connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM \"transaction\";", [], |row| {
            row.get(0)
        })
        .map_err(|error| error.into())
}

/// Map a database row to a Transaction.
///
/// The row must contain the columns id, user_id, kind, amount, category, date
/// and notes, in that order.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(0)?;
    let user_id = row.get(1)?;
    let kind = row.get(2)?;
    let amount = row.get(3)?;
    let category = row.get(4)?;
    let date = row.get(5)?;
    let notes = row.get(6)?;

    Ok(Transaction {
        id,
        user_id: UserID::new(user_id),
        kind,
        amount,
        category,
        date,
        notes,
    })
}

// ============================================================================
// TESTS
// ============================================================================
