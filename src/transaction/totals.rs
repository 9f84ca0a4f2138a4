//! Sums a user's transactions into the figures shown on the dashboard.

use crate::transaction::core::{Transaction, TransactionKind};

/// The money earned, spent and kept across a set of transactions.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Totals {
    /// The sum of all income.
    pub income: f64,
    /// The sum of all expenses.
    pub expenses: f64,
    /// Income minus expenses. Negative when more was spent than earned.
    pub savings: f64,
}

/// Calculate the totals for `transactions`.
pub fn totals(transactions: &[Transaction]) -> Totals {
    let (income, expenses) =
        transactions
            .iter()
            .fold((0.0, 0.0), |(income, expenses), transaction| {
                match transaction.kind {
                    TransactionKind::Income => (income + transaction.amount, expenses),
                    TransactionKind::Expense => (income, expenses + transaction.amount),
                }
            });

    Totals {
        income,
        expenses,
        savings: income - expenses,
    }
}
