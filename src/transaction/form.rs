//! Parsing and rendering of the form for adding a transaction.

use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::{
    Error, UserID, endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_RADIO_GROUP_STYLE, FORM_RADIO_INPUT_STYLE,
        FORM_RADIO_LABEL_STYLE, FORM_TEXT_INPUT_STYLE,
    },
    transaction::core::{NewTransaction, Transaction, TransactionKind, create_transaction},
};

/// Dates are entered as "YYYY-MM-DD", the format of HTML date inputs.
const DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

/// The smallest amount that can be entered, one cent.
pub const MIN_AMOUNT: f64 = 0.01;
/// The largest amount that can be entered for a single transaction.
pub const MAX_AMOUNT: f64 = 1_000_000_000.0;

/// The raw data entered by the user in the form for adding a transaction.
///
/// Missing fields are read as empty strings so that they are reported as
/// validation errors instead of rejecting the request.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TransactionForm {
    /// "income" or "expense".
    #[serde(rename = "type")]
    pub kind: String,
    /// A positive number of dollars.
    pub amount: String,
    pub category: String,
    /// The date formatted as "YYYY-MM-DD".
    pub date: String,
    pub notes: String,
}

/// The ways that the form for adding a transaction can be filled out incorrectly.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum ValidationError {
    /// The transaction type was neither "income" nor "expense".
    #[error("\"{0}\" is not a valid transaction type, choose income or expense")]
    InvalidKind(String),

    /// The amount was not a dollar amount between [MIN_AMOUNT] and [MAX_AMOUNT]
    /// with at most two decimal places.
    #[error(
        "\"{0}\" is not a valid amount, enter a number from 0.01 to 1,000,000,000 with at most two decimal places"
    )]
    InvalidAmount(String),

    /// The date was not a calendar date in the format YYYY-MM-DD with a year from 0001 to 9999.
    #[error("\"{0}\" is not a valid date, use the format YYYY-MM-DD")]
    InvalidDate(String),
}

impl TransactionForm {
    /// Validate the form and convert it into a transaction that can be stored.
    ///
    /// Leading and trailing whitespace is ignored and empty notes are dropped.
    ///
    /// # Errors
    ///
    /// Returns the first [ValidationError] found, checking the type, amount
    /// and date in that order.
    pub fn parse(&self) -> Result<NewTransaction, ValidationError> {
        let raw_kind = self.kind.trim();
        let kind = raw_kind
            .parse::<TransactionKind>()
            .map_err(ValidationError::InvalidKind)?;

        let raw_amount = self.amount.trim();
        let amount = parse_amount(raw_amount)
            .ok_or_else(|| ValidationError::InvalidAmount(raw_amount.to_owned()))?;

        let raw_date = self.date.trim();
        let date = parse_date(raw_date)
            .ok_or_else(|| ValidationError::InvalidDate(raw_date.to_owned()))?;

        let notes = match self.notes.trim() {
            "" => None,
            notes => Some(notes.to_owned()),
        };

        Ok(NewTransaction {
            kind,
            amount,
            category: self.category.trim().to_owned(),
            date,
            notes,
        })
    }
}

/// Parse a plain decimal amount such as "12", "12.5" or "12.50".
///
/// Signs, exponents and fractions of a cent are rejected, as are amounts
/// outside of [MIN_AMOUNT] to [MAX_AMOUNT].
fn parse_amount(raw_amount: &str) -> Option<f64> {
    let (dollars, cents) = raw_amount.split_once('.').unwrap_or((raw_amount, ""));
    let is_digits = |text: &str| text.bytes().all(|byte| byte.is_ascii_digit());

    if (dollars.is_empty() && cents.is_empty())
        || !is_digits(dollars)
        || !is_digits(cents)
        || cents.len() > 2
    {
        return None;
    }

    let amount = raw_amount.parse::<f64>().ok()?;

    (MIN_AMOUNT..=MAX_AMOUNT).contains(&amount).then_some(amount)
}

/// Parse a date in the format "YYYY-MM-DD".
///
/// The year must be written as exactly four digits and cannot be zero.
fn parse_date(raw_date: &str) -> Option<Date> {
    let year = raw_date.get(..4)?;

    if !year.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }

    Date::parse(raw_date, DATE_FORMAT)
        .ok()
        .filter(|date| date.year() >= 1)
}

/// Validate `form` and record the transaction for `user_id`.
///
/// Nothing is stored if the form is invalid.
///
/// # Errors
///
/// Returns a:
/// - [Error::Validation] if the form is not filled out correctly,
/// - or [Error::SqlError] if the transaction could not be stored.
pub fn add_transaction(
    user_id: UserID,
    form: &TransactionForm,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let new_transaction = form.parse()?;

    create_transaction(user_id, new_transaction, connection)
}

/// The form for adding a transaction, posted to [endpoints::ADD_TRANSACTION].
///
/// The date defaults to `today`.
pub fn add_transaction_form(today: Date) -> Markup {
    html! {
        form
            method="post"
            action=(endpoints::ADD_TRANSACTION)
            class="w-full space-y-4"
        {
            fieldset class="space-y-2"
            {
                legend class=(FORM_LABEL_STYLE) { "Transaction type" }

                div class=(FORM_RADIO_GROUP_STYLE)
                {
                    div class="flex items-center gap-3"
                    {
                        input
                            name="type"
                            id="transaction-type-expense"
                            type="radio"
                            value=(TransactionKind::Expense)
                            checked
                            required
                            class=(FORM_RADIO_INPUT_STYLE);

                        label for="transaction-type-expense" class=(FORM_RADIO_LABEL_STYLE)
                        {
                            "Expense"
                        }
                    }

                    div class="flex items-center gap-3"
                    {
                        input
                            name="type"
                            id="transaction-type-income"
                            type="radio"
                            value=(TransactionKind::Income)
                            required
                            class=(FORM_RADIO_INPUT_STYLE);

                        label for="transaction-type-income" class=(FORM_RADIO_LABEL_STYLE)
                        {
                            "Income"
                        }
                    }
                }
            }

            div
            {
                label for="amount" class=(FORM_LABEL_STYLE) { "Amount" }

                div class="input-wrapper w-full"
                {
                    input
                        name="amount"
                        id="amount"
                        type="number"
                        step="0.01"
                        min="0.01"
                        max="1000000000"
                        placeholder="0.01"
                        required
                        class=(FORM_TEXT_INPUT_STYLE);
                }
            }

            div
            {
                label for="category" class=(FORM_LABEL_STYLE) { "Category" }

                input
                    name="category"
                    id="category"
                    type="text"
                    placeholder="Groceries"
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="date" class=(FORM_LABEL_STYLE) { "Date" }

                input
                    name="date"
                    id="date"
                    type="date"
                    value=(today)
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="notes" class=(FORM_LABEL_STYLE) { "Notes" }

                input
                    name="notes"
                    id="notes"
                    type="text"
                    placeholder="Optional"
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Add Transaction" }
        }
    }
}

#[cfg(test)]
mod parse_tests {
    use time::macros::date;

    use crate::transaction::{NewTransaction, TransactionKind, ValidationError};

    use super::TransactionForm;

    fn valid_form() -> TransactionForm {
        TransactionForm {
            kind: "expense".to_owned(),
            amount: "12.50".to_owned(),
            category: "Groceries".to_owned(),
            date: "2024-03-15".to_owned(),
            notes: "Weekly shop".to_owned(),
        }
    }

    #[test]
    fn parses_valid_form() {
        let got = valid_form().parse();

        assert_eq!(
            got,
            Ok(NewTransaction {
                kind: TransactionKind::Expense,
                amount: 12.5,
                category: "Groceries".to_owned(),
                date: date!(2024 - 03 - 15),
                notes: Some("Weekly shop".to_owned()),
            })
        );
    }

    #[test]
    fn trims_whitespace_and_drops_empty_notes() {
        let form = TransactionForm {
            kind: " income ".to_owned(),
            amount: " 100 ".to_owned(),
            category: "  Salary ".to_owned(),
            date: " 2024-03-15".to_owned(),
            notes: "   ".to_owned(),
        };

        let got = form.parse().unwrap();

        assert_eq!(got.kind, TransactionKind::Income);
        assert_eq!(got.amount, 100.0);
        assert_eq!(got.category, "Salary");
        assert_eq!(got.notes, None);
    }

    #[test]
    fn rejects_unknown_kind() {
        let form = TransactionForm {
            kind: "transfer".to_owned(),
            ..valid_form()
        };

        assert_eq!(
            form.parse(),
            Err(ValidationError::InvalidKind("transfer".to_owned()))
        );
    }

    #[test]
    fn rejects_invalid_amounts() {
        for amount in [
            "abc", "", ".", "0", "0.00", "-5", "+5", "NaN", "inf", "1e400", "1e12", "0.001",
            "5e-3", "12.345", "1,000", "1000000000.01", "1e308",
        ] {
            let form = TransactionForm {
                amount: amount.to_owned(),
                ..valid_form()
            };

            assert_eq!(
                form.parse(),
                Err(ValidationError::InvalidAmount(amount.to_owned())),
                "want amount {amount:?} to be rejected"
            );
        }
    }

    #[test]
    fn accepts_amounts_in_dollars_and_cents() {
        for (amount, want) in [
            ("0.01", 0.01),
            ("5", 5.0),
            ("5.", 5.0),
            (".5", 0.5),
            ("12.5", 12.5),
            ("1000000000", 1_000_000_000.0),
        ] {
            let form = TransactionForm {
                amount: amount.to_owned(),
                ..valid_form()
            };

            assert_eq!(
                form.parse().map(|transaction| transaction.amount),
                Ok(want),
                "want amount {amount:?} to be accepted"
            );
        }
    }

    #[test]
    fn accepts_first_and_last_four_digit_years() {
        for (raw_date, want_year) in [("0001-01-01", 1), ("9999-12-31", 9999)] {
            let form = TransactionForm {
                date: raw_date.to_owned(),
                ..valid_form()
            };

            assert_eq!(
                form.parse().map(|transaction| transaction.date.year()),
                Ok(want_year)
            );
        }
    }

    #[test]
    fn rejects_invalid_dates() {
        for date in [
            "13/40/2024",
            "2024-13-01",
            "2024-02-30",
            "yesterday",
            "",
            "-0001-01-01",
            "0000-01-01",
            "+2024-03-15",
            "24-03-15",
        ] {
            let form = TransactionForm {
                date: date.to_owned(),
                ..valid_form()
            };

            assert_eq!(
                form.parse(),
                Err(ValidationError::InvalidDate(date.to_owned())),
                "want date {date:?} to be rejected"
            );
        }
    }

    #[test]
    fn empty_form_is_rejected() {
        assert!(matches!(
            TransactionForm::default().parse(),
            Err(ValidationError::InvalidKind(_))
        ));
    }
}
