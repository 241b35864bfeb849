//! The raw text of a transaction form and its validation.

use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error,
    category::CategoryId,
    transaction::core::{Transaction, TransactionKind, date_format},
};

/// The fields of the add/edit transaction form exactly as the user typed them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionDraft {
    #[serde(default)]
    pub amount: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub category_id: String,
    #[serde(default)]
    pub date: String,
}

impl TransactionDraft {
    /// A blank draft for a new transaction dated `today`.
    pub fn new(today: Date) -> Self {
        Self {
            kind: TransactionKind::Expense.as_str().to_owned(),
            date: format_date(today),
            ..Default::default()
        }
    }

    /// A draft prefilled with the fields of an existing transaction.
    pub fn from_transaction(transaction: &Transaction) -> Self {
        Self {
            amount: transaction.amount.to_string(),
            description: transaction.description.clone(),
            kind: transaction.kind.as_str().to_owned(),
            category_id: transaction.category_id.to_string(),
            date: format_date(transaction.date),
        }
    }

    /// Check the draft and convert its fields to their typed form.
    ///
    /// # Errors
    ///
    /// - [Error::InvalidAmount] if the amount is not a finite number greater than zero.
    /// - [Error::Validation] if the type is not income or expense.
    /// - [Error::MissingCategory] if no category was selected.
    /// - [Error::InvalidDate] if the date is not in the format YYYY-MM-DD.
    pub fn parse(&self) -> Result<ValidatedTransaction, Error> {
        let amount = self
            .amount
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|amount| amount.is_finite() && *amount > 0.0)
            .ok_or_else(|| Error::InvalidAmount(self.amount.clone()))?;

        let kind = self.kind.parse::<TransactionKind>()?;

        let category_id = self
            .category_id
            .trim()
            .parse::<CategoryId>()
            .map_err(|_| Error::MissingCategory)?;

        let date = Date::parse(self.date.trim(), date_format::DATE_FORMAT)
            .map_err(|_| Error::InvalidDate(self.date.clone()))?;

        Ok(ValidatedTransaction {
            amount,
            description: self.description.clone(),
            date,
            kind,
            category_id,
        })
    }
}

fn format_date(date: Date) -> String {
    date.format(date_format::DATE_FORMAT)
        .unwrap_or_else(|_| date.to_string())
}

/// A transaction that passed local validation, serialized as the API's request body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidatedTransaction {
    pub amount: f64,
    pub description: String,
    #[serde(with = "date_format")]
    pub date: Date,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub category_id: CategoryId,
}
