//! Derives the dashboard totals and the per-category expense breakdown.
//!
//! Everything here is a pure function of the transaction and category lists.

use crate::{
    category::Category,
    transaction::{Transaction, TransactionKind},
};

/// The total expenses recorded against one category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    /// The category's name.
    pub name: String,
    /// The sum of the expense amounts in the category.
    pub total: f64,
}

/// Totals shown in the summary cards and charts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Summary {
    /// The sum of all income amounts.
    pub total_income: f64,
    /// The sum of all expense amounts.
    pub total_expense: f64,
    /// Income minus expenses, may be negative.
    pub balance: f64,
    /// Expense totals in category list order, categories without expenses are omitted.
    pub breakdown: Vec<CategoryTotal>,
}

/// Sums `transactions` by kind and breaks the expenses down by category.
///
/// Only categories present in `categories` appear in the breakdown, so
/// expenses whose category has been deleted count towards the totals but
/// not towards any slice of the breakdown.
pub fn summarize(transactions: &[Transaction], categories: &[Category]) -> Summary {
    let total_for = |kind: TransactionKind| -> f64 {
        transactions
            .iter()
            .filter(|transaction| transaction.kind == kind)
            .map(|transaction| transaction.amount)
            .sum()
    };

    let total_income = total_for(TransactionKind::Income);
    let total_expense = total_for(TransactionKind::Expense);

    let breakdown = categories
        .iter()
        .map(|category| CategoryTotal {
            name: category.name.clone(),
            total: transactions
                .iter()
                .filter(|transaction| {
                    transaction.kind == TransactionKind::Expense
                        && transaction.category_id == category.id
                })
                .map(|transaction| transaction.amount)
                .sum(),
        })
        .filter(|category_total| category_total.total != 0.0)
        .collect();

    Summary {
        total_income,
        total_expense,
        balance: total_income - total_expense,
        breakdown,
    }
}
