//! The recent transactions table on the dashboard.

use maud::{Markup, html};
use unicode_segmentation::UnicodeSegmentation;

use crate::{
    category::{Category, category_name},
    endpoints::{self, format_endpoint},
    html::{
        BUTTON_DELETE_STYLE, CATEGORY_BADGE_STYLE, LINK_STYLE, TABLE_CELL_STYLE,
        TABLE_HEADER_STYLE, TABLE_ROW_STYLE, format_currency,
    },
    transaction::{Transaction, TransactionKind},
};

/// The number of transactions shown in the table.
const RECENT_TRANSACTION_COUNT: usize = 10;

/// The max number of graphemes to display in the transaction table rows before
/// truncating and displaying ellipses.
const MAX_DESCRIPTION_GRAPHEMES: usize = 32;

/// Shown for transactions whose category is neither embedded nor in the category list.
pub(super) const UNCATEGORIZED: &str = "Uncategorized";

fn kind_badge_class(kind: TransactionKind) -> &'static str {
    match kind {
        TransactionKind::Income => {
            "px-3 py-1 rounded-full text-sm bg-green-100 text-green-800 \
            dark:bg-green-900 dark:text-green-300"
        }
        TransactionKind::Expense => {
            "px-3 py-1 rounded-full text-sm bg-red-100 text-red-800 \
            dark:bg-red-900 dark:text-red-300"
        }
    }
}

fn amount_class(kind: TransactionKind) -> &'static str {
    match kind {
        TransactionKind::Income => "text-green-600 dark:text-green-400",
        TransactionKind::Expense => "text-red-600 dark:text-red-400",
    }
}

fn format_description(description: &str) -> (String, Option<&str>) {
    let description_length = description.graphemes(true).count();

    if description_length <= MAX_DESCRIPTION_GRAPHEMES {
        (description.to_owned(), None)
    } else {
        let truncated: String = description
            .graphemes(true)
            .take(MAX_DESCRIPTION_GRAPHEMES - 3)
            .collect();
        let truncated = truncated + "...";
        (truncated, Some(description))
    }
}

/// The category name to display for `transaction`.
///
/// Prefers the category embedded by the API, then the category list.
fn display_category<'a>(transaction: &'a Transaction, categories: &'a [Category]) -> &'a str {
    transaction
        .category
        .as_ref()
        .map(|category| category.name.as_str())
        .or_else(|| category_name(categories, transaction.category_id))
        .unwrap_or(UNCATEGORIZED)
}

fn transaction_row(transaction: &Transaction, categories: &[Category]) -> Markup {
    let (description, tooltip) = format_description(&transaction.description);
    let edit_url = format_endpoint(endpoints::EDIT_TRANSACTION_MODAL, transaction.id);
    let delete_url = format_endpoint(endpoints::DELETE_TRANSACTION_MODAL, transaction.id);

    html! {
        tr class=(TABLE_ROW_STYLE) data-transaction-id=(transaction.id)
        {
            td class=(TABLE_CELL_STYLE) { (transaction.date) }
            td class=(TABLE_CELL_STYLE) title=[tooltip] { (description) }
            td class=(TABLE_CELL_STYLE)
            {
                span class=(CATEGORY_BADGE_STYLE)
                {
                    (display_category(transaction, categories))
                }
            }
            td class=(TABLE_CELL_STYLE)
            {
                span class=(kind_badge_class(transaction.kind)) { (transaction.kind.as_str()) }
            }
            td class={(TABLE_CELL_STYLE) " text-right font-semibold " (amount_class(transaction.kind))}
            {
                (format_currency(transaction.amount))
            }
            td class={(TABLE_CELL_STYLE) " text-right whitespace-nowrap"}
            {
                button
                    type="button"
                    hx-get=(edit_url)
                    hx-target="#modal-container"
                    hx-target-error="#alert-container"
                    class={(LINK_STYLE) " mr-3"}
                {
                    "Edit"
                }

                button
                    type="button"
                    hx-get=(delete_url)
                    hx-target="#modal-container"
                    hx-target-error="#alert-container"
                    class=(BUTTON_DELETE_STYLE)
                {
                    "Delete"
                }
            }
        }
    }
}

/// Renders the most recent transactions in the order the API returned them.
pub(super) fn recent_transactions_table(
    transactions: &[Transaction],
    categories: &[Category],
) -> Markup {
    html! {
        section id="recent-transactions" class="bg-white dark:bg-gray-800 rounded-xl shadow-lg p-6"
        {
            h2 class="text-xl font-bold mb-6" { "Recent Transactions" }

            div class="overflow-x-auto"
            {
                table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Type" }
                            th scope="col" class={(TABLE_CELL_STYLE) " text-right"} { "Amount" }
                            th scope="col" class={(TABLE_CELL_STYLE) " text-right"} { "Actions" }
                        }
                    }

                    tbody
                    {
                        @for transaction in transactions.iter().take(RECENT_TRANSACTION_COUNT) {
                            (transaction_row(transaction, categories))
                        }
                    }
                }

                @if transactions.is_empty() {
                    p class="text-gray-500 text-center py-8"
                    {
                        "No transactions yet. Add your first transaction!"
                    }
                }
            }
        }
    }
}
