use maud::{Markup, html};

use crate::{
    category::Category,
    endpoints::{self, format_endpoint},
    html::{BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, modal},
    transaction::{TransactionDraft, TransactionId, TransactionKind},
};

/// Whether the form adds a new transaction or updates an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(TransactionId),
}

impl FormMode {
    fn title(&self) -> &'static str {
        match self {
            FormMode::Create => "Add Transaction",
            FormMode::Edit(_) => "Edit Transaction",
        }
    }

    fn submit_text(&self) -> &'static str {
        match self {
            FormMode::Create => "Add Transaction",
            FormMode::Edit(_) => "Update Transaction",
        }
    }
}

/// The add/edit transaction form inside a modal.
///
/// The form swaps the refreshed dashboard content in on success and shows an
/// alert on failure.
pub fn transaction_modal(mode: FormMode, draft: &TransactionDraft, categories: &[Category]) -> Markup {
    let selected_category = draft.category_id.trim();

    let fields = html! {
        div
        {
            label for="type" class=(FORM_LABEL_STYLE) { "Type" }

            select name="type" id="type" required class=(FORM_TEXT_INPUT_STYLE)
            {
                @for kind in [TransactionKind::Expense, TransactionKind::Income] {
                    option value=(kind.as_str()) selected[draft.kind == kind.as_str()]
                    {
                        (kind.label())
                    }
                }
            }
        }

        div
        {
            label for="amount" class=(FORM_LABEL_STYLE) { "Amount" }

            input
                name="amount"
                id="amount"
                type="number"
                step="0.01"
                min="0.01"
                placeholder="0.00"
                required
                autofocus
                value=(draft.amount)
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label for="description" class=(FORM_LABEL_STYLE) { "Description" }

            input
                name="description"
                id="description"
                type="text"
                placeholder="Description"
                value=(draft.description)
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label for="category_id" class=(FORM_LABEL_STYLE) { "Category" }

            select name="category_id" id="category_id" required class=(FORM_TEXT_INPUT_STYLE)
            {
                @if categories.is_empty() {
                    option value="" { "No categories available" }
                } @else {
                    option value="" { "Select category" }

                    @for category in categories {
                        option
                            value=(category.id)
                            selected[selected_category == category.id.to_string()]
                        {
                            (category.name)
                        }
                    }
                }
            }
        }

        div
        {
            label for="date" class=(FORM_LABEL_STYLE) { "Date" }

            input
                name="date"
                id="date"
                type="date"
                required
                value=(draft.date)
                class=(FORM_TEXT_INPUT_STYLE);
        }
    };

    let form = match mode {
        FormMode::Create => html! {
            form
                hx-post=(endpoints::TRANSACTIONS_API)
                hx-target="#dashboard-content"
                hx-target-error="#alert-container"
                class="w-full space-y-4"
            {
                (fields)
                button type="submit" class=(BUTTON_PRIMARY_STYLE) { (mode.submit_text()) }
            }
        },
        FormMode::Edit(id) => html! {
            form
                hx-put=(format_endpoint(endpoints::TRANSACTION, id))
                hx-target="#dashboard-content"
                hx-target-error="#alert-container"
                class="w-full space-y-4"
            {
                (fields)
                button type="submit" class=(BUTTON_PRIMARY_STYLE) { (mode.submit_text()) }
            }
        },
    };

    modal(mode.title(), &form)
}
