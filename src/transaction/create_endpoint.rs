//! The modal and endpoint for adding a transaction.

use axum::{
    Extension,
    extract::State,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;

use crate::{
    auth::Session,
    dashboard::{DashboardState, dashboard_update_response, mutation_error_response},
    timezone::local_today,
    transaction::{
        TransactionDraft,
        form::{FormMode, transaction_modal},
    },
};

/// Render the modal for adding a transaction, dated today in the local timezone.
pub async fn get_new_transaction_modal(
    State(state): State<DashboardState>,
    Extension(session): Extension<Session>,
) -> Response {
    let categories = state.data.snapshot(&session).categories;
    let draft = TransactionDraft::new(local_today(&state.local_timezone));

    transaction_modal(FormMode::Create, &draft, &categories).into_response()
}

/// Handle the add transaction form submission.
///
/// The draft is validated before the API is contacted.
pub async fn create_transaction_endpoint(
    State(state): State<DashboardState>,
    Extension(session): Extension<Session>,
    Form(draft): Form<TransactionDraft>,
) -> Response {
    match state
        .data
        .create_transaction(&state.api, &session, &draft)
        .await
    {
        Ok(transaction) => {
            tracing::info!("Created transaction {}", transaction.id);
            dashboard_update_response(&state, &session, "Transaction added!")
        }
        Err(error) => mutation_error_response(&state.sessions, &session, error),
    }
}
