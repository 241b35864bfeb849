//! The confirmation modal and endpoint for deleting a transaction.

use axum::{
    Extension,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use maud::html;

use crate::{
    auth::Session,
    dashboard::{DashboardState, dashboard_update_response, mutation_error_response},
    endpoints::{self, format_endpoint},
    html::{BUTTON_DANGER_STYLE, confirm_dialog},
    transaction::TransactionId,
};

/// Ask the user to confirm deleting the transaction with `transaction_id`.
///
/// Nothing is deleted until the confirm button in the modal is pressed.
pub async fn get_delete_transaction_modal(Path(transaction_id): Path<TransactionId>) -> Response {
    let confirm_button = html! {
        button
            type="button"
            hx-delete=(format_endpoint(endpoints::TRANSACTION, transaction_id))
            hx-target="#dashboard-content"
            hx-target-error="#alert-container"
            class=(BUTTON_DANGER_STYLE)
        {
            "Yes, delete"
        }
    };

    confirm_dialog(
        "Delete Confirmation",
        "Do you really want to delete this transaction?",
        &confirm_button,
    )
    .into_response()
}

/// Delete the transaction with `transaction_id` and respond with the refreshed dashboard.
pub async fn delete_transaction_endpoint(
    State(state): State<DashboardState>,
    Extension(session): Extension<Session>,
    Path(transaction_id): Path<TransactionId>,
) -> Response {
    match state
        .data
        .delete_transaction(&state.api, &session, transaction_id)
        .await
    {
        Ok(()) => {
            tracing::info!("Deleted transaction {transaction_id}");
            dashboard_update_response(&state, &session, "Transaction deleted!")
        }
        Err(error) => mutation_error_response(&state.sessions, &session, error),
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        Extension,
        extract::{Path, State},
        http::StatusCode,
    };
    use scraper::Selector;
    use serde_json::json;
    use time::OffsetDateTime;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path},
    };

    use crate::{
        api::ApiClient,
        auth::{SessionManager, token::test_tokens::make_token},
        dashboard::DashboardState,
        data_store::DataStore,
        test_utils::{assert_valid_html, parse_html_fragment},
        transaction::delete_endpoint::{delete_transaction_endpoint, get_delete_transaction_modal},
    };

    #[tokio::test]
    async fn modal_asks_for_confirmation() {
        let response = get_delete_transaction_modal(Path(7)).await;

        let html = parse_html_fragment(response).await;
        assert_valid_html(&html);
        let text = html.root_element().text().collect::<String>();
        assert!(text.contains("Delete Confirmation"));
        assert!(text.contains("Do you really want to delete this transaction?"));
        let confirm = html
            .select(&Selector::parse("button[hx-delete]").unwrap())
            .next()
            .expect("No confirm button found");
        assert_eq!(
            confirm.value().attr("hx-delete"),
            Some("/api/transactions/7")
        );
    }

    #[tokio::test]
    async fn deletes_transaction_and_refreshes() {
        let dir = tempfile::tempdir().unwrap();
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/expenses/7"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/expenses"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/categories"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;
        let sessions = SessionManager::new(dir.path());
        let exp = OffsetDateTime::now_utc().unix_timestamp() + 3600;
        let session = sessions.activate(&make_token("alice", exp)).unwrap();
        let state = DashboardState {
            api: ApiClient::new(&server.uri()).unwrap(),
            data: DataStore::new(sessions.clone()),
            sessions,
            local_timezone: "Etc/UTC".to_owned(),
        };

        let response = delete_transaction_endpoint(State(state), Extension(session), Path(7)).await;

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_fragment(response).await;
        let text = html.root_element().text().collect::<String>();
        assert!(text.contains("Transaction deleted!"));
        assert!(text.contains("No transactions yet"));
    }

    #[tokio::test]
    async fn rejected_token_logs_out() {
        let dir = tempfile::tempdir().unwrap();
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/expenses/7"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;
        let sessions = SessionManager::new(dir.path());
        let exp = OffsetDateTime::now_utc().unix_timestamp() + 3600;
        let session = sessions.activate(&make_token("alice", exp)).unwrap();
        let state = DashboardState {
            api: ApiClient::new(&server.uri()).unwrap(),
            data: DataStore::new(sessions.clone()),
            sessions: sessions.clone(),
            local_timezone: "Etc/UTC".to_owned(),
        };

        let response = delete_transaction_endpoint(State(state), Extension(session), Path(7)).await;

        assert!(response.headers().get("hx-redirect").is_some());
        assert_eq!(sessions.current(), None);
    }

    #[tokio::test]
    async fn rejected_token_of_replaced_session_keeps_new_session() {
        let dir = tempfile::tempdir().unwrap();
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/expenses/7"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;
        let sessions = SessionManager::new(dir.path());
        let exp = OffsetDateTime::now_utc().unix_timestamp() + 3600;
        let alice = sessions.activate(&make_token("alice", exp)).unwrap();
        let bob = sessions.activate(&make_token("bob", exp)).unwrap();
        let state = DashboardState {
            api: ApiClient::new(&server.uri()).unwrap(),
            data: DataStore::new(sessions.clone()),
            sessions: sessions.clone(),
            local_timezone: "Etc/UTC".to_owned(),
        };

        delete_transaction_endpoint(State(state), Extension(alice), Path(7)).await;

        assert_eq!(sessions.current(), Some(bob));
    }
}
