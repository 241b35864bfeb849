//! The modal and endpoint for editing a transaction.

use axum::{
    Extension,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;

use crate::{
    Error,
    auth::Session,
    dashboard::{DashboardState, dashboard_update_response, mutation_error_response},
    transaction::{
        TransactionDraft, TransactionId,
        form::{FormMode, transaction_modal},
    },
};

/// Render the modal for editing the transaction with `transaction_id`,
/// prefilled from the last snapshot.
pub async fn get_edit_transaction_modal(
    State(state): State<DashboardState>,
    Extension(session): Extension<Session>,
    Path(transaction_id): Path<TransactionId>,
) -> Response {
    let Some(transaction) = state.data.transaction(&session, transaction_id) else {
        tracing::warn!("Tried to edit transaction {transaction_id} which is not in the snapshot");
        return Error::NotFound.into_alert_response();
    };

    let categories = state.data.snapshot(&session).categories;
    let draft = TransactionDraft::from_transaction(&transaction);

    transaction_modal(FormMode::Edit(transaction_id), &draft, &categories).into_response()
}

/// Handle the edit transaction form submission.
pub async fn edit_transaction_endpoint(
    State(state): State<DashboardState>,
    Extension(session): Extension<Session>,
    Path(transaction_id): Path<TransactionId>,
    Form(draft): Form<TransactionDraft>,
) -> Response {
    match state
        .data
        .update_transaction(&state.api, &session, transaction_id, &draft)
        .await
    {
        Ok(_) => {
            tracing::info!("Updated transaction {transaction_id}");
            dashboard_update_response(&state, &session, "Transaction updated!")
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
    use axum_extra::extract::Form;
    use scraper::Selector;
    use serde_json::json;
    use time::OffsetDateTime;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{body_json, method, path},
    };

    use crate::{
        api::ApiClient,
        auth::{Session, SessionManager, token::test_tokens::make_token},
        dashboard::DashboardState,
        data_store::{DataStore, test_data::transaction_json},
        test_utils::{
            assert_form_input_with_value, assert_hx_endpoint, assert_valid_html, must_get_form,
            parse_html_fragment,
        },
        transaction::{
            TransactionDraft,
            edit_endpoint::{edit_transaction_endpoint, get_edit_transaction_modal},
        },
    };

    async fn mount_lists(server: &MockServer, amount: f64) {
        Mock::given(method("GET"))
            .and(path("/expenses"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([transaction_json(
                7,
                amount,
                "expense",
                Some((2, "Food"))
            )])))
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path("/categories"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!([{"id": 2, "name": "Food"}])),
            )
            .mount(server)
            .await;
    }

    async fn refreshed_state(
        server: &MockServer,
        dir: &tempfile::TempDir,
    ) -> (DashboardState, Session) {
        let sessions = SessionManager::new(dir.path());
        let exp = OffsetDateTime::now_utc().unix_timestamp() + 3600;
        let session = sessions.activate(&make_token("alice", exp)).unwrap();
        let state = DashboardState {
            api: ApiClient::new(&server.uri()).unwrap(),
            data: DataStore::new(sessions.clone()),
            sessions,
            local_timezone: "Etc/UTC".to_owned(),
        };
        state.data.refresh(&state.api, &session).await.unwrap();

        (state, session)
    }

    #[tokio::test]
    async fn edit_modal_is_prefilled() {
        let dir = tempfile::tempdir().unwrap();
        let server = MockServer::start().await;
        mount_lists(&server, 40.0).await;
        let (state, session) = refreshed_state(&server, &dir).await;

        let response = get_edit_transaction_modal(State(state), Extension(session), Path(7)).await;

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_fragment(response).await;
        assert_valid_html(&html);
        let form = must_get_form(&html);
        assert_hx_endpoint(&form, "/api/transactions/7", "hx-put");
        assert_form_input_with_value(&form, "amount", "number", "40");
        assert_form_input_with_value(&form, "date", "date", "2025-06-01");
    }

    #[tokio::test]
    async fn edit_modal_for_unknown_transaction_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let server = MockServer::start().await;
        mount_lists(&server, 40.0).await;
        let (state, session) = refreshed_state(&server, &dir).await;

        let response = get_edit_transaction_modal(State(state), Extension(session), Path(8)).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn updates_transaction_and_refreshes() {
        let dir = tempfile::tempdir().unwrap();
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/expenses/7"))
            .and(body_json(json!({
                "amount": 55.0,
                "description": "Dinner",
                "date": "2025-06-02",
                "type": "expense",
                "category_id": 2
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(transaction_json(7, 55.0, "expense", Some((2, "Food")))),
            )
            .expect(1)
            .mount(&server)
            .await;
        mount_lists(&server, 40.0).await;
        let (state, session) = refreshed_state(&server, &dir).await;
        let draft = TransactionDraft {
            amount: "55".to_owned(),
            description: "Dinner".to_owned(),
            kind: "expense".to_owned(),
            category_id: "2".to_owned(),
            date: "2025-06-02".to_owned(),
        };

        let response =
            edit_transaction_endpoint(State(state), Extension(session), Path(7), Form(draft)).await;

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_fragment(response).await;
        let alert = html
            .select(&Selector::parse("#alert-container").unwrap())
            .next()
            .expect("alert missing")
            .text()
            .collect::<String>();
        assert!(alert.contains("Transaction updated!"));
    }

    #[tokio::test]
    async fn update_of_deleted_transaction_shows_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/expenses/7"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        mount_lists(&server, 40.0).await;
        let (state, session) = refreshed_state(&server, &dir).await;
        let draft = TransactionDraft::from_transaction(
            &state.data.transaction(&session, 7).expect("transaction missing"),
        );

        let response =
            edit_transaction_endpoint(State(state), Extension(session), Path(7), Form(draft)).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
