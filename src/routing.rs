//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Router, middleware,
    response::Redirect,
    routing::{get, post, put},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    auth::{
        auth_guard, auth_guard_hx, get_log_in_page, get_log_out_modal, get_register_page,
        post_log_in, post_log_out, register_user,
    },
    category::{create_category_endpoint, get_new_category_modal},
    dashboard::get_dashboard_page,
    endpoints,
    internal_server_error::get_internal_server_error_page,
    not_found::get_404_not_found,
    report::{download_report, get_report_modal},
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, edit_transaction_endpoint,
        get_delete_transaction_modal, get_edit_transaction_modal, get_new_transaction_modal,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::LOG_IN_VIEW, get(get_log_in_page))
        .route(endpoints::LOG_IN_API, post(post_log_in))
        .route(endpoints::REGISTER_VIEW, get(get_register_page))
        .route(endpoints::USERS, post(register_user))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        );

    let protected_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
        .route(endpoints::REPORT_PDF, get(download_report))
        .layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    // Modals and mutations are requested by HTMX, so they need the HX-REDIRECT header for auth redirects to work properly.
    let protected_routes = protected_routes.merge(
        Router::new()
            .route(
                endpoints::NEW_TRANSACTION_MODAL,
                get(get_new_transaction_modal),
            )
            .route(
                endpoints::EDIT_TRANSACTION_MODAL,
                get(get_edit_transaction_modal),
            )
            .route(
                endpoints::DELETE_TRANSACTION_MODAL,
                get(get_delete_transaction_modal),
            )
            .route(endpoints::NEW_CATEGORY_MODAL, get(get_new_category_modal))
            .route(endpoints::REPORT_MODAL, get(get_report_modal))
            .route(endpoints::LOG_OUT_MODAL, get(get_log_out_modal))
            .route(endpoints::LOG_OUT_API, post(post_log_out))
            .route(
                endpoints::TRANSACTIONS_API,
                post(create_transaction_endpoint),
            )
            .route(
                endpoints::TRANSACTION,
                put(edit_transaction_endpoint).delete(delete_transaction_endpoint),
            )
            .route(endpoints::CATEGORIES_API, post(create_category_endpoint))
            .layer(middleware::from_fn_with_state(state.clone(), auth_guard_hx)),
    );

    protected_routes
        .merge(unprotected_routes)
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the dashboard page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::DASHBOARD_VIEW)
}


#[cfg(test)]
mod router_tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::json;
    use time::OffsetDateTime;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path},
    };

    use crate::{
        AppState,
        auth::token::test_tokens::make_token,
        build_router,
        data_store::test_data::transaction_json,
        endpoints,
    };

    fn test_server(api_url: &str, dir: &tempfile::TempDir) -> (TestServer, AppState) {
        let state = AppState::new(api_url, dir.path(), "Etc/UTC").unwrap();
        let server =
            TestServer::try_new(build_router(state.clone())).expect("Could not create test server.");

        (server, state)
    }

    async fn mock_api() -> MockServer {
        let server = MockServer::start().await;
        let exp = OffsetDateTime::now_utc().unix_timestamp() + 3600;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": make_token("alice", exp),
                "token_type": "bearer"
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/expenses"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([transaction_json(
                1,
                250.0,
                "expense",
                Some((1, "Food"))
            )])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/categories"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!([{"id": 1, "name": "Food"}])),
            )
            .mount(&server)
            .await;

        server
    }

    #[tokio::test]
    async fn dashboard_redirects_to_log_in_without_session() {
        let dir = tempfile::tempdir().unwrap();
        let (server, _) = test_server("http://127.0.0.1:1", &dir);

        let response = server.get(endpoints::DASHBOARD_VIEW).await;

        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(response.header("location"), endpoints::LOG_IN_VIEW);
    }

    #[tokio::test]
    async fn modal_sends_hx_redirect_without_session() {
        let dir = tempfile::tempdir().unwrap();
        let (server, _) = test_server("http://127.0.0.1:1", &dir);

        let response = server.get(endpoints::NEW_TRANSACTION_MODAL).await;

        response.assert_status_ok();
        assert_eq!(response.header("hx-redirect"), endpoints::LOG_IN_VIEW);
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let (server, _) = test_server("http://127.0.0.1:1", &dir);

        let response = server.get("/does-not-exist").await;

        response.assert_status_not_found();
    }

    #[tokio::test]
    async fn log_in_then_view_dashboard_then_log_out() {
        let dir = tempfile::tempdir().unwrap();
        let api = mock_api().await;
        let (server, state) = test_server(&api.uri(), &dir);

        let response = server
            .post(endpoints::LOG_IN_API)
            .form(&[("username", "alice"), ("password", "hunter2")])
            .await;
        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(response.header("hx-redirect"), endpoints::DASHBOARD_VIEW);

        let response = server.get(endpoints::DASHBOARD_VIEW).await;
        response.assert_status_ok();
        let page = response.text();
        assert!(page.contains("Welcome, alice"));
        assert!(page.contains("₹250.00"));

        let response = server.get(endpoints::LOG_IN_VIEW).await;
        response.assert_status(StatusCode::SEE_OTHER);

        let response = server.post(endpoints::LOG_OUT_API).await;
        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(
            response.header("hx-redirect"),
            "/log_in?notice=logged_out"
        );
        assert_eq!(state.sessions.current(), None);
    }
}
