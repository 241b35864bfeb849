//! Dashboard HTTP handlers and view rendering.
//!
//! This module contains:
//! - The route handler for displaying the dashboard page
//! - The partial returned by every mutation so htmx can swap in fresh content
//! - The state shared by the dashboard and the handlers that mutate its data

use axum::{
    Extension,
    extract::{FromRef, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use maud::{Markup, html};
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    alert::{Alert, deserialize_notice},
    api::ApiClient,
    auth::{Session, SessionManager},
    dashboard::{
        aggregation::summarize, cards::summary_cards_view, charts::charts_view,
        tables::recent_transactions_table,
    },
    data_store::{DataStore, Snapshot},
    endpoints,
    html::{
        BUTTON_SECONDARY_STYLE, HeadElement, PAGE_CONTAINER_STYLE, TOOLBAR_BUTTON_STYLE, base,
        close_modal_oob,
    },
};

/// The state needed for displaying and changing the dashboard.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The client for the remote expense API.
    pub api: ApiClient,
    /// The logged in user's session.
    pub sessions: SessionManager,
    /// The transactions and categories shown on the dashboard.
    pub data: DataStore,
    /// The local timezone as a canonical timezone name, e.g. "Asia/Kolkata".
    pub local_timezone: String,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            api: state.api.clone(),
            sessions: state.sessions.clone(),
            data: state.data.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// An error shown on the dashboard after being sent back to it from a
/// request that could not complete, e.g. a report download.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DashboardNotice {
    /// The API could not produce the requested PDF report.
    ReportFailed,
}

impl DashboardNotice {
    fn message(&self) -> &'static str {
        match self {
            DashboardNotice::ReportFailed => "Failed to generate PDF",
        }
    }

    /// The dashboard URL that shows this notice.
    pub fn dashboard_url(&self) -> String {
        let query = serde_urlencoded::to_string([("notice", self)]).unwrap_or_default();

        format!("{}?{query}", endpoints::DASHBOARD_VIEW)
    }
}

/// The query string accepted by the dashboard page.
#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    /// The notice to show above the dashboard. Unknown values are ignored.
    #[serde(default, deserialize_with = "deserialize_notice")]
    pub notice: Option<DashboardNotice>,
}

/// Display a page with an overview of the user's data.
///
/// The data is refreshed on every visit. If the refresh fails the last
/// snapshot is shown along with an alert.
pub async fn get_dashboard_page(
    State(state): State<DashboardState>,
    Extension(session): Extension<Session>,
    Query(query): Query<DashboardQuery>,
) -> Response {
    let alert = match state.data.refresh(&state.api, &session).await {
        Ok(()) => None,
        Err(Error::Unauthorized) => {
            tracing::info!("The API rejected the token of {}, logging out", session.subject);
            state.sessions.logout_if_current(&session);
            return Redirect::to(endpoints::LOG_IN_VIEW).into_response();
        }
        Err(Error::NotLoggedIn) => return Redirect::to(endpoints::LOG_IN_VIEW).into_response(),
        Err(error) => {
            tracing::error!("Failed to fetch data for the dashboard: {error}");
            Some(Alert::Error {
                message: "Failed to fetch data".to_owned(),
                details: error.to_string(),
            })
        }
    };

    let snapshot = state.data.snapshot(&session);

    dashboard_view(&session, &snapshot, alert, query.notice).into_response()
}

fn toolbar_button(label: &str, modal_endpoint: &str, colour_style: &str) -> Markup {
    html! {
        button
            type="button"
            hx-get=(modal_endpoint)
            hx-target="#modal-container"
            hx-target-error="#alert-container"
            class={(TOOLBAR_BUTTON_STYLE) " " (colour_style)}
        {
            (label)
        }
    }
}

fn dashboard_view(
    session: &Session,
    snapshot: &Snapshot,
    alert: Option<Alert>,
    notice: Option<DashboardNotice>,
) -> Markup {
    let content = html!(
        div class=(PAGE_CONTAINER_STYLE)
        {
            header class="w-full max-w-7xl flex flex-wrap justify-between items-center gap-4 mb-6"
            {
                div
                {
                    h1 class="text-2xl font-bold" { "Expense Tracker" }
                    p class="text-gray-600 dark:text-gray-400" { "Welcome, " (session.subject) }
                }

                div class="flex gap-3 flex-wrap"
                {
                    (toolbar_button(
                        "Add Transaction",
                        endpoints::NEW_TRANSACTION_MODAL,
                        "bg-blue-600 hover:bg-blue-700",
                    ))
                    (toolbar_button(
                        "Add Category",
                        endpoints::NEW_CATEGORY_MODAL,
                        "bg-green-600 hover:bg-green-700",
                    ))
                    (toolbar_button(
                        "Download PDF",
                        endpoints::REPORT_MODAL,
                        "bg-purple-600 hover:bg-purple-700",
                    ))
                    (toolbar_button(
                        "Log out",
                        endpoints::LOG_OUT_MODAL,
                        "bg-red-500 hover:bg-red-600",
                    ))
                }
            }

            @if let Some(notice) = notice {
                div id="dashboard-notice" class="w-full max-w-7xl"
                {
                    (Alert::error(notice.message()).into_html())
                }
            }

            @if let Some(alert) = alert {
                div id="dashboard-alert" class="w-full max-w-7xl"
                {
                    (alert.into_html())
                    a href=(endpoints::DASHBOARD_VIEW) class=(BUTTON_SECONDARY_STYLE) { "Retry" }
                }
            }

            div id="dashboard-content" class="w-full max-w-7xl"
            {
                (dashboard_content(snapshot))
            }
        }
    );

    let scripts = [HeadElement::ScriptLink(
        "/static/echarts.6.0.0.min.js".to_owned(),
    )];

    base("Dashboard", &scripts, &content)
}

/// Renders the cards, charts and table for `snapshot`.
///
/// This is the content of `#dashboard-content` and is swapped in by htmx
/// after every successful mutation.
pub(crate) fn dashboard_content(snapshot: &Snapshot) -> Markup {
    let summary = summarize(&snapshot.transactions, &snapshot.categories);

    html! {
        (summary_cards_view(&summary))
        (charts_view(&summary))
        (recent_transactions_table(&snapshot.transactions, &snapshot.categories))
    }
}

/// The response to a successful mutation: the refreshed dashboard content,
/// the modal closed and a success alert.
pub(crate) fn dashboard_update_response(
    state: &DashboardState,
    session: &Session,
    message: &str,
) -> Response {
    let snapshot = state.data.snapshot(session);

    html! {
        (dashboard_content(&snapshot))
        (close_modal_oob())
        (Alert::success(message).into_oob_html())
    }
    .into_response()
}

/// The response to a failed mutation.
///
/// `session` is logged out if the API no longer accepts its token and it is
/// still the active session.
pub(crate) fn mutation_error_response(
    sessions: &SessionManager,
    session: &Session,
    error: Error,
) -> Response {
    if error.is_validation_error() {
        tracing::debug!("Rejected invalid input: {error}");
    } else {
        tracing::error!("Could not complete the request: {error}");
    }

    if error == Error::Unauthorized {
        sessions.logout_if_current(session);
    }

    error.into_alert_response()
}
