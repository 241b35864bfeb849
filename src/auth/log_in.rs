//! This file defines the routes for displaying the log-in page and handling log-in requests.
//! The session module handles the lower level token and expiry logic.

use axum::{
    Form,
    extract::{FromRef, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    alert::{Alert, deserialize_notice},
    api::ApiClient,
    auth::SessionManager,
    endpoints,
    html::{BUTTON_PRIMARY_STYLE, base, labelled_input, link, loading_spinner, log_in_register},
};

/// Shown when the API rejects the username and password.
pub const INVALID_CREDENTIALS_ERROR_MSG: &str = "Invalid username or password";
/// Shown for any other log-in failure.
pub const LOG_IN_FAILED_ERROR_MSG: &str = "Login failed. Please try again.";

/// A message shown above the log-in form after being sent there from another page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogInNotice {
    /// The user just created an account.
    Registered,
    /// The user just logged out.
    LoggedOut,
}

impl LogInNotice {
    fn message(&self) -> &'static str {
        match self {
            LogInNotice::Registered => "Registration successful! Please login.",
            LogInNotice::LoggedOut => "Logged out successfully",
        }
    }

    /// The log-in page URL that shows this notice.
    pub fn log_in_url(&self) -> String {
        let query = serde_urlencoded::to_string([("notice", self)]).unwrap_or_default();

        format!("{}?{query}", endpoints::LOG_IN_VIEW)
    }
}

/// The query string accepted by the log-in page.
#[derive(Debug, Default, Deserialize)]
pub struct LogInQuery {
    /// The notice to show above the form. Unknown values are ignored.
    #[serde(default, deserialize_with = "deserialize_notice")]
    pub notice: Option<LogInNotice>,
}

fn log_in_form(username: &str, error_message: Option<&str>) -> Markup {
    html! {
        form
            hx-post=(endpoints::LOG_IN_API)
            hx-swap="outerHTML"
            hx-indicator="#indicator"
            hx-disabled-elt="#username, #password, #submit-button"
            class="space-y-4 md:space-y-6"
        {
            (labelled_input("username", "Username", "text", username, "Enter your username"))
            (labelled_input("password", "Password", "password", "", "••••••••"))

            @if let Some(error_message) = error_message {
                p class="text-sm text-red-600 dark:text-red-400" { (error_message) }
            }

            button
                type="submit" id="submit-button" tabindex="0"
                class=(BUTTON_PRIMARY_STYLE)
            {
                span class="inline htmx-indicator" id="indicator"
                {
                    (loading_spinner())
                }
                "Log in"
            }

            div class="text-sm font-light text-gray-500 dark:text-gray-400"
            {
                "Don't have an account? "
                (link(endpoints::REGISTER_VIEW, "Register here"))
            }
        }
    }
}

/// The state needed to perform a login.
#[derive(Debug, Clone)]
pub struct LoginState {
    /// The client used to request tokens.
    pub api: ApiClient,
    /// Receives the session on a successful log-in.
    pub sessions: SessionManager,
}

impl FromRef<AppState> for LoginState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            api: state.api.clone(),
            sessions: state.sessions.clone(),
        }
    }
}

/// Display the log-in page, or redirect to the dashboard if already logged in.
pub async fn get_log_in_page(
    State(state): State<LoginState>,
    Query(query): Query<LogInQuery>,
) -> Response {
    if state.sessions.current().is_some() {
        return Redirect::to(endpoints::DASHBOARD_VIEW).into_response();
    }

    let form = log_in_form("", None);
    let content = html! {
        @if let Some(notice) = query.notice {
            div class="w-full max-w-md mx-auto px-6 pt-8"
            {
                (Alert::success(notice.message()).into_html())
            }
        }

        (log_in_register("Log in to your account", &form))
    };

    base("Log In", &[], &content).into_response()
}

/// The data submitted by the log-in form.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LogInData {
    /// The username typed by the user, surrounding whitespace is ignored.
    pub username: String,
    /// The password, sent to the API as typed.
    pub password: String,
}

/// Handler for log-in requests via the POST method.
///
/// On a successful log-in request, the session is activated and the client is redirected to the dashboard page.
/// Otherwise, the form is returned with an error message explaining the problem.
pub async fn post_log_in(
    State(state): State<LoginState>,
    Form(user_data): Form<LogInData>,
) -> Response {
    match state
        .sessions
        .login(&state.api, user_data.username.trim(), &user_data.password)
        .await
    {
        Ok(_) => (
            HxRedirect(endpoints::DASHBOARD_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(Error::InvalidCredentials) => {
            log_in_form(&user_data.username, Some(INVALID_CREDENTIALS_ERROR_MSG)).into_response()
        }
        Err(error) => {
            tracing::error!("Unhandled error while logging in: {error}");
            log_in_form(&user_data.username, Some(LOG_IN_FAILED_ERROR_MSG)).into_response()
        }
    }
}
