//! The registration page for creating an account with the expense API.

use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    auth::log_in::{LogInNotice, LoginState},
    endpoints,
    html::{BUTTON_PRIMARY_STYLE, base, labelled_input, link, loading_spinner, log_in_register},
};

pub const REGISTRATION_FAILED_ERROR_MSG: &str = "Registration failed";

/// The data submitted by the registration form.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password: String,
}

fn registration_form(username: &str, email: &str, error_message: Option<&str>) -> Markup {
    html! {
        form
            hx-post=(endpoints::USERS)
            hx-swap="outerHTML"
            hx-indicator="#indicator"
            hx-disabled-elt="#username, #email, #password, #submit-button"
            class="space-y-4 md:space-y-6"
        {
            (labelled_input("username", "Username", "text", username, "Choose a username"))
            (labelled_input("email", "Email", "email", email, "name@example.com"))
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
                "Register"
            }

            div class="text-sm font-light text-gray-500 dark:text-gray-400"
            {
                "Already have an account? "
                (link(endpoints::LOG_IN_VIEW, "Log in here"))
            }
        }
    }
}

/// Display the registration page, or redirect to the dashboard if already logged in.
pub async fn get_register_page(State(state): State<LoginState>) -> Response {
    if state.sessions.current().is_some() {
        return Redirect::to(endpoints::DASHBOARD_VIEW).into_response();
    }

    let form = registration_form("", "", None);
    let content = log_in_register("Create an account", &form);

    base("Register", &[], &content).into_response()
}

/// Handler for registration requests via the POST method.
///
/// On success the client is redirected to the log-in page, the new user
/// still has to log in. Otherwise the form is returned with the reason the
/// account could not be created.
pub async fn register_user(
    State(state): State<LoginState>,
    Form(form): Form<RegisterForm>,
) -> Response {
    let result = state
        .sessions
        .register(
            &state.api,
            form.username.trim(),
            form.email.trim(),
            &form.password,
        )
        .await;

    match result {
        Ok(()) => (
            HxRedirect(LogInNotice::Registered.log_in_url()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(Error::Validation(detail)) => {
            registration_form(&form.username, &form.email, Some(&detail)).into_response()
        }
        Err(error) => {
            tracing::error!("Unhandled error while registering a user: {error}");
            registration_form(
                &form.username,
                &form.email,
                Some(REGISTRATION_FAILED_ERROR_MSG),
            )
            .into_response()
        }
    }
}
