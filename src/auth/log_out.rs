//! Log-out confirmation modal and the route handler that ends the session.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use maud::{Markup, html};

use crate::{
    auth::{log_in::LogInNotice, middleware::AuthState},
    endpoints,
    html::{BUTTON_DANGER_STYLE, confirm_dialog},
};

/// Render the modal that asks the user to confirm logging out.
pub async fn get_log_out_modal() -> Markup {
    let confirm_button = html! {
        button
            type="button"
            hx-post=(endpoints::LOG_OUT_API)
            hx-target-error="#alert-container"
            class=(BUTTON_DANGER_STYLE)
        {
            "Yes, log out"
        }
    };

    confirm_dialog(
        "Logout Confirmation",
        "Are you sure you want to log out?",
        &confirm_button,
    )
}

/// End the session and redirect the client to the log-in page.
pub async fn post_log_out(State(state): State<AuthState>) -> Response {
    state.sessions.logout();

    (
        HxRedirect(LogInNotice::LoggedOut.log_in_url()),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}
