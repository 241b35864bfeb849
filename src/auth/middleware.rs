//! Authentication middleware that requires an active session and handles redirects.

use axum::{
    extract::{FromRef, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_htmx::HxRedirect;

use crate::{AppState, auth::SessionManager, endpoints};

/// The state needed for the auth middleware
#[derive(Debug, Clone)]
pub struct AuthState {
    /// Tracks the active session.
    pub sessions: SessionManager,
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            sessions: state.sessions.clone(),
        }
    }
}

/// Middleware function that checks for an active session.
/// The session is placed into the request extensions and the request executed
/// normally if there is one, otherwise the response from `get_redirect` is returned.
///
/// **Note**: Route handlers can use the function argument `Extension(session): Extension<Session>` to receive the session.
#[inline]
async fn auth_guard_internal(
    state: AuthState,
    mut request: Request,
    next: Next,
    get_redirect: impl Fn(&str) -> Response,
) -> Response {
    let Some(session) = state.sessions.current() else {
        tracing::debug!(
            "No active session for {}. Redirecting to log in page.",
            request.uri().path()
        );
        return get_redirect(endpoints::LOG_IN_VIEW);
    };

    request.extensions_mut().insert(session);

    next.run(request).await
}

/// Middleware function that checks for an active session.
/// The session is placed into the request and then the request executed normally if the user is logged in, otherwise a redirect to the log-in page is returned.
pub async fn auth_guard(State(state): State<AuthState>, request: Request, next: Next) -> Response {
    auth_guard_internal(state, request, next, |redirect_url| {
        Redirect::to(redirect_url).into_response()
    })
    .await
}

/// Middleware function that checks for an active session.
/// The session is placed into the request and then the request executed normally if the user is logged in, otherwise a HTMX redirect to the log-in page is returned.
pub async fn auth_guard_hx(
    State(state): State<AuthState>,
    request: Request,
    next: Next,
) -> Response {
    auth_guard_internal(state, request, next, |redirect_url| {
        (HxRedirect(redirect_url.to_owned()), StatusCode::OK).into_response()
    })
    .await
}
