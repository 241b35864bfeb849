//! Defines the app level error type and conversions to rendered HTML pages and alerts.
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_htmx::HxRedirect;

use crate::{
    alert::Alert, endpoints, html::error_view, internal_server_error::InternalServerError,
    not_found::NotFoundError,
};

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The API rejected the username and password combination.
    #[error("invalid username or password")]
    InvalidCredentials,

    /// The session token could not be decoded.
    ///
    /// This happens when a persisted token has been tampered with or was
    /// issued in a format the client does not understand.
    #[error("could not decode session token: {0}")]
    InvalidToken(String),

    /// The persisted token could not be read, written or removed.
    #[error("could not access the token file: {0}")]
    TokenStorage(String),

    /// No user is logged in.
    #[error("no active session")]
    NotLoggedIn,

    /// The API no longer accepts the session token, e.g. it expired early or
    /// was revoked.
    #[error("the API rejected the session token")]
    Unauthorized,

    /// The amount entered in a transaction form is not a positive number.
    #[error("\"{0}\" is not a valid amount")]
    InvalidAmount(String),

    /// The transaction form was submitted without selecting a category.
    #[error("a category must be selected")]
    MissingCategory,

    /// The date entered in a transaction form could not be parsed.
    #[error("\"{0}\" is not a valid date")]
    InvalidDate(String),

    /// An empty string was used to create a category name.
    #[error("Category name cannot be empty")]
    EmptyCategoryName,

    /// The requested report period is not one the API supports.
    #[error("\"{0}\" is not a valid report period")]
    InvalidPeriod(String),

    /// The API rejected the submitted data, `0` holds its explanation.
    #[error("{0}")]
    Validation(String),

    /// The API answered with an unexpected status code.
    #[error("the API responded with {status}: {detail}")]
    Api {
        /// The HTTP status code of the response.
        status: u16,
        /// The error detail from the response body, if any.
        detail: String,
    },

    /// The request to the API could not be completed or its response could
    /// not be read.
    #[error("could not reach the API: {0}")]
    Fetch(String),

    /// The requested resource was not found.
    #[error("the requested resource could not be found")]
    NotFound,
}

impl From<reqwest::Error> for Error {
    fn from(value: reqwest::Error) -> Self {
        tracing::error!("request to the API failed: {value}");
        Error::Fetch(value.to_string())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => NotFoundError.into_response(),
            Error::Unauthorized | Error::NotLoggedIn => {
                Redirect::to(endpoints::LOG_IN_VIEW).into_response()
            }
            Error::InvalidPeriod(period) => {
                let page = error_view(
                    "Bad Request",
                    "400",
                    "Invalid Report Period",
                    &format!("\"{period}\" is not a report period, pick one from the list."),
                );

                (StatusCode::BAD_REQUEST, Html(page.into_string())).into_response()
            }
            Error::Fetch(_) | Error::Api { .. } => InternalServerError {
                description: "Could not reach the server",
                fix: "The expense API did not respond as expected. Please try again later.",
            }
            .into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

impl Error {
    /// Whether this error was caused by malformed user input rather than a
    /// failed request.
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidAmount(_)
                | Error::MissingCategory
                | Error::InvalidDate(_)
                | Error::EmptyCategoryName
                | Error::InvalidPeriod(_)
                | Error::Validation(_)
        )
    }

    /// Render the error as an alert for HTMX requests.
    ///
    /// Authentication failures redirect the client to the log-in page
    /// instead since the user cannot fix them without logging in again.
    pub fn into_alert_response(self) -> Response {
        if matches!(self, Error::Unauthorized | Error::NotLoggedIn) {
            return (
                HxRedirect(endpoints::LOG_IN_VIEW.to_owned()),
                StatusCode::SEE_OTHER,
            )
                .into_response();
        }

        let (status_code, alert) = match self {
            Error::InvalidAmount(_)
            | Error::MissingCategory
            | Error::InvalidDate(_)
            | Error::EmptyCategoryName
            | Error::InvalidPeriod(_)
            | Error::Validation(_) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Alert::Error {
                    message: "Please check your input".to_owned(),
                    details: self.to_string(),
                },
            ),
            Error::NotFound => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not find transaction".to_owned(),
                    details: "The transaction could not be found. \
                    Try refreshing the page to see if it has already been deleted."
                        .to_owned(),
                },
            ),
            Error::Fetch(_) => (
                StatusCode::BAD_GATEWAY,
                Alert::Error {
                    message: "Could not reach the server".to_owned(),
                    details: "Check your connection and try again.".to_owned(),
                },
            ),
            Error::Api { status, detail } => (
                StatusCode::BAD_GATEWAY,
                Alert::Error {
                    message: "The server rejected the request".to_owned(),
                    details: if detail.is_empty() {
                        format!("The expense API responded with status {status}.")
                    } else {
                        detail
                    },
                },
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::Error {
                    message: "Something went wrong".to_owned(),
                    details:
                        "An unexpected error occurred, check the server logs for more details."
                            .to_owned(),
                },
            ),
        };

        (status_code, alert.into_html()).into_response()
    }
}
