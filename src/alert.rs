//! Alert system for displaying success and error messages to users.
//!
//! Alerts are transient notifications that are swapped into the
//! `#alert-container` element of the base page, either as the target of a
//! failed HTMX request or out-of-band next to a successful response.

use maud::{Markup, html};
use serde::{
    Deserialize, Deserializer,
    de::{DeserializeOwned, IntoDeserializer, value},
};

/// A dismissible notification.
#[derive(Debug, Clone, PartialEq)]
pub enum Alert {
    /// An action completed.
    Success {
        /// The headline of the alert.
        message: String,
        /// Optional extra text shown below the headline.
        details: String,
    },
    /// An action failed.
    Error {
        /// The headline of the alert.
        message: String,
        /// Optional extra text shown below the headline.
        details: String,
    },
}

impl Alert {
    /// Create a success alert without details.
    pub fn success(message: &str) -> Self {
        Self::Success {
            message: message.to_owned(),
            details: String::new(),
        }
    }

    /// Create an error alert without details.
    pub fn error(message: &str) -> Self {
        Self::Error {
            message: message.to_owned(),
            details: String::new(),
        }
    }

    /// Render the alert for swapping into the alert container.
    pub fn into_html(self) -> Markup {
        let (container_style, message, details) = match self {
            Alert::Success { message, details } => (
                "p-4 mb-4 text-sm text-green-800 rounded-lg bg-green-50 \
                dark:bg-gray-800 dark:text-green-400 shadow-lg",
                message,
                details,
            ),
            Alert::Error { message, details } => (
                "p-4 mb-4 text-sm text-red-800 rounded-lg bg-red-50 \
                dark:bg-gray-800 dark:text-red-400 shadow-lg",
                message,
                details,
            ),
        };

        html! {
            div class=(container_style) role="alert"
            {
                div class="flex items-start justify-between gap-4"
                {
                    div
                    {
                        span class="font-semibold" { (message) }

                        @if !details.is_empty() {
                            p class="mt-1" { (details) }
                        }
                    }

                    button
                        type="button"
                        class="font-bold"
                        aria-label="Dismiss"
                        onclick="this.closest('[role=alert]').remove()"
                    {
                        "×"
                    }
                }
            }
        }
    }

    /// Render the alert so that it replaces the alert container out-of-band,
    /// e.g. alongside a partial that targets another element.
    pub fn into_oob_html(self) -> Markup {
        html! {
            div
                id="alert-container"
                hx-swap-oob="true"
                class="w-full max-w-md px-4"
                style="position: fixed; bottom: 1rem; left: 50%; transform: translateX(-50%); z-index: 9999;"
            {
                (self.into_html())
            }
        }
    }
}

/// Deserialize an optional notice from a query string, treating values that
/// do not name a notice as absent.
///
/// Use with `#[serde(default, deserialize_with = "deserialize_notice")]`.
pub fn deserialize_notice<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw = Option::<String>::deserialize(deserializer)?;

    Ok(raw.and_then(|raw| {
        T::deserialize(IntoDeserializer::<value::Error>::into_deserializer(raw)).ok()
    }))
}
