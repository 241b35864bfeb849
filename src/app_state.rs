//! Implements a struct that holds the state of the client server.

use std::path::Path;

use crate::{Error, api::ApiClient, auth::SessionManager, data_store::DataStore};

/// The state shared by every request handler.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The client for the remote expense API.
    pub api: ApiClient,

    /// The logged in user's session, if any.
    pub sessions: SessionManager,

    /// The transactions and categories fetched for the session.
    pub data: DataStore,

    /// The local timezone as a canonical timezone name, e.g. "Asia/Kolkata".
    pub local_timezone: String,
}

impl AppState {
    /// Create a new [AppState] with no active session.
    ///
    /// `api_url` is the base URL of the expense API, `state_dir` is where the
    /// session token is persisted and `local_timezone` should be a valid,
    /// canonical timezone name, e.g. "Asia/Kolkata".
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(api_url: &str, state_dir: &Path, local_timezone: &str) -> Result<Self, Error> {
        let api = ApiClient::new(api_url)?;
        let sessions = SessionManager::new(state_dir);
        let data = DataStore::new(sessions.clone());

        Ok(Self {
            api,
            sessions,
            data,
            local_timezone: local_timezone.to_owned(),
        })
    }
}
