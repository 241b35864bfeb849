//! Owns the logged in user's session and logs them out when their token expires.

use std::{
    path::Path,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use time::OffsetDateTime;
use tokio::task::AbortHandle;

use crate::{
    Error,
    api::{ApiClient, NewUser},
    auth::{store::TokenStore, token::decode_token},
};

/// An authenticated session with the expense API.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    /// The bearer token sent with every API request.
    pub token: String,
    /// The username the token was issued to.
    pub subject: String,
    /// When the API stops accepting the token.
    pub expires_at: OffsetDateTime,
    /// Increases every time a session is activated, so results fetched for a
    /// previous session can be told apart from results for this one.
    pub generation: u64,
}

#[derive(Debug, Default)]
struct Inner {
    session: Option<Session>,
    watchdog: Option<AbortHandle>,
    generation: u64,
}

/// Holds at most one [Session] and keeps the persisted token in sync with it.
///
/// Cloning the manager is cheap and every clone refers to the same session.
#[derive(Debug, Clone)]
pub struct SessionManager {
    inner: Arc<Mutex<Inner>>,
    store: TokenStore,
}

impl SessionManager {
    /// Create a manager with no active session that persists tokens in `state_dir`.
    pub fn new(state_dir: &Path) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner::default())),
            store: TokenStore::new(state_dir),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // The session is only replaced as a whole, so a poisoned lock still
        // holds a consistent value.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Exchange `username` and `password` for a token and activate it.
    ///
    /// # Errors
    /// - [Error::InvalidCredentials] if the API rejects the credentials.
    /// - [Error::Fetch] if the API cannot be reached.
    /// - [Error::InvalidToken] if the issued token cannot be decoded or has
    ///   already expired.
    /// - [Error::TokenStorage] if the token cannot be persisted.
    ///
    /// The current session is left untouched on error.
    pub async fn login(
        &self,
        api: &ApiClient,
        username: &str,
        password: &str,
    ) -> Result<Session, Error> {
        let token = api.issue_token(username, password).await?;

        let expires_at = decode_token(&token)?.expires_at()?;
        if expires_at <= OffsetDateTime::now_utc() {
            tracing::warn!("the API issued {username} a token that expired at {expires_at}");
            return Err(Error::InvalidToken(format!(
                "the token expired at {expires_at}"
            )));
        }

        let session = self.activate(&token)?;

        tracing::info!("{} logged in", session.subject);

        Ok(session)
    }

    /// Create a user account. This never logs the new user in.
    pub async fn register(
        &self,
        api: &ApiClient,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<(), Error> {
        api.register(&NewUser {
            username,
            email,
            password,
        })
        .await?;

        tracing::info!("registered user {username}");

        Ok(())
    }

    /// Reactivate the session from the persisted token, if there is one.
    ///
    /// Returns `Ok(None)` if no token is stored or the stored token has
    /// already expired.
    ///
    /// # Errors
    /// Returns [Error::InvalidToken] if the stored token cannot be decoded, the
    /// caller should then call [SessionManager::logout] to discard it.
    pub fn restore(&self) -> Result<Option<Session>, Error> {
        let Some(token) = self.store.load()? else {
            return Ok(None);
        };

        let session = self.activate(&token)?;

        if self.is_current(&session) {
            tracing::info!("restored session for {}", session.subject);
            Ok(Some(session))
        } else {
            Ok(None)
        }
    }

    /// Clear the session, cancel its watchdog and remove the persisted token.
    ///
    /// Logging out without a session does nothing.
    pub fn logout(&self) {
        let previous = {
            let mut inner = self.lock();

            if let Some(watchdog) = inner.watchdog.take() {
                watchdog.abort();
            }

            inner.session.take()
        };

        if let Err(error) = self.store.clear() {
            tracing::error!("could not remove the persisted token: {error}");
        }

        if let Some(session) = previous {
            tracing::info!("{} logged out", session.subject);
        }
    }

    /// Log out `session` only if it is still the active session.
    ///
    /// A request made for a session that has since been replaced must not end
    /// the session that replaced it. Returns whether `session` was logged out.
    pub fn logout_if_current(&self, session: &Session) -> bool {
        match self.end_generation(session.generation) {
            Some(ended) => {
                tracing::info!("{} logged out", ended.subject);
                true
            }
            None => {
                tracing::debug!(
                    "ignoring log out for replaced session generation {}",
                    session.generation
                );
                false
            }
        }
    }

    /// The active session, if any.
    pub fn current(&self) -> Option<Session> {
        self.lock().session.clone()
    }

    /// Whether `session` is still the active session.
    pub fn is_current(&self, session: &Session) -> bool {
        self.lock()
            .session
            .as_ref()
            .is_some_and(|current| current.generation == session.generation)
    }

    /// Make `token` the active session, persist it and arm the expiry watchdog.
    ///
    /// A token that has already expired is logged out before this function returns.
    ///
    /// # Errors
    /// Returns [Error::InvalidToken] if `token` cannot be decoded or
    /// [Error::TokenStorage] if it cannot be persisted. The previous session
    /// stays active on error.
    pub(crate) fn activate(&self, token: &str) -> Result<Session, Error> {
        let claims = decode_token(token)?;
        let expires_at = claims.expires_at()?;

        self.store.save(token)?;

        let session = {
            let mut inner = self.lock();

            if let Some(watchdog) = inner.watchdog.take() {
                watchdog.abort();
            }

            inner.generation += 1;
            let session = Session {
                token: token.to_owned(),
                subject: claims.sub,
                expires_at,
                generation: inner.generation,
            };
            inner.session = Some(session.clone());

            let remaining = expires_at - OffsetDateTime::now_utc();
            if remaining.is_positive() {
                let manager = self.clone();
                let generation = session.generation;

                let task = tokio::spawn(async move {
                    tokio::time::sleep(remaining.unsigned_abs()).await;
                    manager.expire(generation);
                });
                inner.watchdog = Some(task.abort_handle());
            }

            session
        };

        if !(expires_at - OffsetDateTime::now_utc()).is_positive() {
            tracing::info!("the session for {} has already expired", session.subject);
            self.logout();
        }

        Ok(session)
    }

    /// Log out the session with `generation` if it is still the active one.
    fn expire(&self, generation: u64) {
        if let Some(session) = self.end_generation(generation) {
            tracing::info!("the session for {} expired", session.subject);
        }
    }

    /// Clear the session with `generation`, its watchdog and the persisted
    /// token, returning the cleared session. Does nothing if another session
    /// is active.
    fn end_generation(&self, generation: u64) -> Option<Session> {
        let ended = {
            let mut inner = self.lock();

            if !inner
                .session
                .as_ref()
                .is_some_and(|session| session.generation == generation)
            {
                return None;
            }

            if let Some(watchdog) = inner.watchdog.take() {
                watchdog.abort();
            }

            inner.session.take()
        };

        if let Err(error) = self.store.clear() {
            tracing::error!("could not remove the persisted token: {error}");
        }

        ended
    }
}
