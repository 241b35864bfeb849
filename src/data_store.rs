//! The in-memory copy of the user's transactions and categories.
//!
//! The store only ever holds a full snapshot from the last successful refresh.
//! Every mutation is sent to the API and followed by a refresh of both lists.

use std::sync::{Arc, PoisonError, RwLock};

use crate::{
    Error,
    api::ApiClient,
    auth::{Session, SessionManager},
    category::{Category, CategoryName},
    transaction::{Transaction, TransactionDraft, TransactionId},
};

/// The transactions and categories as of the last refresh.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    /// Transactions in the order the API returned them.
    pub transactions: Vec<Transaction>,
    /// Categories in the order the API returned them.
    pub categories: Vec<Category>,
}

#[derive(Debug, Default)]
struct Stored {
    /// The generation of the session the snapshot was fetched for.
    generation: Option<u64>,
    snapshot: Snapshot,
}

/// Shared cache of the API data for the active session.
#[derive(Debug, Clone)]
pub struct DataStore {
    inner: Arc<RwLock<Stored>>,
    sessions: SessionManager,
}

impl DataStore {
    /// Create an empty store. `sessions` is used to discard results that
    /// arrive after their session was logged out or replaced.
    pub fn new(sessions: SessionManager) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Stored::default())),
            sessions,
        }
    }

    /// Fetch both lists and replace the snapshot with them.
    ///
    /// # Errors
    /// - [Error::Fetch], [Error::Api] or [Error::Unauthorized] if either request
    ///   fails, in which case the previous snapshot is kept.
    /// - [Error::NotLoggedIn] if `session` stopped being the active session
    ///   while the requests were in flight. The results are dropped.
    pub async fn refresh(&self, api: &ApiClient, session: &Session) -> Result<(), Error> {
        let (transactions, categories) = tokio::try_join!(
            api.list_transactions(&session.token),
            api.list_categories(&session.token)
        )?;

        if !self.sessions.is_current(session) {
            tracing::debug!(
                "discarding data fetched for session generation {}",
                session.generation
            );
            return Err(Error::NotLoggedIn);
        }

        tracing::debug!(
            "fetched {} transactions and {} categories",
            transactions.len(),
            categories.len()
        );

        let mut stored = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        *stored = Stored {
            generation: Some(session.generation),
            snapshot: Snapshot {
                transactions,
                categories,
            },
        };

        Ok(())
    }

    /// A copy of the lists, empty if they were fetched for a different session.
    pub fn snapshot(&self, session: &Session) -> Snapshot {
        let stored = self.inner.read().unwrap_or_else(PoisonError::into_inner);

        if stored.generation == Some(session.generation) {
            stored.snapshot.clone()
        } else {
            Snapshot::default()
        }
    }

    /// Find the transaction with `id` in the snapshot for `session`.
    pub fn transaction(&self, session: &Session, id: TransactionId) -> Option<Transaction> {
        let stored = self.inner.read().unwrap_or_else(PoisonError::into_inner);

        if stored.generation != Some(session.generation) {
            return None;
        }

        stored
            .snapshot
            .transactions
            .iter()
            .find(|transaction| transaction.id == id)
            .cloned()
    }

    /// Validate `draft`, create the transaction and refresh.
    ///
    /// # Errors
    /// Returns a validation error without contacting the API if `draft` is
    /// invalid, otherwise any error from the request or the refresh.
    pub async fn create_transaction(
        &self,
        api: &ApiClient,
        session: &Session,
        draft: &TransactionDraft,
    ) -> Result<Transaction, Error> {
        let transaction = draft.parse()?;
        let created = api.create_transaction(&session.token, &transaction).await?;
        self.refresh(api, session).await?;

        Ok(created)
    }

    /// Validate `draft`, update the transaction with `id` and refresh.
    ///
    /// # Errors
    /// Returns a validation error without contacting the API if `draft` is
    /// invalid, otherwise any error from the request or the refresh.
    pub async fn update_transaction(
        &self,
        api: &ApiClient,
        session: &Session,
        id: TransactionId,
        draft: &TransactionDraft,
    ) -> Result<Transaction, Error> {
        let transaction = draft.parse()?;
        let updated = api
            .update_transaction(&session.token, id, &transaction)
            .await?;
        self.refresh(api, session).await?;

        Ok(updated)
    }

    /// Delete the transaction with `id` and refresh.
    pub async fn delete_transaction(
        &self,
        api: &ApiClient,
        session: &Session,
        id: TransactionId,
    ) -> Result<(), Error> {
        api.delete_transaction(&session.token, id).await?;
        self.refresh(api, session).await
    }

    /// Validate `name`, create the category and refresh.
    ///
    /// # Errors
    /// Returns [Error::EmptyCategoryName] without contacting the API if `name`
    /// is blank, otherwise any error from the request or the refresh.
    pub async fn create_category(
        &self,
        api: &ApiClient,
        session: &Session,
        name: &str,
    ) -> Result<Category, Error> {
        let name = CategoryName::new(name)?;
        let created = api.create_category(&session.token, &name).await?;
        self.refresh(api, session).await?;

        Ok(created)
    }
}
