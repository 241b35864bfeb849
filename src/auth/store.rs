//! Persists the bearer token between runs of the client.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use crate::Error;

/// The name of the file holding the token inside the state directory.
pub const TOKEN_FILE_NAME: &str = "token";

/// A file in the state directory that holds the raw token string.
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    /// Create a store that keeps the token in `state_dir`.
    ///
    /// The directory is created on the first save if it does not exist.
    pub fn new(state_dir: &Path) -> Self {
        Self {
            path: state_dir.join(TOKEN_FILE_NAME),
        }
    }

    /// Read the persisted token, if any.
    ///
    /// # Errors
    /// Returns [Error::TokenStorage] if the file exists but cannot be read.
    pub fn load(&self) -> Result<Option<String>, Error> {
        match fs::read_to_string(&self.path) {
            Ok(token) if token.trim().is_empty() => Ok(None),
            Ok(token) => Ok(Some(token.trim().to_owned())),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(error) => Err(Error::TokenStorage(format!(
                "could not read {}: {error}",
                self.path.display()
            ))),
        }
    }

    /// Persist `token`, replacing any previous token.
    ///
    /// # Errors
    /// Returns [Error::TokenStorage] if the directory or file cannot be written.
    pub fn save(&self, token: &str) -> Result<(), Error> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|error| {
                Error::TokenStorage(format!("could not create {}: {error}", parent.display()))
            })?;
        }

        fs::write(&self.path, token).map_err(|error| {
            Error::TokenStorage(format!("could not write {}: {error}", self.path.display()))
        })
    }

    /// Remove the persisted token. Removing a missing token is not an error.
    ///
    /// # Errors
    /// Returns [Error::TokenStorage] if the file exists but cannot be removed.
    pub fn clear(&self) -> Result<(), Error> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(Error::TokenStorage(format!(
                "could not remove {}: {error}",
                self.path.display()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::auth::store::TokenStore;

    #[test]
    fn load_returns_none_when_nothing_saved() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path());

        assert_eq!(store.load(), Ok(None));
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path());

        store.save("a.b.c").unwrap();

        assert_eq!(store.load(), Ok(Some("a.b.c".to_owned())));
    }

    #[test]
    fn save_creates_missing_state_dir() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(&dir.path().join("nested").join("state"));

        store.save("a.b.c").unwrap();

        assert_eq!(store.load(), Ok(Some("a.b.c".to_owned())));
    }

    #[test]
    fn clear_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path());
        store.save("a.b.c").unwrap();

        store.clear().unwrap();
        store.clear().unwrap();

        assert_eq!(store.load(), Ok(None));
    }
}
