//! Snippet storage contract and the redb-backed store.

/// Snippet table access.
pub mod snippet;
/// Table definitions.
pub mod tables;

use crate::constants::REDB_FILE_NAME;
use crate::error::AppError;
use crate::identity::UserId;
use crate::models::snippet::{NewSnippet, Snippet};
use crate::reader::CategoryQuery;
use std::path::Path;
use std::sync::Arc;

/// Read/write contract the core needs from a document store.
///
/// Implementations are synchronous; async callers run them on the blocking
/// pool. Whether a just-created snippet is visible to the next `query` is up
/// to the implementation.
pub trait SnippetStore: Send + Sync + 'static {
    /// Persist `doc` and return it with its store-assigned id.
    fn create(&self, doc: &NewSnippet) -> Result<Snippet, AppError>;

    /// All snippets matching `query`, in store insertion order.
    fn query(&self, query: &CategoryQuery) -> Result<Vec<Snippet>, AppError>;

    /// Fetch a snippet by id.
    fn get(&self, id: &str) -> Result<Option<Snippet>, AppError>;

    /// Add or remove `user` from a snippet's favorites.
    ///
    /// # Returns
    /// The updated snippet, or `None` when it does not exist or is private
    /// to someone else.
    fn set_favorite(
        &self,
        id: &str,
        user: &UserId,
        favorite: bool,
    ) -> Result<Option<Snippet>, AppError>;
}

impl<S: SnippetStore> SnippetStore for Arc<S> {
    fn create(&self, doc: &NewSnippet) -> Result<Snippet, AppError> {
        (**self).create(doc)
    }

    fn query(&self, query: &CategoryQuery) -> Result<Vec<Snippet>, AppError> {
        (**self).query(query)
    }

    fn get(&self, id: &str) -> Result<Option<Snippet>, AppError> {
        (**self).get(id)
    }

    fn set_favorite(
        &self,
        id: &str,
        user: &UserId,
        favorite: bool,
    ) -> Result<Option<Snippet>, AppError> {
        (**self).set_favorite(id, user, favorite)
    }
}

/// Database handle with access to the snippet tables.
pub struct Database {
    pub db: Arc<redb::Database>,
    pub snippets: snippet::SnippetDb,
}

impl Database {
    /// Open (or create) the database under the `path` directory.
    ///
    /// # Returns
    /// A fully initialized [`Database`].
    ///
    /// # Errors
    /// Returns an error if the directory cannot be created, another process
    /// holds the database, or table initialization fails.
    pub fn new(path: &str) -> Result<Self, AppError> {
        let dir = Path::new(path);
        std::fs::create_dir_all(dir).map_err(|err| {
            AppError::StorageMessage(format!(
                "Failed to create database directory '{}': {}",
                dir.display(),
                err
            ))
        })?;
        let file = dir.join(REDB_FILE_NAME);
        let db = match redb::Database::create(&file) {
            Ok(db) => Arc::new(db),
            Err(redb::DatabaseError::DatabaseAlreadyOpen) => {
                return Err(AppError::StorageMessage(format!(
                    "Database '{}' is already open in another Sharuco process.\n\
                    Stop it first, or set DB_PATH to use a different database location.",
                    file.display()
                )));
            }
            Err(err) => return Err(err.into()),
        };
        tracing::debug!(path = %file.display(), "opened snippet database");
        Self::from_shared(db)
    }

    /// Build a handle over an already-open redb instance.
    ///
    /// # Errors
    /// Returns an error if the snippet tables cannot be initialized.
    pub fn from_shared(db: Arc<redb::Database>) -> Result<Self, AppError> {
        Ok(Self {
            snippets: snippet::SnippetDb::new(db.clone())?,
            db,
        })
    }
}

impl SnippetStore for Database {
    fn create(&self, doc: &NewSnippet) -> Result<Snippet, AppError> {
        self.snippets.create(doc)
    }

    fn query(&self, query: &CategoryQuery) -> Result<Vec<Snippet>, AppError> {
        self.snippets.query(query)
    }

    fn get(&self, id: &str) -> Result<Option<Snippet>, AppError> {
        self.snippets.get(id)
    }

    fn set_favorite(
        &self,
        id: &str,
        user: &UserId,
        favorite: bool,
    ) -> Result<Option<Snippet>, AppError> {
        self.snippets.set_favorite(id, user, favorite)
    }
}
