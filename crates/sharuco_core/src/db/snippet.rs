//! Snippet storage operations backed by redb.

use crate::db::tables::{SNIPPETS, SNIPPET_IDS};
use crate::error::AppError;
use crate::identity::UserId;
use crate::models::snippet::{NewSnippet, Snippet};
use crate::reader::CategoryQuery;
use redb::{ReadableDatabase, ReadableTable};
use std::sync::Arc;
use uuid::Uuid;

/// Accessor for snippet tables.
pub struct SnippetDb {
    db: Arc<redb::Database>,
}

fn decode_row(seq: u64, bytes: &[u8]) -> Option<Snippet> {
    match serde_json::from_slice::<Snippet>(bytes) {
        Ok(snippet) => Some(snippet),
        Err(err) => {
            tracing::warn!(seq, error = %err, "skipping undecodable snippet row");
            None
        }
    }
}

impl SnippetDb {
    /// Initialize snippet tables if they do not exist yet.
    ///
    /// # Errors
    /// Returns an error when redb transaction/table initialization fails.
    pub fn new(db: Arc<redb::Database>) -> Result<Self, AppError> {
        let write_txn = db.begin_write()?;
        write_txn.open_table(SNIPPETS)?;
        write_txn.open_table(SNIPPET_IDS)?;
        write_txn.commit()?;
        Ok(Self { db })
    }

    /// Insert a new snippet under a fresh id, after every existing row.
    ///
    /// # Returns
    /// The stored snippet including its id.
    ///
    /// # Errors
    /// Returns an error when serialization or storage operations fail.
    pub fn create(&self, doc: &NewSnippet) -> Result<Snippet, AppError> {
        let snippet = Snippet::from_new(Uuid::new_v4().to_string(), doc.clone());
        let encoded = serde_json::to_vec(&snippet)?;

        let write_txn = self.db.begin_write()?;
        {
            let mut rows = write_txn.open_table(SNIPPETS)?;
            let mut ids = write_txn.open_table(SNIPPET_IDS)?;

            if ids.get(snippet.id.as_str())?.is_some() {
                return Err(AppError::StorageMessage(format!(
                    "Snippet id '{}' already exists",
                    snippet.id
                )));
            }
            let seq = match rows.last()? {
                Some((key, _)) => key.value().saturating_add(1),
                None => 0,
            };
            rows.insert(seq, encoded.as_slice())?;
            ids.insert(snippet.id.as_str(), seq)?;
        }
        write_txn.commit()?;
        tracing::debug!(id = %snippet.id, "snippet created");
        Ok(snippet)
    }

    /// Fetch a snippet by id.
    ///
    /// # Errors
    /// Returns an error when storage access or decoding fails.
    pub fn get(&self, id: &str) -> Result<Option<Snippet>, AppError> {
        let read_txn = self.db.begin_read()?;
        let ids = read_txn.open_table(SNIPPET_IDS)?;
        let rows = read_txn.open_table(SNIPPETS)?;
        let Some(seq) = ids.get(id)?.map(|guard| guard.value()) else {
            return Ok(None);
        };
        match rows.get(seq)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Scan all rows in insertion order and keep those matching `query`.
    ///
    /// Rows that cannot be decoded at all are skipped and logged.
    ///
    /// # Errors
    /// Returns an error when storage access fails.
    pub fn query(&self, query: &CategoryQuery) -> Result<Vec<Snippet>, AppError> {
        let read_txn = self.db.begin_read()?;
        let rows = read_txn.open_table(SNIPPETS)?;
        let mut matches = Vec::new();
        for entry in rows.iter()? {
            let (key, value) = entry?;
            if let Some(snippet) = decode_row(key.value(), value.value()) {
                if query.matches(&snippet) {
                    matches.push(snippet);
                }
            }
        }
        tracing::debug!(
            category = %query.category,
            user = %query.user,
            count = matches.len(),
            "category query"
        );
        Ok(matches)
    }

    /// Add or remove `user` from the favorites of snippet `id`.
    ///
    /// # Returns
    /// The updated snippet, or `None` when missing or private to another user.
    ///
    /// # Errors
    /// Returns an error when storage access or (de)serialization fails.
    pub fn set_favorite(
        &self,
        id: &str,
        user: &UserId,
        favorite: bool,
    ) -> Result<Option<Snippet>, AppError> {
        let write_txn = self.db.begin_write()?;
        let updated = {
            let mut rows = write_txn.open_table(SNIPPETS)?;
            let ids = write_txn.open_table(SNIPPET_IDS)?;

            let Some(seq) = ids.get(id)?.map(|guard| guard.value()) else {
                return Ok(None);
            };
            let Some(guard) = rows.get(seq)? else {
                return Ok(None);
            };
            let mut snippet: Snippet = serde_json::from_slice(guard.value())?;
            drop(guard);

            if snippet.is_private() && !snippet.is_owned_by(user) {
                return Ok(None);
            }
            let changed = if favorite {
                snippet.favoris.insert(user.as_str().to_string())
            } else {
                snippet.favoris.remove(user.as_str())
            };
            if changed {
                let encoded = serde_json::to_vec(&snippet)?;
                rows.insert(seq, encoded.as_slice())?;
            }
            snippet
        };
        write_txn.commit()?;
        Ok(Some(updated))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::Category;
    use crate::test_support::{new_snippet, setup_temp_db, user};

    fn query(category: Category, who: &str) -> CategoryQuery {
        CategoryQuery::new(category, user(who))
    }

    #[test]
    fn create_assigns_id_and_get_roundtrips() {
        let (db, _temp) = setup_temp_db();
        let created = db
            .snippets
            .create(&new_snippet("octocat", false, 10))
            .expect("create");
        assert!(!created.id.is_empty());

        let fetched = db
            .snippets
            .get(&created.id)
            .expect("get")
            .expect("snippet exists");
        assert_eq!(fetched, created);
        assert!(db.snippets.get("missing").expect("get").is_none());
    }

    #[test]
    fn query_returns_rows_in_insertion_order() {
        let (db, _temp) = setup_temp_db();
        let ids: Vec<String> = (0..5)
            .map(|i| {
                db.snippets
                    .create(&new_snippet("octocat", false, 100 - i))
                    .expect("create")
                    .id
            })
            .collect();

        let found: Vec<String> = db
            .snippets
            .query(&query(Category::PublicOwned, "octocat"))
            .expect("query")
            .into_iter()
            .map(|snippet| snippet.id)
            .collect();
        assert_eq!(found, ids);
    }

    #[test]
    fn owned_queries_partition_by_author_and_visibility() {
        let (db, _temp) = setup_temp_db();
        let public = db.snippets.create(&new_snippet("octocat", false, 1)).expect("create");
        let private = db.snippets.create(&new_snippet("octocat", true, 2)).expect("create");
        db.snippets.create(&new_snippet("hubot", false, 3)).expect("create");
        db.snippets.create(&new_snippet("hubot", true, 4)).expect("create");

        let public_owned = db
            .snippets
            .query(&query(Category::PublicOwned, "octocat"))
            .expect("query");
        assert_eq!(public_owned, vec![public]);

        let private_owned = db
            .snippets
            .query(&query(Category::PrivateOwned, "octocat"))
            .expect("query");
        assert_eq!(private_owned, vec![private]);
    }

    #[test]
    fn favorited_query_ignores_owner_and_visibility() {
        let (db, _temp) = setup_temp_db();
        let mine_private = db.snippets.create(&new_snippet("octocat", true, 1)).expect("create");
        let theirs = db.snippets.create(&new_snippet("hubot", false, 2)).expect("create");
        db.snippets.create(&new_snippet("hubot", false, 3)).expect("create");

        let me = user("octocat");
        db.snippets
            .set_favorite(&mine_private.id, &me, true)
            .expect("favorite")
            .expect("exists");
        db.snippets
            .set_favorite(&theirs.id, &me, true)
            .expect("favorite")
            .expect("exists");

        let favorited: Vec<String> = db
            .snippets
            .query(&query(Category::Favorited, "octocat"))
            .expect("query")
            .into_iter()
            .map(|snippet| snippet.id)
            .collect();
        assert_eq!(favorited, vec![mine_private.id, theirs.id]);
    }

    #[test]
    fn set_favorite_is_idempotent_and_reversible() {
        let (db, _temp) = setup_temp_db();
        let created = db.snippets.create(&new_snippet("hubot", false, 1)).expect("create");
        let me = user("octocat");

        for _ in 0..2 {
            let updated = db
                .snippets
                .set_favorite(&created.id, &me, true)
                .expect("favorite")
                .expect("exists");
            assert_eq!(updated.favoris.len(), 1);
        }
        let updated = db
            .snippets
            .set_favorite(&created.id, &me, false)
            .expect("unfavorite")
            .expect("exists");
        assert!(updated.favoris.is_empty());
    }

    #[test]
    fn set_favorite_hides_other_users_private_snippets() {
        let (db, _temp) = setup_temp_db();
        let private = db.snippets.create(&new_snippet("hubot", true, 1)).expect("create");
        assert!(db
            .snippets
            .set_favorite(&private.id, &user("octocat"), true)
            .expect("favorite")
            .is_none());
        assert!(db
            .snippets
            .set_favorite("missing", &user("octocat"), true)
            .expect("favorite")
            .is_none());
    }

    #[test]
    fn query_tolerates_partial_and_skips_corrupt_rows() {
        let (db, _temp) = setup_temp_db();
        let write_txn = db.db.begin_write().expect("write txn");
        {
            let mut rows = write_txn.open_table(SNIPPETS).expect("rows");
            rows.insert(0u64, br#"{"id":"partial","idAuthor":"octocat"}"#.as_slice())
                .expect("insert partial");
            rows.insert(1u64, b"not json".as_slice()).expect("insert corrupt");
        }
        write_txn.commit().expect("commit");

        let found = db
            .snippets
            .query(&query(Category::PublicOwned, "octocat"))
            .expect("query");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "partial");
        assert!(found[0].code.is_none());

        let next = db.snippets.create(&new_snippet("octocat", false, 5)).expect("create");
        let found = db
            .snippets
            .query(&query(Category::PublicOwned, "octocat"))
            .expect("query");
        assert_eq!(found.last().map(|s| s.id.as_str()), Some(next.id.as_str()));
    }
}
