//! Shared test-only helpers for sharuco_core.

use crate::db::SnippetStore;
use crate::identity::UserId;
use crate::models::snippet::{NewSnippet, Snippet};
use crate::reader::{Category, CategoryQuery};
use crate::{AppError, Database};
use std::collections::{BTreeSet, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use tempfile::TempDir;
use tokio::sync::Notify;

/// Creates an isolated temporary database and returns it with the temp dir.
///
/// Keep the [`TempDir`] alive for the full test to preserve the backing files.
pub(crate) fn setup_temp_db() -> (Database, TempDir) {
    let temp_dir = TempDir::new().expect("temp dir");
    let db_path = temp_dir.path().join("db");
    let db = Database::new(db_path.to_str().expect("db path")).expect("db");
    (db, temp_dir)
}

pub(crate) fn user(handle: &str) -> UserId {
    UserId::try_from(handle).expect("user id")
}

pub(crate) fn new_snippet(author: &str, is_private: bool, date: i64) -> NewSnippet {
    NewSnippet {
        code: "print(1)".to_string(),
        description: "prints one".to_string(),
        language: "python".to_string(),
        tags: vec!["demo".to_string()],
        is_private,
        date,
        favoris: BTreeSet::new(),
        id_author: author.to_string(),
    }
}

/// Blocks store calls until released, and signals when one arrives.
pub(crate) struct Gate {
    entered: Notify,
    released: Mutex<bool>,
    wake: Condvar,
}

impl Gate {
    fn new() -> Self {
        Self {
            entered: Notify::new(),
            released: Mutex::new(false),
            wake: Condvar::new(),
        }
    }

    fn pass(&self) {
        self.entered.notify_one();
        let mut released = self.released.lock().expect("gate lock");
        while !*released {
            released = self.wake.wait(released).expect("gate wait");
        }
    }

    /// Wait until a gated call is blocked inside the store.
    pub(crate) async fn wait_entered(&self) {
        self.entered.notified().await;
    }

    pub(crate) fn release(&self) {
        *self.released.lock().expect("gate lock") = true;
        self.wake.notify_all();
    }
}

/// In-memory store with scripted failures and blocking points.
#[derive(Default)]
pub(crate) struct ScriptedStore {
    rows: Mutex<Vec<Snippet>>,
    failing: Mutex<HashSet<Category>>,
    fail_writes: AtomicBool,
    creates: AtomicUsize,
    write_gate: Mutex<Option<Arc<Gate>>>,
    user_gate: Mutex<Option<(String, Arc<Gate>)>>,
}

impl ScriptedStore {
    pub(crate) fn push(&self, doc: NewSnippet) -> Snippet {
        let mut rows = self.rows.lock().expect("rows lock");
        let snippet = Snippet::from_new(format!("s{}", rows.len()), doc);
        rows.push(snippet.clone());
        snippet
    }

    pub(crate) fn creates(&self) -> usize {
        self.creates.load(Ordering::SeqCst)
    }

    pub(crate) fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn fail_category(&self, category: Category) {
        self.failing.lock().expect("failing lock").insert(category);
    }

    pub(crate) fn gate_writes(&self) -> Arc<Gate> {
        let gate = Arc::new(Gate::new());
        *self.write_gate.lock().expect("gate lock") = Some(Arc::clone(&gate));
        gate
    }

    pub(crate) fn gate_user(&self, handle: &str) -> Arc<Gate> {
        let gate = Arc::new(Gate::new());
        *self.user_gate.lock().expect("gate lock") = Some((handle.to_string(), Arc::clone(&gate)));
        gate
    }
}

impl SnippetStore for ScriptedStore {
    fn create(&self, doc: &NewSnippet) -> Result<Snippet, AppError> {
        self.creates.fetch_add(1, Ordering::SeqCst);
        let gate = self.write_gate.lock().expect("gate lock").clone();
        if let Some(gate) = gate {
            gate.pass();
        }
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AppError::StorageMessage("store unreachable".to_string()));
        }
        Ok(self.push(doc.clone()))
    }

    fn query(&self, query: &CategoryQuery) -> Result<Vec<Snippet>, AppError> {
        let gate = self
            .user_gate
            .lock()
            .expect("gate lock")
            .as_ref()
            .filter(|(handle, _)| handle == query.user.as_str())
            .map(|(_, gate)| Arc::clone(gate));
        if let Some(gate) = gate {
            gate.pass();
        }
        if self
            .failing
            .lock()
            .expect("failing lock")
            .contains(&query.category)
        {
            return Err(AppError::StorageMessage("scripted read failure".to_string()));
        }
        let rows = self.rows.lock().expect("rows lock");
        Ok(rows.iter().filter(|row| query.matches(row)).cloned().collect())
    }

    fn get(&self, id: &str) -> Result<Option<Snippet>, AppError> {
        let rows = self.rows.lock().expect("rows lock");
        Ok(rows.iter().find(|row| row.id == id).cloned())
    }

    fn set_favorite(
        &self,
        id: &str,
        user: &UserId,
        favorite: bool,
    ) -> Result<Option<Snippet>, AppError> {
        let mut rows = self.rows.lock().expect("rows lock");
        let Some(row) = rows.iter_mut().find(|row| row.id == id) else {
            return Ok(None);
        };
        if favorite {
            row.favoris.insert(user.as_str().to_string());
        } else {
            row.favoris.remove(user.as_str());
        }
        Ok(Some(row.clone()))
    }
}
