//! Per-user snippet writers.
//!
//! Each acting user gets one [`SnippetWriter`], so at most one submission per
//! user is in flight no matter how many requests arrive concurrently.

use sharuco_core::{AppError, Database, SnippetWriter, UserId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

type Writer = Arc<SnippetWriter<Database>>;

/// Registry of writers keyed by acting user.
pub struct WriterRegistry {
    store: Arc<Database>,
    max_code_bytes: usize,
    writers: Mutex<HashMap<UserId, Writer>>,
}

impl WriterRegistry {
    pub fn new(store: Arc<Database>, max_code_bytes: usize) -> Self {
        Self {
            store,
            max_code_bytes,
            writers: Mutex::new(HashMap::new()),
        }
    }

    /// Writer for `user`, created on first use.
    ///
    /// Idle writers nobody else holds are dropped on the way.
    ///
    /// # Errors
    /// Returns an error if the registry lock is poisoned.
    pub fn writer_for(&self, user: &UserId) -> Result<Writer, AppError> {
        let mut writers = self
            .writers
            .lock()
            .map_err(|_| AppError::StorageMessage("Writer registry lock poisoned".to_string()))?;
        writers.retain(|owner, writer| {
            owner == user || writer.is_pending() || Arc::strong_count(writer) > 1
        });
        let writer = writers.entry(user.clone()).or_insert_with(|| {
            Arc::new(SnippetWriter::new(
                Arc::clone(&self.store),
                self.max_code_bytes,
            ))
        });
        Ok(Arc::clone(writer))
    }

    /// Number of writers currently tracked.
    pub fn len(&self) -> usize {
        self.writers.lock().map(|writers| writers.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
