//! Snippet creation with single in-flight submission tracking.

use crate::db::SnippetStore;
use crate::error::AppError;
use crate::identity::UserId;
use crate::linearize::linearize;
use crate::models::snippet::{NewSnippet, Snippet, SnippetForm};
use crate::tags::parse_tags;
use crate::validate::{validate_form, ValidSubmission};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::watch;

/// Message surfaced for failed creates; the form stays intact for retry.
pub const RETRY_MESSAGE: &str = "An error has occurred, please try again later.";

/// Observable outcome of the latest submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SubmitState {
    Idle,
    /// A create request is in flight; resubmission is refused.
    Pending,
    Succeeded { snippet: Snippet },
    Failed { message: String },
}

/// Assemble the canonical document for a validated submission.
///
/// `id_author`, `date`, and `favoris` come from the caller and the clock,
/// never from the form.
pub fn build_document(valid: ValidSubmission, author: &UserId, now: DateTime<Utc>) -> NewSnippet {
    NewSnippet {
        code: linearize(&valid.code),
        description: valid.description,
        language: valid.language,
        tags: parse_tags(valid.tags.as_deref()),
        is_private: valid.is_private,
        date: now.timestamp_millis(),
        favoris: BTreeSet::new(),
        id_author: author.as_str().to_string(),
    }
}

/// In-flight flag and published state, shared with the blocking create.
struct Shared {
    in_flight: AtomicBool,
    state: watch::Sender<SubmitState>,
}

/// Ownership of the single in-flight slot.
///
/// The guard travels into the blocking store call, so the slot is held until
/// the store answers even when the submitting future is dropped first.
struct InFlightGuard {
    shared: Arc<Shared>,
}

impl InFlightGuard {
    fn settle(self, author: &UserId, result: &Result<Snippet, AppError>) {
        match result {
            Ok(snippet) => {
                tracing::info!(
                    user = %author,
                    id = %snippet.id,
                    private = snippet.is_private(),
                    "snippet submitted"
                );
                self.shared.state.send_replace(SubmitState::Succeeded {
                    snippet: snippet.clone(),
                });
            }
            Err(err) => {
                tracing::error!(user = %author, error = %err, "snippet submission failed");
                self.shared.state.send_replace(SubmitState::Failed {
                    message: RETRY_MESSAGE.to_string(),
                });
            }
        }
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        // Still pending here only if the store call panicked.
        self.shared.state.send_if_modified(|state| {
            if matches!(state, SubmitState::Pending) {
                *state = SubmitState::Failed {
                    message: RETRY_MESSAGE.to_string(),
                };
                true
            } else {
                false
            }
        });
        self.shared.in_flight.store(false, Ordering::Release);
    }
}

/// Submits snippets for one acting user or form.
pub struct SnippetWriter<S> {
    store: Arc<S>,
    max_code_bytes: usize,
    shared: Arc<Shared>,
}

impl<S: SnippetStore> SnippetWriter<S> {
    pub fn new(store: Arc<S>, max_code_bytes: usize) -> Self {
        let (state, _rx) = watch::channel(SubmitState::Idle);
        Self {
            store,
            max_code_bytes,
            shared: Arc::new(Shared {
                in_flight: AtomicBool::new(false),
                state,
            }),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<SubmitState> {
        self.shared.state.subscribe()
    }

    pub fn state(&self) -> SubmitState {
        self.shared.state.borrow().clone()
    }

    pub fn is_pending(&self) -> bool {
        self.shared.in_flight.load(Ordering::Acquire)
    }

    fn begin(&self) -> Result<InFlightGuard, AppError> {
        self.shared
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| AppError::SubmissionInFlight)?;
        self.shared.state.send_replace(SubmitState::Pending);
        Ok(InFlightGuard {
            shared: Arc::clone(&self.shared),
        })
    }

    /// Validate `form` and persist it as a snippet authored by `author`.
    ///
    /// Dropping the returned future does not cancel the create: the
    /// submission stays pending until the store answers.
    ///
    /// # Returns
    /// The stored snippet with its store-assigned id.
    ///
    /// # Errors
    /// - [`AppError::Validation`] when required fields are missing; the store
    ///   is not contacted.
    /// - [`AppError::SubmissionInFlight`] while an earlier submission is pending.
    /// - [`AppError::Write`] when the store rejects the create or is unreachable.
    pub async fn submit(&self, author: &UserId, form: &SnippetForm) -> Result<Snippet, AppError> {
        let valid = validate_form(form, self.max_code_bytes).map_err(AppError::Validation)?;
        let guard = self.begin()?;

        let doc = build_document(valid, author, Utc::now());
        let store = Arc::clone(&self.store);
        let owner = author.clone();
        let result = tokio::task::spawn_blocking(move || {
            let result = store.create(&doc);
            guard.settle(&owner, &result);
            result
        })
        .await
        .map_err(AppError::from)
        .and_then(|inner| inner);

        result.map_err(AppError::write)
    }
}
