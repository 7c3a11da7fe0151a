//! Core domain library for Sharuco (snippet submission and categorized retrieval).

/// Configuration loading and defaults.
pub mod config;
/// Shared defaults.
pub mod constants;
/// Snippet storage contract and the redb-backed store.
pub mod db;
/// Application error types (storage/domain).
pub mod error;
/// Acting-user identity passed into every core operation.
pub mod identity;
/// Reversible single-line encoding for submitted code.
pub mod linearize;
/// Data models for submissions and persisted snippets.
pub mod models;
/// Category queries and the reactive dashboard session.
pub mod reader;
/// Comma-separated tag parsing.
pub mod tags;
/// Submission form validation.
pub mod validate;
/// Presentation ordering and empty-state detection for category results.
pub mod view;
/// Snippet creation with single in-flight submission tracking.
pub mod writer;

pub use config::Config;
pub use constants::DEFAULT_PORT;
pub use db::{Database, SnippetStore};
pub use error::AppError;
pub use identity::UserId;
pub use reader::{Category, CategoryReader, CategorySession, CategoryState, Dashboard};
pub use validate::{ValidationErrors, ValidSubmission};
pub use view::CategoryView;
pub use writer::{SnippetWriter, SubmitState};

#[cfg(test)]
pub(crate) mod test_support;
