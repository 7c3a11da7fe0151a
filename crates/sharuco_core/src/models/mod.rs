//! Data models for submissions and persisted snippets.

/// Snippet document shapes (write, read, and submission form).
pub mod snippet;
