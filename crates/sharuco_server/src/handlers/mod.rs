//! HTTP request handlers.

/// Category view and dashboard endpoints.
pub mod category;
/// Snippet submission and favorite endpoints.
pub mod snippet;
