//! Acting-user identity.
//!
//! Identity is resolved by an upstream provider and handed to the core
//! explicitly; nothing in this crate reads ambient session state.

use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable handle of an authenticated user (for example a GitHub screen name).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Build an identity from a raw handle.
    ///
    /// # Errors
    /// Returns [`AppError::Unauthenticated`] when the handle is missing or blank.
    pub fn parse(raw: Option<&str>) -> Result<Self, AppError> {
        match raw.map(str::trim) {
            Some(handle) if !handle.is_empty() => Ok(Self(handle.to_string())),
            _ => Err(AppError::Unauthenticated),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<&str> for UserId {
    type Error = AppError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(Some(value))
    }
}
