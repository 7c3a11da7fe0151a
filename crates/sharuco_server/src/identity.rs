//! Acting-user extraction from the upstream identity header.

use crate::error::HttpError;
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use sharuco_core::{constants::USER_HEADER, AppError, UserId};

/// Authenticated caller resolved from the `x-sharuco-user` header.
#[derive(Debug, Clone)]
pub struct ActingUser(pub UserId);

#[async_trait]
impl<S> FromRequestParts<S> for ActingUser
where
    S: Send + Sync,
{
    type Rejection = HttpError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(USER_HEADER)
            .map(|value| value.to_str().map_err(|_| AppError::Unauthenticated))
            .transpose()?;
        Ok(Self(UserId::parse(raw)?))
    }
}
