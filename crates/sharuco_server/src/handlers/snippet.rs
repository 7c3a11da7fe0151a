//! Snippet HTTP handlers.

use crate::{error::HttpError, identity::ActingUser, AppState};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use sharuco_core::{
    models::snippet::{Snippet, SnippetForm},
    view::SnippetCard,
    AppError, SnippetStore, UserId,
};

/// Submit a new snippet as the acting user.
///
/// # Returns
/// `201 Created` with the stored snippet.
///
/// # Errors
/// Returns an error on validation failure, a concurrent submission by the same
/// user, or a store failure.
pub async fn create_snippet(
    State(state): State<AppState>,
    ActingUser(user): ActingUser,
    Json(form): Json<SnippetForm>,
) -> Result<(StatusCode, Json<Snippet>), HttpError> {
    let writer = state.writers.writer_for(&user)?;
    let snippet = writer.submit(&user, &form).await?;
    Ok((StatusCode::CREATED, Json(snippet)))
}

async fn set_favorite(
    state: AppState,
    id: String,
    user: UserId,
    favorite: bool,
) -> Result<Json<SnippetCard>, HttpError> {
    let store = state.db.clone();
    let updated = tokio::task::spawn_blocking(move || store.set_favorite(&id, &user, favorite))
        .await
        .map_err(AppError::from)??;
    match updated {
        Some(snippet) => Ok(Json(SnippetCard::from(snippet))),
        None => Err(AppError::NotFound.into()),
    }
}

/// Add the acting user to a snippet's favorites.
///
/// # Errors
/// Returns `404` when the snippet is missing or private to another user.
pub async fn favorite_snippet(
    State(state): State<AppState>,
    ActingUser(user): ActingUser,
    Path(id): Path<String>,
) -> Result<Json<SnippetCard>, HttpError> {
    set_favorite(state, id, user, true).await
}

/// Remove the acting user from a snippet's favorites.
///
/// # Errors
/// Returns `404` when the snippet is missing or private to another user.
pub async fn unfavorite_snippet(
    State(state): State<AppState>,
    ActingUser(user): ActingUser,
    Path(id): Path<String>,
) -> Result<Json<SnippetCard>, HttpError> {
    set_favorite(state, id, user, false).await
}
