//! Category view and dashboard handlers.

use crate::{error::HttpError, identity::ActingUser, AppState};
use axum::{extract::State, Json};
use serde::Serialize;
use sharuco_core::{Category, CategoryState, CategoryView, UserId};

async fn category_view(
    state: &AppState,
    category: Category,
    user: &UserId,
) -> Result<Json<CategoryView>, HttpError> {
    let view = state.reader.view(category, user).await?;
    Ok(Json(view))
}

/// Snippets the acting user owns and left public, newest first.
pub async fn public_snippets(
    State(state): State<AppState>,
    ActingUser(user): ActingUser,
) -> Result<Json<CategoryView>, HttpError> {
    category_view(&state, Category::PublicOwned, &user).await
}

/// Snippets the acting user owns and marked private, newest first.
pub async fn private_snippets(
    State(state): State<AppState>,
    ActingUser(user): ActingUser,
) -> Result<Json<CategoryView>, HttpError> {
    category_view(&state, Category::PrivateOwned, &user).await
}

/// Snippets the acting user favorited, newest first.
pub async fn favorite_snippets(
    State(state): State<AppState>,
    ActingUser(user): ActingUser,
) -> Result<Json<CategoryView>, HttpError> {
    category_view(&state, Category::Favorited, &user).await
}

/// All three categories, each with its own state.
#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub user: UserId,
    pub public: CategoryState,
    pub private: CategoryState,
    pub favorites: CategoryState,
}

/// Load the three categories concurrently.
///
/// Always `200`: a failing category reports `failed` without hiding the others.
pub async fn dashboard(
    State(state): State<AppState>,
    ActingUser(user): ActingUser,
) -> Json<DashboardResponse> {
    let [public, private, favorites] = state.reader.load_all(&user).await;
    Json(DashboardResponse {
        user,
        public,
        private,
        favorites,
    })
}
