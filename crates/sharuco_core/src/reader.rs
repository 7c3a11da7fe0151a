//! Category queries and the reactive dashboard session.
//!
//! The three categories are loaded independently: each owns its own
//! loading/error/data state and a failure in one never blocks the others.

use crate::db::SnippetStore;
use crate::error::AppError;
use crate::identity::UserId;
use crate::models::snippet::Snippet;
use crate::view::{assemble, CategoryView};
use serde::Serialize;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;

/// One of the three dashboard partitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Owned by the acting user and not private.
    PublicOwned,
    /// Owned by the acting user and private.
    PrivateOwned,
    /// Favorited by the acting user, whoever owns it.
    Favorited,
}

impl Category {
    pub const ALL: [Category; 3] = [
        Category::PublicOwned,
        Category::PrivateOwned,
        Category::Favorited,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::PublicOwned => "public",
            Category::PrivateOwned => "private",
            Category::Favorited => "favorites",
        }
    }

    /// Message shown when the category has no snippets.
    pub fn empty_message(self) -> &'static str {
        match self {
            Category::PublicOwned => "You don't have any public code yet",
            Category::PrivateOwned => "You don't have any private code yet",
            Category::Favorited => "You don't have any favorite code yet",
        }
    }

    /// Client-facing message for a failed load; store details stay in logs.
    pub fn failure_message(self) -> String {
        format!("Failed to load {} snippets", self.as_str())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Filter predicate for a single category read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryQuery {
    pub category: Category,
    pub user: UserId,
}

impl CategoryQuery {
    pub fn new(category: Category, user: UserId) -> Self {
        Self { category, user }
    }

    /// `true` when `snippet` belongs in this category for this user.
    pub fn matches(&self, snippet: &Snippet) -> bool {
        match self.category {
            Category::PublicOwned => snippet.is_owned_by(&self.user) && !snippet.is_private(),
            Category::PrivateOwned => snippet.is_owned_by(&self.user) && snippet.is_private(),
            Category::Favorited => snippet.is_favorited_by(&self.user),
        }
    }
}

/// Async state of one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CategoryState {
    Loading,
    Failed { message: String },
    Loaded { view: CategoryView },
}

impl CategoryState {
    pub fn is_loading(&self) -> bool {
        matches!(self, CategoryState::Loading)
    }

    fn from_result(category: Category, result: Result<CategoryView, AppError>) -> Self {
        match result {
            Ok(view) => CategoryState::Loaded { view },
            Err(_) => CategoryState::Failed {
                message: category.failure_message(),
            },
        }
    }
}

/// Read-only access to the three categories.
pub struct CategoryReader<S> {
    store: Arc<S>,
}

impl<S> Clone for CategoryReader<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: SnippetStore> CategoryReader<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Raw result set for `category`, in store order.
    ///
    /// # Errors
    /// Returns [`AppError::Read`] tagged with `category` when the store fails.
    pub async fn fetch(&self, category: Category, user: &UserId) -> Result<Vec<Snippet>, AppError> {
        let store = Arc::clone(&self.store);
        let query = CategoryQuery::new(category, user.clone());
        let result = tokio::task::spawn_blocking(move || store.query(&query))
            .await
            .map_err(AppError::from)
            .and_then(|inner| inner);
        result.map_err(|err| {
            tracing::warn!(category = %category, user = %user, error = %err, "category read failed");
            AppError::read(category, err)
        })
    }

    /// Snippets `user` owns and left public.
    pub async fn public_owned(&self, user: &UserId) -> Result<Vec<Snippet>, AppError> {
        self.fetch(Category::PublicOwned, user).await
    }

    /// Snippets `user` owns and marked private.
    pub async fn private_owned(&self, user: &UserId) -> Result<Vec<Snippet>, AppError> {
        self.fetch(Category::PrivateOwned, user).await
    }

    /// Snippets `user` favorited, regardless of owner or visibility.
    pub async fn favorited(&self, user: &UserId) -> Result<Vec<Snippet>, AppError> {
        self.fetch(Category::Favorited, user).await
    }

    /// Fetch and assemble one category view.
    pub async fn view(&self, category: Category, user: &UserId) -> Result<CategoryView, AppError> {
        let snippets = self.fetch(category, user).await?;
        Ok(assemble(category, snippets))
    }

    /// Load all three categories concurrently.
    pub async fn load_all(&self, user: &UserId) -> [CategoryState; 3] {
        let (public, private, favorited) = tokio::join!(
            self.view(Category::PublicOwned, user),
            self.view(Category::PrivateOwned, user),
            self.view(Category::Favorited, user),
        );
        [
            CategoryState::from_result(Category::PublicOwned, public),
            CategoryState::from_result(Category::PrivateOwned, private),
            CategoryState::from_result(Category::Favorited, favorited),
        ]
    }
}

/// Snapshot of the three category states for one acting user.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub user: Option<UserId>,
    /// Bumped on every refresh; results from older generations are dropped.
    #[serde(skip)]
    pub generation: u64,
    pub public: CategoryState,
    pub private: CategoryState,
    pub favorites: CategoryState,
}

impl Dashboard {
    fn idle() -> Self {
        Self {
            user: None,
            generation: 0,
            public: CategoryState::Loading,
            private: CategoryState::Loading,
            favorites: CategoryState::Loading,
        }
    }

    pub fn state(&self, category: Category) -> &CategoryState {
        match category {
            Category::PublicOwned => &self.public,
            Category::PrivateOwned => &self.private,
            Category::Favorited => &self.favorites,
        }
    }

    fn state_mut(&mut self, category: Category) -> &mut CategoryState {
        match category {
            Category::PublicOwned => &mut self.public,
            Category::PrivateOwned => &mut self.private,
            Category::Favorited => &mut self.favorites,
        }
    }

    /// `true` once every category has finished loading (data or error).
    pub fn is_settled(&self) -> bool {
        Category::ALL
            .iter()
            .all(|category| !self.state(*category).is_loading())
    }
}

/// Reactive holder of the dashboard for whoever is currently acting.
///
/// Subscribers observe every state transition through a watch channel.
pub struct CategorySession<S> {
    reader: CategoryReader<S>,
    generation: AtomicU64,
    tx: watch::Sender<Dashboard>,
}

impl<S: SnippetStore> CategorySession<S> {
    pub fn new(store: Arc<S>) -> Self {
        let (tx, _rx) = watch::channel(Dashboard::idle());
        Self {
            reader: CategoryReader::new(store),
            generation: AtomicU64::new(0),
            tx,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Dashboard> {
        self.tx.subscribe()
    }

    pub fn snapshot(&self) -> Dashboard {
        self.tx.borrow().clone()
    }

    /// Re-run all three queries for `user`.
    ///
    /// Categories reset to loading, then each one updates as soon as its own
    /// query finishes. If another refresh starts meanwhile (for example after
    /// re-authentication as someone else), results from this one are dropped.
    ///
    /// # Returns
    /// `true` when this refresh was still current once all queries finished.
    pub async fn refresh(&self, user: UserId) -> bool {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.tx.send_modify(|dashboard| {
            if generation > dashboard.generation {
                *dashboard = Dashboard {
                    user: Some(user.clone()),
                    generation,
                    ..Dashboard::idle()
                };
            }
        });
        tracing::debug!(user = %user, generation, "dashboard refresh started");

        tokio::join!(
            self.load_into(generation, Category::PublicOwned, &user),
            self.load_into(generation, Category::PrivateOwned, &user),
            self.load_into(generation, Category::Favorited, &user),
        );
        self.tx.borrow().generation == generation
    }

    async fn load_into(&self, generation: u64, category: Category, user: &UserId) {
        let result = self.reader.view(category, user).await;
        let state = CategoryState::from_result(category, result);
        let applied = self.tx.send_if_modified(|dashboard| {
            if dashboard.generation != generation {
                return false;
            }
            *dashboard.state_mut(category) = state;
            true
        });
        if !applied {
            tracing::debug!(user = %user, category = %category, generation, "discarding stale category result");
        }
    }
}
