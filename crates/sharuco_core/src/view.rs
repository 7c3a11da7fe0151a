//! Presentation ordering and empty-state detection for category results.

use crate::models::snippet::Snippet;
use crate::reader::Category;
use serde::Serialize;

/// Display-ready snippet with code restored to its original lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnippetCard {
    pub id: String,
    pub id_author: Option<String>,
    pub language: Option<String>,
    pub code: Option<String>,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub favoris: Vec<String>,
    pub is_private: bool,
    pub date: Option<i64>,
}

impl From<Snippet> for SnippetCard {
    fn from(snippet: Snippet) -> Self {
        let code = snippet.display_code();
        let is_private = snippet.is_private();
        Self {
            id: snippet.id,
            id_author: snippet.id_author,
            language: snippet.language,
            code,
            description: snippet.description,
            tags: snippet.tags,
            favoris: snippet.favoris.into_iter().collect(),
            is_private,
            date: snippet.date,
        }
    }
}

/// Presentation of one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum CategoryView {
    /// No snippets; carries the category-specific message.
    Empty { message: String },
    /// Newest first.
    Items { items: Vec<SnippetCard> },
}

impl CategoryView {
    pub fn is_empty(&self) -> bool {
        matches!(self, CategoryView::Empty { .. })
    }

    pub fn items(&self) -> &[SnippetCard] {
        match self {
            CategoryView::Empty { .. } => &[],
            CategoryView::Items { items } => items,
        }
    }
}

/// Order `snippets` by `date`, most recent first.
///
/// The sort is stable, so equal dates keep the store's order. Snippets
/// without a date sort after every dated one.
pub fn order_newest_first(snippets: &mut [Snippet]) {
    snippets.sort_by(|a, b| b.date.cmp(&a.date));
}

/// Build the presentation for a raw category result set.
pub fn assemble(category: Category, mut snippets: Vec<Snippet>) -> CategoryView {
    if snippets.is_empty() {
        return CategoryView::Empty {
            message: category.empty_message().to_string(),
        };
    }
    order_newest_first(&mut snippets);
    CategoryView::Items {
        items: snippets.into_iter().map(SnippetCard::from).collect(),
    }
}
