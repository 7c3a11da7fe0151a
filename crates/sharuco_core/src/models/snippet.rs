//! Snippet document shapes.
//!
//! Field names follow the persisted document layout (`isPrivate`, `idAuthor`,
//! `favoris`) so rows written by other clients of the same store decode here.

use crate::config::parse_env_flag;
use crate::identity::UserId;
use crate::linearize::delinearize;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;

/// Canonical document assembled by the writer and sent to the store.
///
/// Every field is writer-controlled; nothing here is copied verbatim from
/// user-editable input except the validated text fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSnippet {
    /// Linearized source text.
    pub code: String,
    pub description: String,
    pub language: String,
    pub tags: Vec<String>,
    pub is_private: bool,
    /// Submission time in epoch milliseconds.
    pub date: i64,
    pub favoris: BTreeSet<String>,
    pub id_author: String,
}

/// Snippet as returned by the store.
///
/// Reads tolerate partially-populated documents: any missing field decodes
/// as absent instead of failing the whole query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Snippet {
    pub id: String,
    pub code: Option<String>,
    pub description: Option<String>,
    pub language: Option<String>,
    pub tags: Vec<String>,
    pub is_private: Option<bool>,
    pub date: Option<i64>,
    pub favoris: BTreeSet<String>,
    pub id_author: Option<String>,
}

impl Snippet {
    /// Attach a store-assigned id to a freshly created document.
    pub fn from_new(id: String, doc: NewSnippet) -> Self {
        Self {
            id,
            code: Some(doc.code),
            description: Some(doc.description),
            language: Some(doc.language),
            tags: doc.tags,
            is_private: Some(doc.is_private),
            date: Some(doc.date),
            favoris: doc.favoris,
            id_author: Some(doc.id_author),
        }
    }

    /// Visibility with the documented default: a missing flag means public.
    pub fn is_private(&self) -> bool {
        self.is_private.unwrap_or(false)
    }

    pub fn is_owned_by(&self, user: &UserId) -> bool {
        self.id_author.as_deref() == Some(user.as_str())
    }

    pub fn is_favorited_by(&self, user: &UserId) -> bool {
        self.favoris.contains(user.as_str())
    }

    /// Original multi-line code for display.
    pub fn display_code(&self) -> Option<String> {
        self.code.as_deref().map(delinearize)
    }
}

/// Raw submission form as entered by the user.
///
/// Unknown fields (for example a forged `idAuthor` or `favoris`) are ignored
/// during deserialization.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnippetForm {
    pub code: Option<String>,
    pub description: Option<String>,
    pub language: Option<String>,
    pub tags: Option<String>,
    /// Accepts checkbox-style values (`"on"`, `"true"`, `1`) as well as booleans.
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub is_private: Option<bool>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FlagValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

/// Coerce a form flag to a boolean.
///
/// Recognized words map through [`parse_env_flag`]; any other non-empty text
/// counts as set, and numbers are set when non-zero.
fn deserialize_flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<FlagValue>::deserialize(deserializer)?;
    Ok(value.map(|value| match value {
        FlagValue::Bool(flag) => flag,
        FlagValue::Number(number) => number != 0.0 && !number.is_nan(),
        FlagValue::Text(text) => parse_env_flag(&text).unwrap_or(!text.trim().is_empty()),
    }))
}
