//! Submission form validation.
//!
//! Validation runs to completion and reports every failing field at once so
//! callers can render per-field feedback. It has no side effects.

use crate::models::snippet::SnippetForm;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Required form fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    Code,
    Description,
    Language,
}

impl Field {
    pub fn as_str(self) -> &'static str {
        match self {
            Field::Code => "code",
            Field::Description => "description",
            Field::Language => "language",
        }
    }
}

/// Why a single field was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldError {
    /// Missing, empty, or whitespace-only.
    Required,
    /// Larger than the configured byte limit.
    TooLarge { max_bytes: usize },
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldError::Required => f.write_str("This field is required"),
            FieldError::TooLarge { max_bytes } => {
                write!(f, "This field exceeds the maximum of {} bytes", max_bytes)
            }
        }
    }
}

/// Field-indexed validation failures.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<Field, FieldError>);

impl ValidationErrors {
    fn insert(&mut self, field: Field, error: FieldError) {
        self.0.insert(field, error);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: Field) -> Option<&FieldError> {
        self.0.get(&field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &FieldError)> {
        self.0.iter().map(|(field, error)| (*field, error))
    }

    /// Per-field human-readable messages keyed by field name.
    pub fn messages(&self) -> BTreeMap<&'static str, String> {
        self.iter()
            .map(|(field, error)| (field.as_str(), error.to_string()))
            .collect()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, error) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", field.as_str(), error)?;
            first = false;
        }
        Ok(())
    }
}

/// Form contents that passed validation; not yet linearized or tagged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidSubmission {
    /// Source text exactly as entered.
    pub code: String,
    /// Trimmed.
    pub description: String,
    /// Trimmed free-text label.
    pub language: String,
    pub tags: Option<String>,
    pub is_private: bool,
}

fn required_text(value: Option<&str>) -> Option<&str> {
    value.filter(|text| !text.trim().is_empty())
}

/// Check required fields and the code size limit.
///
/// # Arguments
/// - `form`: Raw submission.
/// - `max_code_bytes`: Upper bound on `code` length in bytes.
///
/// # Returns
/// The accepted fields, with `is_private` defaulted to `false`.
///
/// # Errors
/// Returns every failing field when any check fails.
pub fn validate_form(
    form: &SnippetForm,
    max_code_bytes: usize,
) -> Result<ValidSubmission, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let code = required_text(form.code.as_deref());
    match code {
        None => errors.insert(Field::Code, FieldError::Required),
        Some(code) if code.len() > max_code_bytes => errors.insert(
            Field::Code,
            FieldError::TooLarge {
                max_bytes: max_code_bytes,
            },
        ),
        Some(_) => {}
    }
    let description = required_text(form.description.as_deref());
    if description.is_none() {
        errors.insert(Field::Description, FieldError::Required);
    }
    let language = required_text(form.language.as_deref());
    if language.is_none() {
        errors.insert(Field::Language, FieldError::Required);
    }

    match (code, description, language) {
        (Some(code), Some(description), Some(language)) if errors.is_empty() => {
            Ok(ValidSubmission {
                code: code.to_string(),
                description: description.trim().to_string(),
                language: language.trim().to_string(),
                tags: form.tags.clone(),
                is_private: form.is_private.unwrap_or(false),
            })
        }
        _ => Err(errors),
    }
}
