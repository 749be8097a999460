use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single title and body record.
///
/// `created_at` is set once on insert; `updated_at` starts equal to it and
/// moves forward on every edit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: i64,
    pub title: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Raw form submission for adding or editing a note.
///
/// Missing fields deserialize as empty strings so they fail validation
/// instead of being rejected by the extractor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NoteForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: String,
}

/// A form that passed validation: both fields trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidNote {
    pub title: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NoteError {
    #[error("Title and note body are required.")]
    MissingFields,
}

impl NoteForm {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }

    /// Trim both fields and reject the form if either ends up empty.
    pub fn validate(&self) -> Result<ValidNote, NoteError> {
        let title = self.title.trim();
        let body = self.body.trim();

        if title.is_empty() || body.is_empty() {
            return Err(NoteError::MissingFields);
        }

        Ok(ValidNote {
            title: title.to_string(),
            body: body.to_string(),
        })
    }
}

/// Query string for the list page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListNotesQuery {
    pub q: Option<String>,
}

impl ListNotesQuery {
    /// The trimmed search term, or `None` when absent or blank.
    pub fn term(&self) -> Option<&str> {
        self.q.as_deref().map(str::trim).filter(|q| !q.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_trims_both_fields() {
        let valid = NoteForm::new("  Shopping ", "\tBuy milk\n").validate().unwrap();
        assert_eq!(valid.title, "Shopping");
        assert_eq!(valid.body, "Buy milk");
    }

    #[test]
    fn validate_rejects_blank_title() {
        let err = NoteForm::new("   ", "Buy milk").validate().unwrap_err();
        assert_eq!(err, NoteError::MissingFields);
        assert_eq!(err.to_string(), "Title and note body are required.");
    }

    #[test]
    fn validate_rejects_blank_body() {
        assert!(NoteForm::new("Shopping", "").validate().is_err());
    }

    #[test]
    fn query_term_ignores_whitespace() {
        let query = ListNotesQuery {
            q: Some("  ".to_string()),
        };
        assert_eq!(query.term(), None);

        let query = ListNotesQuery {
            q: Some(" milk ".to_string()),
        };
        assert_eq!(query.term(), Some("milk"));
    }
}
