use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::QuestionId;

/// Identifier of the entity being answered for (an RFP instance or answer template context).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SubjectId(pub String);

impl SubjectId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SubjectId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Address of one response record.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ResponseKey {
    pub subject_id: SubjectId,
    pub question_id: QuestionId,
}

impl ResponseKey {
    pub fn new(subject_id: SubjectId, question_id: QuestionId) -> Self {
        Self {
            subject_id,
            question_id,
        }
    }
}

/// Answer payload. Serialized untagged so the stored JSON keeps the shape each widget produces:
/// a string, a number or flag, a list of strings, a `{selected, otherText}` pick, or a nested
/// map whose unanswered sub-questions are `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseValue {
    Text(String),
    Number(serde_json::Number),
    Flag(bool),
    List(Vec<String>),
    Selection {
        selected: Vec<String>,
        #[serde(rename = "otherText", default)]
        other_text: String,
    },
    Composite(BTreeMap<String, Option<ResponseValue>>),
}

impl ResponseValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn list<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::List(values.into_iter().map(Into::into).collect())
    }

    pub fn selection<I, S>(selected: I, other_text: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Selection {
            selected: selected.into_iter().map(Into::into).collect(),
            other_text: other_text.into(),
        }
    }

    /// Emptiness drives both status transitions and required-field validation.
    ///
    /// Whitespace-only text, an empty list and a selection with nothing picked are empty. A
    /// selection's free-text "other" entry does not count, and a composite map is never empty.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(text) => text.trim().is_empty(),
            Self::List(items) => items.is_empty(),
            Self::Selection { selected, .. } => selected.is_empty(),
            Self::Number(_) | Self::Flag(_) | Self::Composite(_) => false,
        }
    }
}

/// Emptiness over an optional value; an absent value is empty.
pub fn is_empty_value(value: Option<&ResponseValue>) -> bool {
    value.map(ResponseValue::is_empty).unwrap_or(true)
}

/// Lifecycle status of a response. `PreFilled` is synthetic and never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseStatus {
    NotStarted,
    InProgress,
    Completed,
    PreFilled,
}

impl ResponseStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::NotStarted => "Not Started",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
            Self::PreFilled => "Pre-filled",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseRecord {
    pub value: Option<ResponseValue>,
    pub status: ResponseStatus,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    /// Value as it stood when the question was last marked complete; the baseline for
    /// edit classification. Later edits keep the status but never move this.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_value: Option<ResponseValue>,
}

impl ResponseRecord {
    pub fn is_completed(&self) -> bool {
        self.status == ResponseStatus::Completed
    }
}
