use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable, subject-independent question identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct QuestionId(pub String);

impl QuestionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for QuestionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Input widget family for a question. Composite questions carry their sub-question keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum FieldType {
    SingleSelect,
    MultiSelect,
    FreeText,
    File,
    Dropdown,
    Composite { sub_questions: Vec<SubQuestion> },
}

impl FieldType {
    pub const fn label(&self) -> &'static str {
        match self {
            Self::SingleSelect => "Single Select",
            Self::MultiSelect => "Multi Select",
            Self::FreeText => "Free Text",
            Self::File => "File Upload",
            Self::Dropdown => "Dropdown",
            Self::Composite { .. } => "Composite",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubQuestion {
    pub key: String,
    pub prompt: String,
}

/// Immutable template entry for a single question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub section: String,
    pub prompt: String,
    pub field_type: FieldType,
    pub required: bool,
    #[serde(default)]
    pub options: Vec<String>,
    /// Answers only make sense for one RFP and are never shared through the global store.
    #[serde(default)]
    pub subject_specific: bool,
    /// Participates in comparison weighting and star ratings.
    #[serde(default)]
    pub weighted: bool,
}

impl Question {
    pub fn new(
        id: impl Into<String>,
        section: impl Into<String>,
        prompt: impl Into<String>,
        field_type: FieldType,
    ) -> Self {
        Self {
            id: QuestionId::new(id),
            section: section.into(),
            prompt: prompt.into(),
            field_type,
            required: false,
            options: Vec::new(),
            subject_specific: false,
            weighted: false,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn subject_specific(mut self) -> Self {
        self.subject_specific = true;
        self
    }

    pub fn weighted(mut self) -> Self {
        self.weighted = true;
        self
    }

    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }
}

/// Named group of questions in template order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub name: String,
    pub question_ids: Vec<QuestionId>,
}
