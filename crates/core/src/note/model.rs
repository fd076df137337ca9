//! Note model definitions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::fields::trim_to_none;
use crate::record::Record;

/// A free-form note
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub content: String,
    /// Presentation colour chosen in the frontend
    #[serde(default)]
    pub color: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Record for Note {
    const KIND: &'static str = "Note";

    fn id(&self) -> u64 {
        self.id
    }
}

impl Note {
    pub fn new(id: u64, title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id,
            title: title.into(),
            content: String::new(),
            color: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewNote {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub color: Option<String>,
}

impl NewNote {
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.title.trim().is_empty() {
            errors.push("Title is required".to_string());
        }
        errors
    }

    pub fn into_note(self, id: u64, now: DateTime<Utc>) -> Note {
        Note {
            id,
            title: self.title.trim().to_string(),
            content: self.content,
            color: trim_to_none(self.color),
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotePatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default, deserialize_with = "crate::fields::nullable")]
    pub color: Option<Option<String>>,
}

impl NotePatch {
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if matches!(&self.title, Some(title) if title.trim().is_empty()) {
            errors.push("Title cannot be empty".to_string());
        }
        errors
    }

    pub fn apply(self, note: &mut Note, now: DateTime<Utc>) {
        if let Some(title) = self.title {
            note.title = title.trim().to_string();
        }
        if let Some(content) = self.content {
            note.content = content;
        }
        if let Some(color) = self.color {
            note.color = trim_to_none(color);
        }
        note.updated_at = now;
    }
}
