//! Note search and ordering

use serde::Deserialize;

use super::model::Note;
use crate::fields::normalize_token;
use crate::query::{contains_needle, search_needle, SortDirection};

/// Note list parameters; repeated keys keep their first value
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(from = "Vec<(String, String)>")]
pub struct NoteQueryParams {
    pub q: Option<String>,
    pub sort_by: Option<String>,
    pub sort_dir: Option<String>,
}

impl NoteQueryParams {
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut params = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_ref() {
                "q" | "query" => &mut params.q,
                "sortBy" | "sort_by" => &mut params.sort_by,
                "sortDir" | "sort_dir" | "order" => &mut params.sort_dir,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into());
            }
        }
        params
    }
}

impl From<Vec<(String, String)>> for NoteQueryParams {
    fn from(pairs: Vec<(String, String)>) -> Self {
        Self::from_pairs(pairs)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteSortField {
    Title,
    CreatedAt,
    UpdatedAt,
}

impl NoteSortField {
    pub fn parse(raw: &str) -> Option<Self> {
        match normalize_token(raw).as_str() {
            "title" => Some(Self::Title),
            "createdat" | "created" => Some(Self::CreatedAt),
            "updatedat" | "updated" => Some(Self::UpdatedAt),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NoteQuery {
    pub text: Option<String>,
    pub field: NoteSortField,
    pub direction: SortDirection,
}

impl Default for NoteQuery {
    fn default() -> Self {
        Self {
            text: None,
            field: NoteSortField::CreatedAt,
            direction: SortDirection::Descending,
        }
    }
}

impl NoteQuery {
    /// Same defaulting rules as task queries: newest first unless a sort
    /// field is named, which then defaults to ascending
    pub fn from_params(params: &NoteQueryParams) -> Self {
        let direction = params.sort_dir.as_deref().and_then(SortDirection::parse);
        let (field, direction) = match params.sort_by.as_deref().and_then(NoteSortField::parse) {
            Some(field) => (field, direction.unwrap_or_default()),
            None => (
                NoteSortField::CreatedAt,
                direction.unwrap_or(SortDirection::Descending),
            ),
        };
        Self {
            text: search_needle(params.q.as_deref()),
            field,
            direction,
        }
    }

    pub fn matches(&self, note: &Note) -> bool {
        match &self.text {
            Some(needle) => {
                contains_needle(&note.title, needle) || contains_needle(&note.content, needle)
            }
            None => true,
        }
    }
}

pub fn query(notes: Vec<Note>, query: &NoteQuery) -> Vec<Note> {
    let mut matching: Vec<Note> = notes.into_iter().filter(|n| query.matches(n)).collect();
    matching.sort_by(|a, b| {
        let ordering = match query.field {
            NoteSortField::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
            NoteSortField::CreatedAt => a.created_at.cmp(&b.created_at),
            NoteSortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
        };
        query.direction.orient(ordering)
    });
    matching
}
