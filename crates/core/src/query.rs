//! Sorting primitives shared by the task and note queries

use std::cmp::Ordering;

use crate::fields::normalize_token;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    /// Lenient parse; `None` for unknown values
    pub fn parse(raw: &str) -> Option<Self> {
        match normalize_token(raw).as_str() {
            "asc" | "ascending" => Some(Self::Ascending),
            "desc" | "descending" => Some(Self::Descending),
            _ => None,
        }
    }

    /// Orient an ascending comparison. Reversing the comparator rather than
    /// the output keeps equal elements in input order.
    pub fn orient(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Ascending => ordering,
            Self::Descending => ordering.reverse(),
        }
    }
}

/// Trimmed, lowercased search needle; `None` when blank
pub(crate) fn search_needle(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase)
}

pub(crate) fn contains_needle(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}
