//! Task filtering and sorting
//!
//! Filters are AND-composed. Unknown filter values and unknown sort names
//! are ignored rather than rejected, so the frontend can pass query strings
//! through without validating them first.

use std::cmp::Ordering;

use chrono::NaiveDate;
use serde::Deserialize;

use super::model::{Task, TaskPriority, TaskStatus};
use crate::fields::normalize_token;
use crate::query::{contains_needle, search_needle, SortDirection};

/// Raw list parameters as they arrive on the query string.
///
/// Deserialized from the raw key/value pairs so repeated keys and a name
/// sent alongside its alias never fail: the first value wins and unknown
/// keys are dropped.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(from = "Vec<(String, String)>")]
pub struct TaskQueryParams {
    pub status: Option<String>,
    pub priority: Option<String>,
    pub category: Option<String>,
    pub q: Option<String>,
    pub due_from: Option<String>,
    pub due_to: Option<String>,
    pub sort_by: Option<String>,
    pub sort_dir: Option<String>,
}

impl TaskQueryParams {
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut params = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_ref() {
                "status" => &mut params.status,
                "priority" => &mut params.priority,
                "category" | "category_id" => &mut params.category,
                "q" | "query" => &mut params.q,
                "dueFrom" | "due_from" => &mut params.due_from,
                "dueTo" | "due_to" => &mut params.due_to,
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

impl From<Vec<(String, String)>> for TaskQueryParams {
    fn from(pairs: Vec<(String, String)>) -> Self {
        Self::from_pairs(pairs)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter {
    Is(TaskStatus),
    /// Anything not completed
    Active,
}

impl StatusFilter {
    pub fn parse(raw: &str) -> Option<Self> {
        if normalize_token(raw) == "active" {
            return Some(Self::Active);
        }
        TaskStatus::parse(raw).map(Self::Is)
    }

    fn matches(self, status: TaskStatus) -> bool {
        match self {
            Self::Is(wanted) => status == wanted,
            Self::Active => status != TaskStatus::Completed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryFilter {
    Id(u64),
    Uncategorized,
}

impl CategoryFilter {
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if let Ok(id) = raw.parse() {
            return Some(Self::Id(id));
        }
        match normalize_token(raw).as_str() {
            "none" | "uncategorized" => Some(Self::Uncategorized),
            _ => None,
        }
    }

    fn matches(self, category_id: Option<u64>) -> bool {
        match self {
            Self::Id(wanted) => category_id == Some(wanted),
            Self::Uncategorized => category_id.is_none(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskSortField {
    Title,
    DueDate,
    Priority,
    Status,
    CreatedAt,
    UpdatedAt,
}

impl TaskSortField {
    pub fn parse(raw: &str) -> Option<Self> {
        match normalize_token(raw).as_str() {
            "title" => Some(Self::Title),
            "duedate" | "due" => Some(Self::DueDate),
            "priority" => Some(Self::Priority),
            "status" => Some(Self::Status),
            "createdat" | "created" => Some(Self::CreatedAt),
            "updatedat" | "updated" => Some(Self::UpdatedAt),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskSort {
    pub field: TaskSortField,
    pub direction: SortDirection,
}

impl Default for TaskSort {
    /// Newest first
    fn default() -> Self {
        Self {
            field: TaskSortField::CreatedAt,
            direction: SortDirection::Descending,
        }
    }
}

impl TaskSort {
    pub fn new(field: TaskSortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    fn compare(&self, a: &Task, b: &Task) -> Ordering {
        let ordering = match self.field {
            TaskSortField::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
            // Undated tasks go last whichever way the dates run
            TaskSortField::DueDate => {
                return match (a.due_date, b.due_date) {
                    (Some(x), Some(y)) => self.direction.orient(x.cmp(&y)),
                    (Some(_), None) => Ordering::Less,
                    (None, Some(_)) => Ordering::Greater,
                    (None, None) => Ordering::Equal,
                };
            }
            TaskSortField::Priority => a.priority.cmp(&b.priority),
            TaskSortField::Status => a.status.cmp(&b.status),
            TaskSortField::CreatedAt => a.created_at.cmp(&b.created_at),
            TaskSortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
        };
        self.direction.orient(ordering)
    }
}

/// Parsed task filters plus sort order
#[derive(Debug, Clone, Default)]
pub struct TaskQuery {
    pub status: Option<StatusFilter>,
    pub priority: Option<TaskPriority>,
    pub category: Option<CategoryFilter>,
    /// Inclusive lower bound on the due date
    pub due_from: Option<NaiveDate>,
    /// Inclusive upper bound on the due date
    pub due_to: Option<NaiveDate>,
    /// Lowercased free-text needle
    pub text: Option<String>,
    pub sort: TaskSort,
}

impl TaskQuery {
    /// Build a query from raw parameters, dropping anything unrecognized.
    ///
    /// Without `sortBy` the order is newest first; an explicit `sortBy`
    /// defaults to ascending.
    pub fn from_params(params: &TaskQueryParams) -> Self {
        let direction = params.sort_dir.as_deref().and_then(SortDirection::parse);
        let sort = match params.sort_by.as_deref().and_then(TaskSortField::parse) {
            Some(field) => TaskSort::new(field, direction.unwrap_or_default()),
            None => TaskSort {
                direction: direction.unwrap_or(SortDirection::Descending),
                ..TaskSort::default()
            },
        };

        Self {
            status: params.status.as_deref().and_then(StatusFilter::parse),
            priority: params.priority.as_deref().and_then(TaskPriority::parse),
            category: params.category.as_deref().and_then(CategoryFilter::parse),
            due_from: params.due_from.as_deref().and_then(parse_date),
            due_to: params.due_to.as_deref().and_then(parse_date),
            text: search_needle(params.q.as_deref()),
            sort,
        }
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(StatusFilter::Is(status));
        self
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.text = search_needle(Some(text));
        self
    }

    pub fn sorted_by(mut self, field: TaskSortField, direction: SortDirection) -> Self {
        self.sort = TaskSort::new(field, direction);
        self
    }

    /// Whether `task` satisfies every filter
    pub fn matches(&self, task: &Task) -> bool {
        if let Some(status) = self.status {
            if !status.matches(task.status) {
                return false;
            }
        }
        if let Some(priority) = self.priority {
            if task.priority != priority {
                return false;
            }
        }
        if let Some(category) = self.category {
            if !category.matches(task.category_id) {
                return false;
            }
        }
        if self.due_from.is_some() || self.due_to.is_some() {
            let Some(due) = task.due_date else {
                return false;
            };
            if self.due_from.is_some_and(|from| due < from) {
                return false;
            }
            if self.due_to.is_some_and(|to| due > to) {
                return false;
            }
        }
        if let Some(needle) = &self.text {
            let in_title = contains_needle(&task.title, needle);
            let in_description = task
                .description
                .as_deref()
                .is_some_and(|d| contains_needle(d, needle));
            if !in_title && !in_description {
                return false;
            }
        }
        true
    }
}

/// Matching tasks in the requested order.
///
/// The sort is stable: tasks comparing equal keep their input order.
pub fn query(tasks: Vec<Task>, query: &TaskQuery) -> Vec<Task> {
    let mut matching: Vec<Task> = tasks.into_iter().filter(|t| query.matches(t)).collect();
    matching.sort_by(|a, b| query.sort.compare(a, b));
    matching
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}
