//! Task model definitions

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::fields::{normalize_token, trim_to_none};
use crate::record::Record;

/// Task progress. Declaration order is the sort order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    Pending,
    #[serde(alias = "in_progress")]
    InProgress,
    Completed,
}

impl Default for TaskStatus {
    fn default() -> Self {
        Self::Pending
    }
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in-progress",
            Self::Completed => "completed",
        }
    }

    /// Lenient parse used for query strings; `None` for unknown values
    pub fn parse(raw: &str) -> Option<Self> {
        match normalize_token(raw).as_str() {
            "pending" => Some(Self::Pending),
            "inprogress" => Some(Self::InProgress),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }
}

/// Task priority level. Declaration order is the sort order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
}

impl Default for TaskPriority {
    fn default() -> Self {
        Self::Medium
    }
}

impl TaskPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match normalize_token(raw).as_str() {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

/// A task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub priority: TaskPriority,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    /// Weak reference to a category; cleared when the category is deleted
    #[serde(default)]
    pub category_id: Option<u64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Record for Task {
    const KIND: &'static str = "Task";

    fn id(&self) -> u64 {
        self.id
    }
}

impl Task {
    /// Create a new pending task with the given id and title
    pub fn new(id: u64, title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id,
            title: title.into(),
            description: None,
            status: TaskStatus::default(),
            priority: TaskPriority::default(),
            due_date: None,
            category_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the status
    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    /// Set the priority
    pub fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = priority;
        self
    }

    /// Set the due date
    pub fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Set the category
    pub fn with_category(mut self, category_id: u64) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }
}

/// Body of a task creation request
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<TaskStatus>,
    /// Legacy completion flag, used only when `status` is absent
    #[serde(default)]
    pub completed: Option<bool>,
    #[serde(default)]
    pub priority: Option<TaskPriority>,
    #[serde(default, alias = "due_date")]
    pub due_date: Option<NaiveDate>,
    #[serde(default, alias = "category_id")]
    pub category_id: Option<u64>,
}

impl NewTask {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Field-level problems, empty when the request is valid
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.title.trim().is_empty() {
            errors.push("Title is required".to_string());
        }
        errors
    }

    pub fn into_task(self, id: u64, now: DateTime<Utc>) -> Task {
        let status = match (self.status, self.completed) {
            (Some(status), _) => status,
            (None, Some(true)) => TaskStatus::Completed,
            _ => TaskStatus::default(),
        };
        Task {
            id,
            title: self.title.trim().to_string(),
            description: trim_to_none(self.description),
            status,
            priority: self.priority.unwrap_or_default(),
            due_date: self.due_date,
            category_id: self.category_id,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Body of a task update request; absent fields are left untouched
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "crate::fields::nullable")]
    pub description: Option<Option<String>>,
    #[serde(default)]
    pub status: Option<TaskStatus>,
    /// Legacy completion flag, used only when `status` is absent
    #[serde(default)]
    pub completed: Option<bool>,
    #[serde(default)]
    pub priority: Option<TaskPriority>,
    #[serde(default, alias = "due_date", deserialize_with = "crate::fields::nullable")]
    pub due_date: Option<Option<NaiveDate>>,
    #[serde(default, alias = "category_id", deserialize_with = "crate::fields::nullable")]
    pub category_id: Option<Option<u64>>,
}

impl TaskPatch {
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if matches!(&self.title, Some(title) if title.trim().is_empty()) {
            errors.push("Title cannot be empty".to_string());
        }
        errors
    }

    /// Category the patch points the task at, if it sets one
    pub fn new_category(&self) -> Option<u64> {
        self.category_id.flatten()
    }

    pub fn apply(self, task: &mut Task, now: DateTime<Utc>) {
        if let Some(title) = self.title {
            task.title = title.trim().to_string();
        }
        if let Some(description) = self.description {
            task.description = trim_to_none(description);
        }
        match (self.status, self.completed) {
            (Some(status), _) => task.status = status,
            (None, Some(true)) => task.status = TaskStatus::Completed,
            (None, Some(false)) if task.is_completed() => task.status = TaskStatus::Pending,
            _ => {}
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(due_date) = self.due_date {
            task.due_date = due_date;
        }
        if let Some(category_id) = self.category_id {
            task.category_id = category_id;
        }
        task.updated_at = now;
    }
}
