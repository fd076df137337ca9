//! Desk service
//!
//! Storage-agnostic entry point for every task, note and category
//! operation. Request schemas are validated here, ids and timestamps are
//! assigned here, and the category cleanup on delete happens here.
//!
//! All mutations go through one async mutex, so read-modify-write cycles
//! inside a single process never interleave.

use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::info;

use crate::category::{default_categories, Category, CategoryPatch, NewCategory};
use crate::note::{self, NewNote, Note, NotePatch, NoteQuery};
use crate::record::{Collection, JsonFileStore, MemoryStore, Record, RecordStore};
use crate::task::{self, compute_stats, NewTask, StatsSnapshot, Task, TaskPatch, TaskQuery};
use crate::{Error, Result};

pub const TASKS_FILE: &str = "tasks.json";
pub const NOTES_FILE: &str = "notes.json";
pub const CATEGORIES_FILE: &str = "categories.json";

/// Outcome of a bulk task deletion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkDeleteReport {
    pub deleted: Vec<u64>,
    pub not_found: Vec<u64>,
}

impl BulkDeleteReport {
    pub fn deleted_count(&self) -> usize {
        self.deleted.len()
    }
}

/// Outcome of a category deletion
#[derive(Debug, Clone)]
pub struct CategoryRemoval {
    pub category: Category,
    /// Tasks whose category reference was cleared
    pub detached_tasks: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub total: usize,
}

/// Dashboard statistics: the task snapshot plus collection sizes
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeskStats {
    #[serde(flatten)]
    pub tasks: StatsSnapshot,
    pub notes: Totals,
    pub categories: Totals,
}

pub struct Desk {
    tasks: Collection<Task>,
    notes: Collection<Note>,
    categories: Collection<Category>,
    write_lock: Mutex<()>,
}

impl Desk {
    pub fn new(
        tasks: Arc<dyn RecordStore<Task>>,
        notes: Arc<dyn RecordStore<Note>>,
        categories: Arc<dyn RecordStore<Category>>,
    ) -> Self {
        Self {
            tasks: Collection::new(tasks),
            notes: Collection::new(notes),
            categories: Collection::new(categories),
            write_lock: Mutex::new(()),
        }
    }

    /// Desk backed by empty in-memory stores
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(MemoryStore::<Task>::new()),
            Arc::new(MemoryStore::<Note>::new()),
            Arc::new(MemoryStore::<Category>::new()),
        )
    }

    /// Desk backed by JSON files in `data_dir`.
    ///
    /// Missing files are created; a missing categories file is seeded with
    /// the default categories when `seed_categories` is set.
    pub async fn open(data_dir: &Path, seed_categories: bool) -> Result<Self> {
        let tasks = JsonFileStore::<Task>::new(data_dir.join(TASKS_FILE));
        let notes = JsonFileStore::<Note>::new(data_dir.join(NOTES_FILE));
        let categories = JsonFileStore::<Category>::new(data_dir.join(CATEGORIES_FILE));

        tasks.ensure_initialized(&[]).await?;
        notes.ensure_initialized(&[]).await?;
        let defaults = if seed_categories {
            default_categories()
        } else {
            Vec::new()
        };
        if categories.ensure_initialized(&defaults).await? && !defaults.is_empty() {
            info!(
                "Seeded {} default categories in {:?}",
                defaults.len(),
                categories.path()
            );
        }

        Ok(Self::new(
            Arc::new(tasks),
            Arc::new(notes),
            Arc::new(categories),
        ))
    }

    // ------------------------------------------------------------------
    // Tasks
    // ------------------------------------------------------------------

    /// Tasks matching `query`, in its sort order
    pub async fn list_tasks(&self, query: &TaskQuery) -> Vec<Task> {
        task::query::query(self.tasks.all().await, query)
    }

    pub async fn get_task(&self, id: u64) -> Result<Task> {
        self.tasks.get(id).await
    }

    pub async fn create_task(&self, input: NewTask) -> Result<Task> {
        let _guard = self.write_lock.lock().await;

        let mut details = input.validate();
        if let Some(category_id) = input.category_id {
            details.extend(self.check_category_exists(category_id).await);
        }
        reject_if_invalid(Task::KIND, details)?;

        let now = Utc::now();
        let task = self.tasks.insert_with(|id| input.into_task(id, now)).await?;
        info!(task_id = task.id, "Created task");
        Ok(task)
    }

    /// Merge `patch` into an existing task
    pub async fn update_task(&self, id: u64, patch: TaskPatch) -> Result<Task> {
        let _guard = self.write_lock.lock().await;
        self.tasks.get(id).await?;

        let mut details = patch.validate();
        if let Some(category_id) = patch.new_category() {
            details.extend(self.check_category_exists(category_id).await);
        }
        reject_if_invalid(Task::KIND, details)?;

        let now = Utc::now();
        let task = self
            .tasks
            .update_with(id, |task| patch.apply(task, now))
            .await?;
        info!(task_id = id, "Updated task");
        Ok(task)
    }

    pub async fn delete_task(&self, id: u64) -> Result<Task> {
        let _guard = self.write_lock.lock().await;
        let task = self.tasks.remove(id).await?;
        info!(task_id = id, "Deleted task");
        Ok(task)
    }

    /// Remove every listed task in one write, reporting unknown ids
    pub async fn bulk_delete_tasks(&self, ids: &[u64]) -> Result<BulkDeleteReport> {
        let _guard = self.write_lock.lock().await;
        let removal = self.tasks.remove_many(ids).await?;
        let report = BulkDeleteReport {
            deleted: removal.removed.iter().map(|t| t.id).collect(),
            not_found: removal.missing,
        };
        info!(
            deleted = report.deleted.len(),
            not_found = report.not_found.len(),
            "Bulk deleted tasks"
        );
        Ok(report)
    }

    // ------------------------------------------------------------------
    // Notes
    // ------------------------------------------------------------------

    pub async fn list_notes(&self, query: &NoteQuery) -> Vec<Note> {
        note::query::query(self.notes.all().await, query)
    }

    pub async fn get_note(&self, id: u64) -> Result<Note> {
        self.notes.get(id).await
    }

    pub async fn create_note(&self, input: NewNote) -> Result<Note> {
        let _guard = self.write_lock.lock().await;
        reject_if_invalid(Note::KIND, input.validate())?;

        let now = Utc::now();
        let note = self.notes.insert_with(|id| input.into_note(id, now)).await?;
        info!(note_id = note.id, "Created note");
        Ok(note)
    }

    pub async fn update_note(&self, id: u64, patch: NotePatch) -> Result<Note> {
        let _guard = self.write_lock.lock().await;
        self.notes.get(id).await?;
        reject_if_invalid(Note::KIND, patch.validate())?;

        let now = Utc::now();
        let note = self
            .notes
            .update_with(id, |note| patch.apply(note, now))
            .await?;
        info!(note_id = id, "Updated note");
        Ok(note)
    }

    pub async fn delete_note(&self, id: u64) -> Result<Note> {
        let _guard = self.write_lock.lock().await;
        let note = self.notes.remove(id).await?;
        info!(note_id = id, "Deleted note");
        Ok(note)
    }

    // ------------------------------------------------------------------
    // Categories
    // ------------------------------------------------------------------

    pub async fn list_categories(&self) -> Vec<Category> {
        self.categories.all().await
    }

    pub async fn get_category(&self, id: u64) -> Result<Category> {
        self.categories.get(id).await
    }

    pub async fn create_category(&self, input: NewCategory) -> Result<Category> {
        let _guard = self.write_lock.lock().await;

        let mut details = input.validate();
        if details.is_empty() {
            details.extend(self.check_name_available(&input.name, None).await);
        }
        reject_if_invalid(Category::KIND, details)?;

        let category = self
            .categories
            .insert_with(|id| input.into_category(id))
            .await?;
        info!(category_id = category.id, "Created category");
        Ok(category)
    }

    pub async fn update_category(&self, id: u64, patch: CategoryPatch) -> Result<Category> {
        let _guard = self.write_lock.lock().await;
        self.categories.get(id).await?;

        let mut details = patch.validate();
        if let Some(name) = patch.name.as_deref().filter(|_| details.is_empty()) {
            details.extend(self.check_name_available(name, Some(id)).await);
        }
        reject_if_invalid(Category::KIND, details)?;

        let category = self
            .categories
            .update_with(id, |category| patch.apply(category))
            .await?;
        info!(category_id = id, "Updated category");
        Ok(category)
    }

    /// Delete a category and clear it from every task that referenced it.
    ///
    /// Tasks are rewritten before the category is removed, so a failure
    /// part way leaves an unused category rather than dangling references.
    pub async fn delete_category(&self, id: u64) -> Result<CategoryRemoval> {
        let _guard = self.write_lock.lock().await;
        self.categories.get(id).await?;

        let mut tasks = self.tasks.all().await;
        let now = Utc::now();
        let mut detached_tasks = 0;
        for task in tasks.iter_mut().filter(|t| t.category_id == Some(id)) {
            task.category_id = None;
            task.updated_at = now;
            detached_tasks += 1;
        }
        if detached_tasks > 0 {
            self.tasks.replace_all(&tasks).await?;
        }

        let category = self.categories.remove(id).await?;
        info!(category_id = id, detached_tasks, "Deleted category");
        Ok(CategoryRemoval {
            category,
            detached_tasks,
        })
    }

    // ------------------------------------------------------------------
    // Statistics
    // ------------------------------------------------------------------

    pub async fn stats(&self) -> DeskStats {
        let tasks = self.tasks.all().await;
        DeskStats {
            tasks: compute_stats(&tasks),
            notes: Totals {
                total: self.notes.all().await.len(),
            },
            categories: Totals {
                total: self.categories.all().await.len(),
            },
        }
    }

    async fn check_category_exists(&self, category_id: u64) -> Option<String> {
        match self.categories.get(category_id).await {
            Ok(_) => None,
            Err(_) => Some(format!("Category {} does not exist", category_id)),
        }
    }

    async fn check_name_available(&self, name: &str, except: Option<u64>) -> Option<String> {
        let taken = self
            .categories
            .all()
            .await
            .iter()
            .any(|c| Some(c.id) != except && c.has_name(name));
        taken.then(|| format!("Category '{}' already exists", name.trim()))
    }
}

fn reject_if_invalid(kind: &'static str, details: Vec<String>) -> Result<()> {
    if details.is_empty() {
        Ok(())
    } else {
        Err(Error::Validation { kind, details })
    }
}
