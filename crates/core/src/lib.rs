//! Core library for taskdesk
//!
//! This crate contains the business logic behind the task manager API:
//! - Record storage (JSON files, in-memory doubles)
//! - Task, note and category models
//! - Task query engine and statistics
//! - The `Desk` service tying them together

pub mod category;
pub mod desk;
pub mod error;
mod fields;
pub mod note;
pub mod query;
pub mod record;
pub mod task;

pub use desk::{BulkDeleteReport, CategoryRemoval, Desk, DeskStats};
pub use error::Error;
pub type Result<T> = std::result::Result<T, Error>;
