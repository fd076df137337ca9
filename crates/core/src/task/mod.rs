//! Task module
//!
//! This module contains task-related types, the query engine and the
//! dashboard statistics.

mod model;
pub mod query;
mod stats;

pub use model::*;
pub use query::{
    CategoryFilter, StatusFilter, TaskQuery, TaskQueryParams, TaskSort, TaskSortField,
};
pub use stats::{compute_stats, PriorityCounts, StatsSnapshot, StatusCounts, UNCATEGORIZED};
