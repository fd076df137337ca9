//! Task statistics for the dashboard

use std::collections::BTreeMap;

use serde::Serialize;

use super::model::{Task, TaskPriority, TaskStatus};

/// Bucket name for tasks without a category
pub const UNCATEGORIZED: &str = "uncategorized";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCounts {
    pub pending: usize,
    pub in_progress: usize,
    pub completed: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriorityCounts {
    pub low: usize,
    pub medium: usize,
    pub high: usize,
}

/// Aggregate view over the task collection
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSnapshot {
    pub total: usize,
    pub by_status: StatusCounts,
    pub by_priority: PriorityCounts,
    /// completed / total, 0 for an empty collection
    pub completion_rate: f64,
    /// Task counts keyed by category id, plus [`UNCATEGORIZED`]
    pub by_category: BTreeMap<String, usize>,
}

pub fn compute_stats(tasks: &[Task]) -> StatsSnapshot {
    let mut by_status = StatusCounts::default();
    let mut by_priority = PriorityCounts::default();
    let mut by_category = BTreeMap::from([(UNCATEGORIZED.to_string(), 0)]);

    for task in tasks {
        match task.status {
            TaskStatus::Pending => by_status.pending += 1,
            TaskStatus::InProgress => by_status.in_progress += 1,
            TaskStatus::Completed => by_status.completed += 1,
        }
        match task.priority {
            TaskPriority::Low => by_priority.low += 1,
            TaskPriority::Medium => by_priority.medium += 1,
            TaskPriority::High => by_priority.high += 1,
        }
        let bucket = match task.category_id {
            Some(id) => id.to_string(),
            None => UNCATEGORIZED.to_string(),
        };
        *by_category.entry(bucket).or_insert(0) += 1;
    }

    let total = tasks.len();
    let completion_rate = if total == 0 {
        0.0
    } else {
        by_status.completed as f64 / total as f64
    };

    StatsSnapshot {
        total,
        by_status,
        by_priority,
        completion_rate,
        by_category,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_collection() {
        let stats = compute_stats(&[]);
        assert_eq!(stats.total, 0);
        assert_eq!(stats.completion_rate, 0.0);
        assert_eq!(stats.by_category.get(UNCATEGORIZED), Some(&0));
        assert_eq!(stats.by_category.len(), 1);
    }

    #[test]
    fn test_two_task_scenario() {
        let tasks = vec![
            Task::new(1, "A").with_priority(TaskPriority::Low),
            Task::new(2, "B")
                .with_status(TaskStatus::Completed)
                .with_priority(TaskPriority::High),
        ];
        let stats = compute_stats(&tasks);

        assert_eq!(stats.total, 2);
        assert_eq!(stats.completion_rate, 0.5);
        assert_eq!(
            stats.by_status,
            StatusCounts {
                pending: 1,
                in_progress: 0,
                completed: 1
            }
        );
        assert_eq!(
            stats.by_priority,
            PriorityCounts {
                low: 1,
                medium: 0,
                high: 1
            }
        );
    }

    #[test]
    fn test_category_buckets() {
        let tasks = vec![
            Task::new(1, "A").with_category(2),
            Task::new(2, "B").with_category(2),
            Task::new(3, "C").with_category(5),
            Task::new(4, "D"),
        ];
        let stats = compute_stats(&tasks);

        assert_eq!(stats.by_category.get("2"), Some(&2));
        assert_eq!(stats.by_category.get("5"), Some(&1));
        assert_eq!(stats.by_category.get(UNCATEGORIZED), Some(&1));
        assert_eq!(stats.by_category.values().sum::<usize>(), stats.total);
    }

    #[test]
    fn test_completion_rate_is_ratio() {
        let tasks: Vec<Task> = (1..=4)
            .map(|id| {
                let task = Task::new(id, format!("Task {}", id));
                if id == 1 {
                    task.with_status(TaskStatus::Completed)
                } else {
                    task.with_status(TaskStatus::InProgress)
                }
            })
            .collect();

        let stats = compute_stats(&tasks);
        assert_eq!(stats.completion_rate, 0.25);
        assert_eq!(stats.by_status.in_progress, 3);
    }

    #[test]
    fn test_serialized_shape() {
        let value = serde_json::to_value(compute_stats(&[Task::new(1, "A")])).unwrap();
        assert_eq!(value["total"], 1);
        assert_eq!(value["byStatus"]["inProgress"], 0);
        assert_eq!(value["byCategory"]["uncategorized"], 1);
        assert_eq!(value["completionRate"], 0.0);
    }
}
