//! Derived views over a task collection. Always computed from the slice
//! handed in; nothing is cached.

use crate::repository::{Task, TaskPriority, TaskStatus};
use crate::utils::date::parse_due_date;

/// Tasks ordered ascending by due date.
///
/// Unparsable due dates sort before every parsable one. The sort is stable,
/// so equal dates keep collection order.
pub fn sort_by_due_date(tasks: &[Task]) -> Vec<Task> {
    let mut sorted = tasks.to_vec();
    sorted.sort_by_cached_key(|task| parse_due_date(&task.due_date));
    sorted
}

pub fn filter_by_status(tasks: &[Task], status: TaskStatus) -> Vec<Task> {
    tasks.iter().filter(|t| t.status == status).cloned().collect()
}

pub fn filter_by_priority(tasks: &[Task], priority: TaskPriority) -> Vec<Task> {
    tasks.iter().filter(|t| t.priority == priority).cloned().collect()
}
