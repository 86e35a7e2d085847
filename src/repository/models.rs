//! Wire records returned by the remote collection and the adapter that maps
//! them onto the canonical task shape.

use super::resource::{Subtask, Task, TaskPriority, TaskStatus};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Record as listed by the remote collection. Only `title` is guaranteed;
/// every other field may be missing upstream.
///
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteRecord {
    #[serde(default)]
    pub id: Option<i64>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<TaskStatus>,
    #[serde(default)]
    pub priority: Option<TaskPriority>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub subtasks: Option<Vec<Subtask>>,
}

/// Maps listed records onto tasks. Swap the implementation to follow a
/// different upstream schema without touching the repository call sites.
///
pub trait RecordAdapter: Send + Sync {
    fn to_task(&self, record: RemoteRecord, fetched_at: DateTime<Utc>) -> Task;
}

/// Values used for fields absent from a listed record.
///
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListDefaults {
    #[serde(default = "default_status")]
    pub status: TaskStatus,
    #[serde(default = "default_priority")]
    pub priority: TaskPriority,
    #[serde(default = "default_description_from_title")]
    pub description_from_title: bool,
}

fn default_status() -> TaskStatus {
    TaskStatus::Pending
}

fn default_priority() -> TaskPriority {
    TaskPriority::Medium
}

fn default_description_from_title() -> bool {
    true
}

impl Default for ListDefaults {
    fn default() -> Self {
        ListDefaults {
            status: default_status(),
            priority: default_priority(),
            description_from_title: default_description_from_title(),
        }
    }
}

/// Fills missing fields from `ListDefaults`; the due date falls back to the
/// fetch moment.
///
#[derive(Clone, Debug, Default)]
pub struct DefaultingAdapter {
    defaults: ListDefaults,
}

impl DefaultingAdapter {
    pub fn new(defaults: ListDefaults) -> Self {
        DefaultingAdapter { defaults }
    }
}

impl RecordAdapter for DefaultingAdapter {
    fn to_task(&self, record: RemoteRecord, fetched_at: DateTime<Utc>) -> Task {
        let description = match record.description {
            Some(description) => description,
            None if self.defaults.description_from_title => record.title.clone(),
            None => String::new(),
        };
        Task {
            id: record.id,
            description,
            status: record.status.unwrap_or(self.defaults.status),
            priority: record.priority.unwrap_or(self.defaults.priority),
            due_date: record
                .due_date
                .unwrap_or_else(|| fetched_at.to_rfc3339_opts(SecondsFormat::Millis, true)),
            subtasks: record.subtasks,
            title: record.title,
        }
    }
}
