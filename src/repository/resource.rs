use fake::{Dummy, Faker};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Defines the lifecycle states of a task.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskStatus {
    Pending,
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 3] = [
        TaskStatus::Pending,
        TaskStatus::InProgress,
        TaskStatus::Completed,
    ];

    /// Returns the label used on the wire and in forms.
    ///
    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Pending => "Pending",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Completed => "Completed",
        }
    }
}

/// Defines the priority levels of a task.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskPriority {
    Low,
    Medium,
    High,
}

impl TaskPriority {
    pub const ALL: [TaskPriority; 3] = [TaskPriority::Low, TaskPriority::Medium, TaskPriority::High];

    /// Returns the label used on the wire and in forms.
    ///
    pub fn as_str(self) -> &'static str {
        match self {
            TaskPriority::Low => "Low",
            TaskPriority::Medium => "Medium",
            TaskPriority::High => "High",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TaskStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("Invalid status '{}'", s))
    }
}

impl FromStr for TaskPriority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TaskPriority::ALL
            .into_iter()
            .find(|priority| priority.as_str() == s)
            .ok_or_else(|| format!("Invalid priority '{}'", s))
    }
}

impl Dummy<Faker> for TaskStatus {
    fn dummy_with_rng<R: Rng + ?Sized>(_: &Faker, rng: &mut R) -> Self {
        TaskStatus::ALL[rng.gen_range(0..TaskStatus::ALL.len())]
    }
}

impl Dummy<Faker> for TaskPriority {
    fn dummy_with_rng<R: Rng + ?Sized>(_: &Faker, rng: &mut R) -> Self {
        TaskPriority::ALL[rng.gen_range(0..TaskPriority::ALL.len())]
    }
}

/// Defines subtask data structure.
///
#[derive(Clone, Debug, Dummy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subtask {
    pub id: i64,
    pub title: String,
    pub completed: bool,
}

/// Defines task data structure. A task without an `id` is a draft that has
/// not been accepted by the remote collection yet.
///
#[derive(Clone, Debug, Dummy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub due_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtasks: Option<Vec<Subtask>>,
}

impl Task {
    /// Returns a new draft without identifier or subtasks.
    ///
    pub fn draft(
        title: &str,
        description: &str,
        status: TaskStatus,
        priority: TaskPriority,
        due_date: &str,
    ) -> Task {
        Task {
            id: None,
            title: title.to_owned(),
            description: description.to_owned(),
            status,
            priority,
            due_date: due_date.to_owned(),
            subtasks: None,
        }
    }

    pub fn is_draft(&self) -> bool {
        self.id.is_none()
    }

    /// Append a subtask with the next free identifier and return it.
    ///
    pub fn add_subtask(&mut self, title: &str) -> &Subtask {
        let subtasks = self.subtasks.get_or_insert_with(Vec::new);
        let id = subtasks.iter().map(|s| s.id).max().unwrap_or(0) + 1;
        subtasks.push(Subtask {
            id,
            title: title.to_owned(),
            completed: false,
        });
        &subtasks[subtasks.len() - 1]
    }

    /// Flip the completion flag of the subtask, returning false when absent.
    ///
    pub fn toggle_subtask(&mut self, subtask_id: i64) -> bool {
        match self
            .subtasks
            .iter_mut()
            .flatten()
            .find(|s| s.id == subtask_id)
        {
            Some(subtask) => {
                subtask.completed = !subtask.completed;
                true
            }
            None => false,
        }
    }

    /// Remove the subtask, returning false when absent.
    ///
    pub fn remove_subtask(&mut self, subtask_id: i64) -> bool {
        let Some(subtasks) = self.subtasks.as_mut() else {
            return false;
        };
        let before = subtasks.len();
        subtasks.retain(|s| s.id != subtask_id);
        subtasks.len() != before
    }

    pub fn has_unique_subtask_ids(&self) -> bool {
        let mut seen = HashSet::new();
        self.subtasks.iter().flatten().all(|s| seen.insert(s.id))
    }
}

/// Keep only persisted tasks, first occurrence per identifier.
/// Returns how many entries were dropped.
///
pub fn retain_persisted(tasks: &mut Vec<Task>) -> usize {
    let before = tasks.len();
    let mut seen = HashSet::new();
    tasks.retain(|task| task.id.map_or(false, |id| seen.insert(id)));
    before - tasks.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use fake::Fake;
    use serde_json::json;

    fn sample() -> Task {
        Task::draft(
            "Write report",
            "Quarterly numbers",
            TaskStatus::Pending,
            TaskPriority::High,
            "2024-11-25",
        )
    }

    #[test]
    fn status_labels_round_trip_through_from_str() {
        for status in TaskStatus::ALL {
            assert_eq!(status, status.as_str().parse().unwrap());
        }
        assert!("Done".parse::<TaskStatus>().is_err());
        assert!("".parse::<TaskPriority>().is_err());
    }

    #[test]
    fn serializes_camel_case_without_draft_id() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(
            value,
            json!({
                "title": "Write report",
                "description": "Quarterly numbers",
                "status": "Pending",
                "priority": "High",
                "dueDate": "2024-11-25",
            })
        );
    }

    #[test]
    fn deserializes_in_progress_status() {
        let task: Task = serde_json::from_value(json!({
            "id": 7,
            "title": "Ship",
            "description": "Ship it now",
            "status": "In Progress",
            "priority": "Low",
            "dueDate": "2024-12-01",
            "subtasks": [{ "id": 1, "title": "Pack", "completed": true }]
        }))
        .unwrap();
        assert_eq!(task.id, Some(7));
        assert_eq!(task.status, TaskStatus::InProgress);
        assert_eq!(task.subtasks.unwrap()[0].title, "Pack");
    }

    #[test]
    fn add_subtask_assigns_next_id() {
        let mut task = sample();
        assert_eq!(task.add_subtask("first").id, 1);
        assert_eq!(task.add_subtask("second").id, 2);
        assert!(task.remove_subtask(1));
        assert_eq!(task.add_subtask("third").id, 3);
        assert!(task.has_unique_subtask_ids());
    }

    #[test]
    fn toggle_and_remove_missing_subtask() {
        let mut task = sample();
        assert!(!task.toggle_subtask(1));
        assert!(!task.remove_subtask(1));
        task.add_subtask("first");
        assert!(task.toggle_subtask(1));
        assert!(task.subtasks.as_ref().unwrap()[0].completed);
    }

    #[test]
    fn detects_duplicate_subtask_ids() {
        let mut task: Task = Faker.fake();
        let subtask: Subtask = Faker.fake();
        task.subtasks = Some(vec![subtask.clone(), subtask]);
        assert!(!task.has_unique_subtask_ids());
    }

    #[test]
    fn retain_persisted_drops_drafts_and_repeated_ids() {
        let with_id = |id: Option<i64>| Task { id, ..Faker.fake() };
        let mut tasks = vec![
            with_id(Some(1)),
            with_id(None),
            with_id(Some(2)),
            with_id(Some(1)),
        ];
        let first = tasks[0].clone();

        assert_eq!(retain_persisted(&mut tasks), 2);
        assert_eq!(tasks.iter().map(|t| t.id).collect::<Vec<_>>(), vec![Some(1), Some(2)]);
        assert_eq!(tasks[0], first);
        assert_eq!(retain_persisted(&mut tasks), 0);
    }
}
