use super::snapshot::Snapshot;
use super::views;
use crate::repository::{
    retain_persisted, RepositoryError, Task, TaskPriority, TaskRepository, TaskStatus,
};
use log::*;
use std::sync::{Mutex, MutexGuard, PoisonError};

pub const FETCH_FALLBACK: &str = "An unknown error occurred";
pub const CREATE_FALLBACK: &str = "Failed to create task";
pub const UPDATE_FALLBACK: &str = "Failed to update task";
pub const DELETE_FALLBACK: &str = "Failed to delete task";

/// Houses the task collection and the status of the last action.
///
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StoreState {
    pub tasks: Vec<Task>,
    pub loading: bool,
    pub error: Option<String>,
}

/// Single authoritative holder of the task collection. Every mutation goes
/// through an action that talks to the repository first and only touches
/// the collection once the remote call succeeded.
///
/// Actions never return errors. A failed action leaves the collection as it
/// was and records a message readable through `error()`. Actions take
/// `&self`, so overlapping calls are possible; they are not serialized and
/// the last one to finish wins `loading` and `error`. Use
/// `events::action::Dispatcher` for one action at a time.
pub struct TaskStore<R> {
    repository: R,
    snapshot: Option<Box<dyn Snapshot>>,
    state: Mutex<StoreState>,
}

/// Clears `loading` when dropped, whatever way the action ends.
///
struct LoadingGuard<'a> {
    state: &'a Mutex<StoreState>,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        lock(self.state).loading = false;
    }
}

fn lock(state: &Mutex<StoreState>) -> MutexGuard<'_, StoreState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<R: TaskRepository> TaskStore<R> {
    /// Return a new empty store backed by `repository`.
    ///
    pub fn new(repository: R) -> Self {
        TaskStore {
            repository,
            snapshot: None,
            state: Mutex::new(StoreState::default()),
        }
    }

    /// Attach a local snapshot slot read before fetching and written after
    /// every successful action.
    ///
    pub fn with_snapshot(mut self, snapshot: Box<dyn Snapshot>) -> Self {
        self.snapshot = Some(snapshot);
        self
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Copy of the whole state, valid until the next action completes.
    ///
    pub fn state(&self) -> StoreState {
        lock(&self.state).clone()
    }

    pub fn tasks(&self) -> Vec<Task> {
        lock(&self.state).tasks.clone()
    }

    pub fn is_loading(&self) -> bool {
        lock(&self.state).loading
    }

    pub fn error(&self) -> Option<String> {
        lock(&self.state).error.clone()
    }

    /// Drop all tasks and status, leaving the snapshot slot untouched.
    ///
    pub fn reset(&self) {
        *lock(&self.state) = StoreState::default();
    }

    /// Populate the collection from the snapshot when one holds tasks,
    /// otherwise replace it with a page fetched from the repository.
    ///
    pub async fn fetch_tasks(&self, page: u32, limit: u32) {
        let _loading = self.begin();
        if let Some(tasks) = self.read_snapshot() {
            info!("Loaded {} tasks from local snapshot.", tasks.len());
            lock(&self.state).tasks = tasks;
            return;
        }
        self.fetch_remote(page, limit).await;
    }

    /// Replace the collection with a page fetched from the repository,
    /// ignoring any snapshot.
    ///
    pub async fn refresh_tasks(&self, page: u32, limit: u32) {
        let _loading = self.begin();
        self.fetch_remote(page, limit).await;
    }

    /// Submit a draft and append the created task.
    ///
    pub async fn create_task(&self, draft: &Task) {
        let _loading = self.begin();
        let created = match self.repository.create(draft).await {
            Ok(task) => task,
            Err(e) => return self.fail(e, CREATE_FALLBACK),
        };
        let Some(id) = created.id else {
            return self.fail(RepositoryError::MissingIdentifier, CREATE_FALLBACK);
        };
        {
            let mut state = lock(&self.state);
            match state.tasks.iter_mut().find(|t| t.id == Some(id)) {
                Some(existing) => {
                    warn!("Created task {} replaces an entry with the same id.", id);
                    *existing = created;
                }
                None => state.tasks.push(created),
            }
        }
        info!("Created task {}.", id);
        self.persist();
    }

    /// Submit a persisted task and replace the matching entry in place.
    /// An id missing from the collection leaves it unchanged.
    ///
    pub async fn update_task(&self, task: &Task) {
        let _loading = self.begin();
        let updated = match self.repository.update(task).await {
            Ok(updated) => updated,
            Err(e) => return self.fail(e, UPDATE_FALLBACK),
        };
        let id = updated.id.or(task.id);
        let replaced = {
            let mut state = lock(&self.state);
            match state.tasks.iter_mut().find(|t| t.id.is_some() && t.id == id) {
                Some(existing) => {
                    *existing = updated;
                    true
                }
                None => false,
            }
        };
        if replaced {
            info!("Updated task {:?}.", id);
        } else {
            warn!("Task {:?} is not in the store; nothing to update.", id);
        }
        self.persist();
    }

    /// Delete remotely and drop every entry with the id.
    ///
    pub async fn delete_task(&self, id: i64) {
        let _loading = self.begin();
        if let Err(e) = self.repository.remove(id).await {
            return self.fail(e, DELETE_FALLBACK);
        }
        let removed = {
            let mut state = lock(&self.state);
            let before = state.tasks.len();
            state.tasks.retain(|t| t.id != Some(id));
            before - state.tasks.len()
        };
        if removed == 0 {
            warn!("Task {} is not in the store; nothing to remove.", id);
        } else {
            info!("Deleted task {}.", id);
        }
        self.persist();
    }

    /// Tasks ordered ascending by due date.
    ///
    pub fn sorted_tasks(&self) -> Vec<Task> {
        views::sort_by_due_date(&lock(&self.state).tasks)
    }

    pub fn filter_by_status(&self, status: TaskStatus) -> Vec<Task> {
        views::filter_by_status(&lock(&self.state).tasks, status)
    }

    pub fn filter_by_priority(&self, priority: TaskPriority) -> Vec<Task> {
        views::filter_by_priority(&lock(&self.state).tasks, priority)
    }

    fn begin(&self) -> LoadingGuard<'_> {
        let mut state = lock(&self.state);
        state.loading = true;
        state.error = None;
        LoadingGuard { state: &self.state }
    }

    async fn fetch_remote(&self, page: u32, limit: u32) {
        match self.repository.list(page, limit).await {
            Ok(mut tasks) => {
                let dropped = retain_persisted(&mut tasks);
                if dropped > 0 {
                    warn!("Skipped {} fetched tasks without a unique id.", dropped);
                }
                info!("Fetched {} tasks (page {}, limit {}).", tasks.len(), page, limit);
                lock(&self.state).tasks = tasks;
                self.persist();
            }
            Err(e) => self.fail(e, FETCH_FALLBACK),
        }
    }

    fn fail(&self, e: RepositoryError, fallback: &str) {
        error!("{}: {}", fallback, e);
        let message = e.to_string();
        lock(&self.state).error = Some(if message.trim().is_empty() {
            fallback.to_string()
        } else {
            message
        });
    }

    /// Snapshot content usable as the collection. Unreadable content, drafts
    /// or repeated ids discard the snapshot.
    ///
    fn read_snapshot(&self) -> Option<Vec<Task>> {
        let snapshot = self.snapshot.as_ref()?;
        match snapshot.load() {
            Ok(Some(mut tasks)) => {
                if retain_persisted(&mut tasks) == 0 {
                    return Some(tasks);
                }
                warn!("Discarding task snapshot holding drafts or repeated ids.");
            }
            Ok(None) => return None,
            Err(e) => warn!("Discarding unreadable task snapshot: {}", e),
        }
        if let Err(e) = snapshot.clear() {
            warn!("Failed to clear task snapshot: {}", e);
        }
        None
    }

    fn persist(&self) {
        let Some(snapshot) = self.snapshot.as_ref() else {
            return;
        };
        let tasks = self.tasks();
        if let Err(e) = snapshot.save(&tasks) {
            warn!("Failed to persist task snapshot: {}", e);
        }
    }
}
