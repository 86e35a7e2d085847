//! Task repository client.
//!
//! The only component that performs network I/O against the remote task
//! collection. Responses are normalized into the canonical `Task` shape and
//! every failure is surfaced to the caller.

mod client;
mod error;
mod models;
mod resource;

pub use error::{RepositoryError, RepositoryResult};
pub use models::{DefaultingAdapter, ListDefaults, RecordAdapter, RemoteRecord};
pub use resource::*;

use chrono::Utc;
use client::Client;
use log::*;
use reqwest::Method;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 10;

/// Operations on the remote task collection.
///
#[allow(async_fn_in_trait)]
pub trait TaskRepository {
    /// Return one page of tasks; `page` is 1-based and `limit` is the page size.
    async fn list(&self, page: u32, limit: u32) -> RepositoryResult<Vec<Task>>;

    /// Submit a draft and return it with its remote-assigned identifier.
    async fn create(&self, task: &Task) -> RepositoryResult<Task>;

    /// Replace the remote record at the task's identifier.
    async fn update(&self, task: &Task) -> RepositoryResult<Task>;

    /// Delete the remote record with the given identifier.
    async fn remove(&self, task_id: i64) -> RepositoryResult<()>;
}

/// Responsible for asynchronous interaction with a REST task collection
/// including transformation of response data into `Task` values.
///
pub struct HttpTaskRepository {
    client: Client,
    adapter: Box<dyn RecordAdapter>,
}

impl HttpTaskRepository {
    /// Returns a new instance for the given collection URL using the default
    /// record adapter.
    ///
    pub fn new(base_url: &str) -> RepositoryResult<Self> {
        Self::with_adapter(base_url, Box::new(DefaultingAdapter::default()))
    }

    /// Returns a new instance mapping listed records through `adapter`.
    ///
    pub fn with_adapter(base_url: &str, adapter: Box<dyn RecordAdapter>) -> RepositoryResult<Self> {
        debug!("Initializing task repository for {}...", base_url);
        Ok(HttpTaskRepository {
            client: Client::new(base_url)?,
            adapter,
        })
    }
}

fn ensure_unique_subtasks(task: &Task) -> RepositoryResult<()> {
    if task.has_unique_subtask_ids() {
        Ok(())
    } else {
        Err(RepositoryError::Validation(
            "Subtask identifiers must be unique within a task".to_string(),
        ))
    }
}

impl TaskRepository for HttpTaskRepository {
    async fn list(&self, page: u32, limit: u32) -> RepositoryResult<Vec<Task>> {
        if page == 0 || limit == 0 {
            return Err(RepositoryError::Validation(
                "Page and limit must be positive".to_string(),
            ));
        }
        debug!("Requesting tasks page {} (limit {})...", page, limit);

        let records: Vec<RemoteRecord> = self
            .client
            .list(&[("_page", page.to_string()), ("_limit", limit.to_string())])
            .await?;
        let fetched_at = Utc::now();

        debug!("Retrieved {} task records", records.len());
        let mut tasks: Vec<Task> = records
            .into_iter()
            .map(|record| self.adapter.to_task(record, fetched_at))
            .collect();
        let dropped = retain_persisted(&mut tasks);
        if dropped > 0 {
            warn!("Dropped {} listed records without a unique identifier", dropped);
        }
        Ok(tasks)
    }

    async fn create(&self, task: &Task) -> RepositoryResult<Task> {
        if !task.is_draft() {
            return Err(RepositoryError::Validation(
                "Only drafts without an identifier can be created".to_string(),
            ));
        }
        ensure_unique_subtasks(task)?;
        debug!("Creating task '{}'...", task.title);

        let created: Task = self.client.send(Method::POST, None, task).await?;
        if created.id.is_none() {
            error!("Remote collection returned created task without identifier");
            return Err(RepositoryError::MissingIdentifier);
        }
        Ok(created)
    }

    async fn update(&self, task: &Task) -> RepositoryResult<Task> {
        let id = task
            .id
            .ok_or_else(|| RepositoryError::Validation("Task ID is required for update".to_string()))?;
        ensure_unique_subtasks(task)?;
        debug!("Updating task {}...", id);

        let mut updated: Task = self.client.send(Method::PUT, Some(id), task).await?;
        updated.id.get_or_insert(id);
        Ok(updated)
    }

    async fn remove(&self, task_id: i64) -> RepositoryResult<()> {
        debug!("Deleting task {}...", task_id);
        self.client.delete(task_id).await
    }
}
