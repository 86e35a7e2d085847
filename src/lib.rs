//! Client-side state for a task board.
//!
//! - `repository`: the REST client for the remote task collection
//! - `store`: the authoritative task collection with loading/error status
//! - `validation`: form rules for task fields
//! - `events`: a queue running store actions one at a time

pub mod app;
pub mod config;
pub mod error;
pub mod events;
pub mod logger;
pub mod repository;
pub mod store;
pub mod utils;
pub mod validation;

pub use error::{AppError, AppResult};
pub use repository::{
    HttpTaskRepository, RepositoryError, Subtask, Task, TaskPriority, TaskRepository, TaskStatus,
};
pub use store::{StoreState, TaskStore};
