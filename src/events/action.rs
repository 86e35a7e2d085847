use crate::repository::{Task, TaskRepository};
use crate::store::TaskStore;
use log::*;
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

pub type ActionSender = UnboundedSender<Action>;
type ActionReceiver = UnboundedReceiver<Action>;

/// Specify the different store actions.
///
#[derive(Debug, Clone)]
pub enum Action {
    FetchTasks { page: u32, limit: u32 },
    RefreshTasks { page: u32, limit: u32 },
    CreateTask(Task),
    UpdateTask(Task),
    DeleteTask { id: i64 },
}

/// Runs queued actions against a shared store strictly one after another,
/// so no two actions ever overlap on the collection.
///
pub struct Dispatcher<R> {
    store: Arc<TaskStore<R>>,
    receiver: ActionReceiver,
}

impl<R: TaskRepository> Dispatcher<R> {
    /// Return a dispatcher for `store` and the sender feeding it.
    ///
    pub fn new(store: Arc<TaskStore<R>>) -> (Self, ActionSender) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Dispatcher { store, receiver }, sender)
    }

    /// Handle actions until every sender is dropped.
    ///
    pub async fn run(mut self) {
        while let Some(action) = self.receiver.recv().await {
            self.handle(action).await;
        }
        debug!("Action queue closed.");
    }

    /// Handle one action by type.
    ///
    pub async fn handle(&self, action: Action) {
        debug!("Processing action '{:?}'...", action);
        match action {
            Action::FetchTasks { page, limit } => self.store.fetch_tasks(page, limit).await,
            Action::RefreshTasks { page, limit } => self.store.refresh_tasks(page, limit).await,
            Action::CreateTask(draft) => self.store.create_task(&draft).await,
            Action::UpdateTask(task) => self.store.update_task(&task).await,
            Action::DeleteTask { id } => self.store.delete_task(id).await,
        }
        if let Some(message) = self.store.error() {
            error!("Action failed: {}", message);
        }
    }
}
