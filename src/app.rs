use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::events::action::{Action, Dispatcher};
use crate::repository::{
    DefaultingAdapter, HttpTaskRepository, Task, TaskPriority, TaskRepository, TaskStatus,
};
use crate::store::{FileSnapshot, TaskStore};
use crate::utils::{format_date, truncate_text};
use crate::validation::FormErrors;
use log::*;
use std::sync::Arc;

const TITLE_WIDTH: usize = 40;

/// Specify the different commands the application can run.
///
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    List {
        page: u32,
        limit: u32,
        refresh: bool,
        sorted: bool,
        status: Option<TaskStatus>,
        priority: Option<TaskPriority>,
    },
    Create(Task),
    Update { id: i64, patch: TaskPatch },
    Delete { id: i64 },
}

/// Fields to change on an existing task; `None` keeps the current value.
///
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub due_date: Option<String>,
    pub add_subtasks: Vec<String>,
    pub toggle_subtasks: Vec<i64>,
}

impl TaskPatch {
    /// Apply the patch, failing when a subtask to toggle does not exist.
    ///
    pub fn apply(&self, task: &mut Task) -> AppResult<()> {
        if let Some(title) = &self.title {
            task.title = title.clone();
        }
        if let Some(description) = &self.description {
            task.description = description.clone();
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(due_date) = &self.due_date {
            task.due_date = due_date.clone();
        }
        for title in &self.add_subtasks {
            task.add_subtask(title);
        }
        for subtask_id in &self.toggle_subtasks {
            if !task.toggle_subtask(*subtask_id) {
                return Err(AppError::Invalid(format!("Subtask {} not found", subtask_id)));
            }
        }
        Ok(())
    }
}

/// Oversees command processing against a task store.
///
pub struct App<R> {
    store: Arc<TaskStore<R>>,
    page_size: u32,
}

impl App<HttpTaskRepository> {
    /// Build the HTTP-backed store described by the configuration.
    ///
    pub fn from_config(config: &Config) -> AppResult<Self> {
        let repository = HttpTaskRepository::with_adapter(
            config.api_base_url()?,
            Box::new(DefaultingAdapter::new(config.list_defaults.clone())),
        )?;
        let mut store = TaskStore::new(repository);
        if let Some(path) = config.snapshot_file() {
            debug!("Using task snapshot at {}", path.display());
            store = store.with_snapshot(Box::new(FileSnapshot::new(path)));
        }
        Ok(App::new(store, config.page_size))
    }
}

impl<R: TaskRepository> App<R> {
    pub fn new(store: TaskStore<R>, page_size: u32) -> Self {
        App {
            store: Arc::new(store),
            page_size,
        }
    }

    pub fn store(&self) -> &TaskStore<R> {
        &self.store
    }

    /// Run a command and return the lines to print.
    ///
    pub async fn execute(&self, command: Command) -> AppResult<Vec<String>> {
        info!("Running command {:?}...", command);
        match command {
            Command::List {
                page,
                limit,
                refresh,
                sorted,
                status,
                priority,
            } => {
                let action = if refresh {
                    Action::RefreshTasks { page, limit }
                } else {
                    Action::FetchTasks { page, limit }
                };
                self.run(action).await?;
                let mut tasks = if sorted {
                    self.store.sorted_tasks()
                } else {
                    self.store.tasks()
                };
                if let Some(status) = status {
                    tasks.retain(|t| t.status == status);
                }
                if let Some(priority) = priority {
                    tasks.retain(|t| t.priority == priority);
                }
                Ok(tasks.iter().map(render_task).collect())
            }
            Command::Create(draft) => {
                ensure_valid(&draft)?;
                self.run(self.fetch_first_page()).await?;
                self.run(Action::CreateTask(draft)).await?;
                let tasks = self.store.tasks();
                Ok(tasks.last().map(render_task).into_iter().collect())
            }
            Command::Update { id, patch } => {
                self.run(self.fetch_first_page()).await?;
                let mut task = self
                    .store
                    .tasks()
                    .into_iter()
                    .find(|t| t.id == Some(id))
                    .ok_or_else(|| AppError::Invalid(format!("Task {} not found", id)))?;
                patch.apply(&mut task)?;
                ensure_valid(&task)?;
                self.run(Action::UpdateTask(task)).await?;
                Ok(self
                    .store
                    .tasks()
                    .iter()
                    .filter(|t| t.id == Some(id))
                    .map(render_task)
                    .collect())
            }
            Command::Delete { id } => {
                self.run(self.fetch_first_page()).await?;
                self.run(Action::DeleteTask { id }).await?;
                Ok(vec![format!("Deleted task {}", id)])
            }
        }
    }

    fn fetch_first_page(&self) -> Action {
        Action::FetchTasks {
            page: 1,
            limit: self.page_size,
        }
    }

    /// Queue one action, drain the queue, and surface the error it recorded.
    ///
    async fn run(&self, action: Action) -> AppResult<()> {
        let (dispatcher, sender) = Dispatcher::new(Arc::clone(&self.store));
        sender
            .send(action)
            .map_err(|e| AppError::Action(format!("Action queue closed: {:?}", e.0)))?;
        drop(sender);
        dispatcher.run().await;
        match self.store.error() {
            Some(message) => Err(AppError::Action(message)),
            None => Ok(()),
        }
    }
}

fn ensure_valid(task: &Task) -> AppResult<()> {
    let mut errors = FormErrors::create_empty();
    if errors.validate_task(task) {
        return Ok(());
    }
    let messages: Vec<String> = errors
        .failures()
        .map(|(field, messages)| format!("{}: {}", field.name(), messages.join(", ")))
        .collect();
    Err(AppError::Invalid(messages.join("; ")))
}

/// Render one task as a single display line.
///
pub fn render_task(task: &Task) -> String {
    let id = task
        .id
        .map(|id| format!("#{}", id))
        .unwrap_or_else(|| String::from("#-"));
    let mut line = format!(
        "{} {} [{}] ({}) due {}",
        id,
        truncate_text(&task.title, TITLE_WIDTH, "..."),
        task.status,
        task.priority,
        format_date(&task.due_date)
    );
    if let Some(subtasks) = task.subtasks.as_ref().filter(|s| !s.is_empty()) {
        let done = subtasks.iter().filter(|s| s.completed).count();
        line.push_str(&format!(" {}/{} subtasks", done, subtasks.len()));
    }
    line
}
