use httpmock::MockServer;
use serde_json::json;
use taskboard::app::{App, Command, TaskPatch};
use taskboard::store::{FileSnapshot, Snapshot};
use taskboard::{AppError, HttpTaskRepository, Task, TaskPriority, TaskStatus, TaskStore};

fn remote_tasks() -> serde_json::Value {
    json!([
        {
            "id": 1,
            "title": "quis ut nam facilis et officia qui",
            "description": "nam facilis et officia description 1",
            "dueDate": "2024-11-26",
            "status": "Pending",
            "priority": "Low"
        },
        {
            "id": 2,
            "title": "fugiat veniam minus",
            "description": "fugiat veniam minus description 2",
            "dueDate": "2024-11-25",
            "status": "Completed",
            "priority": "High"
        }
    ])
}

fn store(server: &MockServer) -> TaskStore<HttpTaskRepository> {
    TaskStore::new(HttpTaskRepository::new(&server.url("/todos")).unwrap())
}

#[tokio::test]
async fn fetch_then_delete_over_http() {
    let server = MockServer::start();
    let list = server
        .mock_async(|when, then| {
            when.method("GET")
                .path("/todos")
                .query_param("_page", "1")
                .query_param("_limit", "10");
            then.status(200).json_body(remote_tasks());
        })
        .await;
    let delete = server
        .mock_async(|when, then| {
            when.method("DELETE").path("/todos/1");
            then.status(200).json_body(json!({}));
        })
        .await;

    let store = store(&server);
    assert!(store.tasks().is_empty());

    store.fetch_tasks(1, 10).await;
    let fetched = store.tasks();
    assert_eq!(fetched.len(), 2);

    store.delete_task(fetched[0].id.unwrap()).await;

    list.assert_async().await;
    delete.assert_async().await;
    assert_eq!(store.tasks(), vec![fetched[1].clone()]);
    assert_eq!(store.error(), None);
    assert!(!store.is_loading());
}

#[tokio::test]
async fn failed_fetch_over_http_keeps_collection() {
    let server = MockServer::start();
    let store = store(&server);
    let mut ok = server
        .mock_async(|when, then| {
            when.method("GET").path("/todos");
            then.status(200).json_body(remote_tasks());
        })
        .await;
    store.fetch_tasks(1, 10).await;
    let before = store.tasks();
    ok.delete_async().await;

    server
        .mock_async(|when, then| {
            when.method("GET").path("/todos");
            then.status(503).body("Service Unavailable");
        })
        .await;
    store.fetch_tasks(1, 10).await;

    assert_eq!(store.tasks(), before);
    assert!(store.error().unwrap().contains("503"));
    assert!(!store.is_loading());
}

#[tokio::test]
async fn update_without_id_never_reaches_server() {
    let server = MockServer::start();
    let put = server
        .mock_async(|when, then| {
            when.method("PUT");
            then.status(200);
        })
        .await;
    let store = store(&server);

    let draft = Task::draft(
        "Draft task",
        "Not persisted yet",
        TaskStatus::Pending,
        TaskPriority::Low,
        "2024-11-25",
    );
    store.update_task(&draft).await;

    assert_eq!(store.error().as_deref(), Some("Task ID is required for update"));
    assert_eq!(put.hits_async().await, 0);
}

#[tokio::test]
async fn app_lists_sorted_and_filtered() {
    let server = MockServer::start();
    server
        .mock_async(|when, then| {
            when.method("GET").path("/todos");
            then.status(200).json_body(remote_tasks());
        })
        .await;
    let app = App::new(store(&server), 10);

    let lines = app
        .execute(Command::List {
            page: 1,
            limit: 10,
            refresh: false,
            sorted: true,
            status: None,
            priority: None,
        })
        .await
        .unwrap();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("#2 "));
    assert!(lines[0].contains("due November 25, 2024"));

    let lines = app
        .execute(Command::List {
            page: 1,
            limit: 10,
            refresh: true,
            sorted: false,
            status: Some(TaskStatus::Pending),
            priority: None,
        })
        .await
        .unwrap();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].starts_with("#1 "));
}

#[tokio::test]
async fn app_creates_valid_task_and_writes_snapshot() {
    let server = MockServer::start();
    server
        .mock_async(|when, then| {
            when.method("GET").path("/todos");
            then.status(200).json_body(json!([]));
        })
        .await;
    let due = chrono::Local::now().date_naive().format("%Y-%m-%d").to_string();
    let create = server
        .mock_async(|when, then| {
            when.method("POST")
                .path("/todos")
                .json_body_partial(r#"{ "title": "Write report", "priority": "High" }"#);
            then.status(201).json_body(json!({
                "id": 201,
                "title": "Write report",
                "description": "Quarterly numbers for the board",
                "status": "Pending",
                "priority": "High",
                "dueDate": due,
                "subtasks": [{ "id": 1, "title": "Outline", "completed": false }]
            }));
        })
        .await;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tasks.json");
    let app = App::new(
        store(&server).with_snapshot(Box::new(FileSnapshot::new(&path))),
        10,
    );

    let mut draft = Task::draft(
        "Write report",
        "Quarterly numbers for the board",
        TaskStatus::Pending,
        TaskPriority::High,
        &due,
    );
    draft.add_subtask("Outline");
    let lines = app.execute(Command::Create(draft)).await.unwrap();

    create.assert_async().await;
    assert_eq!(lines.len(), 1);
    assert!(lines[0].starts_with("#201 Write report [Pending] (High)"));
    assert!(lines[0].ends_with("0/1 subtasks"));

    let saved = FileSnapshot::new(&path).load().unwrap().unwrap();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].id, Some(201));
}

#[tokio::test]
async fn app_rejects_invalid_draft_before_any_request() {
    let server = MockServer::start();
    let any = server
        .mock_async(|when, then| {
            when.path_contains("/todos");
            then.status(200).json_body(json!([]));
        })
        .await;
    let app = App::new(store(&server), 10);

    let draft = Task::draft(
        "ab",
        "short",
        TaskStatus::Pending,
        TaskPriority::Low,
        "2000-01-01",
    );
    let error = app.execute(Command::Create(draft)).await.unwrap_err();

    assert!(matches!(error, AppError::Invalid(_)));
    assert!(error.to_string().contains("Title must be at least 3 characters"));
    assert_eq!(any.hits_async().await, 0);
}

#[tokio::test]
async fn app_update_reports_unknown_task() {
    let server = MockServer::start();
    server
        .mock_async(|when, then| {
            when.method("GET").path("/todos");
            then.status(200).json_body(remote_tasks());
        })
        .await;
    let app = App::new(store(&server), 10);

    let error = app
        .execute(Command::Update {
            id: 99,
            patch: TaskPatch::default(),
        })
        .await
        .unwrap_err();

    assert_eq!(error.to_string(), "Invalid input: Task 99 not found");
}

#[tokio::test]
async fn app_surfaces_delete_failure() {
    let server = MockServer::start();
    server
        .mock_async(|when, then| {
            when.method("GET").path("/todos");
            then.status(200).json_body(remote_tasks());
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method("DELETE").path("/todos/2");
            then.status(500).body("database offline");
        })
        .await;
    let app = App::new(store(&server), 10);

    let error = app.execute(Command::Delete { id: 2 }).await.unwrap_err();

    assert!(matches!(error, AppError::Action(_)));
    assert!(error.to_string().contains("database offline"));
    assert_eq!(app.store().tasks().len(), 2);
}
