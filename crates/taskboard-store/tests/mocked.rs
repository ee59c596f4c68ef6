use async_trait::async_trait;
use mockall::mock;
use pretty_assertions::assert_eq;
use std::sync::Arc;
use taskboard_core::{
    BackendError, BackendResult, NewTask, Task, TaskBackend, TaskId, TaskPatch,
};
use taskboard_store::{Level, Notification, Notifier, TaskStore, ERROR_TIMEOUT};

mock! {
    pub Backend {}

    #[async_trait]
    impl TaskBackend for Backend {
        async fn get_all_tasks(&self) -> BackendResult<Vec<Task>>;
        async fn get_task_by_id(&self, id: &TaskId) -> BackendResult<Option<Task>>;
        async fn create_task(&self, new_task: NewTask) -> BackendResult<Task>;
        async fn update_task(&self, id: &TaskId, patch: TaskPatch) -> BackendResult<Task>;
        async fn delete_task(&self, id: &TaskId) -> BackendResult<()>;
        async fn add_comment(&self, task_id: &TaskId, text: &str) -> BackendResult<Task>;
    }
}

mock! {
    pub Feedback {}

    impl Notifier for Feedback {
        fn notify(&self, notification: Notification);
    }
}

#[tokio::test]
async fn numeric_and_string_ids_address_the_same_task() {
    let mut backend = MockBackend::new();
    backend.expect_get_all_tasks().times(1).returning(|| {
        let tasks: Vec<Task> = serde_json::from_str(
            r#"[{ "id": 7, "title": "Mixed ids", "dueDate": "2030-01-01", "status": "todo" }]"#,
        )
        .unwrap();
        Ok(tasks)
    });
    backend
        .expect_update_task()
        .withf(|id, patch| id.as_str() == "7" && patch.status.is_some())
        .times(1)
        .returning(|id, patch| {
            let mut task = Task::new(id.clone(), "Mixed ids", "2030-01-01");
            patch.apply_to(&mut task);
            Ok(task)
        });

    let mut notifier = MockFeedback::new();
    notifier
        .expect_notify()
        .withf(|n| n.level == Level::Success && n.message == "Task started!")
        .times(1)
        .return_const(());

    let store = TaskStore::new(Arc::new(backend), Arc::new(notifier));
    store.load_tasks().await;
    store
        .update_task(&TaskId::from("7"), TaskPatch::status("in-progress"))
        .await
        .unwrap();

    assert_eq!(store.task(&TaskId::from(7u64)).unwrap().status.as_str(), "in-progress");
}

#[tokio::test]
async fn not_found_uses_plain_error_feedback() {
    let mut backend = MockBackend::new();
    backend
        .expect_add_comment()
        .withf(|id, text| id.as_str() == "9" && text == "hello")
        .times(1)
        .returning(|id, _| Err(BackendError::not_found(id.clone())));

    let mut notifier = MockFeedback::new();
    notifier
        .expect_notify()
        .withf(|n| {
            n.level == Level::Error
                && n.message == "Task with id 9 not found"
                && n.timeout == Some(ERROR_TIMEOUT)
                && n.retry.is_none()
        })
        .times(1)
        .return_const(());

    let store = TaskStore::new(Arc::new(backend), Arc::new(notifier));
    let err = store
        .add_comment(&TaskId::from("9"), "hello")
        .await
        .unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(store.error().as_deref(), Some("Task with id 9 not found"));
    assert_eq!(store.revision(), 0);
}

#[tokio::test]
async fn failed_load_never_touches_collection() {
    let mut backend = MockBackend::new();
    backend
        .expect_get_all_tasks()
        .times(1)
        .returning(|| Err(BackendError::network("Failed to fetch tasks")));

    let mut notifier = MockFeedback::new();
    notifier
        .expect_notify()
        .withf(|n| n.retry.is_some() && n.message == "Network error: Failed to fetch tasks")
        .times(1)
        .return_const(());

    let store = TaskStore::new(Arc::new(backend), Arc::new(notifier));
    store.load_tasks().await;

    assert!(store.tasks().is_empty());
    assert!(!store.is_loading());
    assert_eq!(store.revision(), 0);
}
