//! Session task store
//!
//! [`TaskStore`] is the in-memory authoritative copy of the task collection
//! for one session. Every operation follows the same shape:
//! - Clear the last error
//! - Call the backend (the only suspension point)
//! - On success apply the result locally and notify
//! - On failure record the error, notify and hand the error back
//!
//! The collection lock is never held across a backend call or while the
//! notifier runs.

use crate::notify::{ErrorOptions, Notifier, RetryAction};
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;
use taskboard_core::{
    BackendError, BackendResult, NewTask, Task, TaskBackend, TaskId, TaskPatch, TaskStats,
    TaskStatus,
};
use tokio::sync::watch;

/// Shown after a task is created
pub const TASK_CREATED: &str = "Task created successfully!";
/// Shown after a task moves to `in-progress`
pub const TASK_STARTED: &str = "Task started!";
/// Shown after a task moves to `done`
pub const TASK_COMPLETED: &str = "Task completed!";
/// Shown after a task moves back to `todo`
pub const TASK_REOPENED: &str = "Task moved to todo";
/// Shown after any other update
pub const TASK_UPDATED: &str = "Task updated successfully!";
/// Shown after a task is deleted
pub const TASK_DELETED: &str = "Task deleted successfully!";
/// Shown after a comment is added
pub const COMMENT_ADDED: &str = "Comment added!";

const LOAD_FAILED: &str = "Failed to load tasks";
const CREATE_FAILED: &str = "Failed to create task";
const UPDATE_FAILED: &str = "Failed to update task";
const DELETE_FAILED: &str = "Failed to delete task";
const COMMENT_FAILED: &str = "Failed to add comment";
const REFRESH_FAILED: &str = "Failed to refresh task";

/// Success message for an update, chosen by the status the patch sets
#[must_use]
pub fn status_message(status: Option<&TaskStatus>) -> &'static str {
    match status {
        Some(TaskStatus::InProgress) => TASK_STARTED,
        Some(TaskStatus::Done) => TASK_COMPLETED,
        Some(TaskStatus::Todo) => TASK_REOPENED,
        Some(TaskStatus::Other(_)) | None => TASK_UPDATED,
    }
}

#[derive(Debug, Default)]
struct StoreState {
    tasks: Vec<Task>,
    loading: bool,
    error: Option<String>,
}

struct Shared {
    backend: Arc<dyn TaskBackend>,
    notifier: Arc<dyn Notifier>,
    state: RwLock<StoreState>,
    revision: watch::Sender<u64>,
}

/// Clears `loading` however `load_tasks` exits
struct LoadingGuard<'a>(&'a RwLock<StoreState>);

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.write().loading = false;
    }
}

/// Handle to the session's task collection
///
/// Cloning is cheap; clones share the same collection, backend and notifier.
#[derive(Clone)]
pub struct TaskStore {
    shared: Arc<Shared>,
}

impl fmt::Debug for TaskStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.shared.state.read();
        f.debug_struct("TaskStore")
            .field("tasks", &state.tasks.len())
            .field("loading", &state.loading)
            .field("error", &state.error)
            .field("revision", &*self.shared.revision.borrow())
            .finish_non_exhaustive()
    }
}

impl TaskStore {
    /// Create an empty store over `backend`, reporting through `notifier`
    #[must_use]
    pub fn new(backend: Arc<dyn TaskBackend>, notifier: Arc<dyn Notifier>) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            shared: Arc::new(Shared {
                backend,
                notifier,
                state: RwLock::new(StoreState::default()),
                revision,
            }),
        }
    }

    // ------------------------------------------------------------------
    // Operations
    // ------------------------------------------------------------------

    /// Replace the collection with the backend's
    ///
    /// Failures are not returned: the collection is left untouched, the
    /// message is available from [`TaskStore::error`] and the user is offered
    /// a retry that calls this method again.
    pub async fn load_tasks(&self) {
        let _loading = self.begin_loading();

        match self.shared.backend.get_all_tasks().await {
            Ok(tasks) => {
                let count = tasks.len();
                self.mutate(|state| {
                    state.tasks = tasks;
                    true
                });
                tracing::debug!(count, "tasks loaded");
            }
            Err(err) => {
                let message = self.record_error(&err, LOAD_FAILED);
                tracing::warn!(error = %message, "loading tasks failed");
                self.shared
                    .notifier
                    .show_network_error(&message, Some(self.load_retry()));
            }
        }
    }

    /// Create a task and append it to the collection
    ///
    /// # Errors
    ///
    /// Returns the backend error after recording and reporting it.
    pub async fn create_task(&self, new_task: NewTask) -> BackendResult<Task> {
        self.clear_error();

        match self.shared.backend.create_task(new_task).await {
            Ok(task) => {
                self.mutate(|state| {
                    state.tasks.push(task.clone());
                    true
                });
                tracing::debug!(id = %task.id, "task created");
                self.shared.notifier.show_success(TASK_CREATED);
                Ok(task)
            }
            Err(err) => Err(self.fail(err, CREATE_FAILED)),
        }
    }

    /// Apply `patch` to task `id`
    ///
    /// The local copy is replaced with the backend's answer; a task missing
    /// locally is not inserted.
    ///
    /// # Errors
    ///
    /// Returns the backend error after recording and reporting it.
    pub async fn update_task(&self, id: &TaskId, patch: TaskPatch) -> BackendResult<Task> {
        self.clear_error();
        let message = status_message(patch.status.as_ref());

        match self.shared.backend.update_task(id, patch).await {
            Ok(task) => {
                self.replace(id, &task);
                tracing::debug!(%id, status = %task.status, "task updated");
                self.shared.notifier.show_success(message);
                Ok(task)
            }
            Err(err) => Err(self.fail(err, UPDATE_FAILED)),
        }
    }

    /// Delete task `id`
    ///
    /// # Errors
    ///
    /// Returns the backend error after recording and reporting it.
    pub async fn delete_task(&self, id: &TaskId) -> BackendResult<()> {
        self.clear_error();

        match self.shared.backend.delete_task(id).await {
            Ok(()) => {
                self.mutate(|state| {
                    let before = state.tasks.len();
                    state.tasks.retain(|t| &t.id != id);
                    state.tasks.len() != before
                });
                tracing::debug!(%id, "task deleted");
                self.shared.notifier.show_success(TASK_DELETED);
                Ok(())
            }
            Err(err) => Err(self.fail(err, DELETE_FAILED)),
        }
    }

    /// Add a comment to task `id`
    ///
    /// # Errors
    ///
    /// Returns the backend error after recording and reporting it.
    pub async fn add_comment(&self, id: &TaskId, text: &str) -> BackendResult<Task> {
        self.clear_error();

        match self.shared.backend.add_comment(id, text).await {
            Ok(task) => {
                self.replace(id, &task);
                tracing::debug!(%id, comments = task.comments.len(), "comment added");
                self.shared.notifier.show_success(COMMENT_ADDED);
                Ok(task)
            }
            Err(err) => Err(self.fail(err, COMMENT_FAILED)),
        }
    }

    /// Re-fetch task `id` and replace the local copy if the backend has it
    ///
    /// # Errors
    ///
    /// Returns the backend error after recording and reporting it.
    pub async fn refresh_task(&self, id: &TaskId) -> BackendResult<Option<Task>> {
        self.clear_error();

        match self.shared.backend.get_task_by_id(id).await {
            Ok(found) => {
                if let Some(task) = &found {
                    self.replace(id, task);
                }
                tracing::debug!(%id, found = found.is_some(), "task refreshed");
                Ok(found)
            }
            Err(err) => Err(self.fail(err, REFRESH_FAILED)),
        }
    }

    /// Forget the last error
    pub fn clear_error(&self) {
        self.shared.state.write().error = None;
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// Copy of the collection, in backend order
    #[must_use]
    pub fn tasks(&self) -> Vec<Task> {
        self.shared.state.read().tasks.clone()
    }

    /// Copy of task `id`
    #[must_use]
    pub fn task(&self, id: &TaskId) -> Option<Task> {
        self.shared
            .state
            .read()
            .tasks
            .iter()
            .find(|t| &t.id == id)
            .cloned()
    }

    /// Tasks with the given status, in collection order
    #[must_use]
    pub fn tasks_with_status(&self, status: &TaskStatus) -> Vec<Task> {
        self.shared
            .state
            .read()
            .tasks
            .iter()
            .filter(|t| &t.status == status)
            .cloned()
            .collect()
    }

    /// Tasks not yet started
    #[must_use]
    pub fn todo_tasks(&self) -> Vec<Task> {
        self.tasks_with_status(&TaskStatus::Todo)
    }

    /// Tasks being worked on
    #[must_use]
    pub fn in_progress_tasks(&self) -> Vec<Task> {
        self.tasks_with_status(&TaskStatus::InProgress)
    }

    /// Finished tasks
    #[must_use]
    pub fn completed_tasks(&self) -> Vec<Task> {
        self.tasks_with_status(&TaskStatus::Done)
    }

    /// Counts per board column
    #[must_use]
    pub fn stats(&self) -> TaskStats {
        TaskStats::from_tasks(&self.shared.state.read().tasks)
    }

    /// Whether `load_tasks` is in flight
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.shared.state.read().loading
    }

    /// Message of the last failed operation
    #[must_use]
    pub fn error(&self) -> Option<String> {
        self.shared.state.read().error.clone()
    }

    /// Number of changes made to the collection so far
    #[must_use]
    pub fn revision(&self) -> u64 {
        *self.shared.revision.borrow()
    }

    /// Receiver that observes every collection change
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.shared.revision.subscribe()
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn begin_loading(&self) -> LoadingGuard<'_> {
        let mut state = self.shared.state.write();
        state.error = None;
        state.loading = true;
        LoadingGuard(&self.shared.state)
    }

    fn load_retry(&self) -> RetryAction {
        let store = self.clone();
        RetryAction::new(move || {
            let store = store.clone();
            async move { store.load_tasks().await }
        })
    }

    /// Apply `change`; the revision moves only when it reports a change
    fn mutate(&self, change: impl FnOnce(&mut StoreState) -> bool) -> bool {
        let changed = change(&mut self.shared.state.write());
        if changed {
            self.shared.revision.send_modify(|revision| *revision += 1);
        }
        changed
    }

    fn replace(&self, id: &TaskId, task: &Task) {
        let replaced = self.mutate(|state| {
            match state.tasks.iter_mut().find(|t| &t.id == id) {
                Some(slot) => {
                    slot.clone_from(task);
                    true
                }
                None => false,
            }
        });
        if !replaced {
            tracing::debug!(%id, "task not held locally; nothing replaced");
        }
    }

    /// Store the error message, falling back when it is empty
    fn record_error(&self, err: &BackendError, fallback: &str) -> String {
        let mut message = err.to_string();
        if message.is_empty() {
            message = fallback.to_string();
        }
        self.shared.state.write().error = Some(message.clone());
        message
    }

    /// Record, report and return `err`
    fn fail(&self, err: BackendError, fallback: &str) -> BackendError {
        let message = self.record_error(&err, fallback);
        tracing::warn!(error = %message, retryable = err.is_retryable(), "task operation failed");
        if err.is_retryable() {
            self.shared.notifier.show_network_error(&message, None);
        } else {
            self.shared
                .notifier
                .show_error(&message, ErrorOptions::default());
        }
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::center::NotificationCenter;
    use crate::notify::Level;
    use pretty_assertions::assert_eq;
    use taskboard_backend::{FailOperations, LatencyConfig, Operation, SimulatedBackend};

    fn store_with(
        backend: SimulatedBackend,
    ) -> (TaskStore, Arc<SimulatedBackend>, Arc<NotificationCenter>) {
        let backend = Arc::new(backend.with_latency(LatencyConfig::zero()));
        let center = Arc::new(NotificationCenter::default());
        let store = TaskStore::new(backend.clone(), center.clone());
        (store, backend, center)
    }

    fn board() -> Vec<Task> {
        vec![
            Task::new("1", "Write docs", "2030-01-01"),
            Task::new("2", "Fix login", "2030-01-02").with_status("in-progress"),
            Task::new("3", "Ship release", "2030-01-03").with_status("done"),
        ]
    }

    #[test]
    fn update_messages_follow_status() {
        assert_eq!(status_message(Some(&TaskStatus::InProgress)), "Task started!");
        assert_eq!(status_message(Some(&TaskStatus::Done)), "Task completed!");
        assert_eq!(status_message(Some(&TaskStatus::Todo)), "Task moved to todo");
        assert_eq!(
            status_message(Some(&TaskStatus::from("blocked"))),
            "Task updated successfully!"
        );
        assert_eq!(status_message(None), "Task updated successfully!");
    }

    #[tokio::test]
    async fn load_replaces_collection_and_views() {
        let (store, _, center) = store_with(SimulatedBackend::new(board()));
        assert_eq!(store.revision(), 0);

        store.load_tasks().await;

        assert_eq!(store.tasks().len(), 3);
        assert!(!store.is_loading());
        assert_eq!(store.error(), None);
        assert_eq!(store.revision(), 1);
        assert_eq!(store.todo_tasks()[0].title, "Write docs");
        assert_eq!(store.in_progress_tasks()[0].title, "Fix login");
        assert_eq!(store.completed_tasks()[0].title, "Ship release");
        assert_eq!(
            store.stats(),
            TaskStats {
                total: 3,
                todo: 1,
                in_progress: 1,
                completed: 1
            }
        );
        assert!(center.history().is_empty());
    }

    #[tokio::test]
    async fn update_replaces_in_place() {
        let (store, _, center) = store_with(SimulatedBackend::new(board()));
        store.load_tasks().await;

        let id = TaskId::from(1u64);
        let task = store
            .update_task(&id, TaskPatch::status(TaskStatus::Done))
            .await
            .unwrap();

        assert_eq!(task.status, TaskStatus::Done);
        assert_eq!(store.tasks()[0], task);
        assert_eq!(store.completed_tasks().len(), 2);
        assert_eq!(center.last_message().as_deref(), Some("Task completed!"));
    }

    #[tokio::test]
    async fn failures_are_recorded_and_returned() {
        let (store, _, center) = store_with(
            SimulatedBackend::new(board()).with_faults(FailOperations::new([Operation::Create])),
        );
        store.load_tasks().await;
        let revision = store.revision();

        let err = store
            .create_task(NewTask::new("New task", "2030-02-01"))
            .await
            .unwrap_err();

        assert!(err.is_retryable());
        assert_eq!(
            store.error().as_deref(),
            Some("Network error: Failed to create task")
        );
        assert_eq!(store.tasks().len(), 3);
        assert_eq!(store.revision(), revision);

        let (level, message) = center.history().pop().unwrap();
        assert_eq!(level, Level::Error);
        assert_eq!(message, "Network error: Failed to create task");
        assert!(center.pending_retries().is_empty());

        store.clear_error();
        assert_eq!(store.error(), None);
    }

    #[tokio::test]
    async fn comment_and_refresh_replace_local_copy() {
        let (store, backend, center) = store_with(SimulatedBackend::new(board()));
        store.load_tasks().await;
        let id = TaskId::from("2");

        store.add_comment(&id, "On it").await.unwrap();
        assert_eq!(store.task(&id).unwrap().comments.len(), 1);
        assert_eq!(center.last_message().as_deref(), Some("Comment added!"));

        backend
            .update_task(&id, TaskPatch::new().with_title("Fix login flow"))
            .await
            .unwrap();
        let refreshed = store.refresh_task(&id).await.unwrap().unwrap();
        assert_eq!(refreshed.title, "Fix login flow");
        assert_eq!(store.task(&id).unwrap().title, "Fix login flow");

        assert_eq!(store.refresh_task(&TaskId::from("99")).await.unwrap(), None);
    }

    async fn load_in_background(backend: SimulatedBackend) -> TaskStore {
        let store = TaskStore::new(Arc::new(backend), Arc::new(NotificationCenter::default()));
        assert!(!store.is_loading());

        let pending = tokio::spawn({
            let store = store.clone();
            async move { store.load_tasks().await }
        });
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;
        assert!(store.is_loading());

        pending.await.unwrap();
        assert!(!store.is_loading());
        store
    }

    #[tokio::test(start_paused = true)]
    async fn loading_flag_covers_the_fetch() {
        let store = load_in_background(SimulatedBackend::new(board())).await;
        assert_eq!(store.tasks().len(), 3);
        assert_eq!(store.error(), None);

        let store = load_in_background(
            SimulatedBackend::new(board()).with_faults(FailOperations::new([Operation::GetAll])),
        )
        .await;
        assert!(store.tasks().is_empty());
        assert!(store.error().is_some());
    }

    #[tokio::test]
    async fn unchanged_collection_keeps_revision() {
        let (store, _, _) = store_with(SimulatedBackend::new(board()));
        let id = TaskId::from("1");

        store
            .update_task(&id, TaskPatch::status(TaskStatus::Done))
            .await
            .unwrap();
        store.delete_task(&id).await.unwrap();

        assert!(store.tasks().is_empty());
        assert_eq!(store.revision(), 0);

        store.load_tasks().await;
        store.delete_task(&TaskId::from("404")).await.unwrap_err();
        assert_eq!(store.revision(), 1);
    }

    #[tokio::test]
    async fn subscribers_see_changes() {
        let (store, _, _) = store_with(SimulatedBackend::new(board()));
        let mut changes = store.subscribe();

        store.load_tasks().await;
        assert!(changes.has_changed().unwrap());
        assert_eq!(*changes.borrow_and_update(), 1);

        store.delete_task(&TaskId::from("3")).await.unwrap();
        assert_eq!(*changes.borrow_and_update(), 2);
        assert!(store.task(&TaskId::from("3")).is_none());
    }
}
