//! Task backend capability
//!
//! The store talks to the source of truth only through [`TaskBackend`]. The
//! workspace ships a simulated implementation; a production build would put a
//! network client behind the same trait.

use crate::error::BackendError;
use crate::types::{NewTask, Task, TaskId, TaskPatch};
use async_trait::async_trait;

/// Result alias for backend calls
pub type BackendResult<T> = Result<T, BackendError>;

/// CRUD over the durable task collection
///
/// Every call may fail with [`BackendError::Network`]. Calls that target an
/// existing task fail with [`BackendError::NotFound`] when the id is unknown.
/// Returned tasks are independent copies.
#[async_trait]
pub trait TaskBackend: Send + Sync {
    /// Fetch the whole collection in backend order
    async fn get_all_tasks(&self) -> BackendResult<Vec<Task>>;

    /// Fetch one task, `None` if the id is unknown
    async fn get_task_by_id(&self, id: &TaskId) -> BackendResult<Option<Task>>;

    /// Create a task; the backend assigns the id and starts with empty
    /// comments and metadata
    async fn create_task(&self, new_task: NewTask) -> BackendResult<Task>;

    /// Shallow-merge `patch` into the stored task and return the result
    async fn update_task(&self, id: &TaskId, patch: TaskPatch) -> BackendResult<Task>;

    /// Remove a task
    async fn delete_task(&self, id: &TaskId) -> BackendResult<()>;

    /// Append a comment; the backend assigns its id, author and timestamp
    async fn add_comment(&self, task_id: &TaskId, text: &str) -> BackendResult<Task>;
}
