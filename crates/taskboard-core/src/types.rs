//! Core types for the task board
//!
//! Defines the data model shared by every crate in the workspace:
//! - Task and comment identifiers
//! - Task status values
//! - Tasks, comments and their create/update payloads
//! - Aggregate counts over a task collection

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Identifier as it may appear on the wire: text or a whole number
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Signed(i64),
    Unsigned(u64),
}

impl RawId {
    fn into_string(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::Signed(n) => n.to_string(),
            Self::Unsigned(n) => n.to_string(),
        }
    }
}

macro_rules! wire_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
        pub struct $name(String);

        impl $name {
            /// Borrow the normalized identifier
            #[inline]
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                RawId::deserialize(deserializer).map(|raw| Self(raw.into_string()))
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                Self(value.to_string())
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value.to_string())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

wire_id! {
    /// Unique task identifier
    ///
    /// Accepts either a string or an integer on the wire. Integers are kept in
    /// their decimal form, so `TaskId::from(7u64) == TaskId::from("7")` and
    /// lookups agree no matter which form a caller used.
    TaskId
}

wire_id! {
    /// Comment identifier, normalized the same way as [`TaskId`]
    CommentId
}

/// Workflow status of a task
///
/// The three board columns are named variants; any other value is preserved
/// verbatim in [`TaskStatus::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TaskStatus {
    /// Not started
    #[default]
    Todo,
    /// Being worked on
    InProgress,
    /// Finished
    Done,
    /// Any status outside the board columns
    Other(String),
}

impl TaskStatus {
    /// Wire representation
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "in-progress",
            Self::Done => "done",
            Self::Other(value) => value,
        }
    }
}

impl From<&str> for TaskStatus {
    fn from(value: &str) -> Self {
        match value {
            "todo" => Self::Todo,
            "in-progress" => Self::InProgress,
            "done" => Self::Done,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for TaskStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "todo" | "in-progress" | "done" => Self::from(value.as_str()),
            _ => Self::Other(value),
        }
    }
}

impl From<TaskStatus> for String {
    fn from(status: TaskStatus) -> Self {
        match status {
            TaskStatus::Other(value) => value,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accepts a string or a number and keeps it as text
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<RawId>::deserialize(deserializer)?.map(RawId::into_string))
}

/// A comment attached to a task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    /// Identifier, assigned by the backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<CommentId>,
    /// Comment body
    pub text: String,
    /// Who wrote it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// ISO-8601 creation timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Comment {
    /// Create a bare comment with text only
    #[inline]
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: None,
            text: text.into(),
            author: None,
            created_at: None,
        }
    }
}

/// A unit of trackable work
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Backend-assigned identifier
    pub id: TaskId,
    /// Display title
    pub title: String,
    /// Optional free text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Responsible party
    #[serde(
        default,
        deserialize_with = "string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub assignee_id: Option<String>,
    /// Calendar date string
    #[serde(default)]
    pub due_date: String,
    /// Workflow status
    #[serde(default)]
    pub status: TaskStatus,
    /// Comments in insertion order
    #[serde(default)]
    pub comments: Vec<Comment>,
    /// Auxiliary attributes (priority, tags, ...)
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl Task {
    /// Create a `todo` task with no comments or metadata
    #[must_use]
    pub fn new(id: impl Into<TaskId>, title: impl Into<String>, due_date: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: None,
            assignee_id: None,
            due_date: due_date.into(),
            status: TaskStatus::Todo,
            comments: Vec::new(),
            metadata: Map::new(),
        }
    }

    /// Materialize a create request under a backend-assigned id
    #[must_use]
    pub fn from_new(id: TaskId, new_task: NewTask) -> Self {
        Self {
            id,
            title: new_task.title,
            description: new_task.description,
            assignee_id: new_task.assignee_id,
            due_date: new_task.due_date,
            status: new_task.status,
            comments: Vec::new(),
            metadata: Map::new(),
        }
    }

    /// With description
    #[inline]
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// With assignee
    #[inline]
    #[must_use]
    pub fn with_assignee(mut self, assignee_id: impl Into<String>) -> Self {
        self.assignee_id = Some(assignee_id.into());
        self
    }

    /// With status
    #[inline]
    #[must_use]
    pub fn with_status(mut self, status: impl Into<TaskStatus>) -> Self {
        self.status = status.into();
        self
    }

    /// With an appended comment
    #[inline]
    #[must_use]
    pub fn with_comment(mut self, comment: Comment) -> Self {
        self.comments.push(comment);
        self
    }

    /// With a metadata entry
    #[inline]
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// Fields sent to the backend to create a task
///
/// The backend assigns `id` and starts with empty comments and metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    /// Display title
    pub title: String,
    /// Optional free text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Responsible party
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<String>,
    /// Calendar date string
    #[serde(default)]
    pub due_date: String,
    /// Initial status
    #[serde(default)]
    pub status: TaskStatus,
}

impl NewTask {
    /// Create a `todo` request
    #[must_use]
    pub fn new(title: impl Into<String>, due_date: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            assignee_id: None,
            due_date: due_date.into(),
            status: TaskStatus::Todo,
        }
    }

    /// With description
    #[inline]
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// With assignee
    #[inline]
    #[must_use]
    pub fn with_assignee(mut self, assignee_id: impl Into<String>) -> Self {
        self.assignee_id = Some(assignee_id.into());
        self
    }

    /// With initial status
    #[inline]
    #[must_use]
    pub fn with_status(mut self, status: impl Into<TaskStatus>) -> Self {
        self.status = status.into();
        self
    }
}

/// Partial update of a task
///
/// Only fields that are `Some` are applied; everything else keeps the value
/// the backend already holds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    /// New title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// New description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// New assignee
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<String>,
    /// New due date
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    /// New status
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    /// Replacement comment list
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<Vec<Comment>>,
    /// Replacement metadata
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
}

impl TaskPatch {
    /// Empty patch
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Patch that only moves the task to `status`
    #[inline]
    #[must_use]
    pub fn status(status: impl Into<TaskStatus>) -> Self {
        Self::new().with_status(status)
    }

    /// With status
    #[inline]
    #[must_use]
    pub fn with_status(mut self, status: impl Into<TaskStatus>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// With title
    #[inline]
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// With description
    #[inline]
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// With assignee
    #[inline]
    #[must_use]
    pub fn with_assignee(mut self, assignee_id: impl Into<String>) -> Self {
        self.assignee_id = Some(assignee_id.into());
        self
    }

    /// With due date
    #[inline]
    #[must_use]
    pub fn with_due_date(mut self, due_date: impl Into<String>) -> Self {
        self.due_date = Some(due_date.into());
        self
    }

    /// Shallow-merge the present fields into `task`
    pub fn apply_to(&self, task: &mut Task) {
        if let Some(title) = &self.title {
            task.title.clone_from(title);
        }
        if let Some(description) = &self.description {
            task.description = Some(description.clone());
        }
        if let Some(assignee_id) = &self.assignee_id {
            task.assignee_id = Some(assignee_id.clone());
        }
        if let Some(due_date) = &self.due_date {
            task.due_date.clone_from(due_date);
        }
        if let Some(status) = &self.status {
            task.status = status.clone();
        }
        if let Some(comments) = &self.comments {
            task.comments.clone_from(comments);
        }
        if let Some(metadata) = &self.metadata {
            task.metadata.clone_from(metadata);
        }
    }
}

/// Aggregate counts over a task collection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStats {
    /// All tasks
    pub total: usize,
    /// Tasks with status `todo`
    pub todo: usize,
    /// Tasks with status `in-progress`
    pub in_progress: usize,
    /// Tasks with status `done`
    pub completed: usize,
}

impl TaskStats {
    /// Count a collection
    #[must_use]
    pub fn from_tasks(tasks: &[Task]) -> Self {
        tasks.iter().fold(
            Self {
                total: tasks.len(),
                ..Self::default()
            },
            |mut stats, task| {
                match task.status {
                    TaskStatus::Todo => stats.todo += 1,
                    TaskStatus::InProgress => stats.in_progress += 1,
                    TaskStatus::Done => stats.completed += 1,
                    TaskStatus::Other(_) => {}
                }
                stats
            },
        )
    }
}
