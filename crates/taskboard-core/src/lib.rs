//! Taskboard Core
//!
//! Shared vocabulary of the task board:
//! - The task data model and its wire format
//! - Create-form validation and sanitization
//! - The backend error taxonomy
//! - The [`TaskBackend`] capability the store talks to
//!
//! # Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use taskboard_core::{prepare_new_task, TaskFields};
//!
//! let today = NaiveDate::from_ymd_opt(2025, 8, 1).unwrap();
//! let fields = TaskFields::new()
//!     .with_title("  Write   unit tests ")
//!     .with_due_date("2025-08-03");
//!
//! let new_task = prepare_new_task(&fields, today).unwrap();
//! assert_eq!(new_task.title, "Write unit tests");
//! ```

#![warn(unreachable_pub)]

pub mod backend;
pub mod error;
pub mod types;
pub mod validation;

pub use backend::{BackendResult, TaskBackend};
pub use error::BackendError;
pub use types::{Comment, CommentId, NewTask, Task, TaskId, TaskPatch, TaskStats, TaskStatus};
pub use validation::{
    parse_due_date, prepare_new_task, sanitize_input, sanitize_task_data, validate_task,
    validate_task_on, Field, SanitizedFields, TaskFields, ValidationError, ValidationResult,
};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with the task board
    pub use crate::{
        BackendError, BackendResult, NewTask, Task, TaskBackend, TaskFields, TaskId, TaskPatch,
        TaskStats, TaskStatus,
    };
}
