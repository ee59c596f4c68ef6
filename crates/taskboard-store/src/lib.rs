//! Taskboard Store
//!
//! Session-scoped task collection kept in sync with a [`TaskBackend`]:
//! - [`TaskStore`]: load, create, update, delete and comment on tasks,
//!   with derived per-status views and a change counter
//! - [`Notifier`]: the capability the store reports success and failure through
//! - [`NotificationCenter`]: bounded in-memory notifier with dismiss and retry
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use taskboard_store::{NotificationCenter, TaskStore};
//!
//! let center = Arc::new(NotificationCenter::default());
//! let store = TaskStore::new(backend, center.clone());
//! store.load_tasks().await;
//! if store.error().is_some() {
//!     for id in center.pending_retries() {
//!         center.retry(id).await;
//!     }
//! }
//! ```
//!
//! [`TaskBackend`]: taskboard_core::TaskBackend

#![warn(unreachable_pub)]

pub mod center;
pub mod notify;
pub mod store;

pub use center::{NotificationCenter, NotifyConfig, Shown};
pub use notify::{
    network_error_message, CloseHook, ErrorOptions, Level, Notification, Notifier, RetryAction,
    ERROR_TIMEOUT, NETWORK_ERROR_TIMEOUT, RETRY_TIMEOUT,
};
pub use store::{status_message, TaskStore};
