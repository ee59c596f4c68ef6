//! Error types for the task backend
//!
//! Field validation problems are not errors in this sense: they are reported
//! as data by [`crate::validation`]. Everything here is an `Err` returned by a
//! [`crate::TaskBackend`] call and re-raised by the store.

use crate::types::TaskId;

/// Failure of a backend operation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    /// The operation targeted an id the backend does not hold
    #[error("Task with id {id} not found")]
    NotFound {
        /// The missing id
        id: TaskId,
    },

    /// Transient transport failure
    #[error("Network error: {message}")]
    Network {
        /// What the backend was doing when it failed
        message: String,
    },
}

impl BackendError {
    /// Create not-found error for `id`
    #[inline]
    pub fn not_found(id: impl Into<TaskId>) -> Self {
        Self::NotFound { id: id.into() }
    }

    /// Create network error
    #[inline]
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Check if error is transient
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network { .. })
    }

    /// Check if error is a missing-id failure
    #[inline]
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_error_display() {
        assert_eq!(
            BackendError::not_found("12").to_string(),
            "Task with id 12 not found"
        );
        assert_eq!(
            BackendError::network("Failed to fetch tasks").to_string(),
            "Network error: Failed to fetch tasks"
        );
    }

    #[test]
    fn only_network_errors_are_retryable() {
        assert!(BackendError::network("x").is_retryable());
        assert!(!BackendError::not_found("1").is_retryable());
        assert!(BackendError::not_found("1").is_not_found());
    }
}
