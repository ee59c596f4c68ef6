//! Simulation configuration
//!
//! Per-operation latency, failure probability and the attribution stamped on
//! new comments. Every field has a default so partial TOML tables work.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Backend operation, used for latency lookup, fault decisions and stats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// `get_all_tasks`
    GetAll,
    /// `get_task_by_id`
    GetById,
    /// `create_task`
    Create,
    /// `update_task`
    Update,
    /// `delete_task`
    Delete,
    /// `add_comment`
    AddComment,
}

impl Operation {
    /// Every operation, in declaration order
    pub const ALL: [Self; 6] = [
        Self::GetAll,
        Self::GetById,
        Self::Create,
        Self::Update,
        Self::Delete,
        Self::AddComment,
    ];

    /// Stable name for logs and reports
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::GetAll => "get_all",
            Self::GetById => "get_by_id",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::AddComment => "add_comment",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Simulated round-trip time per operation, in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LatencyConfig {
    /// Fetching the whole collection
    pub get_all_ms: u64,
    /// Fetching one task
    pub get_by_id_ms: u64,
    /// Creating a task
    pub create_ms: u64,
    /// Updating a task
    pub update_ms: u64,
    /// Deleting a task
    pub delete_ms: u64,
    /// Adding a comment
    pub add_comment_ms: u64,
}

impl LatencyConfig {
    /// No simulated delay at all
    #[inline]
    #[must_use]
    pub fn zero() -> Self {
        Self {
            get_all_ms: 0,
            get_by_id_ms: 0,
            create_ms: 0,
            update_ms: 0,
            delete_ms: 0,
            add_comment_ms: 0,
        }
    }

    /// Delay for `operation`
    #[must_use]
    pub fn for_operation(&self, operation: Operation) -> Duration {
        let ms = match operation {
            Operation::GetAll => self.get_all_ms,
            Operation::GetById => self.get_by_id_ms,
            Operation::Create => self.create_ms,
            Operation::Update => self.update_ms,
            Operation::Delete => self.delete_ms,
            Operation::AddComment => self.add_comment_ms,
        };
        Duration::from_millis(ms)
    }
}

impl Default for LatencyConfig {
    fn default() -> Self {
        Self {
            get_all_ms: 500,
            get_by_id_ms: 200,
            create_ms: 300,
            update_ms: 250,
            delete_ms: 200,
            add_comment_ms: 200,
        }
    }
}

/// Simulated backend configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Per-operation latency
    pub latency: LatencyConfig,
    /// Probability in `[0, 1]` that any call fails with a network error
    pub failure_rate: f64,
    /// Seed for the failure RNG; `None` seeds from the OS
    pub seed: Option<u64>,
    /// Author recorded on comments added through the backend
    pub comment_author: String,
}

impl SimulationConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Zero latency, never failing; the starting point for tests
    #[must_use]
    pub fn instant() -> Self {
        Self {
            latency: LatencyConfig::zero(),
            failure_rate: 0.0,
            ..Self::default()
        }
    }

    /// With failure rate
    #[inline]
    #[must_use]
    pub fn with_failure_rate(mut self, rate: f64) -> Self {
        self.failure_rate = rate;
        self
    }

    /// With RNG seed
    #[inline]
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// With latency table
    #[inline]
    #[must_use]
    pub fn with_latency(mut self, latency: LatencyConfig) -> Self {
        self.latency = latency;
        self
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            latency: LatencyConfig::default(),
            failure_rate: 0.5,
            seed: None,
            comment_author: "Current User".to_string(),
        }
    }
}
