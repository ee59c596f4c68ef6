//! In-memory task backend with simulated latency and failures
//!
//! Stands in for a real task service:
//! - Every call sleeps for the configured per-operation latency
//! - The [`FaultInjector`] then decides whether the call fails
//! - Surviving calls act on an in-memory collection and return copies

use crate::config::{LatencyConfig, Operation, SimulationConfig};
use crate::faults::{FaultInjector, NeverFail, RandomFailures};
use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::Arc;
use taskboard_core::{
    BackendError, BackendResult, Comment, CommentId, NewTask, Task, TaskBackend, TaskId, TaskPatch,
};
use ulid::Ulid;

/// Per-operation call counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallCount {
    /// Calls received
    pub calls: u64,
    /// Calls failed by fault injection
    pub injected_failures: u64,
}

/// Call statistics keyed by operation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackendStats {
    counts: BTreeMap<Operation, CallCount>,
}

impl BackendStats {
    fn record(&mut self, operation: Operation, failed: bool) {
        let entry = self.counts.entry(operation).or_default();
        entry.calls += 1;
        if failed {
            entry.injected_failures += 1;
        }
    }

    /// Counters for one operation
    #[must_use]
    pub fn get(&self, operation: Operation) -> CallCount {
        self.counts.get(&operation).copied().unwrap_or_default()
    }

    /// Calls received across all operations
    #[must_use]
    pub fn total_calls(&self) -> u64 {
        self.counts.values().map(|c| c.calls).sum()
    }

    /// Injected failures across all operations
    #[must_use]
    pub fn total_failures(&self) -> u64 {
        self.counts.values().map(|c| c.injected_failures).sum()
    }

    /// Iterate over operations that received calls
    pub fn iter(&self) -> impl Iterator<Item = (Operation, CallCount)> + '_ {
        self.counts.iter().map(|(op, count)| (*op, *count))
    }
}

/// Simulated task backend
#[derive(Debug)]
pub struct SimulatedBackend {
    tasks: Mutex<Vec<Task>>,
    latency: LatencyConfig,
    faults: Arc<dyn FaultInjector>,
    comment_author: String,
    stats: Mutex<BackendStats>,
}

impl SimulatedBackend {
    /// Backend over `tasks` with default latency that never fails
    #[must_use]
    pub fn new(tasks: Vec<Task>) -> Self {
        let defaults = SimulationConfig::default();
        Self {
            tasks: Mutex::new(tasks),
            latency: defaults.latency,
            faults: Arc::new(NeverFail),
            comment_author: defaults.comment_author,
            stats: Mutex::new(BackendStats::default()),
        }
    }

    /// Backend configured from a simulation table
    ///
    /// A seeded config produces a reproducible failure sequence.
    #[must_use]
    pub fn from_config(config: &SimulationConfig, tasks: Vec<Task>) -> Self {
        let faults: Arc<dyn FaultInjector> = match config.seed {
            Some(seed) => Arc::new(RandomFailures::seeded(config.failure_rate, seed)),
            None => Arc::new(RandomFailures::from_entropy(config.failure_rate)),
        };
        Self {
            tasks: Mutex::new(tasks),
            latency: config.latency,
            faults,
            comment_author: config.comment_author.clone(),
            stats: Mutex::new(BackendStats::default()),
        }
    }

    /// With latency table
    #[inline]
    #[must_use]
    pub fn with_latency(mut self, latency: LatencyConfig) -> Self {
        self.latency = latency;
        self
    }

    /// With fault injector
    #[inline]
    #[must_use]
    pub fn with_faults(self, faults: impl FaultInjector + 'static) -> Self {
        self.with_shared_faults(Arc::new(faults))
    }

    /// With a fault injector the caller keeps a handle to
    #[inline]
    #[must_use]
    pub fn with_shared_faults(mut self, faults: Arc<dyn FaultInjector>) -> Self {
        self.faults = faults;
        self
    }

    /// With comment author
    #[inline]
    #[must_use]
    pub fn with_comment_author(mut self, author: impl Into<String>) -> Self {
        self.comment_author = author.into();
        self
    }

    /// Copy of the stored collection, bypassing latency and faults
    #[must_use]
    pub fn snapshot(&self) -> Vec<Task> {
        self.tasks.lock().clone()
    }

    /// Call statistics so far
    #[must_use]
    pub fn stats(&self) -> BackendStats {
        self.stats.lock().clone()
    }

    /// Simulate the round trip; `Err` when the injector fails the call
    async fn round_trip(
        &self,
        operation: Operation,
        failure: impl FnOnce() -> String,
    ) -> BackendResult<()> {
        let delay = self.latency.for_operation(operation);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let failed = self.faults.should_fail(operation);
        self.stats.lock().record(operation, failed);
        if failed {
            let message = failure();
            tracing::debug!(%operation, %message, "injected backend failure");
            return Err(BackendError::network(message));
        }
        tracing::trace!(%operation, latency = ?delay, "backend call");
        Ok(())
    }
}

fn position(tasks: &[Task], id: &TaskId) -> Option<usize> {
    tasks.iter().position(|t| &t.id == id)
}

#[async_trait]
impl TaskBackend for SimulatedBackend {
    async fn get_all_tasks(&self) -> BackendResult<Vec<Task>> {
        self.round_trip(Operation::GetAll, || "Failed to fetch tasks".to_string())
            .await?;
        Ok(self.tasks.lock().clone())
    }

    async fn get_task_by_id(&self, id: &TaskId) -> BackendResult<Option<Task>> {
        self.round_trip(Operation::GetById, || format!("Failed to fetch task {id}"))
            .await?;
        Ok(self.tasks.lock().iter().find(|t| &t.id == id).cloned())
    }

    async fn create_task(&self, new_task: NewTask) -> BackendResult<Task> {
        self.round_trip(Operation::Create, || "Failed to create task".to_string())
            .await?;
        let task = Task::from_new(TaskId::from(Ulid::new().to_string()), new_task);
        self.tasks.lock().push(task.clone());
        tracing::debug!(id = %task.id, "task created");
        Ok(task)
    }

    async fn update_task(&self, id: &TaskId, patch: TaskPatch) -> BackendResult<Task> {
        self.round_trip(Operation::Update, || format!("Failed to update task {id}"))
            .await?;
        let mut tasks = self.tasks.lock();
        let index = position(&tasks, id).ok_or_else(|| BackendError::not_found(id.clone()))?;
        patch.apply_to(&mut tasks[index]);
        Ok(tasks[index].clone())
    }

    async fn delete_task(&self, id: &TaskId) -> BackendResult<()> {
        self.round_trip(Operation::Delete, || format!("Failed to delete task {id}"))
            .await?;
        let mut tasks = self.tasks.lock();
        let index = position(&tasks, id).ok_or_else(|| BackendError::not_found(id.clone()))?;
        tasks.remove(index);
        Ok(())
    }

    async fn add_comment(&self, task_id: &TaskId, text: &str) -> BackendResult<Task> {
        self.round_trip(Operation::AddComment, || "Failed to add comment".to_string())
            .await?;
        let comment = Comment {
            id: Some(CommentId::from(Ulid::new().to_string())),
            text: text.to_string(),
            author: Some(self.comment_author.clone()),
            created_at: Some(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
        };
        let mut tasks = self.tasks.lock();
        let index =
            position(&tasks, task_id).ok_or_else(|| BackendError::not_found(task_id.clone()))?;
        tasks[index].comments.push(comment);
        Ok(tasks[index].clone())
    }
}
