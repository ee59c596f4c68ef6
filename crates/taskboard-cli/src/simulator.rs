//! Seeded store session against the simulated backend
//!
//! Drives a [`TaskStore`] the way a user would click through the board:
//! 1. Load the board, taking the offered retry while loading fails
//! 2. Perform random actions (create, start, complete, reopen, comment,
//!    refresh, delete) on random tasks
//! 3. Report what was attempted, what failed and the final board
//!
//! The backend's failures and the choice of actions both derive from the
//! seed, so a run is reproducible.

use chrono::{Duration, Local};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use taskboard_backend::{fixtures, LatencyConfig, SimulatedBackend, SimulationConfig};
use taskboard_core::{
    prepare_new_task, BackendResult, TaskFields, TaskId, TaskPatch, TaskStats, TaskStatus,
};
use taskboard_store::{NotificationCenter, NotifyConfig, TaskStore};

const TITLES: [&str; 8] = [
    "Review pull request",
    "Update onboarding guide",
    "Profile search endpoint",
    "Triage bug reports",
    "Prepare sprint demo",
    "Rotate API keys",
    "Audit access logs",
    "Draft release notes",
];

const ASSIGNEES: [&str; 4] = ["1001", "1002", "1003", "ops_team"];

const COMMENTS: [&str; 4] = [
    "Picked this up",
    "Blocked on review",
    "Needs another pass",
    "Looks good to me",
];

/// Simulator configuration
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulatorConfig {
    /// Seed for both the action sequence and the backend's failures
    pub seed: u64,
    /// Actions performed after the initial load
    pub operations: u64,
    /// Probability that any backend call fails
    pub failure_rate: f64,
    /// Retries taken while the initial load keeps failing
    pub max_load_retries: u32,
    /// Sleep for the configured latency instead of skipping it
    pub realtime: bool,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            operations: 50,
            failure_rate: SimulationConfig::default().failure_rate,
            max_load_retries: 5,
            realtime: false,
        }
    }
}

/// User action performed by the simulator
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Initial load and its retries
    Load,
    /// Create a task from a generated form
    Create,
    /// Move a task to `in-progress`
    Start,
    /// Move a task to `done`
    Complete,
    /// Move a task back to `todo`
    Reopen,
    /// Comment on a task
    Comment,
    /// Re-fetch a single task
    Refresh,
    /// Delete a task
    Delete,
}

impl Action {
    const RANDOM: [Self; 7] = [
        Self::Create,
        Self::Start,
        Self::Complete,
        Self::Reopen,
        Self::Comment,
        Self::Refresh,
        Self::Delete,
    ];

    fn as_str(self) -> &'static str {
        match self {
            Self::Load => "load",
            Self::Create => "create",
            Self::Start => "start",
            Self::Complete => "complete",
            Self::Reopen => "reopen",
            Self::Comment => "comment",
            Self::Refresh => "refresh",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome counts for one action
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Tally {
    /// Times performed
    pub attempted: u64,
    /// Times the store reported success
    pub succeeded: u64,
    /// Times the store reported an error
    pub failed: u64,
}

/// Counters collected during a run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SimulatorStats {
    /// Outcomes per action
    pub actions: BTreeMap<Action, Tally>,
    /// Retries taken from the load failure notification
    pub load_retries: u32,
    /// Whether the board ended up loaded
    pub loaded: bool,
    /// Generated forms rejected by validation
    pub rejected_forms: u64,
    /// Backend calls received
    pub backend_calls: u64,
    /// Backend calls failed by fault injection
    pub backend_failures: u64,
    /// Notifications shown
    pub notifications: u64,
}

impl SimulatorStats {
    fn record(&mut self, action: Action, ok: bool) {
        let tally = self.actions.entry(action).or_default();
        tally.attempted += 1;
        if ok {
            tally.succeeded += 1;
        } else {
            tally.failed += 1;
        }
    }

    /// Actions performed, including load attempts
    #[must_use]
    pub fn total_attempted(&self) -> u64 {
        self.actions.values().map(|t| t.attempted).sum()
    }

    /// Actions that failed, including load attempts
    #[must_use]
    pub fn total_failed(&self) -> u64 {
        self.actions.values().map(|t| t.failed).sum()
    }
}

/// Final report from the simulator
#[derive(Debug, Clone, Serialize)]
pub struct SimulatorReport {
    /// Run parameters
    pub config: SimulatorConfig,
    /// Counters
    pub stats: SimulatorStats,
    /// Board counts at the end of the run
    pub board: TaskStats,
    /// Last error the store held, if any
    pub last_error: Option<String>,
}

impl SimulatorReport {
    /// Human-readable report
    #[must_use]
    pub fn generate_text(&self) -> String {
        let mut report = String::new();

        report.push_str("=== Taskboard Simulation Report ===\n\n");
        report.push_str(&format!("Seed: {}\n", self.config.seed));
        report.push_str(&format!("Operations: {}\n", self.config.operations));
        report.push_str(&format!("Failure Rate: {:.2}\n", self.config.failure_rate));
        report.push_str(&format!(
            "Board Loaded: {} (after {} retries)\n",
            self.stats.loaded, self.stats.load_retries
        ));

        report.push_str("\n=== Actions ===\n");
        for (action, tally) in &self.stats.actions {
            report.push_str(&format!(
                "{:<10} attempted {:>4}  succeeded {:>4}  failed {:>4}\n",
                action.as_str(),
                tally.attempted,
                tally.succeeded,
                tally.failed
            ));
        }
        report.push_str(&format!(
            "Total: {} attempted, {} failed\n",
            self.stats.total_attempted(),
            self.stats.total_failed()
        ));
        report.push_str(&format!("Rejected Forms: {}\n", self.stats.rejected_forms));

        report.push_str("\n=== Backend ===\n");
        report.push_str(&format!("Calls: {}\n", self.stats.backend_calls));
        report.push_str(&format!("Injected Failures: {}\n", self.stats.backend_failures));
        report.push_str(&format!("Notifications: {}\n", self.stats.notifications));

        report.push_str("\n=== Board ===\n");
        report.push_str(&format!("Total: {}\n", self.board.total));
        report.push_str(&format!("Todo: {}\n", self.board.todo));
        report.push_str(&format!("In Progress: {}\n", self.board.in_progress));
        report.push_str(&format!("Completed: {}\n", self.board.completed));

        if let Some(error) = &self.last_error {
            report.push_str(&format!("\nLast Error: {error}\n"));
        }

        report
    }
}

/// Run one seeded session
///
/// `backend` supplies latency and comment attribution; its failure rate and
/// seed are replaced by the simulator's.
pub async fn run_simulator(
    config: SimulatorConfig,
    backend: &SimulationConfig,
    notifications: NotifyConfig,
) -> SimulatorReport {
    let mut backend_config = backend
        .clone()
        .with_failure_rate(config.failure_rate)
        .with_seed(config.seed);
    if !config.realtime {
        backend_config = backend_config.with_latency(LatencyConfig::zero());
    }

    let backend = Arc::new(SimulatedBackend::from_config(
        &backend_config,
        fixtures::sample_tasks(),
    ));
    let center = Arc::new(NotificationCenter::new(notifications));
    let store = TaskStore::new(backend.clone(), center.clone());

    let mut rng = StdRng::seed_from_u64(config.seed.rotate_left(32));
    let mut stats = SimulatorStats::default();

    tracing::info!(seed = config.seed, operations = config.operations, "simulation started");
    stats.loaded = load_board(&store, &center, config.max_load_retries, &mut stats).await;

    for step in 0..config.operations {
        let action = *Action::RANDOM
            .choose(&mut rng)
            .unwrap_or(&Action::Create);
        let target = random_task(&store, &mut rng);

        let action = if target.is_none() { Action::Create } else { action };
        let outcome = match (action, target) {
            (Action::Create, _) => {
                let fields = generated_form(&mut rng, step);
                match prepare_new_task(&fields, Local::now().date_naive()) {
                    Ok(new_task) => discard(store.create_task(new_task).await),
                    Err(errors) => {
                        tracing::debug!(step, errors = errors.len(), "generated form rejected");
                        stats.rejected_forms += 1;
                        continue;
                    }
                }
            }
            (Action::Start, Some(id)) => move_to(&store, &id, TaskStatus::InProgress).await,
            (Action::Complete, Some(id)) => move_to(&store, &id, TaskStatus::Done).await,
            (Action::Reopen, Some(id)) => move_to(&store, &id, TaskStatus::Todo).await,
            (Action::Comment, Some(id)) => {
                let text = COMMENTS.choose(&mut rng).copied().unwrap_or("Update");
                discard(store.add_comment(&id, text).await)
            }
            (Action::Refresh, Some(id)) => discard(store.refresh_task(&id).await),
            (Action::Delete, Some(id)) => store.delete_task(&id).await,
            (Action::Load, _) | (_, None) => continue,
        };

        tracing::debug!(step, %action, ok = outcome.is_ok(), "simulated action");
        stats.record(action, outcome.is_ok());
    }

    let backend_stats = backend.stats();
    stats.backend_calls = backend_stats.total_calls();
    stats.backend_failures = backend_stats.total_failures();
    stats.notifications = center.total_shown();

    tracing::info!(
        attempted = stats.total_attempted(),
        failed = stats.total_failed(),
        "simulation finished"
    );

    SimulatorReport {
        config,
        stats,
        board: store.stats(),
        last_error: store.error(),
    }
}

/// Load, then follow the retry offered by the failure notification
async fn load_board(
    store: &TaskStore,
    center: &NotificationCenter,
    max_retries: u32,
    stats: &mut SimulatorStats,
) -> bool {
    store.load_tasks().await;
    stats.record(Action::Load, store.error().is_none());

    while store.error().is_some() && stats.load_retries < max_retries {
        let Some(id) = center.pending_retries().first().copied() else {
            break;
        };
        stats.load_retries += 1;
        center.retry(id).await;
        stats.record(Action::Load, store.error().is_none());
    }

    store.error().is_none()
}

fn random_task(store: &TaskStore, rng: &mut StdRng) -> Option<TaskId> {
    let tasks = store.tasks();
    tasks.choose(rng).map(|t| t.id.clone())
}

/// Build a create form; about one in ten is too short to pass validation
fn generated_form(rng: &mut StdRng, step: u64) -> TaskFields {
    let title = if rng.random_bool(0.1) {
        "ab".to_string()
    } else {
        let base = TITLES.choose(rng).copied().unwrap_or("New task");
        format!("{base} #{step}")
    };
    let due = Local::now().date_naive() + Duration::days(rng.random_range(0..30));
    let assignee = ASSIGNEES.choose(rng).copied().unwrap_or_default();
    TaskFields::new()
        .with_title(title)
        .with_assignee(assignee)
        .with_due_date(due.format("%Y-%m-%d").to_string())
}

async fn move_to(store: &TaskStore, id: &TaskId, status: TaskStatus) -> BackendResult<()> {
    discard(store.update_task(id, TaskPatch::status(status)).await)
}

fn discard<T>(result: BackendResult<T>) -> BackendResult<()> {
    result.map(|_| ())
}
