//! Testing utilities for the taskboard workspace
//!
//! Shared fixtures and a ready-wired store harness.

#![allow(missing_docs)]

use chrono::{Duration, Local, NaiveDate};
use std::sync::Arc;
use taskboard_backend::{FaultInjector, LatencyConfig, NeverFail, SimulatedBackend};
use taskboard_core::{Task, TaskFields};
use taskboard_store::{NotificationCenter, TaskStore};

/// Store wired to a zero-latency simulated backend and a notification center
pub struct Harness {
    pub store: TaskStore,
    pub backend: Arc<SimulatedBackend>,
    pub center: Arc<NotificationCenter>,
}

pub fn harness(tasks: Vec<Task>) -> Harness {
    harness_with_faults(tasks, NeverFail)
}

pub fn harness_with_faults(tasks: Vec<Task>, faults: impl FaultInjector + 'static) -> Harness {
    harness_with_shared_faults(tasks, Arc::new(faults))
}

pub fn harness_with_shared_faults(tasks: Vec<Task>, faults: Arc<dyn FaultInjector>) -> Harness {
    let backend = Arc::new(
        SimulatedBackend::new(tasks)
            .with_latency(LatencyConfig::zero())
            .with_shared_faults(faults),
    );
    let center = Arc::new(NotificationCenter::default());
    let store = TaskStore::new(backend.clone(), center.clone());
    Harness {
        store,
        backend,
        center,
    }
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// `YYYY-MM-DD` date `days` from today (negative for the past)
pub fn date_in(days: i64) -> String {
    (today() + Duration::days(days))
        .format("%Y-%m-%d")
        .to_string()
}

pub fn create_test_task(id: &str, title: &str) -> Task {
    Task::new(id, title, date_in(7))
}

pub fn create_test_board() -> Vec<Task> {
    vec![
        create_test_task("1", "Write docs"),
        create_test_task("2", "Fix login").with_status("in-progress"),
        create_test_task("3", "Ship release").with_status("done"),
    ]
}

/// Form that passes validation
pub fn valid_fields() -> TaskFields {
    TaskFields::new()
        .with_title("Write unit tests")
        .with_description("Cover the store")
        .with_assignee("dev_1")
        .with_due_date(date_in(3))
}
