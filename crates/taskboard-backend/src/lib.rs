//! Taskboard Backend - simulated task service
//!
//! An in-memory [`TaskBackend`](taskboard_core::TaskBackend) that behaves like
//! a flaky remote service:
//! - Configurable per-operation latency
//! - Pluggable fault injection (random, scripted, per-operation)
//! - Call statistics for reports and assertions
//!
//! # Example
//!
//! ```rust,ignore
//! use taskboard_backend::{fixtures, ScriptedFailures, SimulatedBackend};
//!
//! let backend = SimulatedBackend::new(fixtures::sample_tasks())
//!     .with_faults(ScriptedFailures::new([true]));
//! // first call fails, every later call succeeds
//! ```

#![warn(unreachable_pub)]

pub mod config;
pub mod faults;
pub mod fixtures;
pub mod simulated;

pub use config::{LatencyConfig, Operation, SimulationConfig};
pub use faults::{FailOperations, FaultInjector, NeverFail, RandomFailures, ScriptedFailures};
pub use simulated::{BackendStats, CallCount, SimulatedBackend};
