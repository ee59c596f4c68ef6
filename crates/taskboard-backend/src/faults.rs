//! Fault injection for the simulated backend
//!
//! The simulated backend asks a [`FaultInjector`] before completing each call.
//! Random failures exercise the store's error path interactively; tests use
//! the deterministic injectors instead of relying on probability.

use crate::config::Operation;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::{HashSet, VecDeque};
use std::fmt::Debug;

/// Decides whether a backend call fails with a network error
pub trait FaultInjector: Send + Sync + Debug {
    /// Called once per backend call, after the simulated latency
    fn should_fail(&self, operation: Operation) -> bool;
}

/// Every call succeeds
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverFail;

impl FaultInjector for NeverFail {
    fn should_fail(&self, _operation: Operation) -> bool {
        false
    }
}

/// Each call fails independently with probability `rate`
#[derive(Debug)]
pub struct RandomFailures {
    rate: f64,
    rng: Mutex<StdRng>,
}

impl RandomFailures {
    /// Seeded injector; the same seed yields the same failure sequence
    #[must_use]
    pub fn seeded(rate: f64, seed: u64) -> Self {
        Self {
            rate: bounded_rate(rate),
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Injector seeded from the operating system
    #[must_use]
    pub fn from_entropy(rate: f64) -> Self {
        Self {
            rate: bounded_rate(rate),
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    /// Effective (clamped) failure rate
    #[inline]
    #[must_use]
    pub fn rate(&self) -> f64 {
        self.rate
    }
}

fn bounded_rate(rate: f64) -> f64 {
    if rate.is_nan() {
        0.0
    } else {
        rate.clamp(0.0, 1.0)
    }
}

impl FaultInjector for RandomFailures {
    fn should_fail(&self, _operation: Operation) -> bool {
        self.rng.lock().random_bool(self.rate)
    }
}

/// Pre-recorded outcomes consumed one per call
///
/// `true` fails the call. Once the script runs out every call succeeds.
#[derive(Debug, Default)]
pub struct ScriptedFailures {
    outcomes: Mutex<VecDeque<bool>>,
}

impl ScriptedFailures {
    /// Script from a sequence of outcomes
    #[must_use]
    pub fn new(outcomes: impl IntoIterator<Item = bool>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into_iter().collect()),
        }
    }

    /// Append outcomes to the end of the script
    pub fn push(&self, outcomes: impl IntoIterator<Item = bool>) {
        self.outcomes.lock().extend(outcomes);
    }

    /// Outcomes not yet consumed
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.outcomes.lock().len()
    }
}

impl FaultInjector for ScriptedFailures {
    fn should_fail(&self, _operation: Operation) -> bool {
        self.outcomes.lock().pop_front().unwrap_or(false)
    }
}

/// Listed operations always fail, all others succeed
#[derive(Debug, Clone, Default)]
pub struct FailOperations {
    operations: HashSet<Operation>,
}

impl FailOperations {
    /// Fail every call to the given operations
    #[must_use]
    pub fn new(operations: impl IntoIterator<Item = Operation>) -> Self {
        Self {
            operations: operations.into_iter().collect(),
        }
    }
}

impl FaultInjector for FailOperations {
    fn should_fail(&self, operation: Operation) -> bool {
        self.operations.contains(&operation)
    }
}
