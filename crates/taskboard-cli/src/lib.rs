//! Taskboard CLI
//!
//! Library half of the `taskboard` binary:
//! - [`config`]: TOML application configuration
//! - [`form`]: create-form validation reports
//! - [`simulator`]: seeded store sessions against the simulated backend

#![warn(unreachable_pub)]

pub mod config;
pub mod form;
pub mod simulator;

pub use config::{AppConfig, ConfigError, CONFIG_ENV};
pub use form::{check_form, FormReport};
pub use simulator::{run_simulator, Action, SimulatorConfig, SimulatorReport, SimulatorStats, Tally};
