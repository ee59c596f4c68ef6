//! `taskboard` binary: validate forms and run seeded store simulations

use anyhow::Context;
use chrono::Local;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;
use taskboard_cli::{check_form, run_simulator, AppConfig, SimulatorConfig};
use taskboard_core::TaskFields;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn cli() -> Command {
    Command::new("taskboard")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Task board validation and store simulation")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("validate")
                .about("Sanitize and validate a create-task form")
                .arg(
                    Arg::new("title")
                        .long("title")
                        .default_value("")
                        .help("Task title"),
                )
                .arg(
                    Arg::new("description")
                        .long("description")
                        .help("Task description"),
                )
                .arg(
                    Arg::new("assignee")
                        .long("assignee")
                        .help("Assignee id"),
                )
                .arg(
                    Arg::new("due-date")
                        .long("due-date")
                        .help("Due date, e.g. 2025-09-01"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Output as JSON"),
                ),
        )
        .subcommand(
            Command::new("simulate")
                .about("Run a seeded session against the simulated backend")
                .arg(
                    Arg::new("seed")
                        .long("seed")
                        .default_value("42")
                        .value_parser(value_parser!(u64))
                        .help("Random seed for reproducibility"),
                )
                .arg(
                    Arg::new("operations")
                        .long("operations")
                        .default_value("50")
                        .value_parser(value_parser!(u64))
                        .help("Number of actions after the initial load"),
                )
                .arg(
                    Arg::new("failure-rate")
                        .long("failure-rate")
                        .value_parser(value_parser!(f64))
                        .help("Probability that a backend call fails [default: from config]"),
                )
                .arg(
                    Arg::new("config")
                        .long("config")
                        .value_parser(value_parser!(PathBuf))
                        .help("TOML config file (overrides TASKBOARD_CONFIG)"),
                )
                .arg(
                    Arg::new("realtime")
                        .long("realtime")
                        .action(ArgAction::SetTrue)
                        .help("Sleep for the configured backend latency"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Output as JSON"),
                ),
        )
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn validate(args: &ArgMatches) -> anyhow::Result<bool> {
    let text = |name: &str| args.get_one::<String>(name).cloned();
    let fields = TaskFields {
        title: text("title"),
        description: text("description"),
        assignee_id: text("assignee"),
        due_date: text("due-date"),
    };

    let report = check_form(&fields, Local::now().date_naive());
    if args.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report.generate_text());
    }
    Ok(report.is_valid())
}

async fn simulate(args: &ArgMatches) -> anyhow::Result<()> {
    let app = AppConfig::load(args.get_one::<PathBuf>("config").map(PathBuf::as_path))
        .context("loading configuration")?;

    let failure_rate = args
        .get_one::<f64>("failure-rate")
        .copied()
        .unwrap_or(app.backend.failure_rate);
    anyhow::ensure!(
        (0.0..=1.0).contains(&failure_rate),
        "--failure-rate must be within [0, 1], got {failure_rate}"
    );

    let config = SimulatorConfig {
        seed: args.get_one::<u64>("seed").copied().unwrap_or(42),
        operations: args.get_one::<u64>("operations").copied().unwrap_or(50),
        failure_rate,
        realtime: args.get_flag("realtime"),
        ..SimulatorConfig::default()
    };

    let report = run_simulator(config, &app.backend, app.notifications).await;
    if args.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report.generate_text());
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let matches = cli().get_matches();
    match matches.subcommand() {
        Some(("validate", args)) => {
            if !validate(args)? {
                std::process::exit(1);
            }
        }
        Some(("simulate", args)) => simulate(args).await?,
        _ => unreachable!("clap requires a subcommand"),
    }
    Ok(())
}
