//! QASH scenario simulator
//!
//! Runs a YAML scenario against an in-memory host and prints the report.
//!
//! # Usage
//!
//! ```bash
//! # Human readable report
//! qash-simulator --scenario demos/delegated_transfer.yaml
//!
//! # JSON report, legacy token rules, failed invocations rolled back
//! qash-simulator --scenario demos/legacy_token.yaml --preset legacy-token --rollback --json
//! ```
//!
//! Exits with status 1 when an expectation, assertion or invariant fails.

mod logging;

use std::{
    fs,
    path::{Path, PathBuf},
    process::ExitCode,
};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::LevelFilter;
use qash_common::policy::LedgerConfig;
use qash_testing_framework::scenarios::{
    parse_scenario, ScenarioExecutor, ScenarioReport, StepOutcome,
};

#[derive(Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Preset {
    Qash,
    LegacyToken,
}

impl From<Preset> for LedgerConfig {
    fn from(preset: Preset) -> Self {
        match preset {
            Preset::Qash => LedgerConfig::qash(),
            Preset::LegacyToken => LedgerConfig::legacy_token(),
        }
    }
}

/// QASH ledger scenario simulator
#[derive(Parser)]
#[command(name = "qash-simulator")]
#[command(version)]
struct Cli {
    /// YAML scenario file
    #[arg(short, long)]
    scenario: PathBuf,

    /// JSON ledger config, overrides the scenario's config
    #[arg(short, long, conflicts_with = "preset")]
    config: Option<PathBuf>,

    /// Named ledger config, overrides the scenario's config
    #[arg(short, long, value_enum)]
    preset: Option<Preset>,

    /// Discard the writes of failed invocations
    #[arg(long)]
    rollback: bool,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    #[arg(long, value_enum, default_value_t = LogLevel::Warn)]
    log_level: LogLevel,
}

fn load_config(path: &Path) -> Result<LedgerConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config {}", path.display()))
}

fn print_report(report: &ScenarioReport) {
    println!("Scenario: {}", report.name);
    for step in &report.steps {
        match &step.outcome {
            StepOutcome::Ok { value: Some(value) } => {
                println!("  {:>3} {:<20} {:<12} ok = {}", step.step, step.action, step.caller, value)
            }
            StepOutcome::Ok { value: None } => {
                println!("  {:>3} {:<20} {:<12} ok", step.step, step.action, step.caller)
            }
            StepOutcome::Error { name, code, .. } => println!(
                "  {:>3} {:<20} {:<12} {} ({})",
                step.step, step.action, step.caller, name, code
            ),
        }
    }

    println!("Balances:");
    for (account, balance) in &report.balances {
        println!("  {:<20} {}", account, balance);
    }
    println!("Events: {}", report.events.len());

    for failure in &report.failures {
        println!("FAILED {}", failure);
    }
    for violation in &report.invariant_violations {
        println!("INVARIANT {}", violation);
    }
    println!("{}", if report.passed() { "PASSED" } else { "FAILED" });
}

fn run(cli: &Cli) -> Result<bool> {
    let yaml = fs::read_to_string(&cli.scenario)
        .with_context(|| format!("Failed to read scenario {}", cli.scenario.display()))?;
    let mut scenario = parse_scenario(&yaml)?;

    if let Some(path) = &cli.config {
        scenario.config = load_config(path)?;
    } else if let Some(preset) = cli.preset {
        scenario.config = preset.into();
    }

    let report = ScenarioExecutor::new()
        .with_rollback(cli.rollback)
        .execute(&scenario)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(report.passed())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(e) = logging::init(cli.log_level.into()) {
        eprintln!("Failed to initialize logger: {}", e);
    }

    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}
