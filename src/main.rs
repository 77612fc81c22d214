//! pycompat - Python dependency compatibility checker CLI tool
//!
//! Reads a requirements file, fetches release metadata from PyPI and reports
//! the minimum version of every package that supports a target Python version.

use anyhow::Context;
use clap::Parser;
use colored::Colorize;
use pycompat::cli::CliArgs;
use pycompat::compat::CompatibilityEvaluator;
use pycompat::error::AppError;
use pycompat::manifest::read_manifest;
use pycompat::orchestrator::{Orchestrator, RunResult};
use pycompat::output::{emit_report, Report};
use pycompat::registry::create_client;
use std::process::ExitCode;
use std::sync::Arc;

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();

    if let Err(e) = initialize_logger(args.log_level()) {
        eprintln!("Warning: failed to initialize logger: {}", e);
    }

    // Run the main logic and handle errors
    match run(args).await {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            let code = e
                .downcast_ref::<AppError>()
                .map(AppError::exit_code)
                .unwrap_or(1);
            ExitCode::from(code)
        }
    }
}

fn initialize_logger(level: simplelog::LevelFilter) -> anyhow::Result<()> {
    let config = simplelog::ConfigBuilder::new()
        .add_filter_allow_str("pycompat")
        .build();

    simplelog::TermLogger::init(
        level,
        config,
        simplelog::TerminalMode::Stderr,
        simplelog::ColorChoice::Auto,
    )?;

    Ok(())
}

/// Main application logic
async fn run(args: CliArgs) -> anyhow::Result<ExitCode> {
    // Validate configuration before any network access
    let evaluator_config = args.evaluator_config().map_err(AppError::from)?;
    let registry_config = args.registry_config().map_err(AppError::from)?;
    let output_config = args.output_config().map_err(AppError::from)?;

    let requirements = read_manifest(&args.requirements_file).map_err(AppError::from)?;

    log::debug!(
        "checking {} requirement(s) against Python {} using {}",
        requirements.len(),
        evaluator_config.target,
        registry_config.index_url
    );

    let client = create_client(&registry_config).context("failed to set up the registry client")?;
    let target = evaluator_config.target.clone();
    let orchestrator = Orchestrator::new(
        Arc::new(client),
        CompatibilityEvaluator::new(evaluator_config),
        args.orchestrator_config(),
    );
    let result = orchestrator.run(&requirements).await;

    let report = Report::new(target, result.outcomes.clone());
    emit_report(&report, &output_config).map_err(AppError::from)?;

    print_summary(&result, args.quiet);

    Ok(ExitCode::from(result.exit_code()))
}

/// Print the end-of-run summary to stderr
fn print_summary(result: &RunResult, quiet: bool) {
    let summary = &result.summary;

    if !quiet {
        eprintln!(
            "{} {} package(s): {} need upgrade, {} compatible, {} indeterminate",
            "Checked".bold(),
            summary.total,
            summary.upgrades_required.to_string().yellow(),
            summary.compatible.to_string().green(),
            summary.indeterminate
        );
    }

    if summary.all_checked() {
        return;
    }

    eprintln!(
        "{}",
        format!("{} package(s) could not be checked", summary.unchecked())
            .red()
            .bold()
    );
    for (name, error) in result.errors() {
        eprintln!("  - {}: {}", name, error);
    }
    for name in result.not_found() {
        eprintln!("  - {}: not found on the package index", name);
    }
}
