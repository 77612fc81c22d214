//! CLI argument parsing module for pycompat

use crate::compat::EvaluatorConfig;
use crate::error::{ConfigError, FormatError};
use crate::orchestrator::{OrchestratorConfig, DEFAULT_CONCURRENCY, MAX_CONCURRENCY};
use crate::output::{OutputConfig, OutputFormat};
use crate::registry::{RegistryConfig, PYPI_API_URL};
use crate::version::{PythonRuntime, DEFAULT_TARGET_RUNTIME};
use chrono::NaiveDate;
use clap::Parser;
use log::LevelFilter;
use std::path::PathBuf;
use std::time::Duration;

/// Parse a timeout given in whole seconds
fn parse_timeout(s: &str) -> Result<Duration, String> {
    let secs: u64 = s
        .trim()
        .parse()
        .map_err(|_| format!("invalid number of seconds: {}", s))?;
    if secs == 0 {
        return Err("timeout must be at least 1 second".to_string());
    }
    Ok(Duration::from_secs(secs))
}

/// Python dependency compatibility checker
#[derive(Parser, Debug, Clone)]
#[command(
    name = "pycompat",
    version,
    about = "Check pinned Python dependencies against a target Python version"
)]
pub struct CliArgs {
    /// Requirements file to check (e.g. requirements.txt)
    pub requirements_file: PathBuf,

    /// Target Python version (e.g. 3.12)
    #[arg(short = 't', long, default_value = DEFAULT_TARGET_RUNTIME)]
    pub target_python_version: String,

    // Output options
    /// Report format (default: inferred from --output, else markdown)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Write the report to this file instead of stdout (required for csv)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    // Registry options
    /// Base URL of the PyPI JSON API
    #[arg(long, default_value = PYPI_API_URL)]
    pub index_url: String,

    /// Release date of the target Python version (YYYY-MM-DD), overrides the built-in table
    #[arg(long)]
    pub runtime_release_date: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, default_value = "10", value_parser = parse_timeout)]
    pub timeout: Duration,

    /// Maximum number of concurrent requests (1-8)
    #[arg(long, default_value_t = DEFAULT_CONCURRENCY as u8, value_parser = clap::value_parser!(u8).range(1..=MAX_CONCURRENCY as i64))]
    pub concurrency: u8,

    // General options
    /// Enable verbose output
    #[arg(long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Enable quiet mode - errors only
    #[arg(short, long)]
    pub quiet: bool,
}

impl CliArgs {
    /// Build the evaluator configuration
    pub fn evaluator_config(&self) -> Result<EvaluatorConfig, ConfigError> {
        let target = PythonRuntime::parse(&self.target_python_version)?;
        let mut config = EvaluatorConfig::new(target);

        if let Some(value) = &self.runtime_release_date {
            let date = NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
                ConfigError::InvalidDate {
                    value: value.clone(),
                }
            })?;
            config = config.with_runtime_release_date(date);
        }

        Ok(config)
    }

    /// Build the registry configuration
    pub fn registry_config(&self) -> Result<RegistryConfig, ConfigError> {
        Ok(RegistryConfig {
            index_url: RegistryConfig::validate_index_url(&self.index_url)?,
            timeout: self.timeout,
            ..RegistryConfig::default()
        })
    }

    /// Build the output configuration
    pub fn output_config(&self) -> Result<OutputConfig, FormatError> {
        OutputConfig::resolve(self.format, self.output.clone())
    }

    /// Build the orchestrator configuration
    pub fn orchestrator_config(&self) -> OrchestratorConfig {
        OrchestratorConfig {
            concurrency: usize::from(self.concurrency),
            show_progress: !self.quiet,
        }
    }

    /// Log level selected by --verbose / --quiet
    pub fn log_level(&self) -> LevelFilter {
        if self.quiet {
            LevelFilter::Error
        } else if self.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Warn
        }
    }
}
