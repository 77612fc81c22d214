//! Pipeline orchestrator for checking a whole manifest
//!
//! This module provides:
//! - One registry call per distinct package (PEP 503 name)
//! - Parallel registry queries bounded by a semaphore
//! - Per-package error isolation: a failed fetch never aborts the run
//! - Results placed back into manifest order

use crate::compat::CompatibilityEvaluator;
use crate::domain::{
    CheckStatus, CheckSummary, EvaluationResult, PackageOutcome, PackageRequirement, ReleaseInfo,
};
use crate::error::FetchError;
use crate::progress::{CheckProgress, FetchProgress};
use crate::registry::RegistryClient;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Default concurrency limit for registry requests
pub const DEFAULT_CONCURRENCY: usize = 4;

/// Upper bound for registry request concurrency
pub const MAX_CONCURRENCY: usize = 8;

/// Configuration for the orchestrator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrchestratorConfig {
    /// Maximum concurrent registry requests
    pub concurrency: usize,
    /// Whether to draw a progress bar
    pub show_progress: bool,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            show_progress: false,
        }
    }
}

/// Orchestrator for fetching and evaluating every requirement
pub struct Orchestrator {
    /// Package index client
    registry: Arc<dyn RegistryClient>,
    /// Evaluator configured for the target runtime
    evaluator: CompatibilityEvaluator,
    /// Semaphore for concurrency control
    semaphore: Arc<Semaphore>,
    /// Whether to draw a progress bar
    show_progress: bool,
}

/// Result of a run
#[derive(Debug, Clone)]
pub struct RunResult {
    /// One outcome per requirement, in manifest order
    pub outcomes: Vec<PackageOutcome>,
    /// Counts over all outcomes
    pub summary: CheckSummary,
}

impl RunResult {
    /// Create a result and compute its summary
    pub fn new(outcomes: Vec<PackageOutcome>) -> Self {
        let summary = CheckSummary::from_outcomes(&outcomes);
        Self { outcomes, summary }
    }

    /// Fetch errors by package name, in manifest order
    pub fn errors(&self) -> impl Iterator<Item = (&str, &FetchError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.fetch_error().map(|e| (o.package_name(), e)))
    }

    /// Packages the index has no releases for, in manifest order
    pub fn not_found(&self) -> impl Iterator<Item = &str> {
        self.outcomes
            .iter()
            .filter(|o| o.status == CheckStatus::NoReleases)
            .map(PackageOutcome::package_name)
    }

    /// Process exit code: 0 when every package was checked, 2 otherwise
    pub fn exit_code(&self) -> u8 {
        if self.summary.all_checked() {
            0
        } else {
            2
        }
    }
}

impl Orchestrator {
    /// Create a new orchestrator
    pub fn new(
        registry: Arc<dyn RegistryClient>,
        evaluator: CompatibilityEvaluator,
        config: OrchestratorConfig,
    ) -> Self {
        let permits = config.concurrency.clamp(1, MAX_CONCURRENCY);
        Self {
            registry,
            evaluator,
            semaphore: Arc::new(Semaphore::new(permits)),
            show_progress: config.show_progress,
        }
    }

    /// Fetch and evaluate every requirement
    pub async fn run(&self, requirements: &[PackageRequirement]) -> RunResult {
        let packages = distinct_packages(requirements);
        let mut progress = CheckProgress::start(packages.len(), self.show_progress);
        let fetched = self.fetch_all(&packages, &mut progress).await;
        log::debug!("fetched {} package(s): {}", packages.len(), progress.finish());

        let outcomes = requirements
            .iter()
            .map(|req| match fetched.get(&req.normalized_name()) {
                Some(result) => self.outcome(req, result),
                None => PackageOutcome::fetch_failed(
                    req.clone(),
                    FetchError::network(
                        req.name.as_str(),
                        self.registry.registry_name(),
                        "fetch task did not complete",
                    ),
                ),
            })
            .collect();

        RunResult::new(outcomes)
    }

    /// Fetch releases for each `(normalized, display)` name pair
    async fn fetch_all(
        &self,
        packages: &[(String, String)],
        progress: &mut CheckProgress,
    ) -> HashMap<String, Result<Vec<ReleaseInfo>, FetchError>> {
        let mut tasks = JoinSet::new();

        for (key, name) in packages {
            let registry = Arc::clone(&self.registry);
            let semaphore = Arc::clone(&self.semaphore);
            let key = key.clone();
            let name = name.clone();

            tasks.spawn(async move {
                // The semaphore is never closed
                let _permit = semaphore.acquire_owned().await.ok();
                let result = registry.fetch_releases(&name).await;
                (key, name, result)
            });
        }

        let mut fetched = HashMap::with_capacity(packages.len());
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((key, name, result)) => {
                    let fetch = match &result {
                        Ok(releases) if releases.is_empty() => FetchProgress::NotFound,
                        Ok(releases) => FetchProgress::Found(releases.len()),
                        Err(e) => {
                            log::warn!("{}", e);
                            FetchProgress::Failed
                        }
                    };
                    log::debug!("{}: {}", name, fetch);
                    progress.record(&name, fetch);
                    fetched.insert(key, result);
                }
                Err(e) => log::error!("fetch task failed: {}", e),
            }
        }

        fetched
    }

    fn outcome(
        &self,
        requirement: &PackageRequirement,
        result: &Result<Vec<ReleaseInfo>, FetchError>,
    ) -> PackageOutcome {
        match result {
            Ok(releases) if releases.is_empty() => PackageOutcome::no_releases(
                EvaluationResult::indeterminate(requirement.clone()),
            ),
            Ok(releases) => PackageOutcome::checked(self.evaluator.evaluate(requirement, releases)),
            Err(e) => PackageOutcome::fetch_failed(requirement.clone(), e.clone()),
        }
    }
}

/// Distinct `(normalized, first spelling)` names in manifest order
fn distinct_packages(requirements: &[PackageRequirement]) -> Vec<(String, String)> {
    let mut seen = HashSet::new();
    requirements
        .iter()
        .filter_map(|req| {
            let key = req.normalized_name();
            seen.insert(key.clone()).then(|| (key, req.name.clone()))
        })
        .collect()
}
