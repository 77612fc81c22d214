//! Compatibility evaluation result types

use super::PackageRequirement;
use crate::error::FetchError;
use crate::version::PackageVersion;
use chrono::{DateTime, Utc};
use std::fmt;

/// How the minimum compatible version was determined
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confidence {
    /// A release declares support for the target runtime
    Explicit,
    /// Inferred from a release published after the target runtime
    Heuristic,
    /// No determination could be made
    Indeterminate,
}

impl Confidence {
    /// Label used in reports
    pub fn label(&self) -> &'static str {
        match self {
            Confidence::Explicit => "explicit",
            Confidence::Heuristic => "heuristic",
            Confidence::Indeterminate => "?",
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Whether the pinned version must be upgraded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpgradeStatus {
    /// The pin is older than the minimum compatible version, or missing
    Required,
    /// The pin already satisfies the minimum compatible version
    NotRequired,
    /// Not enough data to decide
    Indeterminate,
}

impl UpgradeStatus {
    /// Label used in reports
    pub fn label(&self) -> &'static str {
        match self {
            UpgradeStatus::Required => "yes",
            UpgradeStatus::NotRequired => "no",
            UpgradeStatus::Indeterminate => "?",
        }
    }
}

impl fmt::Display for UpgradeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Result of evaluating one requirement against its releases
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationResult {
    /// The evaluated requirement
    pub requirement: PackageRequirement,
    /// Smallest release known or inferred to support the target runtime
    pub minimum_compatible: Option<PackageVersion>,
    /// How `minimum_compatible` was determined
    pub confidence: Confidence,
    /// Whether the pin must be upgraded
    pub upgrade: UpgradeStatus,
    /// Highest stable release (highest pre-release if none is stable)
    pub latest: Option<PackageVersion>,
    /// Upload date of `latest`
    pub latest_released_at: Option<DateTime<Utc>>,
}

impl EvaluationResult {
    /// Result for a requirement without any usable release data
    pub fn indeterminate(requirement: PackageRequirement) -> Self {
        Self {
            requirement,
            minimum_compatible: None,
            confidence: Confidence::Indeterminate,
            upgrade: UpgradeStatus::Indeterminate,
            latest: None,
            latest_released_at: None,
        }
    }

    /// Returns true if the pin must be upgraded
    pub fn needs_upgrade(&self) -> bool {
        self.upgrade == UpgradeStatus::Required
    }
}

/// Whether a package could be checked against the index
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckStatus {
    /// Release metadata was fetched and evaluated
    Checked,
    /// The index has no usable release for this package
    NoReleases,
    /// Fetching failed
    FetchFailed(FetchError),
}

/// Evaluation of one manifest entry together with how it was obtained
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageOutcome {
    /// Evaluation result (indeterminate unless `status` is `Checked`)
    pub result: EvaluationResult,
    /// Fetch status
    pub status: CheckStatus,
}

impl PackageOutcome {
    /// Outcome for a package that was fetched and evaluated
    pub fn checked(result: EvaluationResult) -> Self {
        Self {
            result,
            status: CheckStatus::Checked,
        }
    }

    /// Outcome for a package the index has no releases for
    pub fn no_releases(result: EvaluationResult) -> Self {
        Self {
            result,
            status: CheckStatus::NoReleases,
        }
    }

    /// Outcome for a package whose fetch failed
    pub fn fetch_failed(requirement: PackageRequirement, error: FetchError) -> Self {
        Self {
            result: EvaluationResult::indeterminate(requirement),
            status: CheckStatus::FetchFailed(error),
        }
    }

    /// Returns true if the package could be checked
    pub fn is_checked(&self) -> bool {
        self.status == CheckStatus::Checked
    }

    /// The fetch error, if any
    pub fn fetch_error(&self) -> Option<&FetchError> {
        match &self.status {
            CheckStatus::FetchFailed(e) => Some(e),
            _ => None,
        }
    }

    /// The package name
    pub fn package_name(&self) -> &str {
        &self.result.requirement.name
    }
}
