//! Run summary structures

use super::{CheckStatus, PackageOutcome, UpgradeStatus};

/// Counts over all packages of a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CheckSummary {
    /// Number of manifest entries
    pub total: usize,
    /// Packages whose pin must be upgraded
    pub upgrades_required: usize,
    /// Packages already compatible
    pub compatible: usize,
    /// Checked packages without a determination
    pub indeterminate: usize,
    /// Packages not found on the index
    pub not_found: usize,
    /// Packages whose fetch failed
    pub fetch_failed: usize,
}

impl CheckSummary {
    /// Build the summary from the outcomes of a run
    pub fn from_outcomes(outcomes: &[PackageOutcome]) -> Self {
        let mut summary = Self {
            total: outcomes.len(),
            ..Self::default()
        };

        for outcome in outcomes {
            match &outcome.status {
                CheckStatus::NoReleases => summary.not_found += 1,
                CheckStatus::FetchFailed(_) => summary.fetch_failed += 1,
                CheckStatus::Checked => match outcome.result.upgrade {
                    UpgradeStatus::Required => summary.upgrades_required += 1,
                    UpgradeStatus::NotRequired => summary.compatible += 1,
                    UpgradeStatus::Indeterminate => summary.indeterminate += 1,
                },
            }
        }

        summary
    }

    /// Packages that could not be checked
    pub fn unchecked(&self) -> usize {
        self.not_found + self.fetch_failed
    }

    /// Returns true if every package was checked
    pub fn all_checked(&self) -> bool {
        self.unchecked() == 0
    }
}
