//! Compatibility evaluation
//!
//! This module provides:
//! - Evaluator configuration (target runtime, heuristic cutoff date)
//! - The evaluator that finds the minimum release compatible with the
//!   target runtime and decides whether the pin must be upgraded

mod config;

pub use config::EvaluatorConfig;

use crate::domain::{
    Confidence, EvaluationResult, PackageRequirement, ReleaseInfo, RuntimeSupport, UpgradeStatus,
};
use crate::version::{PackageVersion, PythonRuntime};

/// Decides the minimum compatible version of a package for one target runtime
#[derive(Debug, Clone, Default)]
pub struct CompatibilityEvaluator {
    config: EvaluatorConfig,
}

impl CompatibilityEvaluator {
    /// Create a new evaluator with the given configuration
    pub fn new(config: EvaluatorConfig) -> Self {
        Self { config }
    }

    /// The target runtime
    pub fn target(&self) -> &PythonRuntime {
        &self.config.target
    }

    /// Evaluate a requirement against the releases of its package
    pub fn evaluate(
        &self,
        requirement: &PackageRequirement,
        releases: &[ReleaseInfo],
    ) -> EvaluationResult {
        let candidates = candidate_releases(releases);
        let Some(latest) = candidates.last() else {
            return EvaluationResult::indeterminate(requirement.clone());
        };

        let (minimum_compatible, confidence) = match self.find_minimum(&candidates) {
            Some((release, confidence)) => (Some(release.version.clone()), confidence),
            None => (None, Confidence::Indeterminate),
        };

        let upgrade = upgrade_status(requirement.pinned_version(), minimum_compatible.as_ref());

        EvaluationResult {
            requirement: requirement.clone(),
            minimum_compatible,
            confidence,
            upgrade,
            latest: Some(latest.version.clone()),
            latest_released_at: Some(latest.released_at),
        }
    }

    /// First explicitly compatible release, else first release inferred
    /// compatible by date
    fn find_minimum<'a>(
        &self,
        candidates: &[&'a ReleaseInfo],
    ) -> Option<(&'a ReleaseInfo, Confidence)> {
        let target = &self.config.target;

        if let Some(release) = candidates
            .iter()
            .find(|r| r.supported_runtimes.explicitly_supports(target))
        {
            return Some((*release, Confidence::Explicit));
        }

        let cutoff = self.config.heuristic_cutoff()?;
        candidates
            .iter()
            .find(|r| {
                r.supported_runtimes == RuntimeSupport::Unknown && r.release_date() > cutoff
            })
            .map(|release| (*release, Confidence::Heuristic))
    }
}

/// Evaluate with the built-in release date of `target`
pub fn evaluate(
    requirement: &PackageRequirement,
    releases: &[ReleaseInfo],
    target: &PythonRuntime,
) -> EvaluationResult {
    CompatibilityEvaluator::new(EvaluatorConfig::new(target.clone())).evaluate(requirement, releases)
}

/// Releases sorted ascending; pre-releases only when nothing stable exists
fn candidate_releases(releases: &[ReleaseInfo]) -> Vec<&ReleaseInfo> {
    let has_stable = releases.iter().any(|r| !r.is_prerelease());
    let mut candidates: Vec<&ReleaseInfo> = releases
        .iter()
        .filter(|r| !has_stable || !r.is_prerelease())
        .collect();
    candidates.sort_by(|a, b| {
        a.version
            .cmp(&b.version)
            .then_with(|| a.version.as_str().cmp(b.version.as_str()))
            .then_with(|| a.released_at.cmp(&b.released_at))
    });
    candidates
}

fn upgrade_status(
    pinned: Option<&PackageVersion>,
    minimum: Option<&PackageVersion>,
) -> UpgradeStatus {
    match (pinned, minimum) {
        (None, _) => UpgradeStatus::Required,
        (Some(_), None) => UpgradeStatus::Indeterminate,
        (Some(pinned), Some(minimum)) if pinned < minimum => UpgradeStatus::Required,
        (Some(_), Some(_)) => UpgradeStatus::NotRequired,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::SpecifierSet;
    use chrono::{DateTime, NaiveDate, TimeZone, Utc};

    fn v(s: &str) -> PackageVersion {
        PackageVersion::parse(s).unwrap()
    }

    fn runtime(s: &str) -> PythonRuntime {
        PythonRuntime::parse(s).unwrap()
    }

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    fn unknown(version: &str, released_at: DateTime<Utc>) -> ReleaseInfo {
        ReleaseInfo::new(v(version), released_at)
    }

    fn requires(version: &str, released_at: DateTime<Utc>, spec: &str) -> ReleaseInfo {
        ReleaseInfo::new(v(version), released_at).with_support(RuntimeSupport::from_metadata(
            Some(SpecifierSet::parse(spec).unwrap()),
            Vec::new(),
        ))
    }

    fn classified(version: &str, released_at: DateTime<Utc>, runtimes: &[&str]) -> ReleaseInfo {
        ReleaseInfo::new(v(version), released_at).with_support(RuntimeSupport::from_metadata(
            None,
            runtimes.iter().map(|r| runtime(r)).collect(),
        ))
    }

    fn evaluator(target: &str) -> CompatibilityEvaluator {
        CompatibilityEvaluator::new(EvaluatorConfig::new(runtime(target)))
    }

    fn pinned(name: &str, version: &str) -> PackageRequirement {
        PackageRequirement::pinned(name, v(version))
    }

    #[test]
    fn test_requests_scenario() {
        // 2.25.0 declares nothing and predates 3.12; 2.31.0 declares support
        let releases = vec![
            unknown("2.25.0", at(2020, 11, 11)),
            requires("2.31.0", at(2023, 5, 22), ">=3.7"),
        ];
        let result = evaluator("3.12").evaluate(&pinned("requests", "2.25.0"), &releases);

        assert_eq!(result.minimum_compatible, Some(v("2.31.0")));
        assert_eq!(result.upgrade, UpgradeStatus::Required);
        assert!(result.needs_upgrade());
        assert_eq!(result.confidence, Confidence::Explicit);
        assert_eq!(result.latest, Some(v("2.31.0")));
        assert_eq!(result.latest_released_at, Some(at(2023, 5, 22)));
    }

    #[test]
    fn test_empty_releases_indeterminate() {
        let result = evaluator("3.12").evaluate(&pinned("foo", "1.0.0"), &[]);
        assert_eq!(result.minimum_compatible, None);
        assert_eq!(result.upgrade, UpgradeStatus::Indeterminate);
        assert_eq!(result.confidence, Confidence::Indeterminate);
        assert_eq!(result.latest, None);

        let unpinned = evaluator("3.12").evaluate(&PackageRequirement::unpinned("foo"), &[]);
        assert_eq!(unpinned.upgrade, UpgradeStatus::Indeterminate);
    }

    #[test]
    fn test_explicit_minimum_is_smallest() {
        // Input order must not matter
        let releases = vec![
            requires("3.0", at(2024, 1, 1), ">=3.8"),
            requires("1.0", at(2019, 1, 1), ">=2.7,<3.0"),
            requires("2.0", at(2022, 1, 1), ">=3.8"),
            requires("2.5", at(2023, 1, 1), ">=3.9"),
        ];
        let result = evaluator("3.12").evaluate(&pinned("pkg", "1.0"), &releases);
        assert_eq!(result.minimum_compatible, Some(v("2.0")));
        assert_eq!(result.confidence, Confidence::Explicit);
    }

    #[test]
    fn test_pin_at_minimum_not_required() {
        let releases = vec![
            requires("1.0", at(2019, 1, 1), ">=3.6"),
            requires("1.1", at(2020, 1, 1), ">=3.6"),
        ];
        let result = evaluator("3.12").evaluate(&pinned("pkg", "1.0.0"), &releases);
        assert_eq!(result.minimum_compatible, Some(v("1.0")));
        assert_eq!(result.upgrade, UpgradeStatus::NotRequired);

        let result = evaluator("3.12").evaluate(&pinned("pkg", "1.1"), &releases);
        assert_eq!(result.upgrade, UpgradeStatus::NotRequired);
    }

    #[test]
    fn test_unpinned_requires_upgrade_when_minimum_known() {
        let releases = vec![requires("1.0", at(2019, 1, 1), ">=3.6")];
        let result = evaluator("3.12").evaluate(&PackageRequirement::unpinned("pkg"), &releases);
        assert_eq!(result.upgrade, UpgradeStatus::Required);
    }

    #[test]
    fn test_unpinned_without_minimum_requires_upgrade() {
        let releases = vec![unknown("1.0", at(2019, 1, 1))];
        let result = evaluator("3.12").evaluate(&PackageRequirement::unpinned("pkg"), &releases);
        assert_eq!(result.minimum_compatible, None);
        assert_eq!(result.confidence, Confidence::Indeterminate);
        assert_eq!(result.upgrade, UpgradeStatus::Required);
        assert_eq!(result.latest, Some(v("1.0")));
    }

    #[test]
    fn test_version_order_is_not_lexical() {
        let releases = vec![
            requires("1.9", at(2020, 1, 1), "<3.0"),
            requires("1.10", at(2021, 1, 1), ">=3.8"),
        ];
        let result = evaluator("3.12").evaluate(&pinned("pkg", "1.9"), &releases);
        assert_eq!(result.minimum_compatible, Some(v("1.10")));
        assert_eq!(result.latest, Some(v("1.10")));
        assert_eq!(result.upgrade, UpgradeStatus::Required);
    }

    #[test]
    fn test_classifier_counts_as_explicit() {
        let releases = vec![
            classified("1.0", at(2022, 1, 1), &["3.10", "3.11"]),
            classified("2.0", at(2024, 1, 1), &["3.11", "3.12"]),
        ];
        let result = evaluator("3.12").evaluate(&pinned("pkg", "1.0"), &releases);
        assert_eq!(result.minimum_compatible, Some(v("2.0")));
        assert_eq!(result.confidence, Confidence::Explicit);
    }

    #[test]
    fn test_heuristic_first_release_after_runtime_date() {
        // 3.12 was released on 2023-10-02
        let releases = vec![
            unknown("1.0", at(2023, 1, 1)),
            unknown("1.1", at(2023, 10, 2)),
            unknown("1.2", at(2023, 10, 3)),
            unknown("1.3", at(2024, 2, 1)),
        ];
        let result = evaluator("3.12").evaluate(&pinned("pkg", "1.0"), &releases);
        assert_eq!(result.minimum_compatible, Some(v("1.2")));
        assert_eq!(result.confidence, Confidence::Heuristic);
        assert_eq!(result.upgrade, UpgradeStatus::Required);
    }

    #[test]
    fn test_heuristic_compares_utc_calendar_day() {
        let releases = vec![ReleaseInfo::new(
            v("1.0"),
            Utc.with_ymd_and_hms(2023, 10, 2, 23, 59, 59).unwrap(),
        )];
        let result = evaluator("3.12").evaluate(&pinned("pkg", "1.0"), &releases);
        assert_eq!(result.minimum_compatible, None);
        assert_eq!(result.confidence, Confidence::Indeterminate);
    }

    #[test]
    fn test_heuristic_ignores_releases_that_exclude_target() {
        let releases = vec![
            requires("1.0", at(2024, 1, 1), "<3.12"),
            unknown("1.1", at(2024, 3, 1)),
        ];
        let result = evaluator("3.12").evaluate(&pinned("pkg", "1.0"), &releases);
        assert_eq!(result.minimum_compatible, Some(v("1.1")));
        assert_eq!(result.confidence, Confidence::Heuristic);
    }

    #[test]
    fn test_explicit_wins_over_earlier_heuristic_candidate() {
        let releases = vec![
            unknown("1.0", at(2024, 1, 1)),
            requires("1.1", at(2024, 2, 1), ">=3.8"),
        ];
        let result = evaluator("3.12").evaluate(&pinned("pkg", "1.0"), &releases);
        assert_eq!(result.minimum_compatible, Some(v("1.1")));
        assert_eq!(result.confidence, Confidence::Explicit);
    }

    #[test]
    fn test_no_explicit_support_never_explicit() {
        let cases = vec![
            vec![unknown("1.0", at(2020, 1, 1))],
            vec![unknown("1.0", at(2020, 1, 1)), unknown("2.0", at(2025, 1, 1))],
            vec![requires("1.0", at(2020, 1, 1), "<3.0")],
            vec![classified("1.0", at(2024, 1, 1), &["3.11"])],
        ];
        for releases in cases {
            let result = evaluator("3.12").evaluate(&pinned("pkg", "1.0"), &releases);
            assert_ne!(result.confidence, Confidence::Explicit);
        }
    }

    #[test]
    fn test_unknown_runtime_disables_heuristic() {
        let releases = vec![unknown("1.0", at(2030, 1, 1))];
        let result = evaluator("4.0").evaluate(&pinned("pkg", "1.0"), &releases);
        assert_eq!(result.confidence, Confidence::Indeterminate);

        let config = EvaluatorConfig::new(runtime("4.0"))
            .with_runtime_release_date(NaiveDate::from_ymd_opt(2029, 10, 1).unwrap());
        let result = CompatibilityEvaluator::new(config).evaluate(&pinned("pkg", "1.0"), &releases);
        assert_eq!(result.minimum_compatible, Some(v("1.0")));
        assert_eq!(result.confidence, Confidence::Heuristic);
    }

    #[test]
    fn test_prereleases_discarded_when_stable_exists() {
        let releases = vec![
            requires("2.0rc1", at(2023, 9, 1), ">=3.8"),
            requires("1.0", at(2022, 1, 1), "<3.12"),
            requires("2.0", at(2023, 11, 1), ">=3.8"),
            requires("3.0a1", at(2024, 5, 1), ">=3.8"),
        ];
        let result = evaluator("3.12").evaluate(&pinned("pkg", "1.0"), &releases);
        assert_eq!(result.minimum_compatible, Some(v("2.0")));
        assert_eq!(result.latest, Some(v("2.0")));
    }

    #[test]
    fn test_prereleases_used_when_no_stable() {
        let releases = vec![
            requires("1.0b1", at(2023, 9, 1), ">=3.8"),
            requires("1.0rc1", at(2023, 11, 1), ">=3.8"),
        ];
        let result = evaluator("3.12").evaluate(&pinned("pkg", "1.0b1"), &releases);
        assert_eq!(result.minimum_compatible, Some(v("1.0b1")));
        assert_eq!(result.latest, Some(v("1.0rc1")));
        assert_eq!(result.upgrade, UpgradeStatus::NotRequired);
    }

    #[test]
    fn test_evaluate_is_deterministic() {
        let releases = vec![
            unknown("1.0", at(2020, 1, 1)),
            requires("1.0.0", at(2020, 1, 2), ">=3.6"),
            unknown("2.0", at(2024, 1, 1)),
            classified("1.5", at(2022, 1, 1), &["3.12"]),
        ];
        let mut reversed = releases.clone();
        reversed.reverse();

        let req = pinned("pkg", "1.0");
        let first = evaluator("3.12").evaluate(&req, &releases);
        for _ in 0..5 {
            assert_eq!(evaluator("3.12").evaluate(&req, &releases), first);
        }
        assert_eq!(evaluator("3.12").evaluate(&req, &reversed), first);
    }

    #[test]
    fn test_free_evaluate_matches_evaluator() {
        let releases = vec![requires("1.0", at(2020, 1, 1), ">=3.6")];
        let req = pinned("pkg", "0.9");
        assert_eq!(
            evaluate(&req, &releases, &runtime("3.12")),
            evaluator("3.12").evaluate(&req, &releases)
        );
    }
}
