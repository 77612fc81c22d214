//! Core domain models for pycompat
//!
//! This module contains the fundamental types used throughout the application:
//! - Package requirements read from the manifest
//! - Release metadata with tagged runtime support
//! - Evaluation results and per-package outcomes
//! - Run summary

mod evaluation;
mod release;
mod requirement;
mod summary;

pub use evaluation::{CheckStatus, Confidence, EvaluationResult, PackageOutcome, UpgradeStatus};
pub use release::{ReleaseInfo, RuntimeConstraint, RuntimeSupport};
pub use requirement::{normalize_name, PackageRequirement, VersionPin};
pub use summary::CheckSummary;
