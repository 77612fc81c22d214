//! Release metadata fetched from the package index

use crate::version::{PackageVersion, PythonRuntime, SpecifierSet};
use chrono::{DateTime, NaiveDate, Utc};

/// Runtime support declared by a release
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConstraint {
    /// `requires_python` specifier, if declared
    pub requires_python: Option<SpecifierSet>,
    /// Runtimes named by `Programming Language :: Python :: X.Y` classifiers
    pub classifiers: Vec<PythonRuntime>,
}

impl RuntimeConstraint {
    /// Returns true if the declaration includes `target`
    ///
    /// A `requires_python` that excludes the target wins over classifiers.
    pub fn includes(&self, target: &PythonRuntime) -> bool {
        if let Some(spec) = &self.requires_python {
            if !spec.contains(target.as_version()) {
                return false;
            }
        }
        if self.classifiers.iter().any(|c| c.same_feature_release(target)) {
            return true;
        }
        self.requires_python.is_some()
    }
}

/// Tagged runtime declaration: absence of data is `Unknown`, never "unsupported"
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeSupport {
    /// The release declares which runtimes it supports
    Known(RuntimeConstraint),
    /// The release carries no runtime declaration
    Unknown,
}

impl RuntimeSupport {
    /// Build from the raw metadata fields, `Unknown` if both are empty
    pub fn from_metadata(
        requires_python: Option<SpecifierSet>,
        classifiers: Vec<PythonRuntime>,
    ) -> Self {
        let requires_python = requires_python.filter(|s| !s.is_empty());
        if requires_python.is_none() && classifiers.is_empty() {
            RuntimeSupport::Unknown
        } else {
            RuntimeSupport::Known(RuntimeConstraint {
                requires_python,
                classifiers,
            })
        }
    }

    /// Returns true only for a known declaration that includes `target`
    pub fn explicitly_supports(&self, target: &PythonRuntime) -> bool {
        match self {
            RuntimeSupport::Known(constraint) => constraint.includes(target),
            RuntimeSupport::Unknown => false,
        }
    }

    /// Returns true if the release declares anything
    pub fn is_known(&self) -> bool {
        matches!(self, RuntimeSupport::Known(_))
    }
}

/// One published release of a package
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseInfo {
    /// Release version
    pub version: PackageVersion,
    /// When this version was first uploaded
    pub released_at: DateTime<Utc>,
    /// Declared runtime support
    pub supported_runtimes: RuntimeSupport,
}

impl ReleaseInfo {
    /// Creates a release with no runtime declaration
    pub fn new(version: PackageVersion, released_at: DateTime<Utc>) -> Self {
        Self {
            version,
            released_at,
            supported_runtimes: RuntimeSupport::Unknown,
        }
    }

    /// Sets the runtime declaration (builder pattern)
    pub fn with_support(mut self, support: RuntimeSupport) -> Self {
        self.supported_runtimes = support;
        self
    }

    /// Calendar day of the release (UTC)
    pub fn release_date(&self) -> NaiveDate {
        self.released_at.date_naive()
    }

    /// Returns true for pre-release and dev versions
    pub fn is_prerelease(&self) -> bool {
        self.version.is_prerelease()
    }
}
