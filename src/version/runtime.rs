//! Python runtime versions and their release dates

use crate::error::VersionError;
use crate::version::PackageVersion;
use chrono::NaiveDate;
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

static RUNTIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\.(\d+)(?:\.(\d+))?$").unwrap());

static CLASSIFIER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^Programming Language\s*::\s*Python\s*::\s*(\d+\.\d+)\s*$").unwrap()
});

/// CPython feature releases (`X.Y.0`) and their release dates
const CPYTHON_RELEASES: &[(u64, u64, (i32, u32, u32))] = &[
    (2, 7, (2010, 7, 3)),
    (3, 0, (2008, 12, 3)),
    (3, 1, (2009, 6, 27)),
    (3, 2, (2011, 2, 20)),
    (3, 3, (2012, 9, 29)),
    (3, 4, (2014, 3, 16)),
    (3, 5, (2015, 9, 13)),
    (3, 6, (2016, 12, 23)),
    (3, 7, (2018, 6, 27)),
    (3, 8, (2019, 10, 14)),
    (3, 9, (2020, 10, 5)),
    (3, 10, (2021, 10, 4)),
    (3, 11, (2022, 10, 24)),
    (3, 12, (2023, 10, 2)),
    (3, 13, (2024, 10, 7)),
    (3, 14, (2025, 10, 7)),
];

/// Default target runtime
pub const DEFAULT_TARGET_RUNTIME: &str = "3.12";

/// A target Python runtime such as `3.12` or `3.12.1`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PythonRuntime {
    major: u64,
    minor: u64,
    patch: Option<u64>,
    version: PackageVersion,
}

impl PythonRuntime {
    /// Parse a runtime version of the form `X.Y` or `X.Y.Z`
    pub fn parse(value: &str) -> Result<Self, VersionError> {
        let trimmed = value.trim();
        let invalid = || VersionError::InvalidRuntime {
            value: value.to_string(),
        };
        let caps = RUNTIME_RE.captures(trimmed).ok_or_else(invalid)?;

        let major = caps[1].parse().map_err(|_| invalid())?;
        let minor = caps[2].parse().map_err(|_| invalid())?;
        let patch = match caps.get(3) {
            Some(m) => Some(m.as_str().parse().map_err(|_| invalid())?),
            None => None,
        };
        let version = PackageVersion::parse(trimmed).map_err(|_| invalid())?;

        Ok(Self {
            major,
            minor,
            patch,
            version,
        })
    }

    /// Parse the runtime named by a trove classifier, e.g.
    /// `Programming Language :: Python :: 3.12`. Major-only classifiers
    /// (`Python :: 3`) do not name a runtime and yield `None`.
    pub fn from_classifier(classifier: &str) -> Option<Self> {
        let caps = CLASSIFIER_RE.captures(classifier.trim())?;
        Self::parse(&caps[1]).ok()
    }

    /// The runtime as a PEP 440 version, for specifier matching
    pub fn as_version(&self) -> &PackageVersion {
        &self.version
    }

    /// `(major, minor)` of the feature release
    pub fn feature_release(&self) -> (u64, u64) {
        (self.major, self.minor)
    }

    /// Returns true if both runtimes belong to the same feature release
    pub fn same_feature_release(&self, other: &Self) -> bool {
        self.feature_release() == other.feature_release()
    }

    /// Release date of this feature release, if known
    pub fn release_date(&self) -> Option<NaiveDate> {
        CPYTHON_RELEASES
            .iter()
            .find(|(major, minor, _)| *major == self.major && *minor == self.minor)
            .and_then(|(_, _, (y, m, d))| NaiveDate::from_ymd_opt(*y, *m, *d))
    }
}

impl Default for PythonRuntime {
    fn default() -> Self {
        Self::parse(DEFAULT_TARGET_RUNTIME).expect("default runtime is a valid version")
    }
}

impl FromStr for PythonRuntime {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for PythonRuntime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.patch {
            Some(patch) => write!(f, "{}.{}.{}", self.major, self.minor, patch),
            None => write!(f, "{}.{}", self.major, self.minor),
        }
    }
}
