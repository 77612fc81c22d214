//! Package requirement read from the manifest

use crate::version::{Operator, PackageVersion};
use std::fmt;

/// Version pin attached to a requirement (e.g. `==2.25.0`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionPin {
    /// Operator written before the version
    pub operator: Operator,
    /// Pinned version
    pub version: PackageVersion,
}

impl VersionPin {
    /// Creates a new pin
    pub fn new(operator: Operator, version: PackageVersion) -> Self {
        Self { operator, version }
    }

    /// Creates an exact (`==`) pin
    pub fn exact(version: PackageVersion) -> Self {
        Self::new(Operator::Equal, version)
    }

    /// Returns true for `==` and `===` pins
    pub fn is_exact(&self) -> bool {
        matches!(self.operator, Operator::Equal | Operator::Arbitrary)
    }
}

impl fmt::Display for VersionPin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.operator.symbol(), self.version)
    }
}

/// A package listed in the manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageRequirement {
    /// Package name as written in the manifest
    pub name: String,
    /// Extras requested with the package (`name[extra]`)
    pub extras: Vec<String>,
    /// Pinned version, `None` when the line names the package only
    pub pin: Option<VersionPin>,
}

impl PackageRequirement {
    /// Creates a new requirement
    pub fn new(name: impl Into<String>, pin: Option<VersionPin>) -> Self {
        Self {
            name: name.into(),
            extras: Vec::new(),
            pin,
        }
    }

    /// Creates a requirement pinned with `==`
    pub fn pinned(name: impl Into<String>, version: PackageVersion) -> Self {
        Self::new(name, Some(VersionPin::exact(version)))
    }

    /// Creates a requirement without a version
    pub fn unpinned(name: impl Into<String>) -> Self {
        Self::new(name, None)
    }

    /// Sets the extras (builder pattern)
    pub fn with_extras(mut self, extras: Vec<String>) -> Self {
        self.extras = extras;
        self
    }

    /// The pinned version, if any
    pub fn pinned_version(&self) -> Option<&PackageVersion> {
        self.pin.as_ref().map(|p| &p.version)
    }

    /// PEP 503 normalized name used for index lookups
    pub fn normalized_name(&self) -> String {
        normalize_name(&self.name)
    }
}

impl fmt::Display for PackageRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.extras.is_empty() {
            write!(f, "[{}]", self.extras.join(","))?;
        }
        if let Some(pin) = &self.pin {
            write!(f, "{}", pin)?;
        }
        Ok(())
    }
}

/// Normalize a distribution name: lowercase, runs of `-`, `_`, `.` become `-`
pub fn normalize_name(name: &str) -> String {
    let mut normalized = String::with_capacity(name.len());
    let mut in_separator = false;
    for c in name.trim().chars() {
        if matches!(c, '-' | '_' | '.') {
            if !in_separator {
                normalized.push('-');
            }
            in_separator = true;
        } else {
            normalized.push(c.to_ascii_lowercase());
            in_separator = false;
        }
    }
    normalized
}
