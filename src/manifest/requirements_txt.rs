//! requirements.txt parser
//!
//! Handles pip and pip-compile output:
//! - Pins: `requests==2.25.0`, `django>=4.2`, `attrs~=23.1`
//! - Extras: `uvicorn[standard]==0.23.2`
//! - Environment markers: `pywin32==306 ; sys_platform == "win32"`
//! - Line continuations and hash options: `requests==2.25.0 \` + `--hash=sha256:...`
//! - Annotations: `# via -r requirements.in`

use crate::domain::{PackageRequirement, VersionPin};
use crate::manifest::ManifestParser;
use crate::version::{Operator, PackageVersion};
use regex::Regex;
use std::sync::LazyLock;

/// Parser for requirements.txt files
pub struct RequirementsTxtParser;

// PEP 508 distribution name, optional extras, then the rest of the line
static REQUIREMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z0-9](?:[A-Za-z0-9._-]*[A-Za-z0-9])?)\s*(?:\[([^\]]*)\])?\s*(.*)$")
        .unwrap()
});
static PIN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(~=|===|==|!=|<=|>=|<|>)\s*(\S+)$").unwrap());
static INLINE_COMMENT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(^|\s)#.*$").unwrap());

/// Classification of a single manifest line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestLine {
    /// A package requirement
    Requirement(PackageRequirement),
    /// Blank line, comment or pip option
    Ignored,
    /// A line that looks like a requirement but cannot be used
    Invalid(String),
}

impl ManifestParser for RequirementsTxtParser {
    fn parse(&self, content: &str) -> Vec<PackageRequirement> {
        let mut requirements = Vec::new();

        for (index, line) in content.lines().enumerate() {
            match classify_line(line) {
                ManifestLine::Requirement(req) => requirements.push(req),
                ManifestLine::Ignored => {}
                ManifestLine::Invalid(reason) => {
                    log::warn!("skipping manifest line {}: {}", index + 1, reason);
                }
            }
        }

        requirements
    }
}

/// Parse a single line, returning the requirement it holds if any
pub fn parse_requirement_line(line: &str) -> Option<PackageRequirement> {
    match classify_line(line) {
        ManifestLine::Requirement(req) => Some(req),
        _ => None,
    }
}

/// Classify a single manifest line
pub fn classify_line(line: &str) -> ManifestLine {
    let line = line.trim();
    let line = line.strip_suffix('\\').unwrap_or(line).trim();

    if line.is_empty() || line.starts_with('#') || line.starts_with('-') {
        return ManifestLine::Ignored;
    }

    let without_comment = INLINE_COMMENT_RE.replace(line, "");
    let requirement = without_comment
        .split(';')
        .next()
        .unwrap_or_default()
        .trim();

    if requirement.is_empty() {
        return ManifestLine::Ignored;
    }

    if requirement.contains('@') || requirement.contains("://") {
        return ManifestLine::Invalid(format!("direct reference '{}' has no version", requirement));
    }

    let Some(caps) = REQUIREMENT_RE.captures(requirement) else {
        return ManifestLine::Invalid(format!("'{}' is not a requirement", requirement));
    };

    let name = caps[1].to_string();
    let extras: Vec<String> = caps
        .get(2)
        .map(|m| {
            m.as_str()
                .split(',')
                .map(str::trim)
                .filter(|e| !e.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();
    let specifier = caps.get(3).map(|m| m.as_str().trim()).unwrap_or("");

    if specifier.is_empty() {
        return ManifestLine::Requirement(
            PackageRequirement::unpinned(name).with_extras(extras),
        );
    }

    // The first clause of a specifier list is the pin
    let clause = specifier.split(',').next().unwrap_or_default().trim();
    let Some(pin_caps) = PIN_RE.captures(clause) else {
        return ManifestLine::Invalid(format!("unrecognized version pin '{}' for {}", clause, name));
    };

    let Some(operator) = Operator::from_symbol(&pin_caps[1]) else {
        return ManifestLine::Invalid(format!("unknown operator in '{}'", clause));
    };

    match PackageVersion::parse(&pin_caps[2]) {
        Ok(version) => ManifestLine::Requirement(
            PackageRequirement::new(name, Some(VersionPin::new(operator, version)))
                .with_extras(extras),
        ),
        Err(e) => ManifestLine::Invalid(format!("{} for {}", e, name)),
    }
}
