//! PEP 440 version specifiers (`requires_python` style constraints)
//!
//! Handles specifier clauses:
//! - Comparison: `>=3.8`, `>3.7`, `<=3.12`, `<4`
//! - Exclusion: `!=3.0.*`, `!=3.1`
//! - Exact and prefix match: `==3.12`, `==3.*`
//! - Compatible release: `~=3.8`
//! - Arbitrary equality: `===3.12`
//! - Comma-separated sets: `>=2.7, !=3.0.*, !=3.1.*, <4`

use crate::error::VersionError;
use crate::version::pep440::{compare_release, PackageVersion};
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

static CLAUSE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(~=|===|==|!=|<=|>=|<|>)\s*(\S+)$").unwrap());

/// Specifier comparison operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Compatible,
    Equal,
    NotEqual,
    LessEqual,
    GreaterEqual,
    Less,
    Greater,
    Arbitrary,
}

impl Operator {
    /// Look up an operator by its symbol
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "~=" => Some(Operator::Compatible),
            "==" => Some(Operator::Equal),
            "!=" => Some(Operator::NotEqual),
            "<=" => Some(Operator::LessEqual),
            ">=" => Some(Operator::GreaterEqual),
            "<" => Some(Operator::Less),
            ">" => Some(Operator::Greater),
            "===" => Some(Operator::Arbitrary),
            _ => None,
        }
    }

    /// The operator as written in a specifier
    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Compatible => "~=",
            Operator::Equal => "==",
            Operator::NotEqual => "!=",
            Operator::LessEqual => "<=",
            Operator::GreaterEqual => ">=",
            Operator::Less => "<",
            Operator::Greater => ">",
            Operator::Arbitrary => "===",
        }
    }
}

/// A single specifier clause such as `>=3.8`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Specifier {
    operator: Operator,
    raw_version: String,
    version: Option<PackageVersion>,
    wildcard: bool,
}

impl Specifier {
    /// Parse one clause
    pub fn parse(clause: &str) -> Result<Self, VersionError> {
        let trimmed = clause.trim();
        let caps = CLAUSE_RE
            .captures(trimmed)
            .ok_or_else(|| VersionError::invalid_specifier(clause, "unrecognized clause"))?;

        let operator = Operator::from_symbol(&caps[1])
            .ok_or_else(|| VersionError::invalid_specifier(clause, "unknown operator"))?;
        let raw_version = caps[2].to_string();

        if operator == Operator::Arbitrary {
            return Ok(Self {
                operator,
                raw_version,
                version: None,
                wildcard: false,
            });
        }

        let (version_str, wildcard) = match raw_version.strip_suffix(".*") {
            Some(prefix) => (prefix, true),
            None => (raw_version.as_str(), false),
        };

        // Legacy metadata such as `>=3.6.*` is accepted as `>=3.6`.
        let wildcard =
            wildcard && matches!(operator, Operator::Equal | Operator::NotEqual);

        let version = PackageVersion::parse(version_str)
            .map_err(|_| VersionError::invalid_specifier(clause, "invalid version"))?;

        if operator == Operator::Compatible && version.release().len() < 2 {
            return Err(VersionError::invalid_specifier(
                clause,
                "compatible release needs at least two segments",
            ));
        }

        Ok(Self {
            operator,
            raw_version,
            version: Some(version),
            wildcard,
        })
    }

    /// The clause operator
    pub fn operator(&self) -> Operator {
        self.operator
    }

    /// Returns true if `candidate` satisfies this clause
    pub fn contains(&self, candidate: &PackageVersion) -> bool {
        let Some(spec) = &self.version else {
            return candidate.as_str().eq_ignore_ascii_case(&self.raw_version);
        };
        let candidate = candidate.without_local();

        match self.operator {
            Operator::Equal if self.wildcard => prefix_match(spec, &candidate),
            Operator::NotEqual if self.wildcard => !prefix_match(spec, &candidate),
            Operator::Equal => candidate == *spec,
            Operator::NotEqual => candidate != *spec,
            Operator::LessEqual => candidate <= *spec,
            Operator::GreaterEqual => candidate >= *spec,
            Operator::Less => {
                candidate < *spec
                    && !(candidate.is_prerelease()
                        && !spec.is_prerelease()
                        && candidate.same_release(spec))
            }
            Operator::Greater => {
                candidate > *spec
                    && !(candidate.is_postrelease()
                        && !spec.is_postrelease()
                        && candidate.same_release(spec))
            }
            Operator::Compatible => {
                let release = spec.release();
                candidate >= *spec
                    && candidate.epoch() == spec.epoch()
                    && segments_match(&release[..release.len() - 1], candidate.release())
            }
            Operator::Arbitrary => false,
        }
    }
}

fn prefix_match(spec: &PackageVersion, candidate: &PackageVersion) -> bool {
    candidate.epoch() == spec.epoch() && segments_match(spec.release(), candidate.release())
}

fn segments_match(prefix: &[u64], release: &[u64]) -> bool {
    let padded: Vec<u64> = (0..prefix.len())
        .map(|i| release.get(i).copied().unwrap_or(0))
        .collect();
    compare_release(prefix, &padded).is_eq()
}

impl fmt::Display for Specifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.operator.symbol(), self.raw_version)
    }
}

/// A comma-separated set of specifier clauses, all of which must hold
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpecifierSet {
    specifiers: Vec<Specifier>,
}

impl SpecifierSet {
    /// Parse a specifier set; empty clauses are ignored
    pub fn parse(value: &str) -> Result<Self, VersionError> {
        let specifiers = value
            .split(',')
            .map(str::trim)
            .filter(|clause| !clause.is_empty())
            .map(Specifier::parse)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { specifiers })
    }

    /// Returns true if every clause accepts `candidate`
    pub fn contains(&self, candidate: &PackageVersion) -> bool {
        self.specifiers.iter().all(|s| s.contains(candidate))
    }

    /// Returns true if the set has no clauses
    pub fn is_empty(&self) -> bool {
        self.specifiers.is_empty()
    }

    /// Iterate over the clauses
    pub fn iter(&self) -> impl Iterator<Item = &Specifier> {
        self.specifiers.iter()
    }
}

impl FromStr for SpecifierSet {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for SpecifierSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let clauses: Vec<String> = self.specifiers.iter().map(|s| s.to_string()).collect();
        write!(f, "{}", clauses.join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> PackageVersion {
        PackageVersion::parse(s).unwrap()
    }

    fn set(s: &str) -> SpecifierSet {
        SpecifierSet::parse(s).unwrap()
    }

    #[test]
    fn test_greater_or_equal() {
        assert!(set(">=3.7").contains(&v("3.12")));
        assert!(set(">=3.12").contains(&v("3.12")));
        assert!(!set(">=3.13").contains(&v("3.12")));
    }

    #[test]
    fn test_upper_bound() {
        assert!(!set(">=3.6,<3.12").contains(&v("3.12")));
        assert!(set(">=3.6,<3.13").contains(&v("3.12")));
        assert!(set("<4").contains(&v("3.12")));
    }

    #[test]
    fn test_less_than_excludes_prereleases_of_bound() {
        assert!(!set("<3.12").contains(&v("3.12.0rc1")));
        assert!(set("<3.12rc2").contains(&v("3.12rc1")));
    }

    #[test]
    fn test_greater_than_excludes_postreleases_of_bound() {
        assert!(!set(">3.12").contains(&v("3.12.post1")));
        assert!(set(">3.12").contains(&v("3.12.1")));
    }

    #[test]
    fn test_wildcard_exclusions() {
        let s = set(">=2.7, !=3.0.*, !=3.1.*, !=3.2.*, <4");
        assert!(s.contains(&v("3.12")));
        assert!(s.contains(&v("2.7")));
        assert!(!s.contains(&v("3.1")));
        assert!(!s.contains(&v("3.1.4")));
    }

    #[test]
    fn test_equal_wildcard() {
        assert!(set("==3.*").contains(&v("3.12")));
        assert!(!set("==2.*").contains(&v("3.12")));
        assert!(set("==3.12.*").contains(&v("3.12")));
    }

    #[test]
    fn test_equal_with_padding() {
        assert!(set("==3.12").contains(&v("3.12.0")));
        assert!(!set("==3.12.1").contains(&v("3.12")));
    }

    #[test]
    fn test_compatible_release() {
        assert!(set("~=3.8").contains(&v("3.12")));
        assert!(!set("~=3.8").contains(&v("4.0")));
        assert!(!set("~=3.8.1").contains(&v("3.12")));
        assert!(SpecifierSet::parse("~=3").is_err());
    }

    #[test]
    fn test_arbitrary_equality() {
        assert!(set("===3.12").contains(&v("3.12")));
        assert!(!set("===3.12").contains(&v("3.12.0")));
    }

    #[test]
    fn test_legacy_wildcard_on_ordering_operator() {
        assert!(set(">=3.6.*").contains(&v("3.12")));
    }

    #[test]
    fn test_empty_set_matches_everything() {
        let s = set("");
        assert!(s.is_empty());
        assert!(s.contains(&v("3.12")));
    }

    #[test]
    fn test_invalid_specifiers() {
        assert!(SpecifierSet::parse("3.8").is_err());
        assert!(SpecifierSet::parse(">=three").is_err());
        assert!(SpecifierSet::parse("=>3.8").is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(set(">=3.8, <4").to_string(), ">=3.8,<4");
    }
}
