//! PEP 440 package versions
//!
//! Handles version formats:
//! - Release segments: `1`, `1.2`, `1.2.3.4`
//! - Epoch: `1!2.0`
//! - Pre-releases: `1.0a1`, `1.0b2`, `1.0rc1` (and `alpha`, `beta`, `c`, `pre`, `preview`)
//! - Post-releases: `1.0.post1`, `1.0-1`, `1.0rev2`
//! - Development releases: `1.0.dev3`
//! - Local labels: `1.0+ubuntu.1`

use crate::error::VersionError;
use regex::Regex;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

static PEP440_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?ix)^
        v?
        (?:(?P<epoch>[0-9]+)!)?
        (?P<release>[0-9]+(?:\.[0-9]+)*)
        (?P<pre>[-_.]?(?P<pre_l>alpha|a|beta|b|preview|pre|c|rc)[-_.]?(?P<pre_n>[0-9]+)?)?
        (?P<post>(?:-(?P<post_n1>[0-9]+))|(?:[-_.]?(?P<post_l>post|rev|r)[-_.]?(?P<post_n2>[0-9]+)?))?
        (?P<dev>[-_.]?dev[-_.]?(?P<dev_n>[0-9]+)?)?
        (?:\+(?P<local>[a-z0-9]+(?:[-_.][a-z0-9]+)*))?
        $",
    )
    .unwrap()
});

/// Pre-release phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PreRelease {
    Alpha,
    Beta,
    ReleaseCandidate,
}

impl PreRelease {
    fn from_label(label: &str) -> Self {
        match label.to_ascii_lowercase().as_str() {
            "a" | "alpha" => PreRelease::Alpha,
            "b" | "beta" => PreRelease::Beta,
            _ => PreRelease::ReleaseCandidate,
        }
    }
}

// Sort keys follow the PEP 440 ordering: a dev-only release sorts before any
// pre-release of the same version, which sorts before the final release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum PreKey {
    DevOnly,
    Pre(PreRelease, u64),
    Final,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum DevKey {
    Dev(u64),
    None,
}

/// A parsed PEP 440 version
///
/// Equality and ordering follow PEP 440, so `1.0` equals `1.0.0` and
/// `1.10` sorts after `1.9`. The original spelling is kept for display.
#[derive(Debug, Clone)]
pub struct PackageVersion {
    raw: String,
    epoch: u64,
    release: Vec<u64>,
    pre: Option<(PreRelease, u64)>,
    post: Option<u64>,
    dev: Option<u64>,
    local: Option<String>,
}

impl PackageVersion {
    /// Parse a version string
    pub fn parse(value: &str) -> Result<Self, VersionError> {
        let trimmed = value.trim();
        let caps = PEP440_RE
            .captures(trimmed)
            .ok_or_else(|| VersionError::invalid_version(value))?;

        let number = |s: &str| -> Result<u64, VersionError> {
            s.parse().map_err(|_| VersionError::invalid_version(value))
        };

        let epoch = match caps.name("epoch") {
            Some(m) => number(m.as_str())?,
            None => 0,
        };

        let release = caps["release"]
            .split('.')
            .map(number)
            .collect::<Result<Vec<_>, _>>()?;

        let pre = match caps.name("pre_l") {
            Some(label) => {
                let n = match caps.name("pre_n") {
                    Some(m) => number(m.as_str())?,
                    None => 0,
                };
                Some((PreRelease::from_label(label.as_str()), n))
            }
            None => None,
        };

        let post = if caps.name("post").is_some() {
            match caps.name("post_n1").or_else(|| caps.name("post_n2")) {
                Some(m) => Some(number(m.as_str())?),
                None => Some(0),
            }
        } else {
            None
        };

        let dev = if caps.name("dev").is_some() {
            match caps.name("dev_n") {
                Some(m) => Some(number(m.as_str())?),
                None => Some(0),
            }
        } else {
            None
        };

        let local = caps.name("local").map(|m| m.as_str().to_ascii_lowercase());

        Ok(Self {
            raw: trimmed.to_string(),
            epoch,
            release,
            pre,
            post,
            dev,
            local,
        })
    }

    /// The version string as it was written
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Release segments (e.g. `[1, 2, 3]` for `1.2.3`)
    pub fn release(&self) -> &[u64] {
        &self.release
    }

    /// Epoch (`0` unless written as `N!`)
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Returns true for pre-releases and development releases
    pub fn is_prerelease(&self) -> bool {
        self.pre.is_some() || self.dev.is_some()
    }

    /// Returns true for post-releases
    pub fn is_postrelease(&self) -> bool {
        self.post.is_some()
    }

    /// Returns true if this version has a local label
    pub fn has_local(&self) -> bool {
        self.local.is_some()
    }

    /// Same epoch and release segments, ignoring pre/post/dev/local parts
    pub fn same_release(&self, other: &Self) -> bool {
        self.epoch == other.epoch && compare_release(&self.release, &other.release).is_eq()
    }

    /// Copy of this version without its local label
    pub fn without_local(&self) -> Self {
        let mut public = self.clone();
        if let Some((public_raw, _)) = self.raw.split_once('+') {
            public.raw = public_raw.to_string();
        }
        public.local = None;
        public
    }

    fn pre_key(&self) -> PreKey {
        match (self.pre, self.post, self.dev) {
            (None, None, Some(_)) => PreKey::DevOnly,
            (Some((phase, n)), _, _) => PreKey::Pre(phase, n),
            _ => PreKey::Final,
        }
    }

    fn dev_key(&self) -> DevKey {
        match self.dev {
            Some(n) => DevKey::Dev(n),
            None => DevKey::None,
        }
    }
}

/// One segment of a local label; numeric segments sort above alphanumeric ones
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum LocalSegment<'a> {
    Alpha(&'a str),
    /// Digit count without leading zeros, then the digits
    Numeric(usize, &'a str),
}

fn local_segments(label: &str) -> Vec<LocalSegment<'_>> {
    label
        .split(['.', '-', '_'])
        .map(|part| {
            if part.bytes().all(|b| b.is_ascii_digit()) {
                let digits = part.trim_start_matches('0');
                LocalSegment::Numeric(digits.len(), digits)
            } else {
                LocalSegment::Alpha(part)
            }
        })
        .collect()
}

/// Compare local labels segment by segment; no label sorts first
fn compare_local(a: Option<&str>, b: Option<&str>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => local_segments(a).cmp(&local_segments(b)),
        _ => a.is_some().cmp(&b.is_some()),
    }
}

/// Compare release segments with implicit zero padding
pub(crate) fn compare_release(a: &[u64], b: &[u64]) -> Ordering {
    let len = a.len().max(b.len());
    for i in 0..len {
        let pa = a.get(i).copied().unwrap_or(0);
        let pb = b.get(i).copied().unwrap_or(0);
        match pa.cmp(&pb) {
            Ordering::Equal => continue,
            other => return other,
        }
    }
    Ordering::Equal
}

impl Ord for PackageVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.epoch
            .cmp(&other.epoch)
            .then_with(|| compare_release(&self.release, &other.release))
            .then_with(|| self.pre_key().cmp(&other.pre_key()))
            .then_with(|| self.post.cmp(&other.post))
            .then_with(|| self.dev_key().cmp(&other.dev_key()))
            .then_with(|| compare_local(self.local.as_deref(), other.local.as_deref()))
    }
}

impl PartialOrd for PackageVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for PackageVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for PackageVersion {}

impl FromStr for PackageVersion {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for PackageVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}
