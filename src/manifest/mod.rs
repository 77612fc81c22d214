//! Manifest reading
//!
//! This module provides functionality to:
//! - Read a requirements manifest from disk
//! - Parse it into an ordered list of package requirements

mod requirements_txt;

pub use requirements_txt::{classify_line, parse_requirement_line, ManifestLine, RequirementsTxtParser};

use crate::domain::PackageRequirement;
use crate::error::ManifestError;
use std::path::Path;

/// Trait for parsing manifest files
pub trait ManifestParser {
    /// Parse requirements from manifest content, in file order
    fn parse(&self, content: &str) -> Vec<PackageRequirement>;
}

/// Parse requirements from manifest content
pub fn parse_manifest(content: &str) -> Vec<PackageRequirement> {
    RequirementsTxtParser.parse(content)
}

/// Read and parse a manifest file
///
/// Fails when the file cannot be read or contains no valid requirement.
pub fn read_manifest(path: &Path) -> Result<Vec<PackageRequirement>, ManifestError> {
    let content = std::fs::read_to_string(path).map_err(|e| ManifestError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;

    let requirements = parse_manifest(&content);
    if requirements.is_empty() {
        return Err(ManifestError::no_requirements(path));
    }

    log::debug!(
        "read {} requirement(s) from {}",
        requirements.len(),
        path.display()
    );
    Ok(requirements)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_read_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("requirements.txt");
        fs::write(&path, "requests==2.25.0\n# comment\nflask\n").unwrap();

        let reqs = read_manifest(&path).unwrap();
        assert_eq!(reqs.len(), 2);
        assert_eq!(reqs[0].name, "requests");
        assert_eq!(reqs[1].name, "flask");
    }

    #[test]
    fn test_read_manifest_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_manifest(&dir.path().join("missing.txt")).unwrap_err();
        assert!(matches!(err, ManifestError::ReadError { .. }));
    }

    #[test]
    fn test_read_manifest_without_requirements() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("requirements.txt");
        fs::write(&path, "# only comments\n\n--hash=sha256:abc\n").unwrap();

        let err = read_manifest(&path).unwrap_err();
        assert!(matches!(err, ManifestError::NoRequirements { .. }));
    }
}
