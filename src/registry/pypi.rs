//! PyPI JSON API adapter
//!
//! Fetches release metadata from PyPI.
//! API endpoint: https://pypi.org/pypi/{package}/json

use crate::domain::{normalize_name, ReleaseInfo, RuntimeSupport};
use crate::error::FetchError;
use crate::registry::{HttpClient, RegistryClient};
use crate::version::{PackageVersion, PythonRuntime, SpecifierSet};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

/// PyPI API base URL
pub const PYPI_API_URL: &str = "https://pypi.org/pypi";

/// PyPI adapter
pub struct PyPIAdapter {
    client: HttpClient,
    index_url: String,
}

/// PyPI package metadata response
#[derive(Debug, Default, Deserialize)]
struct PyPIResponse {
    /// Metadata of the latest release
    #[serde(default)]
    info: Option<PackageInfo>,
    /// Release files keyed by version; files are kept raw so one bad entry
    /// does not reject the whole response
    #[serde(default)]
    releases: HashMap<String, Vec<Value>>,
}

/// Package-level metadata
#[derive(Debug, Default, Deserialize)]
struct PackageInfo {
    /// Version the metadata describes
    version: Option<String>,
    /// Trove classifiers of that version
    #[serde(default)]
    classifiers: Vec<String>,
    /// `requires_python` of that version
    requires_python: Option<String>,
}

/// Release file information
#[derive(Debug, Deserialize)]
struct ReleaseFile {
    /// Upload time with timezone
    upload_time_iso_8601: Option<String>,
    /// Upload time without timezone (UTC)
    upload_time: Option<String>,
    /// Declared supported Python versions
    requires_python: Option<String>,
    #[serde(default)]
    yanked: bool,
}

impl ReleaseFile {
    fn uploaded_at(&self) -> Option<DateTime<Utc>> {
        if let Some(time) = self
            .upload_time_iso_8601
            .as_deref()
            .and_then(|s| s.parse::<DateTime<Utc>>().ok())
        {
            return Some(time);
        }
        self.upload_time
            .as_deref()
            .and_then(|s| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").ok())
            .map(|naive| naive.and_utc())
    }
}

impl PyPIAdapter {
    /// Create a new PyPI adapter
    pub fn new(client: HttpClient) -> Self {
        Self {
            client,
            index_url: PYPI_API_URL.to_string(),
        }
    }

    /// Use a different JSON API base URL
    pub fn with_index_url(mut self, index_url: impl Into<String>) -> Self {
        self.index_url = index_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Build the URL for a package
    fn build_url(&self, package: &str) -> String {
        format!("{}/{}/json", self.index_url, normalize_name(package))
    }
}

#[async_trait]
impl RegistryClient for PyPIAdapter {
    fn registry_name(&self) -> &'static str {
        "PyPI"
    }

    async fn fetch_releases(&self, package: &str) -> Result<Vec<ReleaseInfo>, FetchError> {
        let url = self.build_url(package);
        let response: Option<PyPIResponse> = self
            .client
            .get_json(&url, package, self.registry_name())
            .await?;

        match response {
            Some(response) => Ok(parse_releases(package, response)),
            None => {
                log::debug!("{} not found on {}", package, self.registry_name());
                Ok(Vec::new())
            }
        }
    }
}

/// Convert a PyPI response into releases sorted ascending by version
fn parse_releases(package: &str, response: PyPIResponse) -> Vec<ReleaseInfo> {
    let info = response.info.unwrap_or_default();
    let info_version = info
        .version
        .as_deref()
        .and_then(|v| PackageVersion::parse(v).ok());
    let classifiers: Vec<PythonRuntime> = info
        .classifiers
        .iter()
        .filter_map(|c| PythonRuntime::from_classifier(c))
        .collect();

    let mut releases = Vec::new();

    for (raw_version, raw_files) in response.releases {
        let version = match PackageVersion::parse(&raw_version) {
            Ok(version) => version,
            Err(e) => {
                log::debug!("{}: skipping release: {}", package, e);
                continue;
            }
        };

        let files: Vec<ReleaseFile> = raw_files
            .into_iter()
            .filter_map(|file| serde_json::from_value::<ReleaseFile>(file).ok())
            .filter(|file| !file.yanked)
            .collect();

        let Some(released_at) = files.iter().filter_map(ReleaseFile::uploaded_at).min() else {
            log::debug!(
                "{}: skipping release {}: no available files",
                package,
                raw_version
            );
            continue;
        };

        let is_info_release = info_version.as_ref() == Some(&version);

        let requires_python = files
            .iter()
            .filter_map(|file| file.requires_python.as_deref())
            .map(str::trim)
            .find(|s| !s.is_empty())
            .or_else(|| {
                is_info_release
                    .then_some(info.requires_python.as_deref())
                    .flatten()
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
            });

        let requires_python = match requires_python.map(SpecifierSet::parse).transpose() {
            Ok(spec) => spec,
            Err(e) => {
                log::debug!("{}: skipping release {}: {}", package, raw_version, e);
                continue;
            }
        };

        let release_classifiers = if is_info_release {
            classifiers.clone()
        } else {
            Vec::new()
        };

        releases.push(
            ReleaseInfo::new(version, released_at)
                .with_support(RuntimeSupport::from_metadata(requires_python, release_classifiers)),
        );
    }

    releases.sort_by(|a, b| {
        a.version
            .cmp(&b.version)
            .then_with(|| a.version.as_str().cmp(b.version.as_str()))
    });
    releases
}
