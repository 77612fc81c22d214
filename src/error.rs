//! Application error types using thiserror
//!
//! Error hierarchy:
//! - ManifestError: the requirements file cannot be read or holds nothing usable (fatal)
//! - FetchError: a single package could not be fetched from the index (non-fatal)
//! - FormatError: the report cannot be written (fatal)
//! - ConfigError: invalid command-line configuration (fatal)
//! - VersionError: a version, specifier or runtime string is not valid

use std::path::PathBuf;
use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Manifest file related errors
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// Report output related errors
    #[error(transparent)]
    Format(#[from] FormatError),

    /// Configuration related errors
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl AppError {
    /// Process exit code for a fatal error
    pub fn exit_code(&self) -> u8 {
        1
    }
}

/// Errors related to reading the requirements manifest
#[derive(Error, Debug)]
pub enum ManifestError {
    /// Failed to read manifest file
    #[error("failed to read manifest file {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The manifest has no usable requirement line
    #[error("no valid requirement lines found in {path}")]
    NoRequirements { path: PathBuf },
}

/// Errors related to fetching release metadata for one package
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Network request failed
    #[error("failed to fetch package '{package}' from {registry}: {message}")]
    Network {
        package: String,
        registry: String,
        message: String,
    },

    /// Timeout
    #[error("timeout while fetching '{package}' from {registry}")]
    Timeout { package: String, registry: String },

    /// Non-success HTTP status that is not retried
    #[error("{registry} returned HTTP {status} for '{package}'")]
    Http {
        package: String,
        registry: String,
        status: u16,
    },

    /// Invalid response from registry
    #[error("invalid response from {registry} for '{package}': {message}")]
    InvalidResponse {
        package: String,
        registry: String,
        message: String,
    },

    /// The HTTP client could not be constructed
    #[error("failed to create HTTP client: {message}")]
    Client { message: String },
}

/// Errors related to writing the report
#[derive(Error, Debug)]
pub enum FormatError {
    /// Output file could not be created
    #[error("failed to create output file {path}: {source}")]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing the report failed
    #[error("failed to write report: {0}")]
    Write(#[from] std::io::Error),

    /// CSV serialization failed
    #[error("failed to write CSV report: {0}")]
    Csv(#[from] csv::Error),

    /// CSV output needs a destination file
    #[error("CSV output requires an output file (--output)")]
    MissingOutput,
}

/// Errors related to configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Invalid target runtime
    #[error(transparent)]
    InvalidRuntime(#[from] VersionError),

    /// Invalid date value
    #[error("invalid date '{value}': expected format YYYY-MM-DD")]
    InvalidDate { value: String },

    /// Invalid package index URL
    #[error("invalid index URL '{value}': {message}")]
    InvalidIndexUrl { value: String, message: String },
}

/// Errors produced while parsing version strings
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VersionError {
    /// Not a PEP 440 version
    #[error("invalid version '{value}'")]
    InvalidVersion { value: String },

    /// Not a valid version specifier
    #[error("invalid version specifier '{value}': {message}")]
    InvalidSpecifier { value: String, message: String },

    /// Not a Python runtime version of the form X.Y or X.Y.Z
    #[error("invalid Python version '{value}': expected format like '3.12'")]
    InvalidRuntime { value: String },
}

impl ManifestError {
    /// Creates a new ReadError
    pub fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ManifestError::ReadError {
            path: path.into(),
            source,
        }
    }

    /// Creates a new NoRequirements error
    pub fn no_requirements(path: impl Into<PathBuf>) -> Self {
        ManifestError::NoRequirements { path: path.into() }
    }
}

impl FetchError {
    /// Creates a new Network error
    pub fn network(
        package: impl Into<String>,
        registry: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        FetchError::Network {
            package: package.into(),
            registry: registry.into(),
            message: message.into(),
        }
    }

    /// Creates a new Timeout error
    pub fn timeout(package: impl Into<String>, registry: impl Into<String>) -> Self {
        FetchError::Timeout {
            package: package.into(),
            registry: registry.into(),
        }
    }

    /// Creates a new InvalidResponse error
    pub fn invalid_response(
        package: impl Into<String>,
        registry: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        FetchError::InvalidResponse {
            package: package.into(),
            registry: registry.into(),
            message: message.into(),
        }
    }

    /// Returns true if retrying the request may succeed
    pub fn is_transient(&self) -> bool {
        match self {
            FetchError::Network { .. }
            | FetchError::Timeout { .. }
            | FetchError::InvalidResponse { .. } => true,
            FetchError::Http { status, .. } => *status == 429 || *status >= 500,
            FetchError::Client { .. } => false,
        }
    }
}

impl VersionError {
    /// Creates a new InvalidVersion error
    pub fn invalid_version(value: impl Into<String>) -> Self {
        VersionError::InvalidVersion {
            value: value.into(),
        }
    }

    /// Creates a new InvalidSpecifier error
    pub fn invalid_specifier(value: impl Into<String>, message: impl Into<String>) -> Self {
        VersionError::InvalidSpecifier {
            value: value.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_error_read() {
        let err = ManifestError::read_error(
            "/path/to/requirements.txt",
            std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        );
        let msg = format!("{}", err);
        assert!(msg.contains("failed to read manifest file"));
        assert!(msg.contains("requirements.txt"));
    }

    #[test]
    fn test_manifest_error_no_requirements() {
        let err = ManifestError::no_requirements("requirements.txt");
        assert!(err.to_string().contains("no valid requirement lines"));
    }

    #[test]
    fn test_fetch_error_network() {
        let err = FetchError::network("requests", "PyPI", "connection refused");
        let msg = format!("{}", err);
        assert!(msg.contains("failed to fetch package 'requests'"));
        assert!(msg.contains("connection refused"));
    }

    #[test]
    fn test_fetch_error_timeout() {
        let err = FetchError::timeout("django", "PyPI");
        let msg = format!("{}", err);
        assert!(msg.contains("timeout"));
        assert!(msg.contains("django"));
    }

    #[test]
    fn test_fetch_error_is_transient() {
        assert!(FetchError::network("a", "PyPI", "reset").is_transient());
        assert!(FetchError::timeout("a", "PyPI").is_transient());
        let server_error = FetchError::Http {
            package: "a".to_string(),
            registry: "PyPI".to_string(),
            status: 503,
        };
        assert!(server_error.is_transient());
        let rate_limited = FetchError::Http {
            package: "a".to_string(),
            registry: "PyPI".to_string(),
            status: 429,
        };
        assert!(rate_limited.is_transient());
        let forbidden = FetchError::Http {
            package: "a".to_string(),
            registry: "PyPI".to_string(),
            status: 403,
        };
        assert!(!forbidden.is_transient());
        let client = FetchError::Client {
            message: "tls".to_string(),
        };
        assert!(!client.is_transient());
    }

    #[test]
    fn test_format_error_missing_output() {
        let msg = FormatError::MissingOutput.to_string();
        assert!(msg.contains("--output"));
    }

    #[test]
    fn test_config_error_invalid_date() {
        let err = ConfigError::InvalidDate {
            value: "yesterday".to_string(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("invalid date"));
        assert!(msg.contains("yesterday"));
    }

    #[test]
    fn test_version_error_invalid_runtime() {
        let err = VersionError::InvalidRuntime {
            value: "three".to_string(),
        };
        assert!(err.to_string().contains("'three'"));
    }

    #[test]
    fn test_app_error_from_manifest_error() {
        let manifest_err = ManifestError::no_requirements("/path");
        let app_err: AppError = manifest_err.into();
        let msg = format!("{}", app_err);
        assert!(msg.contains("no valid requirement lines"));
        assert_eq!(app_err.exit_code(), 1);
    }

    #[test]
    fn test_app_error_from_format_error() {
        let app_err: AppError = FormatError::MissingOutput.into();
        assert!(app_err.to_string().contains("CSV output"));
    }

    #[test]
    fn test_app_error_from_config_error() {
        let config_err = ConfigError::InvalidRuntime(VersionError::InvalidRuntime {
            value: "bad".to_string(),
        });
        let app_err: AppError = config_err.into();
        assert!(app_err.to_string().contains("invalid Python version"));
    }

    #[test]
    fn test_error_debug_trait() {
        let err = ManifestError::no_requirements("/test");
        let debug = format!("{:?}", err);
        assert!(debug.contains("NoRequirements"));
    }
}
