//! pycompat - Python dependency compatibility checker library
//!
//! This library provides the core functionality for checking whether the
//! packages pinned in a requirements file support a target Python version:
//! - Manifest reading (requirements.txt, pip-compile output)
//! - PEP 440 versions, specifiers and Python runtimes
//! - PyPI release metadata fetching
//! - Minimum compatible version evaluation
//! - Markdown and CSV reports

pub mod cli;
pub mod compat;
pub mod domain;
pub mod error;
pub mod manifest;
pub mod orchestrator;
pub mod output;
pub mod progress;
pub mod registry;
pub mod version;
