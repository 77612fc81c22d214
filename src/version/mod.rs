//! Python version model
//!
//! This module provides:
//! - PEP 440 package versions with proper ordering
//! - Version specifier sets (`requires_python` constraints)
//! - Target Python runtime versions and their release dates

mod pep440;
mod runtime;
mod specifier;

pub use pep440::{PackageVersion, PreRelease};
pub use runtime::{PythonRuntime, DEFAULT_TARGET_RUNTIME};
pub use specifier::{Operator, Specifier, SpecifierSet};
