//! Evaluator configuration
//!
//! This module provides the EvaluatorConfig struct that carries the
//! target runtime and the date used by the release-date heuristic.

use crate::version::PythonRuntime;
use chrono::NaiveDate;

/// Configuration for compatibility evaluation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EvaluatorConfig {
    /// Target Python runtime
    pub target: PythonRuntime,
    /// Overrides the built-in release date of the target runtime
    pub runtime_release_date: Option<NaiveDate>,
}

impl EvaluatorConfig {
    /// Create a configuration for the given target runtime
    pub fn new(target: PythonRuntime) -> Self {
        Self {
            target,
            runtime_release_date: None,
        }
    }

    /// Set the runtime release date used by the heuristic
    pub fn with_runtime_release_date(mut self, date: NaiveDate) -> Self {
        self.runtime_release_date = Some(date);
        self
    }

    /// Date after which an undeclared release is inferred compatible
    ///
    /// `None` disables the heuristic.
    pub fn heuristic_cutoff(&self) -> Option<NaiveDate> {
        self.runtime_release_date
            .or_else(|| self.target.release_date())
    }
}
