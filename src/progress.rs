//! Progress display for package checks
//!
//! Draws a bar on stderr while release metadata is fetched. Each finished
//! fetch updates the bar message with the package and what came back, and a
//! running tally of found, missing and failed packages.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::fmt;
use std::time::Duration;

const TEMPLATE: &str =
    "{spinner:.cyan} Checking packages [{bar:30.cyan/blue}] {pos}/{len} {prefix:.dim} {wide_msg}";

/// What a single package fetch returned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchProgress {
    /// Usable releases were found
    Found(usize),
    /// The index has no usable releases for the package
    NotFound,
    /// The fetch failed after retries
    Failed,
}

impl fmt::Display for FetchProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchProgress::Found(1) => write!(f, "1 release"),
            FetchProgress::Found(n) => write!(f, "{} releases", n),
            FetchProgress::NotFound => write!(f, "not found"),
            FetchProgress::Failed => write!(f, "fetch failed"),
        }
    }
}

/// Counts of finished fetches by result
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchTally {
    pub found: usize,
    pub not_found: usize,
    pub failed: usize,
}

impl FetchTally {
    /// Number of fetches recorded so far
    pub fn completed(&self) -> usize {
        self.found + self.not_found + self.failed
    }

    fn record(&mut self, fetch: FetchProgress) {
        match fetch {
            FetchProgress::Found(_) => self.found += 1,
            FetchProgress::NotFound => self.not_found += 1,
            FetchProgress::Failed => self.failed += 1,
        }
    }
}

impl fmt::Display for FetchTally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} found, {} missing, {} failed",
            self.found, self.not_found, self.failed
        )
    }
}

/// Progress of the fetch phase of a run
pub struct CheckProgress {
    /// Drawn bar; absent in quiet mode
    bar: Option<ProgressBar>,
    tally: FetchTally,
}

impl CheckProgress {
    /// Start tracking `total` package fetches
    ///
    /// Nothing is drawn when `enabled` is false or there is nothing to fetch.
    pub fn start(total: usize, enabled: bool) -> Self {
        if !enabled || total == 0 {
            return Self::hidden();
        }
        Self::with_draw_target(total, ProgressDrawTarget::stderr())
    }

    /// Track fetches without drawing anything
    pub fn hidden() -> Self {
        Self {
            bar: None,
            tally: FetchTally::default(),
        }
    }

    fn with_draw_target(total: usize, target: ProgressDrawTarget) -> Self {
        let bar = ProgressBar::with_draw_target(Some(total as u64), target);
        bar.set_style(
            ProgressStyle::default_bar()
                .template(TEMPLATE)
                .expect("Invalid template")
                .progress_chars("█▓▒░"),
        );
        bar.set_prefix(FetchTally::default().to_string());
        bar.enable_steady_tick(Duration::from_millis(100));

        Self {
            bar: Some(bar),
            tally: FetchTally::default(),
        }
    }

    /// Record a finished fetch for `package`
    pub fn record(&mut self, package: &str, fetch: FetchProgress) {
        self.tally.record(fetch);

        if let Some(ref bar) = self.bar {
            bar.set_prefix(self.tally.to_string());
            bar.set_message(format!("{}: {}", package, fetch));
            bar.inc(1);
        }
    }

    /// Counts recorded so far
    pub fn tally(&self) -> FetchTally {
        self.tally
    }

    /// Clear the bar and return the final counts
    pub fn finish(self) -> FetchTally {
        if let Some(bar) = self.bar {
            bar.finish_and_clear();
        }
        self.tally
    }
}
