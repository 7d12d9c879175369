//! Run coordination across categories
//!
//! Phases: `Idle → SelectingCategories → {Discovering → Filtering →
//! Dispatching}* → Aggregating → Done`.
//!
//! Categories run one at a time in registration order. A failing category
//! does not stop the ones after it; the run's exit code is the first non-zero
//! category status. Only configuration and changed-file resolution errors
//! abort a run.

use crate::changed::{ChangedFileResolver, VcsError};
use crate::dispatch::{CategoryStatus, DispatchOptions, Dispatcher, SkipReason};
use crate::filter::{self, Exclusion};
use crate::paths::PathSet;
use crate::process::ProcessRunner;
use crate::registry::{Category, CategoryRegistry, ConfigError};
use crate::walker;
use std::collections::BTreeMap;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a whole run
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Vcs(#[from] VcsError),
}

/// Where a run currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Idle,
    SelectingCategories,
    Discovering,
    Filtering,
    Dispatching,
    Aggregating,
    Done,
}

/// Per-run options, usually straight from the command line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Category keys or aliases to run; empty means all
    pub categories: Vec<String>,
    /// Only lint files reported as changed by the VCS
    pub changed_only: bool,
    pub fix: bool,
    pub verbose: bool,
}

/// Result of one category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryOutcome {
    pub key: String,
    /// Files discovered under the scan roots
    pub candidates: usize,
    /// Files handed to the tool
    pub files: Vec<PathBuf>,
    /// Files removed by filtering, per reason
    pub excluded: BTreeMap<Exclusion, usize>,
    pub status: CategoryStatus,
}

/// Result of a complete run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// One entry per selected category, in execution order
    pub outcomes: Vec<CategoryOutcome>,
}

impl RunReport {
    /// First non-zero category status, else 0
    pub fn exit_code(&self) -> i32 {
        self.first_failure().map_or(0, |o| o.status.exit_code())
    }

    /// The earliest failing category
    pub fn first_failure(&self) -> Option<&CategoryOutcome> {
        self.outcomes.iter().find(|o| o.status.exit_code() != 0)
    }

    pub fn failures(&self) -> impl Iterator<Item = &CategoryOutcome> {
        self.outcomes.iter().filter(|o| o.status.is_failure())
    }
}

/// Drives a run over a registry
pub struct RunCoordinator<'a> {
    registry: &'a CategoryRegistry,
    runner: &'a dyn ProcessRunner,
    phase: RunPhase,
}

impl<'a> RunCoordinator<'a> {
    pub fn new(registry: &'a CategoryRegistry, runner: &'a dyn ProcessRunner) -> Self {
        Self {
            registry,
            runner,
            phase: RunPhase::Idle,
        }
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    /// Run every selected category and aggregate the results
    ///
    /// # Errors
    /// Returns [`RunError::Config`] for an unknown category name and
    /// [`RunError::Vcs`] when `--changed` mode cannot list changed files.
    /// Tool failures are not errors; they are reported in the [`RunReport`].
    pub fn run(&mut self, options: &RunOptions) -> Result<RunReport, RunError> {
        self.enter(RunPhase::SelectingCategories);
        let selected = self.registry.select(&options.categories)?;

        let whitelist = if options.changed_only && !selected.is_empty() {
            let resolver = ChangedFileResolver::new(self.registry.vcs(), self.runner);
            Some(resolver.resolve(self.registry.source_root())?)
        } else {
            None
        };

        let dispatcher = Dispatcher::new(
            self.runner,
            DispatchOptions {
                fix: options.fix,
                verbose: options.verbose,
            },
        );

        let mut report = RunReport::default();
        for category in selected {
            let outcome = self.run_category(category, whitelist.as_ref(), &dispatcher);
            if outcome.status.is_failure() && report.first_failure().is_none() {
                tracing::info!(
                    "Recording {} as the run's failure (status {})",
                    outcome.key,
                    outcome.status.exit_code()
                );
            }
            report.outcomes.push(outcome);
        }

        self.enter(RunPhase::Aggregating);
        tracing::info!(
            "{} categories run, {} failed, exit code {}",
            report.outcomes.len(),
            report.failures().count(),
            report.exit_code()
        );

        self.enter(RunPhase::Done);
        Ok(report)
    }

    fn run_category(
        &mut self,
        category: &Category,
        whitelist: Option<&PathSet>,
        dispatcher: &Dispatcher<'_>,
    ) -> CategoryOutcome {
        if whitelist.is_some_and(|w| w.is_empty()) {
            tracing::info!("No changed files, skipping {}", category.key);
            return CategoryOutcome {
                key: category.key.clone(),
                candidates: 0,
                files: Vec::new(),
                excluded: BTreeMap::new(),
                status: CategoryStatus::Skipped(SkipReason::NoChangedFiles),
            };
        }

        self.enter(RunPhase::Discovering);
        let candidates = walker::collect(&category.roots, |p| category.matches(p));
        let candidate_count = candidates.len();
        tracing::debug!("{}: {} candidate files", category.key, candidate_count);

        self.enter(RunPhase::Filtering);
        let outcome = filter::filter(
            candidates,
            self.registry.blacklist(),
            &category.ignore_roots,
            |p| category.matches(p),
            whitelist,
        );
        tracing::debug!(
            "{}: {} files after filtering, {} excluded",
            category.key,
            outcome.kept.len(),
            outcome.removed.len()
        );

        self.enter(RunPhase::Dispatching);
        let status = dispatcher.dispatch(category, &outcome.kept);

        CategoryOutcome {
            key: category.key.clone(),
            candidates: candidate_count,
            excluded: outcome.removal_counts(),
            files: outcome.kept.into_iter().collect(),
            status,
        }
    }

    fn enter(&mut self, phase: RunPhase) {
        tracing::trace!("{:?} -> {:?}", self.phase, phase);
        self.phase = phase;
    }
}
