//! Run report output
//!
//! `--format text` prints one summary line per category (verbose mode only);
//! `--format json` prints the whole report as a single JSON document.

use crate::coordinator::{CategoryOutcome, RunReport};
use crate::dispatch::{CategoryStatus, Failure, FileProblem, SkipReason};
use crate::filter::Exclusion;
use serde::Serialize;
use std::collections::BTreeMap;

/// A per-file problem in per-file dispatch mode
#[derive(Debug, Clone, Serialize)]
pub struct JsonFileProblem {
    pub file: String,
    pub problem: String,
}

/// One category's result
#[derive(Debug, Clone, Serialize)]
pub struct JsonCategory {
    pub key: String,
    /// "clean", "skipped" or "failed"
    pub status: &'static str,
    pub exit_code: i32,
    pub candidates: usize,
    pub files: usize,
    pub excluded: BTreeMap<Exclusion, usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub problems: Vec<JsonFileProblem>,
}

/// Whole-run report
#[derive(Debug, Clone, Serialize)]
pub struct JsonRunReport {
    pub exit_code: i32,
    pub categories: Vec<JsonCategory>,
}

impl From<&CategoryOutcome> for JsonCategory {
    fn from(outcome: &CategoryOutcome) -> Self {
        let (status, detail, problems) = match &outcome.status {
            CategoryStatus::Clean => ("clean", None, Vec::new()),
            CategoryStatus::Skipped(reason) => ("skipped", Some(skip_text(*reason)), Vec::new()),
            CategoryStatus::Failed(failure) => {
                let problems = match failure {
                    Failure::Files { problems } => problems
                        .iter()
                        .map(|(file, problem)| JsonFileProblem {
                            file: file.display().to_string(),
                            problem: problem_text(problem),
                        })
                        .collect(),
                    _ => Vec::new(),
                };
                ("failed", Some(failure_text(failure)), problems)
            }
        };

        Self {
            key: outcome.key.clone(),
            status,
            exit_code: outcome.status.exit_code(),
            candidates: outcome.candidates,
            files: outcome.files.len(),
            excluded: outcome.excluded.clone(),
            detail,
            problems,
        }
    }
}

impl From<&RunReport> for JsonRunReport {
    fn from(report: &RunReport) -> Self {
        Self {
            exit_code: report.exit_code(),
            categories: report.outcomes.iter().map(JsonCategory::from).collect(),
        }
    }
}

/// Serialize a run report to pretty-printed JSON
pub fn to_json(report: &RunReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&JsonRunReport::from(report))
}

/// One summary line per category
pub fn summary_lines(report: &RunReport) -> Vec<String> {
    report
        .outcomes
        .iter()
        .map(|outcome| {
            let state = match &outcome.status {
                CategoryStatus::Clean => "clean".to_string(),
                CategoryStatus::Skipped(reason) => format!("skipped ({})", skip_text(*reason)),
                CategoryStatus::Failed(failure) => format!("FAILED ({})", failure_text(failure)),
            };
            format!(
                "{}: {} of {} files linted, {}",
                outcome.key,
                outcome.files.len(),
                outcome.candidates,
                state
            )
        })
        .collect()
}

fn skip_text(reason: SkipReason) -> String {
    match reason {
        SkipReason::NoFiles => "no files to lint".to_string(),
        SkipReason::NoChangedFiles => "no changed files".to_string(),
    }
}

fn failure_text(failure: &Failure) -> String {
    match failure {
        Failure::ToolReported { code } => format!("tool exited with status {}", code),
        Failure::Invocation { message } => message.clone(),
        Failure::Files { problems } => format!(
            "{} {} failed",
            problems.len(),
            if problems.len() == 1 { "file" } else { "files" }
        ),
    }
}

fn problem_text(problem: &FileProblem) -> String {
    match problem {
        FileProblem::NeedsFormatting => "needs formatting".to_string(),
        FileProblem::ExitStatus(code) => format!("exit code {}", code),
        FileProblem::Invocation(message) => message.clone(),
    }
}
