//! Polylint - multi-language lint orchestrator
//!
//! This library discovers source files per language category, filters them
//! through a blacklist, ignore subtrees and an optional changed-file
//! whitelist, runs each category's external linter, and aggregates the
//! results into a single process exit code.

pub mod changed;
pub mod cli;
pub mod coordinator;
pub mod dispatch;
pub mod filter;
pub mod noise;
pub mod paths;
pub mod process;
pub mod registry;
pub mod report;
pub mod walker;
