//! Per-category filtering of informational tool output
//!
//! Some linters write progress and summary text to stderr alongside real
//! findings (cpplint prints `Done processing <file>` for every input and
//! `Total errors found: 0` on success). Each category carries its own set of
//! patterns; matching lines are dropped before the rest is shown.

use regex::Regex;

/// Predicate over captured stderr lines
#[derive(Debug, Clone, Default)]
pub struct NoiseFilter {
    patterns: Vec<Regex>,
}

impl NoiseFilter {
    /// Filter that treats nothing as noise
    pub fn none() -> Self {
        Self::default()
    }

    /// Compile a filter from regular expressions
    pub fn from_patterns<I, S>(patterns: I) -> Result<Self, regex::Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|p| Regex::new(p.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    /// Check if a line is status noise
    pub fn is_noise(&self, line: &str) -> bool {
        self.patterns.iter().any(|p| p.is_match(line))
    }

    /// Non-empty lines of `text` that are not noise, in order
    ///
    /// Lines are split on any run of `\r` / `\n`.
    pub fn signal_lines<'a>(&'a self, text: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        text.split(['\r', '\n'])
            .filter(|line| !line.is_empty())
            .filter(move |line| !self.is_noise(line))
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}
