//! Check results and their aggregation.

use std::fmt;

/// Outcome class of one check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The check passed.
    Pass,
    /// Worth a look; does not fail the suite.
    Warning,
    /// The output set does not conform.
    Failure,
}

/// One check outcome.
#[derive(Debug, Clone)]
pub struct TestResult {
    /// Validator id, e.g. `documents/enum_refs`.
    pub validator: String,
    /// One-line outcome.
    pub message: String,
    /// Outcome class.
    pub severity: Severity,
    /// Offending items, one per line.
    pub details: Vec<String>,
}

impl TestResult {
    fn new(validator: impl Into<String>, message: impl Into<String>, severity: Severity) -> Self {
        Self {
            validator: validator.into(),
            message: message.into(),
            severity,
            details: Vec::new(),
        }
    }

    /// A passing result.
    pub fn pass(validator: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(validator, message, Severity::Pass)
    }

    /// A warning.
    pub fn warn(validator: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(validator, message, Severity::Warning)
    }

    /// A failure.
    pub fn fail(validator: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(validator, message, Severity::Failure)
    }

    /// A failure listing the offending items.
    pub fn fail_with_details(
        validator: impl Into<String>,
        message: impl Into<String>,
        details: Vec<String>,
    ) -> Self {
        Self {
            details,
            ..Self::fail(validator, message)
        }
    }

    /// Pass when `problems` is empty, otherwise a failure listing them.
    pub fn from_problems(
        validator: impl Into<String>,
        passed: impl Into<String>,
        failed: impl Into<String>,
        problems: Vec<String>,
    ) -> Self {
        if problems.is_empty() {
            Self::pass(validator, passed)
        } else {
            Self::fail_with_details(validator, failed, problems)
        }
    }

    /// Returns true if this result is a failure.
    pub fn is_failure(&self) -> bool {
        self.severity == Severity::Failure
    }
}

impl fmt::Display for TestResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.severity {
            Severity::Pass => "PASS",
            Severity::Warning => "WARN",
            Severity::Failure => "FAIL",
        };
        write!(f, "[{tag}] {}: {}", self.validator, self.message)?;
        for line in &self.details {
            write!(f, "\n    {line}")?;
        }
        Ok(())
    }
}

/// Every result of a conformance run.
#[derive(Debug, Default)]
pub struct ConformanceReport {
    /// Results in validator order.
    pub results: Vec<TestResult>,
}

impl ConformanceReport {
    /// An empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a result.
    pub fn push(&mut self, result: TestResult) {
        self.results.push(result);
    }

    /// Appends another report's results.
    pub fn extend(&mut self, other: ConformanceReport) {
        self.results.extend(other.results);
    }

    /// Failed results.
    pub fn failures(&self) -> impl Iterator<Item = &TestResult> {
        self.results.iter().filter(|r| r.is_failure())
    }

    /// Number of failures.
    pub fn failure_count(&self) -> usize {
        self.failures().count()
    }

    /// Number of warnings.
    pub fn warning_count(&self) -> usize {
        self.results
            .iter()
            .filter(|r| r.severity == Severity::Warning)
            .count()
    }

    /// Returns true if nothing failed.
    pub fn all_passed(&self) -> bool {
        self.failure_count() == 0
    }
}
