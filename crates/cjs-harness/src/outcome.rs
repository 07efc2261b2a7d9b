//! Per-fixture and per-batch results.
//!
//! Everything here is `Serialize` so callers can hand the batch result to
//! other tools as JSON; printed progress is only for humans.

use serde::Serialize;

use crate::compare::ComparisonReport;

/// Final status of one fixture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FixtureStatus {
    /// Roundtrip was lossless
    Passed,
    /// Roundtrip failed or an engine step failed
    Failed,
    /// Fixture could not be loaded
    Skipped,
}

/// Classification of what went wrong
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Fixture text unavailable
    LoadFailure,
    /// An import call raised
    ImportFailure,
    /// An export call raised
    ExportFailure,
    /// JSON export did not parse
    InvalidJson,
    /// Elements remained after clear
    ClearFailed,
    /// Element counts differ between text and JSON import
    ElementCountMismatch,
    /// Comparator found differences
    TextMismatch,
    /// An engine call or settle wait exceeded its limit
    Timeout,
}

/// One recorded problem
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FixtureError {
    /// What kind of problem
    pub kind: FailureKind,
    /// Message for humans
    pub message: String,
}

impl FixtureError {
    /// Create a fixture error
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Which steps ran and what they observed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StepLog {
    /// Length of the original text in bytes
    pub text_size: Option<usize>,
    /// Text import succeeded
    pub import_text: bool,
    /// Element count after text import
    pub element_count_initial: Option<usize>,
    /// JSON export succeeded
    pub export_json: bool,
    /// Size of the JSON export in bytes
    pub json_size: Option<usize>,
    /// JSON export parsed
    pub json_valid: bool,
    /// Entries in the exported `elements` object
    pub json_element_count: Option<usize>,
    /// Clear was called and left nothing behind
    pub clear: bool,
    /// JSON import succeeded
    pub import_json: bool,
    /// Element count after JSON import
    pub element_count_after_json: Option<usize>,
    /// Final text export succeeded
    pub export_text: bool,
    /// Comparison ran
    pub comparison: bool,
}

/// Result of running one fixture
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FixtureOutcome {
    /// Fixture identifier
    pub name: String,
    /// Final status
    pub status: FixtureStatus,
    /// Problems that count against the fixture, in the order found
    pub errors: Vec<FixtureError>,
    /// Problems that were recorded but tolerated
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<FixtureError>,
    /// Step progress
    pub steps: StepLog,
    /// Text comparison, when the run got that far
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparison: Option<ComparisonReport>,
}

impl FixtureOutcome {
    /// A fresh outcome, not yet decided
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: FixtureStatus::Failed,
            errors: Vec::new(),
            warnings: Vec::new(),
            steps: StepLog::default(),
            comparison: None,
        }
    }

    /// Outcome for a fixture that could not be loaded
    pub fn skipped(name: impl Into<String>, message: impl Into<String>) -> Self {
        let mut outcome = Self::new(name);
        outcome.status = FixtureStatus::Skipped;
        outcome
            .errors
            .push(FixtureError::new(FailureKind::LoadFailure, message));
        outcome
    }

    /// First recorded error message
    pub fn error(&self) -> Option<&str> {
        self.errors.first().map(|e| e.message.as_str())
    }

    /// First recorded failure kind
    pub fn failure_kind(&self) -> Option<FailureKind> {
        self.errors.first().map(|e| e.kind)
    }

    /// Whether a given kind was recorded as an error
    pub fn has_error(&self, kind: FailureKind) -> bool {
        self.errors.iter().any(|e| e.kind == kind)
    }

    /// Status shortcut
    pub fn passed(&self) -> bool {
        self.status == FixtureStatus::Passed
    }
}

/// Aggregate result of a batch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchResult {
    /// Fixtures requested
    pub total: usize,
    /// Fixtures that passed
    pub passed: usize,
    /// Fixtures that failed
    pub failed: usize,
    /// Fixtures that could not be loaded
    pub skipped: usize,
    /// Per-fixture outcomes in run order
    pub outcomes: Vec<FixtureOutcome>,
}

impl BatchResult {
    /// Empty result for `total` requested fixtures
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Default::default()
        }
    }

    /// Record an outcome and update the counters
    pub fn record(&mut self, outcome: FixtureOutcome) {
        match outcome.status {
            FixtureStatus::Passed => self.passed += 1,
            FixtureStatus::Failed => self.failed += 1,
            FixtureStatus::Skipped => self.skipped += 1,
        }
        self.outcomes.push(outcome);
    }

    /// Percentage of non-skipped fixtures that passed; `None` when every
    /// fixture was skipped.
    pub fn success_rate(&self) -> Option<f64> {
        let attempted = self.total.saturating_sub(self.skipped);
        if attempted == 0 {
            None
        } else {
            Some(self.passed as f64 / attempted as f64 * 100.0)
        }
    }

    /// Success rate with one decimal place, or `N/A`
    pub fn success_rate_label(&self) -> String {
        match self.success_rate() {
            Some(rate) => format!("{:.1}%", rate),
            None => "N/A".to_string(),
        }
    }

    /// True when at least one fixture failed
    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}
