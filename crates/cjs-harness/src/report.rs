//! Human-readable progress and summaries.

use std::io::{self, Write};

use console::style;

use crate::batch::BatchObserver;
use crate::compare::{ComparisonReport, Difference};
use crate::outcome::{BatchResult, FixtureOutcome, FixtureStatus};

/// Differences printed per failed fixture
pub const DEFAULT_MAX_DIFFS: usize = 3;
/// Characters of each differing line shown
pub const DEFAULT_PREVIEW_CHARS: usize = 80;

/// Writes progress lines and the batch summary to any `Write`.
///
/// Styling comes from `console`, which drops colors automatically when
/// the output is not a terminal.
#[derive(Debug)]
pub struct ConsoleReporter<W: Write> {
    out: W,
    max_diffs: usize,
    preview_chars: usize,
}

impl ConsoleReporter<io::Stdout> {
    /// Reporter on standard output
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> ConsoleReporter<W> {
    /// Create a reporter with the default limits
    pub fn new(out: W) -> Self {
        Self {
            out,
            max_diffs: DEFAULT_MAX_DIFFS,
            preview_chars: DEFAULT_PREVIEW_CHARS,
        }
    }

    /// Number of differences listed for a failed fixture
    pub fn with_max_diffs(mut self, max_diffs: usize) -> Self {
        self.max_diffs = max_diffs;
        self
    }

    /// Characters shown per differing line
    pub fn with_preview_chars(mut self, preview_chars: usize) -> Self {
        self.preview_chars = preview_chars;
        self
    }

    /// Consume the reporter and return the writer
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Print the result of a single-fixture run.
    pub fn single(&mut self, outcome: &FixtureOutcome) -> io::Result<()> {
        writeln!(self.out, "Testing single circuit: {}", outcome.name)?;
        let verdict = match outcome.status {
            FixtureStatus::Passed => style("PASSED").green().to_string(),
            FixtureStatus::Failed => style("FAILED").red().to_string(),
            FixtureStatus::Skipped => style("SKIPPED").yellow().to_string(),
        };
        writeln!(self.out, "Result: {}", verdict)?;
        if let Some(message) = outcome.error() {
            writeln!(self.out, "Error: {}", message)?;
        }
        for warning in &outcome.warnings {
            writeln!(self.out, "Warning: {}", warning.message)?;
        }
        if let Some(report) = outcome.comparison.as_ref().filter(|r| !r.identical) {
            self.all_differences(report)?;
        }
        Ok(())
    }

    /// Print the step-by-step view of a current-circuit run.
    pub fn current(&mut self, outcome: &FixtureOutcome) -> io::Result<()> {
        let steps = &outcome.steps;
        writeln!(self.out, "Testing current circuit: {}", outcome.name)?;
        if let (Some(count), Some(size)) = (steps.element_count_initial, steps.text_size) {
            writeln!(self.out, "Original: {} elements, {} chars", count, size)?;
        }
        if let Some(size) = steps.json_size {
            writeln!(self.out, "JSON: {} chars", size)?;
        }
        if let Some(count) = steps.json_element_count {
            writeln!(self.out, "JSON elements: {}", count)?;
        }
        if let Some(count) = steps.element_count_after_json {
            writeln!(self.out, "After JSON import: {} elements", count)?;
        }
        match &outcome.comparison {
            Some(report) => {
                writeln!(self.out, "Identical: {}", report.identical)?;
                if !report.identical {
                    self.all_differences(report)?;
                }
            }
            None => {
                if let Some(message) = outcome.error() {
                    writeln!(self.out, "{} {}", style("✗").red(), message)?;
                }
            }
        }
        Ok(())
    }

    /// Print every difference in a report.
    pub fn all_differences(&mut self, report: &ComparisonReport) -> io::Result<()> {
        writeln!(self.out, "Differences: {}", report.differences.len())?;
        for diff in &report.differences {
            self.difference(diff, "  ")?;
        }
        Ok(())
    }

    fn difference(&mut self, diff: &Difference, indent: &str) -> io::Result<()> {
        match diff {
            Difference::LineCount { original, new } => {
                writeln!(self.out, "{}Lines: {} → {}", indent, original, new)
            }
            Difference::Line {
                line,
                original,
                new,
            } => {
                writeln!(self.out, "{}Line {}:", indent, line)?;
                let removed = format!("- {}", preview(original, self.preview_chars));
                let added = format!("+ {}", preview(new, self.preview_chars));
                writeln!(self.out, "{}  {}", indent, style(removed).red())?;
                writeln!(self.out, "{}  {}", indent, style(added).green())
            }
        }
    }
}

impl<W: Write> BatchObserver for ConsoleReporter<W> {
    fn batch_started(&mut self, total: usize) -> io::Result<()> {
        writeln!(self.out, "{}", style("=== JSON Roundtrip Tests ===").bold())?;
        writeln!(self.out, "Testing {} circuits...", total)?;
        writeln!(self.out)
    }

    fn fixture_started(&mut self, name: &str) -> io::Result<()> {
        writeln!(self.out, "Testing: {}", name)
    }

    fn fixture_finished(&mut self, outcome: &FixtureOutcome) -> io::Result<()> {
        match outcome.status {
            FixtureStatus::Passed => writeln!(
                self.out,
                "  {} ({} elements)",
                style("✓ PASSED").green(),
                outcome.steps.element_count_initial.unwrap_or_default()
            ),
            FixtureStatus::Skipped => {
                writeln!(self.out, "  {}: Could not load file", style("⊘ SKIPPED").yellow())
            }
            FixtureStatus::Failed => {
                writeln!(
                    self.out,
                    "  {}: {}",
                    style("✗ FAILED").red(),
                    outcome.error().unwrap_or("unknown error")
                )?;
                if let Some(report) = outcome.comparison.as_ref().filter(|r| !r.identical) {
                    writeln!(self.out, "    Differences:")?;
                    for diff in report.differences.iter().take(self.max_diffs) {
                        self.difference(diff, "      ")?;
                    }
                }
                Ok(())
            }
        }
    }

    fn batch_finished(&mut self, result: &BatchResult) -> io::Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, "{}", style("=== Summary ===").bold())?;
        writeln!(self.out, "Total:   {}", result.total)?;
        writeln!(self.out, "Passed:  {}", result.passed)?;
        writeln!(self.out, "Failed:  {}", result.failed)?;
        writeln!(self.out, "Skipped: {}", result.skipped)?;
        writeln!(self.out, "Success Rate: {}", result.success_rate_label())?;
        self.out.flush()
    }
}

/// First `max` characters of a line.
fn preview(line: &str, max: usize) -> &str {
    match line.char_indices().nth(max) {
        Some((idx, _)) => &line[..idx],
        None => line,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::compare;
    use crate::outcome::{FailureKind, FixtureError};

    fn render<F>(f: F) -> String
    where
        F: FnOnce(&mut ConsoleReporter<Vec<u8>>) -> io::Result<()>,
    {
        console::set_colors_enabled(false);
        let mut reporter = ConsoleReporter::new(Vec::new());
        f(&mut reporter).expect("write");
        String::from_utf8(reporter.into_inner()).expect("utf8")
    }

    fn failed_with_diffs() -> FixtureOutcome {
        let mut outcome = FixtureOutcome::new("cap.txt");
        let long = "x".repeat(100);
        let report = compare(
            &format!("a\nb\nc\nd\n{}\n", long),
            "a\nB\nC\nD\nE\nF\n",
        );
        outcome.errors.push(FixtureError::new(
            FailureKind::TextMismatch,
            format!("Text format differences: {} lines differ", report.differences.len()),
        ));
        outcome.comparison = Some(report);
        outcome
    }

    #[test]
    fn passed_line_shows_element_count() {
        let mut outcome = FixtureOutcome::new("ohms.txt");
        outcome.status = FixtureStatus::Passed;
        outcome.steps.element_count_initial = Some(4);
        let out = render(|r| r.fixture_finished(&outcome));
        assert_eq!(out, "  ✓ PASSED (4 elements)\n");
    }

    #[test]
    fn skipped_line() {
        let outcome = FixtureOutcome::skipped("gone.txt", "Could not load file");
        let out = render(|r| r.fixture_finished(&outcome));
        assert_eq!(out, "  ⊘ SKIPPED: Could not load file\n");
    }

    #[test]
    fn failure_lists_first_three_differences() {
        let outcome = failed_with_diffs();
        let out = render(|r| r.fixture_finished(&outcome));

        assert!(out.starts_with("  ✗ FAILED: Text format differences: 6 lines differ\n"));
        assert!(out.contains("    Differences:\n"));
        assert!(out.contains("      Lines: 5 → 6\n"));
        assert!(out.contains("      Line 2:\n        - b\n        + B\n"));
        assert!(out.contains("      Line 3:\n"));
        assert!(!out.contains("Line 4:"));
    }

    #[test]
    fn previews_are_truncated() {
        let mut outcome = failed_with_diffs();
        outcome.comparison = Some(compare(&"y".repeat(120), "z"));
        let out = render(|r| r.fixture_finished(&outcome));
        assert!(out.contains(&format!("- {}\n", "y".repeat(80))));
        assert!(!out.contains(&"y".repeat(81)));
    }

    #[test]
    fn summary_block() {
        let mut result = BatchResult::new(2);
        let mut ok = FixtureOutcome::new("a.txt");
        ok.status = FixtureStatus::Passed;
        result.record(ok);
        result.record(FixtureOutcome::skipped("b.txt", "Could not load file"));

        let out = render(|r| r.batch_finished(&result));
        assert!(out.contains("=== Summary ===\n"));
        assert!(out.contains("Total:   2\n"));
        assert!(out.contains("Passed:  1\n"));
        assert!(out.contains("Skipped: 1\n"));
        assert!(out.contains("Success Rate: 100.0%\n"));

        let empty = BatchResult::new(0);
        let out = render(|r| r.batch_finished(&empty));
        assert!(out.contains("Success Rate: N/A\n"));
    }

    #[test]
    fn banner() {
        let out = render(|r| {
            r.batch_started(20)?;
            r.fixture_started("ohms.txt")
        });
        assert_eq!(out, "=== JSON Roundtrip Tests ===\nTesting 20 circuits...\n\nTesting: ohms.txt\n");
    }

    #[test]
    fn single_view() {
        let outcome = failed_with_diffs();
        let out = render(|r| r.single(&outcome));
        assert!(out.starts_with("Testing single circuit: cap.txt\nResult: FAILED\n"));
        assert!(out.contains("Error: Text format differences"));
        assert!(out.contains("Differences: 6\n"));
        assert!(out.contains("  Line 5:\n"));
    }

    #[test]
    fn preview_respects_char_boundaries() {
        assert_eq!(preview("héllo", 2), "hé");
        assert_eq!(preview("ab", 80), "ab");
    }
}
