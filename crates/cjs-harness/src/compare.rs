//! Positional comparison of two text-format circuits.
//!
//! Blank lines are dropped from both sides, then lines are paired by index.
//! A pair matches when the raw lines are identical or their normalized forms
//! are. There is no alignment: one inserted line shifts every later pair and
//! shows up as a run of line differences.

use serde::Serialize;

use crate::normalize::normalize_line;

/// A single recorded difference
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Difference {
    /// Non-blank line counts differ
    LineCount {
        /// Lines in the original text
        original: usize,
        /// Lines in the candidate text
        new: usize,
    },
    /// Lines at the same position differ after normalization
    Line {
        /// 1-based position among non-blank lines
        line: usize,
        /// Original line, as read
        original: String,
        /// Candidate line, as read
        new: String,
    },
}

/// Outcome of comparing two texts
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComparisonReport {
    /// True iff `differences` is empty
    pub identical: bool,
    /// Differences in discovery order (count mismatch first)
    pub differences: Vec<Difference>,
}

impl ComparisonReport {
    fn from_differences(differences: Vec<Difference>) -> Self {
        Self {
            identical: differences.is_empty(),
            differences,
        }
    }

    /// Number of `Line` entries
    pub fn line_differences(&self) -> usize {
        self.differences
            .iter()
            .filter(|d| matches!(d, Difference::Line { .. }))
            .count()
    }
}

/// Compare two texts line by line.
pub fn compare(original: &str, candidate: &str) -> ComparisonReport {
    let original: Vec<&str> = original.split('\n').collect();
    let candidate: Vec<&str> = candidate.split('\n').collect();
    compare_lines(&original, &candidate)
}

/// Compare two already-split line sequences.
pub fn compare_lines<S: AsRef<str>>(original: &[S], candidate: &[S]) -> ComparisonReport {
    let orig: Vec<&str> = non_blank(original);
    let cand: Vec<&str> = non_blank(candidate);
    let mut differences = Vec::new();

    if orig.len() != cand.len() {
        differences.push(Difference::LineCount {
            original: orig.len(),
            new: cand.len(),
        });
    }

    for i in 0..orig.len().max(cand.len()) {
        let a = orig.get(i).copied().unwrap_or("");
        let b = cand.get(i).copied().unwrap_or("");
        if a != b && normalize_line(a) != normalize_line(b) {
            differences.push(Difference::Line {
                line: i + 1,
                original: a.to_string(),
                new: b.to_string(),
            });
        }
    }

    ComparisonReport::from_differences(differences)
}

fn non_blank<S: AsRef<str>>(lines: &[S]) -> Vec<&str> {
    lines
        .iter()
        .map(|l| l.as_ref())
        .filter(|l| !l.trim().is_empty())
        .collect()
}
