//! Property tests for the normalizer and comparator.

use cjs_harness::{compare, compare_lines, normalize_line, normalize_text, Difference};
use proptest::prelude::*;

/// A CircuitJS-like line: tag followed by integer and decimal tokens.
fn arb_line() -> impl Strategy<Value = String> {
    "[a-zA-Z$][a-z]?( -?[0-9]{1,4}(\\.[0-9]{1,12})?(e-[0-9]{1,2})?){0,7}"
}

fn arb_lines() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(arb_line(), 0..12)
}

proptest! {
    #[test]
    fn normalization_is_idempotent(line in arb_line()) {
        let once = normalize_line(&line);
        prop_assert_eq!(normalize_line(&once), once);
    }

    #[test]
    fn text_normalization_is_idempotent(lines in arb_lines()) {
        let once = normalize_text(&lines.join("\n"));
        prop_assert_eq!(normalize_text(&once), once);
    }

    #[test]
    fn comparison_is_reflexive(lines in arb_lines()) {
        let text = lines.join("\n");
        prop_assert!(compare(&text, &text).identical);
    }

    #[test]
    fn digits_past_the_sixth_significant_are_ignored(
        lead in 1u32..10,
        fixed in "[0-9]{5}",
        tail_a in "[0-4][0-9]{1,8}",
        tail_b in "[0-4][0-9]{1,8}",
    ) {
        let a = format!("c 0 0 16 0 0 {}.{}{}", lead, fixed, tail_a);
        let b = format!("c 0 0 16 0 0 {}.{}{}", lead, fixed, tail_b);
        prop_assert!(compare(&a, &b).identical, "{} vs {}", a, b);
    }

    #[test]
    fn blank_lines_never_matter(
        lines in arb_lines(),
        blanks in prop::collection::vec((0usize..16, "[ \t]{0,3}"), 0..6),
    ) {
        let mut padded = lines.clone();
        for (at, blank) in blanks {
            let at = at.min(padded.len());
            padded.insert(at, blank);
        }
        prop_assert!(compare_lines(&lines, &padded).identical);
        prop_assert!(compare_lines(&padded, &lines).identical);
    }

    #[test]
    fn swapping_distinct_lines_is_detected(
        lines in prop::collection::vec(arb_line(), 2..10),
        i in 0usize..10,
        j in 0usize..10,
    ) {
        let i = i % lines.len();
        let j = j % lines.len();
        prop_assume!(normalize_line(&lines[i]) != normalize_line(&lines[j]));

        let mut swapped = lines.clone();
        swapped.swap(i, j);
        let report = compare_lines(&lines, &swapped);
        prop_assert!(!report.identical);
        prop_assert_eq!(report.line_differences(), 2);
    }

    #[test]
    fn count_mismatch_is_always_reported(
        lines in arb_lines(),
        extra in prop::collection::vec(arb_line(), 1..4),
    ) {
        let mut longer = lines.clone();
        longer.extend(extra.iter().cloned());
        let report = compare_lines(&lines, &longer);
        prop_assert!(!report.identical);
        prop_assert_eq!(
            &report.differences[0],
            &Difference::LineCount { original: lines.len(), new: longer.len() }
        );
    }
}
