//! Line normalization for tolerant text comparison.
//!
//! Two independent export passes may print the same floating point value
//! with different trailing digits. Literals with seven or more fractional
//! digits are therefore re-rendered at six significant digits; shorter
//! literals and everything else on the line are left alone. Lines are never
//! reordered: the `$` options line must stay first.

use once_cell::sync::Lazy;
use regex::Regex;

static LONG_DECIMAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"-?[0-9]+\.[0-9]{7,}").expect("static pattern"));

/// Significant digits kept for long decimal literals
pub const SIGNIFICANT_DIGITS: usize = 6;

/// Normalize a single line: trim, then canonicalize long decimal literals.
///
/// A match that continues a preceding number (`1.2345678.1234567`, or the
/// exponent of `1.2e-7.1234567`) is left alone, so the result is stable
/// under repeated normalization.
pub fn normalize_line(line: &str) -> String {
    let line = line.trim();
    let mut out = String::with_capacity(line.len());
    let mut last = 0;
    for m in LONG_DECIMAL.find_iter(line) {
        if continues_number(&line[..m.start()]) {
            continue;
        }
        if let Ok(value) = m.as_str().parse::<f64>() {
            out.push_str(&line[last..m.start()]);
            out.push_str(&to_precision(value, SIGNIFICANT_DIGITS));
            last = m.end();
        }
    }
    out.push_str(&line[last..]);
    out
}

/// Whether text ending in `prefix` is still inside a numeric literal.
fn continues_number(prefix: &str) -> bool {
    if prefix.ends_with('.') {
        return true;
    }
    let prefix = prefix.strip_suffix(|c: char| c == '+' || c == '-').unwrap_or(prefix);
    match prefix.strip_suffix(|c: char| c == 'e' || c == 'E') {
        Some(mantissa) => mantissa.ends_with(|c: char| c.is_ascii_digit()),
        None => false,
    }
}

/// Normalize a whole text: every line normalized, empty lines dropped.
pub fn normalize_text(text: &str) -> String {
    text.split('\n')
        .map(normalize_line)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render `value` with `precision` significant digits in the layout of
/// ECMAScript's `Number.prototype.toPrecision`.
///
/// Exact ties round half to even (`0.0009765625` gives `0.000976562`), where
/// ECMAScript rounds them up.
///
/// Fixed notation is used while the decimal exponent lies in
/// `[-6, precision)`, exponential notation (`1.23457e-7`) otherwise.
pub fn to_precision(value: f64, precision: usize) -> String {
    let precision = precision.max(1);
    if !value.is_finite() {
        return value.to_string();
    }
    if value == 0.0 {
        return if precision == 1 {
            "0".to_string()
        } else {
            format!("0.{}", "0".repeat(precision - 1))
        };
    }

    // "{:.Ne}" rounds to N+1 significant digits and reports the exponent
    // after rounding.
    let sci = format!("{:.*e}", precision - 1, value.abs());
    let (mantissa, exp) = match sci.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (sci.as_str(), 0),
    };
    let digits: String = mantissa.chars().filter(|c| c.is_ascii_digit()).collect();
    let sign = if value < 0.0 { "-" } else { "" };

    if exp < -6 || exp >= precision as i32 {
        let (head, tail) = digits.split_at(1);
        let exp_sign = if exp < 0 { '-' } else { '+' };
        return if tail.is_empty() {
            format!("{}{}e{}{}", sign, head, exp_sign, exp.abs())
        } else {
            format!("{}{}.{}e{}{}", sign, head, tail, exp_sign, exp.abs())
        };
    }

    if exp >= 0 {
        let int_len = exp as usize + 1;
        let (int_part, frac_part) = digits.split_at(int_len);
        if frac_part.is_empty() {
            format!("{}{}", sign, int_part)
        } else {
            format!("{}{}.{}", sign, int_part, frac_part)
        }
    } else {
        let zeros = "0".repeat((-exp - 1) as usize);
        format!("{}0.{}{}", sign, zeros, digits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_precision_matches_ecmascript() {
        assert_eq!(to_precision(10.20027730826997, 6), "10.2003");
        assert_eq!(to_precision(0.000005, 6), "0.00000500000");
        assert_eq!(to_precision(1.7143528192808883e-7, 6), "1.71435e-7");
        assert_eq!(to_precision(-9.860571317474385, 6), "-9.86057");
        assert_eq!(to_precision(123456.789, 6), "123457");
        assert_eq!(to_precision(1234567.891, 6), "1.23457e+6");
        assert_eq!(to_precision(0.0, 6), "0.00000");
        assert_eq!(to_precision(-0.0, 6), "0.00000");
        assert_eq!(to_precision(9.9999996, 6), "10.0000");
    }

    #[test]
    fn exact_ties_round_to_even() {
        assert_eq!(to_precision(0.0009765625, 6), "0.000976562");
    }

    #[test]
    fn adjacent_literals_are_stable() {
        let once = normalize_line("x 1.2345678.1234567");
        assert_eq!(once, "x 1.23457.1234567");
        assert_eq!(normalize_line(&once), once);

        let once = normalize_line("x 0.00000012345678.1234567");
        assert_eq!(once, "x 1.23457e-7.1234567");
        assert_eq!(normalize_line(&once), once);

        assert_eq!(normalize_line("x 1.2345678-2.1234567"), "x 1.23457-2.12346");
    }

    #[test]
    fn long_literals_are_rounded() {
        assert_eq!(
            normalize_line("  c 384 352 176 352 0 0.000015 -9.860571317474385  "),
            "c 384 352 176 352 0 0.000015 -9.86057"
        );
        assert_eq!(
            normalize_line("$ 1 0.000005 10.20027730826997 50 5 43 5e-11"),
            "$ 1 0.000005 10.2003 50 5 43 5e-11"
        );
    }

    #[test]
    fn short_literals_are_untouched() {
        assert_eq!(normalize_line("r 0 0 16 0 0 1.234567"), "r 0 0 16 0 0 1.234567");
        assert_eq!(normalize_line("r 0 0 16 0 0 1000"), "r 0 0 16 0 0 1000");
    }

    #[test]
    fn normalize_text_drops_blank_lines_and_keeps_order() {
        let text = "$ 1 0.000005 10.20027730826997 50 5\n\n   \nw 0 0 16 0 0\r\nr 0 0 16 0 0 10\n";
        assert_eq!(
            normalize_text(text),
            "$ 1 0.000005 10.2003 50 5\nw 0 0 16 0 0\nr 0 0 16 0 0 10"
        );
    }

    #[test]
    fn normalization_is_idempotent_on_samples() {
        for line in [
            "c 0 0 0 0 0 0.0000000",
            "x 0.00000123456789 -0.0000001234567",
            "t 1 2 3 4 0 1 -4.99999999999 0.60000000001 100",
            "$ 0 5.000000000000001e-6 10.20027730826997 63 10 62",
        ] {
            let once = normalize_line(line);
            assert_eq!(normalize_line(&once), once, "not idempotent for {line}");
        }
    }
}
