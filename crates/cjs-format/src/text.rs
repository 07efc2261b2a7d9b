//! The native CircuitJS1 line format.
//!
//! ```text
//! $ 1 0.000005 10.20027730826997 50 5 43 5e-11
//! r 176 80 384 80 0 10
//! 34 fwdrop\s0.805904783 1 1.7143528192808883e-7 0 2 0 1
//! d 384 80 384 160 2 fwdrop\s0.805904783
//! o 0 64 0 4099 5 0.1 0 1
//! h 1 2 3
//! ```
//!
//! Lines end at any `\r` or `\n`. Tokens are separated by spaces, tabs, form
//! feeds and `+`. The first token
//! of each line selects its meaning; anything that is not an options, scope,
//! hint, model or adjustable line is an element.

use std::fmt::{Display, Formatter};

use log::debug;

use crate::error::{FormatError, Result};
use crate::{CircuitDocument, Element, Hint, Record, SimOptions};

/// Model definitions are printed right before the element that uses them.
fn is_model_tag(tag: &str) -> bool {
    matches!(tag, "!" | "34" | "32" | ".")
}

/// Filter-view data that CircuitJS1 itself discards on load.
fn is_ignored_tag(tag: &str) -> bool {
    matches!(tag, "%" | "?" | "B")
}

fn tokenize(line: &str) -> impl Iterator<Item = &str> {
    line.split(|c: char| matches!(c, ' ' | '+' | '\t' | '\x0c' | '\r' | '\n'))
        .filter(|t| !t.is_empty())
}

/// Lines ending in `\n`, `\r\n` or a bare `\r`.
fn physical_lines(input: &str) -> impl Iterator<Item = &str> {
    input
        .split('\n')
        .flat_map(|line| line.strip_suffix('\r').unwrap_or(line).split('\r'))
}

/// Parse text-format circuit data into a document.
///
/// Blank lines are skipped. A malformed options, hint or element line is an
/// error carrying its 1-based line number.
pub fn parse_text(input: &str) -> Result<CircuitDocument> {
    let mut doc = CircuitDocument::new();
    let mut pending_models: Vec<Record> = Vec::new();

    for (idx, raw) in physical_lines(input).enumerate() {
        let line_no = idx + 1;
        let mut tokens = tokenize(raw);
        let Some(tag) = tokens.next() else {
            continue;
        };
        let fields: Vec<String> = tokens.map(str::to_string).collect();

        match tag {
            "$" => doc.options = Some(parse_options(line_no, &fields)?),
            "o" => doc.scopes.push(Record::new(tag, fields)),
            "h" => doc.hint = Some(parse_hint(line_no, &fields)?),
            "38" => doc.adjustables.push(Record::new(tag, fields)),
            t if is_model_tag(t) => pending_models.push(Record::new(tag, fields)),
            t if is_ignored_tag(t) => {
                debug!("line {}: ignoring '{}' record", line_no, t);
            }
            _ => {
                let mut element = parse_element(line_no, tag, &fields)?;
                element.models = std::mem::take(&mut pending_models);
                doc.elements.push(element);
            }
        }
    }

    doc.trailing_models = pending_models;
    Ok(doc)
}

fn parse_int<T: std::str::FromStr>(line: usize, what: &str, token: Option<&String>) -> Result<T> {
    let token = token.ok_or_else(|| FormatError::parse(line, format!("missing {}", what)))?;
    token
        .parse::<T>()
        .map_err(|_| FormatError::parse(line, format!("bad {} '{}'", what, token)))
}

fn required(line: usize, what: &str, token: Option<&String>) -> Result<String> {
    token
        .cloned()
        .ok_or_else(|| FormatError::parse(line, format!("missing {}", what)))
}

fn parse_options(line: usize, fields: &[String]) -> Result<SimOptions> {
    if fields.len() > 7 {
        debug!("line {}: dropping {} extra option fields", line, fields.len() - 7);
    }
    Ok(SimOptions {
        flags: parse_int(line, "option flags", fields.first())?,
        max_time_step: required(line, "max time step", fields.get(1))?,
        speed: required(line, "simulation speed", fields.get(2))?,
        current_speed: required(line, "current speed", fields.get(3))?,
        voltage_range: required(line, "voltage range", fields.get(4))?,
        power_brightness: fields.get(5).cloned(),
        min_time_step: fields.get(6).cloned(),
    })
}

fn parse_hint(line: usize, fields: &[String]) -> Result<Hint> {
    Ok(Hint {
        kind: parse_int(line, "hint type", fields.first())?,
        item1: parse_int(line, "hint item", fields.get(1))?,
        item2: parse_int(line, "hint item", fields.get(2))?,
    })
}

fn parse_element(line: usize, kind: &str, fields: &[String]) -> Result<Element> {
    let mut element = Element::new(
        kind,
        parse_int(line, "x1", fields.first())?,
        parse_int(line, "y1", fields.get(1))?,
        parse_int(line, "x2", fields.get(2))?,
        parse_int(line, "y2", fields.get(3))?,
        parse_int(line, "element flags", fields.get(4))?,
    );

    let rest = &fields[5..];
    match rest.iter().position(|t| t == "#") {
        Some(hash) => {
            element.params = rest[..hash].to_vec();
            let desc = rest[hash + 1..].join(" ");
            if !desc.is_empty() {
                element.description = Some(desc);
            }
        }
        None => element.params = rest.to_vec(),
    }
    Ok(element)
}

impl Display for SimOptions {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "$ {} {} {} {} {}",
            self.flags, self.max_time_step, self.speed, self.current_speed, self.voltage_range
        )?;
        if let Some(power) = &self.power_brightness {
            write!(f, " {}", power)?;
            if let Some(min) = &self.min_time_step {
                write!(f, " {}", min)?;
            }
        }
        Ok(())
    }
}

impl Display for Element {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} {} {} {} {}",
            self.kind, self.x1, self.y1, self.x2, self.y2, self.flags
        )?;
        for p in &self.params {
            write!(f, " {}", p)?;
        }
        if let Some(desc) = &self.description {
            write!(f, " # {}", desc)?;
        }
        Ok(())
    }
}

impl Display for Hint {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "h {} {} {}", self.kind, self.item1, self.item2)
    }
}

/// Print a document in text format, one record per line.
///
/// Order: options, each element preceded by its models, trailing models,
/// scopes, adjustables, hint.
pub fn to_text(doc: &CircuitDocument) -> String {
    let mut lines: Vec<String> = Vec::with_capacity(doc.elements.len() + 4);

    if let Some(options) = &doc.options {
        lines.push(options.to_string());
    }
    for element in &doc.elements {
        lines.extend(element.models.iter().map(Record::to_string));
        lines.push(element.to_string());
    }
    lines.extend(doc.trailing_models.iter().map(Record::to_string));
    lines.extend(doc.scopes.iter().map(Record::to_string));
    lines.extend(doc.adjustables.iter().map(Record::to_string));
    if let Some(hint) = &doc.hint {
        lines.push(hint.to_string());
    }

    let mut out = lines.join("\n");
    if !out.is_empty() {
        out.push('\n');
    }
    out
}
