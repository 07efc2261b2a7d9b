//! CircuitJS1 circuit documents and their two serializations.
//!
//! A [`CircuitDocument`] holds what a CircuitJS1 text file describes: the
//! `$` options line, the circuit elements (each preceded by any model lines it
//! depends on), scope lines, adjustable (slider) lines and the hint line.
//!
//! - [`text`]: the native line format (`type x1 y1 x2 y2 flags params...`).
//! - [`json`]: the JSON 2.0 document (`schema`, `simulation`, `elements`, ...).
//!
//! Numeric tokens are stored in the spelling they were read with, so a
//! document read from text prints back to the same tokens. Nothing here
//! simulates a circuit.

use std::fmt::{Display, Formatter};

pub mod error;
pub mod json;
pub mod text;

pub use error::{FormatError, Result};
pub use json::{from_json, to_json, JSON_FORMAT_ID, JSON_FORMAT_VERSION};
pub use text::{parse_text, to_text};

/// A raw non-element line (model definition, scope, adjustable).
///
/// The first token is kept as `tag`, the remaining tokens verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Leading token (`o`, `38`, `34`, `!`, ...)
    pub tag: String,
    /// Remaining tokens
    pub fields: Vec<String>,
}

impl Record {
    /// Build a record from its tag and fields
    pub fn new(tag: impl Into<String>, fields: Vec<String>) -> Self {
        Self {
            tag: tag.into(),
            fields,
        }
    }
}

impl Display for Record {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tag)?;
        for field in &self.fields {
            write!(f, " {}", field)?;
        }
        Ok(())
    }
}

/// Simulation options carried by the `$` line.
///
/// Layout: `$ flags maxTimeStep speed currentBar voltageRange [powerBar [minTimeStep]]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimOptions {
    /// Display/solver bit set (see the `FLAG_*` constants)
    pub flags: u32,
    /// Maximum time step in seconds
    pub max_time_step: String,
    /// Simulation speed factor
    pub speed: String,
    /// Current animation speed (slider position)
    pub current_speed: String,
    /// Voltage colour range
    pub voltage_range: String,
    /// Power brightness (slider position), optional in older files
    pub power_brightness: Option<String>,
    /// Minimum time step in seconds, optional in older files
    pub min_time_step: Option<String>,
}

impl SimOptions {
    /// Current dots are shown
    pub const FLAG_SHOW_DOTS: u32 = 1;
    /// Small grid is enabled
    pub const FLAG_SMALL_GRID: u32 = 2;
    /// Voltage colouring is hidden (inverted)
    pub const FLAG_HIDE_VOLTAGE: u32 = 4;
    /// Power display is enabled
    pub const FLAG_SHOW_POWER: u32 = 8;
    /// Value labels are hidden (inverted)
    pub const FLAG_HIDE_VALUES: u32 = 16;
    /// Linear scale in filter views
    pub const FLAG_LINEAR_SCALE: u32 = 32;
    /// Automatic time step adjustment
    pub const FLAG_AUTO_TIME_STEP: u32 = 64;
    /// All bits with a known meaning
    pub const KNOWN_FLAGS: u32 = 127;

    /// Whether a flag bit is set
    pub fn has(&self, flag: u32) -> bool {
        self.flags & flag != 0
    }
}

/// A single circuit element line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Element type token (`r`, `c`, `w`, `150`, ...)
    pub kind: String,
    /// Start point x
    pub x1: i32,
    /// Start point y
    pub y1: i32,
    /// End point x
    pub x2: i32,
    /// End point y
    pub y2: i32,
    /// Element-specific flag bits
    pub flags: i32,
    /// Type-specific parameters, verbatim
    pub params: Vec<String>,
    /// Free text after `#`
    pub description: Option<String>,
    /// Model lines that precede this element in the text format
    pub models: Vec<Record>,
}

impl Element {
    /// Create an element with no parameters
    pub fn new(kind: impl Into<String>, x1: i32, y1: i32, x2: i32, y2: i32, flags: i32) -> Self {
        Self {
            kind: kind.into(),
            x1,
            y1,
            x2,
            y2,
            flags,
            params: Vec::new(),
            description: None,
            models: Vec::new(),
        }
    }

    /// Builder: append parameters
    pub fn with_params<I, S>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.params.extend(params.into_iter().map(Into::into));
        self
    }
}

/// The `h` line: which hint the renderer shows and for which elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hint {
    /// Hint type
    pub kind: i32,
    /// First referenced item
    pub item1: i32,
    /// Second referenced item
    pub item2: i32,
}

/// An in-memory circuit document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CircuitDocument {
    /// Options from the `$` line, if the source had one
    pub options: Option<SimOptions>,
    /// Elements in file order
    pub elements: Vec<Element>,
    /// Model lines not followed by any element
    pub trailing_models: Vec<Record>,
    /// Scope (`o`) lines
    pub scopes: Vec<Record>,
    /// Adjustable (`38`) lines
    pub adjustables: Vec<Record>,
    /// Hint (`h`) line
    pub hint: Option<Hint>,
}

impl CircuitDocument {
    /// Create an empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of circuit elements (options, models, scopes and hints excluded)
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// True when the document holds nothing at all
    pub fn is_empty(&self) -> bool {
        self.options.is_none()
            && self.elements.is_empty()
            && self.trailing_models.is_empty()
            && self.scopes.is_empty()
            && self.adjustables.is_empty()
            && self.hint.is_none()
    }

    /// Drop all content
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Append another document's content, keeping our options and hint when set.
    pub fn merge(&mut self, other: CircuitDocument) {
        if self.options.is_none() {
            self.options = other.options;
        }
        if self.hint.is_none() {
            self.hint = other.hint;
        }
        self.elements.extend(other.elements);
        self.trailing_models.extend(other.trailing_models);
        self.scopes.extend(other.scopes);
        self.adjustables.extend(other.adjustables);
    }
}
