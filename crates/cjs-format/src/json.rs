//! JSON 2.0 circuit documents.
//!
//! ```json
//! {
//!   "schema": { "format": "circuitjs", "version": "2.0" },
//!   "simulation": { "display": { ... }, "time_step": "0.000005", ... },
//!   "elements": {
//!     "R1": { "type": "r", "index": 0, "bounds": { ... }, "params": [10] }
//!   },
//!   "scopes": [ "o 0 64 0 4099 5 0.1 0 1" ],
//!   "hint": { "type": 1, "item1": 2, "item2": 3 }
//! }
//! ```
//!
//! Key order of `elements` carries no meaning; the importer restores element
//! order from each element's `index`. Numeric tokens that are plain integers
//! become JSON numbers, everything else stays a string so the original
//! spelling survives the trip.

use std::collections::{BTreeMap, HashMap};

use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{FormatError, Result};
use crate::{CircuitDocument, Element, Hint, Record, SimOptions};

/// Value of `schema.format`
pub const JSON_FORMAT_ID: &str = "circuitjs";
/// Value of `schema.version` written by [`to_json`]
pub const JSON_FORMAT_VERSION: &str = "2.0";

#[derive(Debug, Serialize, Deserialize)]
struct JsonDocument {
    schema: Schema,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    simulation: Option<Simulation>,
    #[serde(default)]
    elements: BTreeMap<String, JsonElement>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    models: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    scopes: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    adjustables: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    hint: Option<JsonHint>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Schema {
    format: String,
    version: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct DisplayOptions {
    show_dots: bool,
    small_grid: bool,
    show_voltage: bool,
    show_power: bool,
    show_values: bool,
}

#[derive(Debug, Serialize, Deserialize)]
struct Simulation {
    display: DisplayOptions,
    #[serde(default, skip_serializing_if = "is_false")]
    linear_scale: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    auto_time_step: bool,
    #[serde(default, skip_serializing_if = "is_zero_u32")]
    extra_flags: u32,
    time_step: Value,
    speed: Value,
    current_speed: Value,
    voltage_range: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    power_brightness: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    min_time_step: Option<Value>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Bounds {
    left: i32,
    top: i32,
    right: i32,
    bottom: i32,
}

#[derive(Debug, Serialize, Deserialize)]
struct JsonElement {
    #[serde(rename = "type")]
    kind: String,
    index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    bounds: Bounds,
    #[serde(rename = "_flags", default, skip_serializing_if = "is_zero_i32")]
    flags: i32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    params: Vec<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    models: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct JsonHint {
    #[serde(rename = "type")]
    kind: i32,
    item1: i32,
    item2: i32,
}

fn is_false(v: &bool) -> bool {
    !*v
}

fn is_zero_u32(v: &u32) -> bool {
    *v == 0
}

fn is_zero_i32(v: &i32) -> bool {
    *v == 0
}

fn token_to_value(token: &str) -> Value {
    match token.parse::<i64>() {
        Ok(n) if n.to_string() == token => Value::from(n),
        _ => Value::String(token.to_string()),
    }
}

fn value_to_token(field: &str, value: &Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(FormatError::invalid_value(
            field,
            format!("expected a number or string, found {}", other),
        )),
    }
}

fn record_from_line(field: &str, line: &str) -> Result<Record> {
    let mut tokens = line.split_whitespace();
    let tag = tokens
        .next()
        .ok_or_else(|| FormatError::invalid_value(field, "empty record line"))?;
    Ok(Record::new(tag, tokens.map(str::to_string).collect()))
}

fn id_prefix(kind: &str) -> &'static str {
    match kind {
        "r" => "R",
        "c" => "C",
        "l" => "L",
        "d" => "D",
        "t" => "Q",
        "f" | "j" => "J",
        "a" => "U",
        "T" => "T",
        "s" | "S" => "SW",
        "v" | "R" | "i" => "V",
        "g" => "GND",
        "w" => "W",
        "x" => "TXT",
        _ => "E",
    }
}

fn simulation_from_options(o: &SimOptions) -> Simulation {
    Simulation {
        display: DisplayOptions {
            show_dots: o.has(SimOptions::FLAG_SHOW_DOTS),
            small_grid: o.has(SimOptions::FLAG_SMALL_GRID),
            show_voltage: !o.has(SimOptions::FLAG_HIDE_VOLTAGE),
            show_power: o.has(SimOptions::FLAG_SHOW_POWER),
            show_values: !o.has(SimOptions::FLAG_HIDE_VALUES),
        },
        linear_scale: o.has(SimOptions::FLAG_LINEAR_SCALE),
        auto_time_step: o.has(SimOptions::FLAG_AUTO_TIME_STEP),
        extra_flags: o.flags & !SimOptions::KNOWN_FLAGS,
        time_step: token_to_value(&o.max_time_step),
        speed: token_to_value(&o.speed),
        current_speed: token_to_value(&o.current_speed),
        voltage_range: token_to_value(&o.voltage_range),
        power_brightness: o.power_brightness.as_deref().map(token_to_value),
        min_time_step: o.min_time_step.as_deref().map(token_to_value),
    }
}

fn options_from_simulation(s: &Simulation) -> Result<SimOptions> {
    let d = &s.display;
    let mut flags = s.extra_flags & !SimOptions::KNOWN_FLAGS;
    for (set, bit) in [
        (d.show_dots, SimOptions::FLAG_SHOW_DOTS),
        (d.small_grid, SimOptions::FLAG_SMALL_GRID),
        (!d.show_voltage, SimOptions::FLAG_HIDE_VOLTAGE),
        (d.show_power, SimOptions::FLAG_SHOW_POWER),
        (!d.show_values, SimOptions::FLAG_HIDE_VALUES),
        (s.linear_scale, SimOptions::FLAG_LINEAR_SCALE),
        (s.auto_time_step, SimOptions::FLAG_AUTO_TIME_STEP),
    ] {
        if set {
            flags |= bit;
        }
    }

    if s.min_time_step.is_some() && s.power_brightness.is_none() {
        return Err(FormatError::invalid_value(
            "simulation.min_time_step",
            "requires simulation.power_brightness",
        ));
    }

    Ok(SimOptions {
        flags,
        max_time_step: value_to_token("simulation.time_step", &s.time_step)?,
        speed: value_to_token("simulation.speed", &s.speed)?,
        current_speed: value_to_token("simulation.current_speed", &s.current_speed)?,
        voltage_range: value_to_token("simulation.voltage_range", &s.voltage_range)?,
        power_brightness: s
            .power_brightness
            .as_ref()
            .map(|v| value_to_token("simulation.power_brightness", v))
            .transpose()?,
        min_time_step: s
            .min_time_step
            .as_ref()
            .map(|v| value_to_token("simulation.min_time_step", v))
            .transpose()?,
    })
}

/// Serialize a document as pretty-printed JSON 2.0.
pub fn to_json(doc: &CircuitDocument) -> Result<String> {
    let mut counters: HashMap<&'static str, usize> = HashMap::new();
    let mut elements = BTreeMap::new();

    for (index, e) in doc.elements.iter().enumerate() {
        let prefix = id_prefix(&e.kind);
        let n = counters.entry(prefix).or_insert(0);
        *n += 1;
        elements.insert(
            format!("{}{}", prefix, n),
            JsonElement {
                kind: e.kind.clone(),
                index,
                description: e.description.clone(),
                bounds: Bounds {
                    left: e.x1,
                    top: e.y1,
                    right: e.x2,
                    bottom: e.y2,
                },
                flags: e.flags,
                params: e.params.iter().map(|p| token_to_value(p)).collect(),
                models: e.models.iter().map(Record::to_string).collect(),
            },
        );
    }

    let json_doc = JsonDocument {
        schema: Schema {
            format: JSON_FORMAT_ID.to_string(),
            version: JSON_FORMAT_VERSION.to_string(),
        },
        simulation: doc.options.as_ref().map(simulation_from_options),
        elements,
        models: doc.trailing_models.iter().map(Record::to_string).collect(),
        scopes: doc.scopes.iter().map(Record::to_string).collect(),
        adjustables: doc.adjustables.iter().map(Record::to_string).collect(),
        hint: doc.hint.map(|h| JsonHint {
            kind: h.kind,
            item1: h.item1,
            item2: h.item2,
        }),
    };

    Ok(serde_json::to_string_pretty(&json_doc)?)
}

fn validate_schema(root: &Value) -> Result<()> {
    let schema = root
        .get("schema")
        .and_then(Value::as_object)
        .ok_or_else(|| FormatError::schema("missing 'schema' object"))?;

    let format = schema.get("format").and_then(Value::as_str).unwrap_or_default();
    if format != JSON_FORMAT_ID {
        return Err(FormatError::schema(format!(
            "format is '{}', expected '{}'",
            format, JSON_FORMAT_ID
        )));
    }

    let version = schema.get("version").and_then(Value::as_str).unwrap_or_default();
    if !version.starts_with("2.") {
        return Err(FormatError::schema(format!(
            "version '{}' is not supported (expected 2.x)",
            version
        )));
    }
    Ok(())
}

/// Read a JSON 2.0 document.
///
/// The schema must name format `circuitjs` with a `2.x` version.
pub fn from_json(input: &str) -> Result<CircuitDocument> {
    let root: Value = serde_json::from_str(input)?;
    validate_schema(&root)?;
    let json_doc: JsonDocument = serde_json::from_value(root)?;

    let mut doc = CircuitDocument::new();
    doc.options = json_doc
        .simulation
        .as_ref()
        .map(options_from_simulation)
        .transpose()?;

    let mut ordered: Vec<(String, JsonElement)> = json_doc.elements.into_iter().collect();
    ordered.sort_by(|(a_id, a), (b_id, b)| a.index.cmp(&b.index).then_with(|| a_id.cmp(b_id)));

    for (id, je) in ordered {
        let params = je
            .params
            .iter()
            .map(|v| value_to_token(&format!("elements.{}.params", id), v))
            .collect::<Result<Vec<_>>>()?;
        let models = je
            .models
            .iter()
            .map(|m| record_from_line(&format!("elements.{}.models", id), m))
            .collect::<Result<Vec<_>>>()?;

        let mut element = Element::new(
            je.kind,
            je.bounds.left,
            je.bounds.top,
            je.bounds.right,
            je.bounds.bottom,
            je.flags,
        )
        .with_params(params);
        element.description = je.description.filter(|d| !d.is_empty());
        element.models = models;
        doc.elements.push(element);
    }

    doc.trailing_models = json_doc
        .models
        .iter()
        .map(|m| record_from_line("models", m))
        .collect::<Result<_>>()?;
    doc.scopes = json_doc
        .scopes
        .iter()
        .map(|s| record_from_line("scopes", s))
        .collect::<Result<_>>()?;
    doc.adjustables = json_doc
        .adjustables
        .iter()
        .map(|a| record_from_line("adjustables", a))
        .collect::<Result<_>>()?;
    doc.hint = json_doc.hint.map(|h| Hint {
        kind: h.kind,
        item1: h.item1,
        item2: h.item2,
    });

    debug!(
        "JSON import: {} elements, {} scopes, {} adjustables",
        doc.elements.len(),
        doc.scopes.len(),
        doc.adjustables.len()
    );
    Ok(doc)
}
