use std::collections::BTreeMap;

use chrono::{Local, NaiveDateTime};
use serde_json::{Map, Number, Value};

use crate::fields::{FieldDescriptor, InputKind};

/// Display/edit format for datetime fields, as the backend's admin
/// UI used them ("datetime-local" style, minute precision).
pub const DATETIME_LOCAL_FORMAT: &str = "%Y-%m-%dT%H:%M";

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(f64),
    Checkbox(bool),
    DateTime(String),
}

impl FieldValue {
    pub fn display(&self) -> String {
        match self {
            FieldValue::Text(s) | FieldValue::DateTime(s) => s.clone(),
            FieldValue::Number(n) => format_number(*n),
            FieldValue::Checkbox(b) => if *b { "yes" } else { "no" }.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FormControl {
    pub field: FieldDescriptor,
    pub value: FieldValue,
    pub errors: Vec<String>,
}

/// The runtime form model for one entity. Rebuilt wholesale when a
/// sync refresh delivers fresh values; the server stays authoritative.
#[derive(Debug, Clone, Default)]
pub struct FormModel {
    pub controls: Vec<FormControl>,
}

impl FormModel {
    pub fn build(fields: Vec<FieldDescriptor>, existing: &Map<String, Value>) -> Self {
        let controls = fields
            .into_iter()
            .map(|field| {
                let value = seed_value(&field, existing.get(field.key.as_str()));
                FormControl {
                    field,
                    value,
                    errors: Vec::new(),
                }
            })
            .collect();
        Self { controls }
    }

    pub fn len(&self) -> usize {
        self.controls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.controls.is_empty()
    }

    pub fn control(&self, key: &str) -> Option<&FormControl> {
        self.controls.iter().find(|c| c.field.key == key)
    }

    /// Applies a raw edit to one control, parsing per input kind.
    /// Returns false (and records the error) when the raw text does
    /// not parse; the stored value is left unchanged in that case.
    pub fn set_input(&mut self, index: usize, raw: &str) -> bool {
        let Some(control) = self.controls.get_mut(index) else {
            return false;
        };
        control.errors.clear();
        let trimmed = raw.trim();
        match control.field.input {
            InputKind::Text | InputKind::Select => {
                control.value = FieldValue::Text(trimmed.to_string());
                true
            }
            InputKind::Number => match trimmed.parse::<f64>() {
                Ok(num) if num.is_finite() => {
                    control.value = FieldValue::Number(num);
                    true
                }
                _ if trimmed.is_empty() => {
                    control.value = FieldValue::Number(0.0);
                    true
                }
                _ => {
                    control.errors.push("not a number".to_string());
                    false
                }
            },
            InputKind::Checkbox => {
                let flag = matches!(trimmed.to_lowercase().as_str(), "true" | "yes" | "1" | "on");
                control.value = FieldValue::Checkbox(flag);
                true
            }
            InputKind::DateTime => {
                if trimmed.is_empty() || parse_datetime_local(trimmed).is_some() {
                    control.value = FieldValue::DateTime(trimmed.to_string());
                    true
                } else {
                    control.errors.push("unparsable date".to_string());
                    false
                }
            }
        }
    }

    pub fn toggle(&mut self, index: usize) {
        if let Some(control) = self.controls.get_mut(index) {
            if let FieldValue::Checkbox(flag) = control.value {
                control.value = FieldValue::Checkbox(!flag);
                control.errors.clear();
            }
        }
    }

    /// Cycles a select control through its catalog options.
    pub fn cycle_option(&mut self, index: usize, forward: bool) {
        let Some(control) = self.controls.get_mut(index) else {
            return;
        };
        if control.field.input != InputKind::Select || control.field.options.is_empty() {
            return;
        }
        let current = match &control.value {
            FieldValue::Text(s) => s.clone(),
            _ => String::new(),
        };
        let len = control.field.options.len();
        let pos = control.field.options.iter().position(|o| *o == current);
        let next = match (pos, forward) {
            (Some(i), true) => (i + 1) % len,
            (Some(i), false) => (i + len - 1) % len,
            (None, _) => 0,
        };
        control.value = FieldValue::Text(control.field.options[next].clone());
        control.errors.clear();
    }

    /// Client-side validation: numeric stats never negative, status
    /// required, datetimes must parse. Everything else is the
    /// server's call.
    pub fn validate(&mut self) -> bool {
        let mut ok = true;
        for control in &mut self.controls {
            control.errors.clear();
            match (&control.value, control.field.input) {
                (FieldValue::Number(n), InputKind::Number) => {
                    if *n < 0.0 {
                        control.errors.push("must not be negative".to_string());
                        ok = false;
                    }
                }
                (FieldValue::Text(s), InputKind::Select) => {
                    if control.field.key == "status" && s.trim().is_empty() {
                        control.errors.push("required".to_string());
                        ok = false;
                    }
                }
                (FieldValue::DateTime(s), InputKind::DateTime) => {
                    if !s.trim().is_empty() && parse_datetime_local(s).is_none() {
                        control.errors.push("unparsable date".to_string());
                        ok = false;
                    }
                }
                _ => {}
            }
        }
        ok
    }

    /// Marks controls invalid from a server-side 400 field map.
    pub fn apply_server_errors(&mut self, fields: &BTreeMap<String, Vec<String>>) {
        for control in &mut self.controls {
            if let Some(messages) = fields.get(&control.field.key) {
                control.errors = messages.clone();
            }
        }
    }

    pub fn has_errors(&self) -> bool {
        self.controls.iter().any(|c| !c.errors.is_empty())
    }

    /// Wire payload: numbers with negatives clamped to zero,
    /// datetime-local strings normalized to the backend timestamp
    /// format, checkboxes as booleans.
    pub fn serialize(&self) -> Map<String, Value> {
        let mut out = Map::new();
        for control in &self.controls {
            let value = match &control.value {
                FieldValue::Text(s) => Value::String(s.clone()),
                FieldValue::Checkbox(b) => Value::Bool(*b),
                FieldValue::Number(n) => number_value(n.max(0.0)),
                FieldValue::DateTime(s) => {
                    Value::String(datetime_to_wire(s).unwrap_or_else(|| s.clone()))
                }
            };
            out.insert(control.field.key.clone(), value);
        }
        out
    }
}

fn seed_value(field: &FieldDescriptor, existing: Option<&Value>) -> FieldValue {
    match field.input {
        InputKind::Number => {
            let num = existing.and_then(coerce_number).unwrap_or(0.0);
            FieldValue::Number(num)
        }
        InputKind::Checkbox => {
            let flag = existing.and_then(|v| v.as_bool()).unwrap_or(false);
            FieldValue::Checkbox(flag)
        }
        InputKind::Text | InputKind::Select => {
            let text = existing
                .and_then(|v| v.as_str().map(|s| s.to_string()))
                .unwrap_or_default();
            FieldValue::Text(text)
        }
        InputKind::DateTime => {
            let text = existing
                .and_then(|v| v.as_str())
                .map(normalize_wire_datetime)
                .unwrap_or_else(|| Local::now().format(DATETIME_LOCAL_FORMAT).to_string());
            FieldValue::DateTime(text)
        }
    }
}

fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Wire timestamps arrive like "2025-03-04T20:00:00Z"; the form edits
/// them at minute precision. `get` keeps a byte 16 that falls inside
/// a multibyte character from panicking; the uncut string then fails
/// validation instead.
pub fn normalize_wire_datetime(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('Z');
    match trimmed.get(..16) {
        Some(prefix) => prefix.replace(' ', "T"),
        None => trimmed.replace(' ', "T"),
    }
}

pub fn parse_datetime_local(raw: &str) -> Option<NaiveDateTime> {
    const FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S",
    ];
    let trimmed = raw.trim();
    for fmt in FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Some(dt);
        }
    }
    None
}

pub fn datetime_to_wire(raw: &str) -> Option<String> {
    let dt = parse_datetime_local(raw)?;
    Some(dt.format("%Y-%m-%dT%H:%M:%SZ").to_string())
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 {
        format!("{}", n as i64)
    } else {
        format!("{n:.3}")
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    }
}

/// Integral values serialize as integers so an unedited round trip
/// reproduces what the backend sent.
fn number_value(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < (i64::MAX as f64) {
        Value::Number(Number::from(n as i64))
    } else {
        Number::from_f64(n)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    }
}
