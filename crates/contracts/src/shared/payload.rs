use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// Largest integer a JSON consumer can represent exactly (2^53).
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Declared kind of an input, taken from its `type` attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputKind {
    Number,
    Range,
    Text,
    Other(String),
}

impl InputKind {
    /// Attribute values are matched ASCII case-insensitively; a missing or
    /// empty attribute means free text (`select` and `textarea` have none).
    pub fn from_type_attr(attr: Option<&str>) -> Self {
        let Some(raw) = attr else {
            return Self::Text;
        };
        match raw.trim().to_ascii_lowercase().as_str() {
            "number" => Self::Number,
            "range" => Self::Range,
            "" | "text" => Self::Text,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Number | Self::Range)
    }
}

/// One editable element as read from a form.
#[derive(Debug, Clone, PartialEq)]
pub struct InputField {
    pub name: Option<String>,
    pub kind: InputKind,
    pub value: String,
}

impl InputField {
    pub fn new(name: Option<&str>, kind: InputKind, value: impl Into<String>) -> Self {
        Self {
            name: name.map(str::to_string),
            kind,
            value: value.into(),
        }
    }

    /// JSON value sent for this field.
    pub fn json_value(&self) -> Value {
        if self.kind.is_numeric() {
            coerce_numeric(&self.value)
        } else {
            Value::String(self.value.clone())
        }
    }
}

/// Converts the text of a numeric input into a JSON number.
///
/// Policy:
/// - blank (after trimming) becomes `0`;
/// - a finite decimal float becomes that number, integral values within
///   ±2^53 as JSON integers;
/// - anything else, including `NaN`, infinities and hex literals, becomes `null`.
pub fn coerce_numeric(raw: &str) -> Value {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Value::from(0);
    }
    match trimmed.parse::<f64>() {
        Ok(number) if number.is_finite() => number_value(number),
        _ => Value::Null,
    }
}

fn number_value(number: f64) -> Value {
    if number.fract() == 0.0 && number.abs() <= MAX_SAFE_INTEGER {
        return Value::from(number as i64);
    }
    Number::from_f64(number)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

/// JSON object built from the named inputs of one form.
///
/// The key set is exactly the set of named inputs seen; it makes no
/// assumption about the server's schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Payload(Map<String, Value>);

impl Payload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_fields<'a>(fields: impl IntoIterator<Item = &'a InputField>) -> Self {
        let mut payload = Self::new();
        for field in fields {
            payload.insert_field(field);
        }
        payload
    }

    /// Adds `field` unless it is unnamed. A repeated name overwrites the
    /// earlier value.
    pub fn insert_field(&mut self, field: &InputField) {
        if let Some(name) = &field.name {
            self.0.insert(name.clone(), field.json_value());
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_json(&self) -> String {
        Value::Object(self.0.clone()).to_string()
    }
}
