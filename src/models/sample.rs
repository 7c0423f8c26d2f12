// Datastream samples as returned by Astarte, and their numeric form

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};

/// Value of one datastream sample, tagged by its JSON shape.
#[derive(Debug, Clone, PartialEq)]
pub enum SampleValue {
    Float(f64),
    Integer(i64),
    /// Strings carry `longinteger` values and anything else Astarte renders as text.
    NumericString(String),
    /// Booleans, nulls, objects and arrays.
    Other(serde_json::Value),
}

impl SampleValue {
    /// JSON kind name, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            SampleValue::Float(_) => "double",
            SampleValue::Integer(_) => "integer",
            SampleValue::NumericString(_) => "string",
            SampleValue::Other(serde_json::Value::Null) => "null",
            SampleValue::Other(serde_json::Value::Bool(_)) => "boolean",
            SampleValue::Other(serde_json::Value::Array(_)) => "array",
            SampleValue::Other(serde_json::Value::Object(_)) => "object",
            SampleValue::Other(_) => "unknown",
        }
    }
}

impl From<serde_json::Value> for SampleValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => SampleValue::Integer(i),
                // as_f64 only fails with arbitrary_precision, which is not enabled
                None => n
                    .as_f64()
                    .map(SampleValue::Float)
                    .unwrap_or(SampleValue::Other(serde_json::Value::Number(n))),
            },
            serde_json::Value::String(s) => SampleValue::NumericString(s),
            other => SampleValue::Other(other),
        }
    }
}

impl<'de> Deserialize<'de> for SampleValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        serde_json::Value::deserialize(deserializer).map(SampleValue::from)
    }
}

/// One sample of a datastream page. Extra fields (e.g. `reception_timestamp`) are ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawSample {
    pub timestamp: DateTime<Utc>,
    pub value: SampleValue,
}

/// A sample whose value has been normalized to `f64`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericSample {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}
