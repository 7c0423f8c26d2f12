// Time series built by the fetcher and the host frame it is rendered into

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::NumericSample;

pub const FRAME_NAME: &str = "response";
pub const TIME_FIELD: &str = "Time";
pub const VALUE_FIELD: &str = "Value";

/// Ordered numeric series kept as two parallel columns of equal length.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeSeries {
    timestamps: Vec<DateTime<Utc>>,
    values: Vec<f64>,
}

impl TimeSeries {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, sample: NumericSample) {
        self.timestamps.push(sample.timestamp);
        self.values.push(sample.value);
    }

    pub fn timestamps(&self) -> &[DateTime<Utc>] {
        &self.timestamps
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Renders the series as the host's two-column frame (`Time` in epoch ms, `Value`).
    pub fn to_frame(&self) -> Frame {
        Frame {
            name: FRAME_NAME.to_string(),
            fields: vec![
                Field {
                    name: TIME_FIELD.to_string(),
                    values: FieldValues::Time(
                        self.timestamps.iter().map(|t| t.timestamp_millis()).collect(),
                    ),
                },
                Field {
                    name: VALUE_FIELD.to_string(),
                    values: FieldValues::Number(self.values.clone()),
                },
            ],
        }
    }
}

/// Tabular response unit understood by the host: named, typed columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub name: String,
    pub fields: Vec<Field>,
}

impl Frame {
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    #[serde(flatten)]
    pub values: FieldValues,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "values", rename_all = "lowercase")]
pub enum FieldValues {
    Time(Vec<i64>),
    Number(Vec<f64>),
}

impl FieldValues {
    pub fn len(&self) -> usize {
        match self {
            FieldValues::Time(v) => v.len(),
            FieldValues::Number(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
