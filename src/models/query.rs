// Query models: the host's query payload, time range, and batch request

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Time window of a query. `from` is inclusive, `to` is exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl TimeRange {
    pub fn new(from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        Self { from, to }
    }
}

/// Query payload as sent by the host's query editor. Unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesQuery {
    pub device: String,
    pub interface_name: String,
    pub path: String,
}

impl SeriesQuery {
    /// Checks the fields that must be present before any remote call is made.
    pub fn validate(&self) -> Result<(), String> {
        if self.device.trim().is_empty() {
            return Err("device must be non-empty".into());
        }
        if self.interface_name.trim().is_empty() {
            return Err("interfaceName must be non-empty".into());
        }
        Ok(())
    }

    /// Path segments below the interface; `"/a/b"`, `"a/b"` and `"a/b/"` are equivalent.
    pub fn path_segments(&self) -> impl Iterator<Item = &str> {
        self.path.split('/').filter(|s| !s.is_empty())
    }
}

/// One query of a batch: caller-supplied id, its window, and the raw JSON model.
#[derive(Debug, Clone)]
pub struct DataQuery {
    pub ref_id: String,
    pub time_range: TimeRange,
    pub json: Bytes,
}

/// A batch of queries resolved independently of each other.
#[derive(Debug, Clone, Default)]
pub struct QueryDataRequest {
    pub queries: Vec<DataQuery>,
}
