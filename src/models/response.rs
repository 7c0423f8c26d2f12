// Wire responses handed back to the host: query results, resources, health

use std::collections::BTreeMap;

use axum::http::StatusCode;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use super::{Frame, TimeSeries};
use crate::error::QueryError;

/// Outcome of one query on the wire: frames on success, error text otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataResponse {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub frames: Vec<Frame>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<String>,
}

impl From<&Result<TimeSeries, QueryError>> for DataResponse {
    fn from(result: &Result<TimeSeries, QueryError>) -> Self {
        match result {
            Ok(series) => DataResponse {
                frames: vec![series.to_frame()],
                error: None,
                error_kind: None,
            },
            Err(e) => DataResponse {
                frames: vec![],
                error: Some(e.to_string()),
                error_kind: Some(e.kind().to_string()),
            },
        }
    }
}

/// Per-query outcomes of a batch, keyed by `refId`.
#[derive(Debug, Default)]
pub struct QueryDataResponse {
    pub responses: BTreeMap<String, Result<TimeSeries, QueryError>>,
}

impl QueryDataResponse {
    pub fn get(&self, ref_id: &str) -> Option<&Result<TimeSeries, QueryError>> {
        self.responses.get(ref_id)
    }

    pub fn to_wire(&self) -> QueryDataResponseBody {
        QueryDataResponseBody {
            results: self
                .responses
                .iter()
                .map(|(ref_id, result)| (ref_id.clone(), DataResponse::from(result)))
                .collect(),
        }
    }
}

/// JSON body of `POST /api/query`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryDataResponseBody {
    pub results: BTreeMap<String, DataResponse>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HealthStatus {
    Ok,
    Error,
}

/// Result of a health check, shown to the operator on the settings page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthCheck {
    pub status: HealthStatus,
    pub message: String,
}

impl HealthCheck {
    pub fn is_ok(&self) -> bool {
        self.status == HealthStatus::Ok
    }
}

/// Status and raw body of a resource call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceResponse {
    pub status: StatusCode,
    pub body: Bytes,
}

impl ResourceResponse {
    pub fn ok(body: impl Into<Bytes>) -> Self {
        Self {
            status: StatusCode::OK,
            body: body.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            body: Bytes::from(message.into()),
        }
    }
}
