// Handlers: version, query batch, health, resources

use axum::{
    Json,
    extract::{OriginalUri, State},
    http::header,
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::AppState;
use crate::error::QueryError;
use crate::models::{
    DataQuery, HealthCheck, QueryDataRequest, QueryDataResponseBody, ResourceResponse, TimeRange,
};
use crate::version::{NAME, VERSION};

/// Body of `POST /api/query`. Items are decoded one by one so a malformed item
/// only fails its own refId.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryRequestBody {
    pub range: TimeRange,
    pub queries: Vec<serde_json::Value>,
}

/// Queries ready to dispatch, plus items rejected while decoding their envelope.
/// A refId appears in at most one of the two; the later item in the body wins.
#[derive(Debug, Default)]
pub struct QueryBatch {
    pub request: QueryDataRequest,
    pub rejected: Vec<(String, QueryError)>,
}

impl QueryRequestBody {
    pub fn into_batch(self) -> QueryBatch {
        let mut batch = QueryBatch::default();
        for (index, item) in self.queries.into_iter().enumerate() {
            let serde_json::Value::Object(mut model) = item else {
                warn!(index, "query item is not an object, dropping it");
                continue;
            };
            let ref_id = match model.remove("refId") {
                Some(serde_json::Value::String(ref_id)) => ref_id,
                _ => {
                    warn!(index, "query item has no string refId, dropping it");
                    continue;
                }
            };
            let time_range = match model.remove("timeRange") {
                None | Some(serde_json::Value::Null) => Ok(self.range),
                Some(raw) => serde_json::from_value::<TimeRange>(raw)
                    .map_err(|e| QueryError::Validation(format!("invalid timeRange: {}", e))),
            };

            if batch.request.queries.iter().any(|q| q.ref_id == ref_id)
                || batch.rejected.iter().any(|(id, _)| *id == ref_id)
            {
                warn!(ref_id = %ref_id, "duplicate refId in batch, keeping the last query");
            }
            batch.request.queries.retain(|q| q.ref_id != ref_id);
            batch.rejected.retain(|(id, _)| *id != ref_id);

            match time_range {
                Ok(time_range) => batch.request.queries.push(DataQuery {
                    ref_id,
                    time_range,
                    json: Bytes::from(serde_json::Value::Object(model).to_string()),
                }),
                Err(e) => batch.rejected.push((ref_id, e)),
            }
        }
        batch
    }
}

/// GET /version: service name and version (from Cargo.toml at build time).
pub(super) async fn version_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "name": NAME,
        "version": VERSION,
    }))
}

/// POST /api/query: resolves every query; failures are reported per refId, never as HTTP errors.
pub(super) async fn query_handler(
    State(state): State<AppState>,
    Json(body): Json<QueryRequestBody>,
) -> Json<QueryDataResponseBody> {
    let batch = body.into_batch();
    let mut response = state
        .datasource
        .query_data(&batch.request, &state.cancel)
        .await;
    for (ref_id, e) in batch.rejected {
        warn!(ref_id = %ref_id, kind = e.kind(), error = %e, "query failed");
        response.responses.insert(ref_id, Err(e));
    }
    Json(response.to_wire())
}

/// GET /api/health: always 200; the status lives in the body.
pub(super) async fn health_handler(State(state): State<AppState>) -> Json<HealthCheck> {
    Json(state.datasource.check_health().await)
}

/// GET /api/resources[/*]: only the query string is looked at.
pub(super) async fn resource_handler(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
) -> Response {
    state
        .datasource
        .call_resource(&uri.to_string())
        .await
        .into_response()
}

impl IntoResponse for ResourceResponse {
    fn into_response(self) -> Response {
        let content_type = if self.status.is_success() {
            "application/json"
        } else {
            "text/plain; charset=utf-8"
        };
        (self.status, [(header::CONTENT_TYPE, content_type)], self.body).into_response()
    }
}
