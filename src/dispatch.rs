// Query dispatcher: per-query parse, validate, fetch. Batches resolve sequentially and
// independently; each outcome is keyed by the query's refId.

use tracing::{debug, info, warn};

use crate::astarte::AstarteApi;
use crate::cancel::Cancellation;
use crate::error::QueryError;
use crate::fetcher::fetch_series;
use crate::models::{DataQuery, QueryDataRequest, QueryDataResponse, SeriesQuery, TimeSeries};

/// Parses and validates a raw query payload.
pub fn parse_query(json: &[u8]) -> Result<SeriesQuery, QueryError> {
    let query: SeriesQuery =
        serde_json::from_slice(json).map_err(|e| QueryError::Validation(e.to_string()))?;
    query.validate().map_err(QueryError::Validation)?;
    Ok(query)
}

/// Runs one query. No retries: remote failures come back as-is.
pub async fn dispatch(
    query: &DataQuery,
    realm: &str,
    api: &dyn AstarteApi,
    cancel: &Cancellation,
) -> Result<TimeSeries, QueryError> {
    debug!(ref_id = %query.ref_id, json = %String::from_utf8_lossy(&query.json), "received query");
    let series_query = parse_query(&query.json)?;
    let range = query.time_range;
    if range.to < range.from {
        return Err(QueryError::Validation(format!(
            "time range ends ({}) before it starts ({})",
            range.to, range.from
        )));
    }
    fetch_series(api, realm, &series_query, range, cancel).await
}

/// Resolves every query of the batch, one after the other.
pub async fn query_data(
    request: &QueryDataRequest,
    realm: &str,
    api: &dyn AstarteApi,
    cancel: &Cancellation,
) -> QueryDataResponse {
    let mut response = QueryDataResponse::default();
    for query in &request.queries {
        let result = dispatch(query, realm, api, cancel).await;
        match &result {
            Ok(series) => info!(ref_id = %query.ref_id, samples = series.len(), "query succeeded"),
            Err(e) => warn!(ref_id = %query.ref_id, kind = e.kind(), error = %e, "query failed"),
        }
        if response
            .responses
            .insert(query.ref_id.clone(), result)
            .is_some()
        {
            warn!(ref_id = %query.ref_id, "duplicate refId in batch, keeping the last result");
        }
    }
    response
}
