// Paginated series fetcher: drains a datastream paginator into a TimeSeries.
// The first page is always requested, so auth/connectivity errors surface on empty windows too.
// Any failure (page, type, cancellation) discards everything read so far.

use tracing::{debug, instrument, warn};

use crate::astarte::{AstarteApi, DatastreamPaginator};
use crate::cancel::Cancellation;
use crate::error::QueryError;
use crate::models::{NumericSample, RawSample, SeriesQuery, TimeRange, TimeSeries};
use crate::normalize::{Normalized, normalize};

#[instrument(
    skip(api, query, cancel),
    fields(device = %query.device, interface = %query.interface_name, path = %query.path)
)]
pub async fn fetch_series(
    api: &dyn AstarteApi,
    realm: &str,
    query: &SeriesQuery,
    range: TimeRange,
    cancel: &Cancellation,
) -> Result<TimeSeries, QueryError> {
    let mut paginator = api.datastream_paginator(realm, query, range)?;
    let mut series = TimeSeries::new();
    let mut pages = 0usize;
    let mut skipped = 0usize;

    loop {
        let page = next_page(paginator.as_mut(), cancel).await?;
        pages += 1;
        for sample in page {
            skipped += append_sample(&mut series, sample, query)? as usize;
        }
        if !paginator.has_next_page() {
            break;
        }
    }

    debug!(pages, samples = series.len(), skipped, "series fetched");
    Ok(series)
}

async fn next_page(
    paginator: &mut dyn DatastreamPaginator,
    cancel: &Cancellation,
) -> Result<Vec<RawSample>, QueryError> {
    if cancel.is_cancelled() {
        return Err(QueryError::Cancelled);
    }
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(QueryError::Cancelled),
        page = paginator.next_page() => page.map_err(|e| {
            warn!(error = %e, "datastream page failed");
            QueryError::from(e)
        }),
    }
}

/// Appends one sample; returns true if it was skipped.
fn append_sample(
    series: &mut TimeSeries,
    sample: RawSample,
    query: &SeriesQuery,
) -> Result<bool, QueryError> {
    match normalize(&sample.value) {
        Ok(Normalized::Value(value)) => {
            series.push(NumericSample {
                timestamp: sample.timestamp,
                value,
            });
            Ok(false)
        }
        Ok(Normalized::Skip(e)) => {
            warn!(value = ?sample.value, timestamp = %sample.timestamp, error = %e, "could not parse value as numeric, skipping sample");
            Ok(true)
        }
        Err(unsupported) => {
            let err = QueryError::NonNumeric {
                device: query.device.clone(),
                interface: query.interface_name.clone(),
                path: query.path.clone(),
                kind: unsupported.kind,
            };
            warn!(error = %err, "non-numeric value in datastream");
            Err(err)
        }
    }
}
