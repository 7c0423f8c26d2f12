// Time-window datastream paginator (ascending order)
// First page: since=<from>&to=<to>&limit=<n>. Next pages: since_after=<last timestamp>.
// A page shorter than the limit is the last one.

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::Client;
use tracing::{debug, instrument};
use url::Url;

use super::client::get_data;
use super::{ApiError, DatastreamPaginator};
use crate::models::{RawSample, TimeRange};

pub struct TimeWindowPaginator {
    http: Client,
    token: String,
    url: Url,
    range: TimeRange,
    page_size: u32,
    cursor: Option<DateTime<Utc>>,
    has_next: bool,
    pages_fetched: usize,
}

impl TimeWindowPaginator {
    pub fn new(http: Client, token: String, url: Url, range: TimeRange, page_size: u32) -> Self {
        Self {
            http,
            token,
            url,
            range,
            page_size: page_size.max(1),
            cursor: None,
            has_next: true,
            pages_fetched: 0,
        }
    }

    /// URL of the next page to request.
    pub fn page_url(&self) -> Url {
        let mut url = self.url.clone();
        {
            let mut pairs = url.query_pairs_mut();
            match self.cursor {
                None => pairs.append_pair("since", &format_timestamp(self.range.from)),
                Some(last) => pairs.append_pair("since_after", &format_timestamp(last)),
            };
            pairs
                .append_pair("to", &format_timestamp(self.range.to))
                .append_pair("limit", &self.page_size.to_string());
        }
        url
    }
}

#[async_trait]
impl DatastreamPaginator for TimeWindowPaginator {
    #[instrument(skip_all, fields(operation = "datastream_page"))]
    async fn next_page(&mut self) -> Result<Vec<RawSample>, ApiError> {
        let url = self.page_url();
        let page: Vec<RawSample> = get_data(&self.http, &self.token, url).await?;
        self.pages_fetched += 1;
        self.has_next = page.len() >= self.page_size as usize;
        if let Some(last) = page.last() {
            self.cursor = Some(last.timestamp);
        }
        debug!(
            page = self.pages_fetched,
            samples = page.len(),
            has_next = self.has_next,
            "datastream page received"
        );
        Ok(page)
    }

    fn has_next_page(&self) -> bool {
        self.has_next
    }
}

fn format_timestamp(t: DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Millis, true)
}
