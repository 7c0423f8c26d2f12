// Shared test helpers: an in-memory AstarteApi with scripted datastream pages

#![allow(dead_code)]

use std::collections::{BTreeMap, VecDeque};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use astarte_datasource::astarte::{ApiError, AstarteApi, DatastreamPaginator};
use astarte_datasource::models::{
    DeviceStats, InterfaceDescriptor, InterfaceVersion, RawSample, SampleValue, SeriesQuery,
    TimeRange,
};
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};

/// A scripted page: samples, or the message of an `ApiError::Http`.
pub type Page = Result<Vec<RawSample>, String>;

pub fn ts(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).unwrap()
}

pub fn sample(secs: i64, value: serde_json::Value) -> RawSample {
    RawSample {
        timestamp: ts(secs),
        value: SampleValue::from(value),
    }
}

pub fn range() -> TimeRange {
    TimeRange::new(ts(0), ts(86_400))
}

pub fn series_query(device: &str) -> SeriesQuery {
    SeriesQuery {
        device: device.into(),
        interface_name: "org.example.Temp".into(),
        path: "/value".into(),
    }
}

#[derive(Default)]
pub struct FakeApi {
    /// Datastream pages per device id; unknown devices get one empty page.
    pub pages: BTreeMap<String, Vec<Page>>,
    pub introspection: BTreeMap<String, BTreeMap<String, InterfaceVersion>>,
    pub interfaces: BTreeMap<(String, u32), serde_json::Value>,
    pub stats_error: Option<String>,
    /// Delay before every page is served.
    pub page_delay: Option<Duration>,
    /// Number of remote calls of any kind.
    pub calls: Arc<AtomicUsize>,
}

impl FakeApi {
    pub fn with_pages(device: &str, pages: Vec<Page>) -> Self {
        let mut api = FakeApi::default();
        api.pages.insert(device.into(), pages);
        api
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn call_counter(&self) -> Arc<AtomicUsize> {
        self.calls.clone()
    }
}

pub struct FakePaginator {
    pages: VecDeque<Page>,
    delay: Option<Duration>,
    calls: Arc<AtomicUsize>,
    has_next: bool,
}

#[async_trait]
impl DatastreamPaginator for FakePaginator {
    async fn next_page(&mut self) -> Result<Vec<RawSample>, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let page = self.pages.pop_front().unwrap_or_else(|| Ok(vec![]));
        self.has_next = !self.pages.is_empty();
        page.map_err(ApiError::Http)
    }

    fn has_next_page(&self) -> bool {
        self.has_next
    }
}

#[async_trait]
impl AstarteApi for FakeApi {
    fn datastream_paginator(
        &self,
        _realm: &str,
        query: &SeriesQuery,
        _range: TimeRange,
    ) -> Result<Box<dyn DatastreamPaginator>, ApiError> {
        let pages = self.pages.get(&query.device).cloned().unwrap_or_default();
        Ok(Box::new(FakePaginator {
            pages: pages.into(),
            delay: self.page_delay,
            calls: self.calls.clone(),
            has_next: true,
        }))
    }

    async fn device_introspection(
        &self,
        _realm: &str,
        device_id: &str,
    ) -> Result<BTreeMap<String, InterfaceVersion>, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.introspection
            .get(device_id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("device {} not found", device_id)))
    }

    async fn interface(
        &self,
        _realm: &str,
        name: &str,
        major: u32,
    ) -> Result<InterfaceDescriptor, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.interfaces
            .get(&(name.to_string(), major))
            .cloned()
            .map(InterfaceDescriptor)
            .ok_or_else(|| ApiError::NotFound(format!("interface {} v{} not found", name, major)))
    }

    async fn device_stats(&self, _realm: &str) -> Result<DeviceStats, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.stats_error {
            Some(msg) => Err(ApiError::Auth(msg.clone())),
            None => Ok(DeviceStats {
                total_devices: 3,
                connected_devices: 1,
            }),
        }
    }
}
