// Astarte remote client: the API seam used by the datasource, and its HTTP implementation

mod client;
mod error;
mod paginator;

pub use client::{AstarteClient, AstarteClientBuilder, DEFAULT_PAGE_SIZE, DEFAULT_TIMEOUT};
pub use error::ApiError;
pub use paginator::TimeWindowPaginator;

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::models::{
    DeviceStats, InterfaceDescriptor, InterfaceVersion, RawSample, SeriesQuery, TimeRange,
};

/// Cursor over the pages of a datastream, in ascending time order.
///
/// `has_next_page` is true before the first page is requested; callers always
/// fetch one page and then keep going while it stays true.
#[async_trait]
pub trait DatastreamPaginator: Send {
    async fn next_page(&mut self) -> Result<Vec<RawSample>, ApiError>;

    fn has_next_page(&self) -> bool;
}

/// Calls the datasource needs from Astarte. Shared read-only for the lifetime of an instance.
#[async_trait]
pub trait AstarteApi: Send + Sync {
    /// Paginator over `query`'s datastream within `range`, oldest sample first.
    fn datastream_paginator(
        &self,
        realm: &str,
        query: &SeriesQuery,
        range: TimeRange,
    ) -> Result<Box<dyn DatastreamPaginator>, ApiError>;

    /// Interfaces a device currently implements, keyed by interface name.
    async fn device_introspection(
        &self,
        realm: &str,
        device_id: &str,
    ) -> Result<BTreeMap<String, InterfaceVersion>, ApiError>;

    async fn interface(
        &self,
        realm: &str,
        name: &str,
        major: u32,
    ) -> Result<InterfaceDescriptor, ApiError>;

    async fn device_stats(&self, realm: &str) -> Result<DeviceStats, ApiError>;
}
