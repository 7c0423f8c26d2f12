// Astarte HTTP client over reqwest: AppEngine (devices, datastreams, stats) and Realm Management (interfaces)

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use super::paginator::TimeWindowPaginator;
use super::{ApiError, AstarteApi, DatastreamPaginator};
use crate::models::{
    DeviceStats, InterfaceDescriptor, InterfaceVersion, SeriesQuery, TimeRange,
};
use crate::version::USER_AGENT;

/// Samples requested per datastream page.
pub const DEFAULT_PAGE_SIZE: u32 = 10_000;
/// Per-request timeout of the underlying HTTP client.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Authenticated client for one Astarte installation. Cheap to clone.
#[derive(Clone)]
pub struct AstarteClient {
    http: Client,
    appengine_url: Url,
    realm_management_url: Url,
    token: String,
    page_size: u32,
}

impl fmt::Debug for AstarteClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AstarteClient")
            .field("appengine_url", &self.appengine_url.as_str())
            .field("realm_management_url", &self.realm_management_url.as_str())
            .field("page_size", &self.page_size)
            .finish_non_exhaustive()
    }
}

impl AstarteClient {
    pub fn builder() -> AstarteClientBuilder {
        AstarteClientBuilder::default()
    }

    pub fn appengine_url(&self) -> &Url {
        &self.appengine_url
    }

    pub fn realm_management_url(&self) -> &Url {
        &self.realm_management_url
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// `{appengine}/v1/{realm}/devices/{device}/interfaces/{interface}/{path...}`
    pub fn datastream_url(&self, realm: &str, query: &SeriesQuery) -> Result<Url, ApiError> {
        let segments = [
            "v1",
            realm,
            "devices",
            query.device.as_str(),
            "interfaces",
            query.interface_name.as_str(),
        ];
        endpoint(
            &self.appengine_url,
            segments.into_iter().chain(query.path_segments()),
        )
    }

    async fn get_data<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        get_data(&self.http, &self.token, url).await
    }
}

#[async_trait]
impl AstarteApi for AstarteClient {
    fn datastream_paginator(
        &self,
        realm: &str,
        query: &SeriesQuery,
        range: TimeRange,
    ) -> Result<Box<dyn DatastreamPaginator>, ApiError> {
        let url = self.datastream_url(realm, query)?;
        Ok(Box::new(TimeWindowPaginator::new(
            self.http.clone(),
            self.token.clone(),
            url,
            range,
            self.page_size,
        )))
    }

    #[instrument(skip(self), fields(api = "appengine", operation = "device_introspection"))]
    async fn device_introspection(
        &self,
        realm: &str,
        device_id: &str,
    ) -> Result<BTreeMap<String, InterfaceVersion>, ApiError> {
        let url = endpoint(&self.appengine_url, ["v1", realm, "devices", device_id])?;
        let details: DeviceDetails = self.get_data(url).await?;
        debug!(interfaces = details.introspection.len(), "received device introspection");
        Ok(details.introspection)
    }

    #[instrument(skip(self), fields(api = "realmmanagement", operation = "interface"))]
    async fn interface(
        &self,
        realm: &str,
        name: &str,
        major: u32,
    ) -> Result<InterfaceDescriptor, ApiError> {
        let major = major.to_string();
        let url = endpoint(
            &self.realm_management_url,
            ["v1", realm, "interfaces", name, major.as_str()],
        )?;
        self.get_data(url).await
    }

    #[instrument(skip(self), fields(api = "appengine", operation = "device_stats"))]
    async fn device_stats(&self, realm: &str) -> Result<DeviceStats, ApiError> {
        let url = endpoint(&self.appengine_url, ["v1", realm, "stats", "devices"])?;
        self.get_data(url).await
    }
}

/// Builder for [`AstarteClient`].
#[derive(Debug, Default)]
pub struct AstarteClientBuilder {
    api_url: Option<String>,
    appengine_url: Option<String>,
    realm_management_url: Option<String>,
    token: Option<String>,
    page_size: Option<u32>,
    timeout: Option<Duration>,
}

impl AstarteClientBuilder {
    /// Base API URL; services live at `{api_url}/appengine` and `{api_url}/realmmanagement`.
    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = Some(url.into());
        self
    }

    /// Explicit AppEngine URL, e.g. `http://localhost:4002` for a local installation.
    pub fn appengine_url(mut self, url: impl Into<String>) -> Self {
        self.appengine_url = Some(url.into());
        self
    }

    /// Explicit Realm Management URL.
    pub fn realm_management_url(mut self, url: impl Into<String>) -> Self {
        self.realm_management_url = Some(url.into());
        self
    }

    /// JWT sent as a bearer token on every request.
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn build(self) -> Result<AstarteClient, ApiError> {
        let base = self.api_url.as_deref().map(Url::parse).transpose()?;
        let appengine_url = service_url(self.appengine_url, base.as_ref(), "appengine")?;
        let realm_management_url =
            service_url(self.realm_management_url, base.as_ref(), "realmmanagement")?;

        let http = Client::builder()
            .timeout(self.timeout.unwrap_or(DEFAULT_TIMEOUT))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(AstarteClient {
            http,
            appengine_url,
            realm_management_url,
            token: self.token.unwrap_or_default(),
            page_size: self.page_size.unwrap_or(DEFAULT_PAGE_SIZE).max(1),
        })
    }
}

fn service_url(explicit: Option<String>, base: Option<&Url>, service: &str) -> Result<Url, ApiError> {
    match (explicit, base) {
        (Some(url), _) => Ok(Url::parse(&url)?),
        (None, Some(base)) => endpoint(base, [service]),
        (None, None) => Err(ApiError::Url(format!(
            "no API URL configured for {}",
            service
        ))),
    }
}

/// Appends percent-encoded path segments to `base`.
pub(super) fn endpoint<'a>(
    base: &Url,
    segments: impl IntoIterator<Item = &'a str>,
) -> Result<Url, ApiError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| ApiError::Url(format!("{} cannot be a base URL", base)))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// GETs `url` with the bearer token and unwraps Astarte's `{"data": ...}` envelope.
pub(super) async fn get_data<T: DeserializeOwned>(
    http: &Client,
    token: &str,
    url: Url,
) -> Result<T, ApiError> {
    let response = http.get(url.clone()).bearer_auth(token).send().await?;
    let response = check_status(response, &url).await?;
    let envelope: DataEnvelope<T> = response
        .json()
        .await
        .map_err(|e| ApiError::Parse(e.to_string()))?;
    Ok(envelope.data)
}

async fn check_status(response: Response, url: &Url) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(ApiError::Auth(format!(
            "{} on {}: {}",
            status,
            url.path(),
            body
        ))),
        StatusCode::NOT_FOUND => Err(ApiError::NotFound(format!("{}: {}", url.path(), body))),
        _ => Err(ApiError::Status {
            status: status.as_u16(),
            body,
        }),
    }
}

#[derive(Debug, Deserialize)]
struct DataEnvelope<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct DeviceDetails {
    #[serde(default)]
    introspection: BTreeMap<String, InterfaceVersion>,
}
