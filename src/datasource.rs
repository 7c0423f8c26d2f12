// Datasource instance: owns the Astarte client and the realm, and exposes the three
// host capabilities (queries, health, resources). Dropping the instance disposes it.

use async_trait::async_trait;
use tracing::info;

use crate::astarte::{AstarteApi, AstarteClient};
use crate::cancel::Cancellation;
use crate::config::AstarteConfig;
use crate::models::{HealthCheck, QueryDataRequest, QueryDataResponse, ResourceResponse};
use crate::{dispatch, health, resources};

#[async_trait]
pub trait QueryRunner: Send + Sync {
    async fn query_data(
        &self,
        request: &QueryDataRequest,
        cancel: &Cancellation,
    ) -> QueryDataResponse;
}

#[async_trait]
pub trait HealthProbe: Send + Sync {
    async fn check_health(&self) -> HealthCheck;
}

#[async_trait]
pub trait ResourceRouter: Send + Sync {
    async fn call_resource(&self, request_url: &str) -> ResourceResponse;
}

/// Everything the HTTP surface needs from a datasource.
pub trait DatasourceHandler: QueryRunner + HealthProbe + ResourceRouter {}

impl<T: QueryRunner + HealthProbe + ResourceRouter> DatasourceHandler for T {}

pub struct Datasource {
    api: Box<dyn AstarteApi>,
    realm: String,
}

impl Datasource {
    pub fn new(api: Box<dyn AstarteApi>, realm: impl Into<String>) -> Self {
        let realm = realm.into();
        info!(realm = %realm, "datasource instance created");
        Self { api, realm }
    }

    /// Builds the HTTP client from settings. The token is never logged.
    pub fn from_config(config: &AstarteConfig) -> anyhow::Result<Self> {
        let mut builder = AstarteClient::builder()
            .api_url(&config.api_url)
            .token(&config.token)
            .page_size(config.page_size)
            .timeout(std::time::Duration::from_secs(config.timeout_secs));
        if let Some(url) = &config.appengine_url {
            builder = builder.appengine_url(url);
        }
        if let Some(url) = &config.realm_management_url {
            builder = builder.realm_management_url(url);
        }
        let client = builder
            .build()
            .map_err(|e| anyhow::anyhow!("astarte client: {}", e))?;
        info!(
            appengine = %client.appengine_url(),
            realm_management = %client.realm_management_url(),
            page_size = client.page_size(),
            "astarte client ready"
        );
        Ok(Self::new(Box::new(client), &config.realm))
    }
}

#[async_trait]
impl QueryRunner for Datasource {
    async fn query_data(
        &self,
        request: &QueryDataRequest,
        cancel: &Cancellation,
    ) -> QueryDataResponse {
        info!(queries = request.queries.len(), "query_data called");
        dispatch::query_data(request, &self.realm, self.api.as_ref(), cancel).await
    }
}

#[async_trait]
impl HealthProbe for Datasource {
    async fn check_health(&self) -> HealthCheck {
        health::probe(self.api.as_ref(), &self.realm).await
    }
}

#[async_trait]
impl ResourceRouter for Datasource {
    async fn call_resource(&self, request_url: &str) -> ResourceResponse {
        resources::route(self.api.as_ref(), &self.realm, request_url).await
    }
}

impl Drop for Datasource {
    fn drop(&mut self) {
        info!(realm = %self.realm, "disposing datasource instance");
    }
}
