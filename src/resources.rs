// Introspection resource router: classifies a resource URL by its query string.
//   device_id=<id>            -> [{name, major, minor}, ...] sorted by name
//   name=<iface>&major=<int>  -> interface document
//   anything else             -> 400 "unexpected request", no remote call

use serde_json::{Value, json};
use tracing::{info, warn};
use url::Url;

use crate::astarte::AstarteApi;
use crate::error::ResourceError;
use crate::models::{InterfaceDescriptor, IntrospectionEntry, ResourceResponse};

const RESOURCE_BASE: &str = "http://localhost/";

/// Parsed resource request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceRequest {
    DeviceIntrospection { device_id: String },
    Interface { name: String, major: u32 },
}

impl ResourceRequest {
    /// Classifies `request_url` (absolute, or a path with query such as `/resources?device_id=x`).
    pub fn parse(request_url: &str) -> Result<Self, ResourceError> {
        let url = Url::parse(RESOURCE_BASE)
            .and_then(|base| base.join(request_url))
            .map_err(|e| ResourceError::InvalidParameter(format!("invalid resource URL: {}", e)))?;

        let param = |key: &str| {
            url.query_pairs()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.into_owned())
        };

        if let Some(device_id) = param("device_id") {
            if device_id.is_empty() {
                return Err(ResourceError::InvalidParameter(
                    "device_id must be non-empty".into(),
                ));
            }
            return Ok(ResourceRequest::DeviceIntrospection { device_id });
        }

        match (param("name"), param("major")) {
            (Some(name), Some(major)) => {
                let major = major.parse::<u32>().map_err(|e| {
                    ResourceError::InvalidParameter(format!(
                        "invalid interface major version '{}': {}",
                        major, e
                    ))
                })?;
                Ok(ResourceRequest::Interface { name, major })
            }
            _ => Err(ResourceError::Unrecognized),
        }
    }
}

/// Device introspection as a list, sorted by interface name.
pub async fn device_introspection(
    api: &dyn AstarteApi,
    realm: &str,
    device_id: &str,
) -> Result<Vec<IntrospectionEntry>, ResourceError> {
    let introspection = api.device_introspection(realm, device_id).await?;
    info!(device_id, interfaces = introspection.len(), "received introspection for device");
    Ok(introspection
        .into_iter()
        .map(|(name, version)| IntrospectionEntry {
            name,
            major: version.major,
            minor: version.minor,
        })
        .collect())
}

pub async fn interface(
    api: &dyn AstarteApi,
    realm: &str,
    name: &str,
    major: u32,
) -> Result<InterfaceDescriptor, ResourceError> {
    let doc = api.interface(realm, name, major).await?;
    info!(interface = name, major, "received interface document");
    Ok(doc)
}

/// Answers a resource call. Never retries; every failure is a 400 carrying the error text.
pub async fn route(api: &dyn AstarteApi, realm: &str, request_url: &str) -> ResourceResponse {
    match handle(api, realm, request_url).await {
        Ok(body) => ResourceResponse::ok(body),
        Err(e) => {
            warn!(url = request_url, error = %e, "resource request rejected");
            ResourceResponse::bad_request(e.to_string())
        }
    }
}

async fn handle(
    api: &dyn AstarteApi,
    realm: &str,
    request_url: &str,
) -> Result<String, ResourceError> {
    match ResourceRequest::parse(request_url)? {
        ResourceRequest::DeviceIntrospection { device_id } => {
            let entries = device_introspection(api, realm, &device_id).await?;
            let list: Vec<Value> = entries
                .into_iter()
                .map(|e| json!({"name": e.name, "major": e.major, "minor": e.minor}))
                .collect();
            Ok(Value::Array(list).to_string())
        }
        ResourceRequest::Interface { name, major } => {
            let doc = interface(api, realm, &name, major).await?;
            Ok(doc.0.to_string())
        }
    }
}
