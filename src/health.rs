// Health prober: one authenticated device-stats call against the realm

use tracing::{error, info};

use crate::astarte::AstarteApi;
use crate::models::{HealthCheck, HealthStatus};

pub const HEALTHY_MESSAGE: &str = "Data source is working";

/// Healthy when the call succeeds; otherwise the error's message verbatim.
pub async fn probe(api: &dyn AstarteApi, realm: &str) -> HealthCheck {
    match api.device_stats(realm).await {
        Ok(stats) => {
            info!(
                realm,
                total_devices = stats.total_devices,
                connected_devices = stats.connected_devices,
                "health check passed"
            );
            HealthCheck {
                status: HealthStatus::Ok,
                message: HEALTHY_MESSAGE.to_string(),
            }
        }
        Err(e) => {
            error!(realm, error = %e, "health check failed");
            HealthCheck {
                status: HealthStatus::Error,
                message: e.to_string(),
            }
        }
    }
}
