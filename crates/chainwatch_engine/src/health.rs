use chainwatch_core::HealthStatus;
use chainwatch_logging::{watch_debug, watch_warn};

use crate::Backend;

/// Asks the backend for readiness. A transport failure reads as unreachable.
pub async fn check_health(backend: &dyn Backend) -> HealthStatus {
    match backend.health().await {
        Ok(response) => {
            let status = response.status();
            watch_debug!("Health: {:?}", status);
            status
        }
        Err(err) => {
            watch_warn!("Health check failed: {}", err);
            HealthStatus::unreachable()
        }
    }
}
