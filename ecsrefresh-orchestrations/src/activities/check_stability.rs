//! Stability oracle activity

use ecsrefresh_models::{ServiceState, Stability, StabilitySnapshot};
use tracing::{info, warn};

use crate::activity_names::activities;
use crate::activity_types::{CheckStabilityInput, CheckStabilityOutput};
use crate::capabilities::ServiceRegistry;
use crate::error::RefreshError;

/// Activity name for logging and flow mapping
pub const NAME: &str = activities::CHECK_STABILITY;

pub async fn activity(
    registry: &dyn ServiceRegistry,
    input: CheckStabilityInput,
) -> Result<CheckStabilityOutput, RefreshError> {
    let identity = &input.identity;
    info!(
        activity = NAME,
        cluster = %identity.cluster,
        service = %identity.service,
        region = %identity.region,
        "Checking service status"
    );

    let services = registry
        .describe_services(
            &identity.region,
            &identity.cluster,
            std::slice::from_ref(&identity.service),
        )
        .await?;

    let state = select_service(services, &identity.service).ok_or_else(|| {
        RefreshError::Lookup(format!(
            "no services found for {} in cluster {}",
            identity.service, identity.cluster
        ))
    })?;

    let snapshot = StabilitySnapshot::from_service_state(&state);
    let stability = snapshot.evaluate();

    match &stability {
        Stability::Stable => info!(
            activity = NAME,
            service = %identity.service,
            running = snapshot.running_count,
            desired = snapshot.desired_count,
            "Service is stable and ready for refresh"
        ),
        Stability::Unstable { reason } => warn!(
            activity = NAME,
            service = %identity.service,
            running = snapshot.running_count,
            pending = snapshot.pending_count,
            desired = snapshot.desired_count,
            deployments = snapshot.deployment_count,
            "Service is not stable: {}",
            reason
        ),
    }

    Ok(CheckStabilityOutput { snapshot, stability })
}

/// Prefer the entry named like the request; fall back to the first one
fn select_service(services: Vec<ServiceState>, service_name: &str) -> Option<ServiceState> {
    let position = services
        .iter()
        .position(|s| s.service_name == service_name)
        .unwrap_or(0);
    services.into_iter().nth(position)
}
