//! Fetch live task counts for refreshed services

use tracing::{info, warn};

use crate::activity_names::activities;
use crate::activity_types::{DescribeServiceCountsInput, DescribeServiceCountsOutput, ServiceCounts};
use crate::capabilities::ServiceRegistry;
use crate::error::RefreshError;

/// Activity name for logging and flow mapping
pub const NAME: &str = activities::DESCRIBE_SERVICE_COUNTS;

pub async fn activity(
    registry: &dyn ServiceRegistry,
    input: DescribeServiceCountsInput,
) -> Result<DescribeServiceCountsOutput, RefreshError> {
    info!(
        activity = NAME,
        cluster = %input.cluster,
        region = %input.region,
        services = ?input.services,
        "Checking ECS service status"
    );

    let states = registry
        .describe_services(&input.region, &input.cluster, &input.services)
        .await?;

    let services: Vec<ServiceCounts> = states
        .into_iter()
        .map(|state| ServiceCounts {
            service_name: state.service_name,
            running_count: state.running_count,
            pending_count: state.pending_count,
            desired_count: state.desired_count,
        })
        .collect();

    let missing: Vec<String> = input
        .services
        .iter()
        .filter(|name| !services.iter().any(|s| &s.service_name == *name))
        .cloned()
        .collect();

    if !missing.is_empty() {
        warn!(activity = NAME, cluster = %input.cluster, missing = ?missing, "Services not found in registry");
    }

    Ok(DescribeServiceCountsOutput { services, missing })
}
