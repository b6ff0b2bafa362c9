//! Force a new deployment of a service

use tracing::info;

use crate::activity_names::activities;
use crate::activity_types::{ForceRedeployInput, ForceRedeployOutput};
use crate::capabilities::ServiceRegistry;
use crate::error::RefreshError;

/// Activity name for logging and flow mapping
pub const NAME: &str = activities::FORCE_REDEPLOY;

pub async fn activity(
    registry: &dyn ServiceRegistry,
    input: ForceRedeployInput,
) -> Result<ForceRedeployOutput, RefreshError> {
    info!(
        activity = NAME,
        cluster = %input.cluster,
        service = %input.service,
        region = %input.region,
        "Forcing new deployment"
    );

    let ack = registry
        .force_new_deployment(&input.region, &input.cluster, &input.service)
        .await?;

    info!(
        activity = NAME,
        service = %input.service,
        deployment = ?ack.primary_deployment_id,
        "Service refresh triggered"
    );

    Ok(ForceRedeployOutput { ack })
}
