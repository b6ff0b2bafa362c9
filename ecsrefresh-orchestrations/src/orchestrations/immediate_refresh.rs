//! Immediate refresh orchestration
//!
//! Forces a redeploy of the one configured service. No stability check, no
//! alarm handling, no verification.

use tracing::{error, info};

use crate::activities::force_redeploy;
use crate::activity_types::ForceRedeployInput;
use crate::registry::Collaborators;
use crate::types::{ImmediateRefreshOutput, IMMEDIATE_TRIGGERED_MESSAGE};

pub async fn immediate_refresh_orchestration(ctx: &Collaborators) -> ImmediateRefreshOutput {
    let settings = &ctx.settings;
    info!(
        cluster = %settings.trigger_cluster,
        service = %settings.trigger_service,
        "Immediate refresh triggered"
    );

    let input = ForceRedeployInput {
        cluster: settings.trigger_cluster.clone(),
        service: settings.trigger_service.clone(),
        region: settings.default_region.clone(),
    };

    match force_redeploy::activity(ctx.registry.as_ref(), input).await {
        Ok(output) => ImmediateRefreshOutput::Triggered {
            message: IMMEDIATE_TRIGGERED_MESSAGE.to_string(),
            response: output.ack,
        },
        Err(e) => {
            error!("Immediate refresh failed: {}", e);
            ImmediateRefreshOutput::Failed { error: e.to_string() }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeAlarmStore, FakeRegistry, Fakes};

    #[tokio::test]
    async fn test_unknown_service_returns_error_message() {
        let fakes = Fakes::new(FakeRegistry::new(), FakeAlarmStore::default());
        let output = immediate_refresh_orchestration(&fakes.collaborators()).await;

        assert_eq!(
            output,
            ImmediateRefreshOutput::Failed {
                error: "lookup failed: service nginx-service not found in cluster poc-test-cluster"
                    .to_string()
            }
        );
        // The redeploy is still attempted exactly once, with no stability check first
        assert_eq!(fakes.journal.entries(), vec!["redeploy poc-test-cluster|nginx-service"]);
    }
}
