//! Verify refreshed services orchestration (phase 2)
//!
//! Runs once per deferred verification request. A service counts as stable
//! here when running == desired, which is looser than the five-condition
//! check used before a refresh. Stable services get their CPU alarms
//! re-enabled; anything else is reported and left alone.

use ecsrefresh_models::{AlarmMatchMode, DeferredVerificationRequest};
use tracing::{error, info, warn};

use crate::activities::{describe_service_counts, discover_bound_alarms, set_alarm_actions};
use crate::activity_types::{
    DescribeServiceCountsInput, DiscoverBoundAlarmsInput, ServiceCounts, SetAlarmActionsInput,
};
use crate::error::RefreshError;
use crate::registry::Collaborators;
use crate::types::{ServiceStatusReport, VerifyRefreshOutput};

pub async fn verify_refreshed_services_orchestration(
    ctx: &Collaborators,
    input: DeferredVerificationRequest,
) -> Result<VerifyRefreshOutput, RefreshError> {
    if input.cluster_name.is_empty() || input.refreshed_services.is_empty() {
        return Err(RefreshError::MalformedInput(
            crate::payload::MISSING_NAMES_MESSAGE.to_string(),
        ));
    }

    let counts = describe_service_counts::activity(
        ctx.registry.as_ref(),
        DescribeServiceCountsInput {
            cluster: input.cluster_name.clone(),
            services: input.refreshed_services.clone(),
            region: input.region.clone(),
        },
    )
    .await?;

    let mut service_status = Vec::with_capacity(counts.services.len());
    for service in counts.services {
        service_status.push(verify_service(ctx, &input.region, service).await);
    }

    Ok(VerifyRefreshOutput {
        status: "completed".to_string(),
        service_status,
        missing_services: counts.missing,
    })
}

async fn verify_service(ctx: &Collaborators, region: &str, counts: ServiceCounts) -> ServiceStatusReport {
    info!(
        service = %counts.service_name,
        running = counts.running_count,
        pending = counts.pending_count,
        desired = counts.desired_count,
        "ECS service status"
    );

    let is_stable = counts.running_count == counts.desired_count;

    let alarms_enabled = if is_stable {
        info!(service = %counts.service_name, "Service is now stable, enabling alarms");
        enable_bound_alarms(ctx, region, &counts.service_name).await
    } else {
        warn!(service = %counts.service_name, "Service is not stable yet, skipping alarm re-enablement");
        0
    };

    ServiceStatusReport {
        service_name: counts.service_name,
        running_count: counts.running_count,
        pending_count: counts.pending_count,
        desired_count: counts.desired_count,
        is_stable,
        alarms_enabled,
    }
}

/// Alarm failures are logged; the service is still reported
async fn enable_bound_alarms(ctx: &Collaborators, region: &str, service_name: &str) -> usize {
    let result = async {
        let discovered = discover_bound_alarms::activity(
            ctx.alarms.as_ref(),
            DiscoverBoundAlarmsInput {
                service_name: service_name.to_string(),
                region: region.to_string(),
                mode: AlarmMatchMode::Enable,
            },
        )
        .await?;

        let toggled = set_alarm_actions::activity(
            ctx.alarms.as_ref(),
            SetAlarmActionsInput {
                region: region.to_string(),
                alarm_names: discovered.alarm_names,
                enabled: true,
            },
        )
        .await?;

        Ok::<usize, RefreshError>(toggled.toggled)
    }
    .await;

    match result {
        Ok(count) => count,
        Err(e) => {
            error!(service = %service_name, "Error enabling alarms: {}", e);
            0
        }
    }
}
