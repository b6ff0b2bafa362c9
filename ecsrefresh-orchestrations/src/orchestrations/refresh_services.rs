//! Refresh services orchestration (phase 1)
//!
//! Per unique service in the batch:
//! 1. Check stability; anything short of stable is skipped without side effects
//! 2. Disable the service's CPU alarms, then pause so monitoring settles
//! 3. Force a new deployment
//! 4. Publish a deferred verification request, then pause before the next service
//!
//! Failures are contained to the service they happen on. Nothing is retried.

use ecsrefresh_models::{AlarmMatchMode, DeferredVerificationRequest, ServiceIdentity, Stability};
use tracing::{error, info, warn};

use crate::activities::{
    check_stability, discover_bound_alarms, force_redeploy, publish_verification, set_alarm_actions,
};
use crate::activity_types::{
    CheckStabilityInput, DiscoverBoundAlarmsInput, ForceRedeployInput, PublishVerificationInput,
    SetAlarmActionsInput,
};
use crate::batch::{self, Walked};
use crate::error::RefreshError;
use crate::registry::Collaborators;
use crate::types::{
    EntityOutcome, EntityReport, RefreshServicesInput, RefreshServicesOutput, NO_EVENTS_MESSAGE,
    REFRESH_COMPLETED_MESSAGE,
};

pub async fn refresh_services_orchestration(
    ctx: &Collaborators,
    input: RefreshServicesInput,
) -> RefreshServicesOutput {
    if input.events.is_empty() {
        warn!("No events in payload, skipping");
        return RefreshServicesOutput {
            message: NO_EVENTS_MESSAGE.to_string(),
            entities: Vec::new(),
        };
    }

    let mut entities = Vec::new();

    for walked in batch::walk(&input) {
        match walked {
            Walked::Malformed { entity, error } => {
                warn!(region = %entity.region, "{}", error);
                entities.push(EntityReport {
                    entity_value: entity.descriptor(),
                    region: entity.region,
                    outcome: EntityOutcome::Malformed {
                        error: error.to_string(),
                    },
                });
            }
            Walked::Unique {
                identity,
                entity_value,
            } => {
                let outcome = refresh_service(ctx, &identity).await;
                entities.push(EntityReport {
                    entity_value,
                    region: identity.region,
                    outcome,
                });
            }
        }
    }

    info!(entities = entities.len(), "Refresh batch completed");

    RefreshServicesOutput {
        message: REFRESH_COMPLETED_MESSAGE.to_string(),
        entities,
    }
}

async fn refresh_service(ctx: &Collaborators, identity: &ServiceIdentity) -> EntityOutcome {
    info!(
        cluster = %identity.cluster,
        service = %identity.service,
        region = %identity.region,
        "Checking ECS service before refresh"
    );

    // Step 1: Stability gate
    let check = match check_stability::activity(
        ctx.registry.as_ref(),
        CheckStabilityInput {
            identity: identity.clone(),
        },
    )
    .await
    {
        Ok(check) => check,
        Err(e) => {
            warn!(service = %identity.key(), "Skipping service, stability could not be confirmed: {}", e);
            return EntityOutcome::Skipped {
                reason: e.to_string(),
            };
        }
    };

    if let Stability::Unstable { reason } = check.stability {
        warn!(service = %identity.key(), "Skipping service due to ongoing activity: {}", reason);
        return EntityOutcome::Skipped {
            reason: reason.to_string(),
        };
    }

    // Step 2: Silence alarms
    let alarms_disabled = disable_bound_alarms(ctx, identity).await;
    if alarms_disabled > 0 {
        tokio::time::sleep(ctx.settings.alarm_settle).await;
    }

    // Steps 3-4: Redeploy and schedule verification
    match redeploy_and_schedule(ctx, identity).await {
        Ok(event_id) => EntityOutcome::VerificationScheduled {
            alarms_disabled,
            event_id,
        },
        Err(e) => {
            error!(service = %identity.key(), region = %identity.region, "Error processing service: {}", e);
            EntityOutcome::Failed {
                error: e.to_string(),
            }
        }
    }
}

/// Alarm failures are logged and do not block the redeploy
async fn disable_bound_alarms(ctx: &Collaborators, identity: &ServiceIdentity) -> usize {
    let result = async {
        let discovered = discover_bound_alarms::activity(
            ctx.alarms.as_ref(),
            DiscoverBoundAlarmsInput {
                service_name: identity.service.clone(),
                region: identity.region.clone(),
                mode: AlarmMatchMode::Disable,
            },
        )
        .await?;

        let toggled = set_alarm_actions::activity(
            ctx.alarms.as_ref(),
            SetAlarmActionsInput {
                region: identity.region.clone(),
                alarm_names: discovered.alarm_names,
                enabled: false,
            },
        )
        .await?;

        Ok::<usize, RefreshError>(toggled.toggled)
    }
    .await;

    match result {
        Ok(count) => count,
        Err(e) => {
            error!(service = %identity.key(), "Error disabling alarms: {}", e);
            0
        }
    }
}

async fn redeploy_and_schedule(
    ctx: &Collaborators,
    identity: &ServiceIdentity,
) -> Result<Option<String>, RefreshError> {
    force_redeploy::activity(
        ctx.registry.as_ref(),
        ForceRedeployInput {
            cluster: identity.cluster.clone(),
            service: identity.service.clone(),
            region: identity.region.clone(),
        },
    )
    .await?;

    let published = publish_verification::activity(
        ctx.events.as_ref(),
        PublishVerificationInput {
            request: DeferredVerificationRequest::for_identity(identity),
            source: ctx.settings.event_source.clone(),
            detail_type: ctx.settings.event_detail_type.clone(),
            bus_name: ctx.settings.event_bus.clone(),
        },
    )
    .await?;

    tokio::time::sleep(ctx.settings.event_pacing).await;

    Ok(published.event_id)
}
