//! Publish a deferred verification request

use ecsrefresh_models::OutboundEvent;
use tracing::info;

use crate::activity_names::activities;
use crate::activity_types::{PublishVerificationInput, PublishVerificationOutput};
use crate::capabilities::EventChannel;
use crate::error::RefreshError;

/// Activity name for logging and flow mapping
pub const NAME: &str = activities::PUBLISH_VERIFICATION;

pub async fn activity(
    channel: &dyn EventChannel,
    input: PublishVerificationInput,
) -> Result<PublishVerificationOutput, RefreshError> {
    let detail = serde_json::to_string(&input.request)?;

    let event = OutboundEvent {
        source: input.source,
        detail_type: input.detail_type,
        detail,
        bus_name: input.bus_name,
        timestamp: chrono::Utc::now(),
    };

    let event_id = channel.publish(&event).await?;

    info!(
        activity = NAME,
        cluster = %input.request.cluster_name,
        services = ?input.request.refreshed_services,
        event_id = ?event_id,
        "Verification request sent"
    );

    Ok(PublishVerificationOutput { event_id })
}
