//! Collaborator capabilities
//!
//! Each orchestration receives these as `Arc<dyn ...>` at construction time.
//! [`crate::aws_client`] implements them over the AWS SDK; tests use in-memory
//! fakes.

use async_trait::async_trait;
use ecsrefresh_models::{AlarmBinding, OutboundEvent, RedeployAck, ServiceState};

use crate::error::ProviderError;

/// Service registry: live service state and forced redeploys
#[async_trait]
pub trait ServiceRegistry: Send + Sync + 'static {
    /// Describe the named services. Services the registry does not know are
    /// simply absent from the result.
    async fn describe_services(
        &self,
        region: &str,
        cluster: &str,
        services: &[String],
    ) -> Result<Vec<ServiceState>, ProviderError>;

    /// Replace every running task of the service with a fresh one
    async fn force_new_deployment(
        &self,
        region: &str,
        cluster: &str,
        service: &str,
    ) -> Result<RedeployAck, ProviderError>;
}

/// Alarm store: alarm listing and action toggling
#[async_trait]
pub trait AlarmStore: Send + Sync + 'static {
    /// List alarms, optionally restricted to one metric name
    async fn describe_alarms(
        &self,
        region: &str,
        metric_name: Option<&str>,
    ) -> Result<Vec<AlarmBinding>, ProviderError>;

    /// Enable or disable the actions of the named alarms. Fire-and-forget.
    async fn set_alarm_actions_enabled(
        &self,
        region: &str,
        alarm_names: &[String],
        enabled: bool,
    ) -> Result<(), ProviderError>;
}

/// Outbound event channel. Delay and routing are the channel's concern.
#[async_trait]
pub trait EventChannel: Send + Sync + 'static {
    /// Publish one event and return the id the channel assigned to it
    async fn publish(&self, event: &OutboundEvent) -> Result<Option<String>, ProviderError>;
}
