//! Input and output types for ECS refresh orchestrations

use std::time::Duration;

use ecsrefresh_models::RedeployAck;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Message returned when a refresh batch has been fully visited
pub const REFRESH_COMPLETED_MESSAGE: &str = "ECS Service Refresh Completed";

/// Message returned when the payload carried no events
pub const NO_EVENTS_MESSAGE: &str = "No 'events' field in event. Skipping.";

/// Message returned by the immediate trigger on success
pub const IMMEDIATE_TRIGGERED_MESSAGE: &str = "ECS Service refresh triggered successfully";

// ============================================================================
// Settings
// ============================================================================

/// Tunables shared by the orchestrations
#[derive(Debug, Clone, PartialEq)]
pub struct RefreshSettings {
    /// Pause after disabling alarms, before the redeploy
    pub alarm_settle: Duration,
    /// Pause after each published verification request
    pub event_pacing: Duration,
    /// Event source for verification requests
    pub event_source: String,
    /// Event detail-type for verification requests
    pub event_detail_type: String,
    /// Event bus receiving verification requests
    pub event_bus: String,
    /// Region used when a payload omits one
    pub default_region: String,
    /// Cluster targeted by the immediate trigger
    pub trigger_cluster: String,
    /// Service targeted by the immediate trigger
    pub trigger_service: String,
}

impl Default for RefreshSettings {
    fn default() -> Self {
        Self {
            alarm_settle: Duration::from_secs(3),
            event_pacing: Duration::from_secs(2),
            event_source: "custom.ecs.check-status".to_string(),
            event_detail_type: "ECS Service Status Check".to_string(),
            event_bus: "default".to_string(),
            default_region: "us-east-1".to_string(),
            trigger_cluster: "poc-test-cluster".to_string(),
            trigger_service: "nginx-service".to_string(),
        }
    }
}

// ============================================================================
// Refresh Services Orchestration
// ============================================================================

/// One entity named by a health event
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AffectedEntity {
    /// Composite `cluster|service` key as sent. Anything but a string is
    /// reported as malformed when the batch is walked.
    pub entity_value: Value,
    /// Provider status code, informational only
    pub status_code: Option<String>,
}

/// One health event: a region and the entities it affects
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthEvent {
    pub region: String,
    pub entities: Vec<AffectedEntity>,
}

/// Normalized refresh batch
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct RefreshServicesInput {
    pub events: Vec<HealthEvent>,
}

/// Terminal state of one entity in a refresh batch
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum EntityOutcome {
    /// Refreshed and a verification request was published
    VerificationScheduled {
        alarms_disabled: usize,
        event_id: Option<String>,
    },
    /// Not stable, or stability could not be confirmed. Nothing was changed.
    Skipped { reason: String },
    /// Bad composite key
    Malformed { error: String },
    /// Redeploy or publish failed after the stability check passed
    Failed { error: String },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EntityReport {
    pub entity_value: String,
    pub region: String,
    #[serde(flatten)]
    pub outcome: EntityOutcome,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RefreshServicesOutput {
    pub message: String,
    #[serde(default)]
    pub entities: Vec<EntityReport>,
}

// ============================================================================
// Verify Refreshed Services Orchestration
// ============================================================================

/// Live status of one service after a refresh
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ServiceStatusReport {
    pub service_name: String,
    pub running_count: i32,
    pub pending_count: i32,
    pub desired_count: i32,
    pub is_stable: bool,
    /// Alarms whose actions were re-enabled
    pub alarms_enabled: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VerifyRefreshOutput {
    /// Always "completed"; failures are reported through the error result
    pub status: String,
    pub service_status: Vec<ServiceStatusReport>,
    #[serde(default)]
    pub missing_services: Vec<String>,
}

// ============================================================================
// Immediate Refresh Orchestration
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ImmediateRefreshOutput {
    Triggered { message: String, response: RedeployAck },
    Failed { error: String },
}
