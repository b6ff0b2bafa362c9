//! Input and output types for ECS refresh activities

use ecsrefresh_models::{
    AlarmMatchMode, DeferredVerificationRequest, RedeployAck, ServiceIdentity, Stability,
    StabilitySnapshot,
};
use serde::{Deserialize, Serialize};

// ============================================================================
// Check Stability Activity
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CheckStabilityInput {
    /// Service to evaluate
    pub identity: ServiceIdentity,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CheckStabilityOutput {
    /// Snapshot the decision was made on
    pub snapshot: StabilitySnapshot,
    /// Stable, or unstable with the first failing condition
    pub stability: Stability,
}

// ============================================================================
// Describe Service Counts Activity
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DescribeServiceCountsInput {
    pub cluster: String,
    pub services: Vec<String>,
    pub region: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServiceCounts {
    pub service_name: String,
    pub running_count: i32,
    pub pending_count: i32,
    pub desired_count: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DescribeServiceCountsOutput {
    /// Counts for every service the registry returned, in registry order
    pub services: Vec<ServiceCounts>,
    /// Requested services the registry did not return
    pub missing: Vec<String>,
}

// ============================================================================
// Discover Bound Alarms Activity
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiscoverBoundAlarmsInput {
    pub service_name: String,
    pub region: String,
    /// Which dimension rule to apply
    pub mode: AlarmMatchMode,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiscoverBoundAlarmsOutput {
    /// Distinct alarm names, in listing order
    pub alarm_names: Vec<String>,
}

// ============================================================================
// Set Alarm Actions Activity
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SetAlarmActionsInput {
    pub region: String,
    pub alarm_names: Vec<String>,
    pub enabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SetAlarmActionsOutput {
    /// Number of alarms sent to the store (0 when nothing was sent)
    pub toggled: usize,
}

// ============================================================================
// Force Redeploy Activity
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ForceRedeployInput {
    pub cluster: String,
    pub service: String,
    pub region: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ForceRedeployOutput {
    pub ack: RedeployAck,
}

// ============================================================================
// Publish Verification Activity
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PublishVerificationInput {
    pub request: DeferredVerificationRequest,
    /// Event source field
    pub source: String,
    /// Event detail-type field
    pub detail_type: String,
    /// Target event bus
    pub bus_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PublishVerificationOutput {
    /// Id assigned by the channel, if it reports one
    pub event_id: Option<String>,
}
