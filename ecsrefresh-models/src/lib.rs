use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Rollout state reported for a deployment that finished rolling out
pub const ROLLOUT_COMPLETED: &str = "COMPLETED";

/// Deployment status marking the active deployment of a service
pub const STATUS_PRIMARY: &str = "PRIMARY";

/// Metric name that binds an alarm to a service
pub const CPU_UTILIZATION_METRIC: &str = "CPUUtilization";

/// Dimension name required by the enable path
pub const SERVICE_NAME_DIMENSION: &str = "ServiceName";

// ============================================================================
// Service identity
// ============================================================================

/// Raised when a composite `cluster|service` key cannot be split
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid entity format: {entity_value:?} (expected cluster|service)")]
pub struct MalformedEntity {
    pub entity_value: String,
}

/// A managed service instance: cluster + service, plus the region it lives in
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ServiceIdentity {
    pub cluster: String,
    pub service: String,
    pub region: String,
}

impl ServiceIdentity {
    /// Parse a `cluster|service` key. Segments past the second are ignored.
    pub fn parse(entity_value: &str, region: impl Into<String>) -> Result<Self, MalformedEntity> {
        let mut parts = entity_value.split('|');
        match (parts.next(), parts.next()) {
            (Some(cluster), Some(service)) => Ok(Self {
                cluster: cluster.to_string(),
                service: service.to_string(),
                region: region.into(),
            }),
            _ => Err(MalformedEntity {
                entity_value: entity_value.to_string(),
            }),
        }
    }

    /// Dedup key. Region is informational and not part of it.
    pub fn key(&self) -> String {
        format!("{}|{}", self.cluster, self.service)
    }
}

impl fmt::Display for ServiceIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{} ({})", self.cluster, self.service, self.region)
    }
}

// ============================================================================
// Registry view
// ============================================================================

/// One deployment of a service as the registry reports it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct DeploymentState {
    pub id: Option<String>,
    pub rollout_state: Option<String>,
    pub status: String,
}

/// Live state of a service as returned by the registry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ServiceState {
    pub service_name: String,
    pub running_count: i32,
    pub pending_count: i32,
    pub desired_count: i32,
    pub deployments: Vec<DeploymentState>,
}

/// Acknowledgement returned by a forced redeploy
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RedeployAck {
    pub cluster: String,
    pub service: String,
    pub service_arn: Option<String>,
    pub status: Option<String>,
    pub desired_count: i32,
    pub running_count: i32,
    /// Id of the deployment started by the redeploy, when reported
    pub primary_deployment_id: Option<String>,
}

// ============================================================================
// Stability
// ============================================================================

/// Point-in-time view used for one stability decision. Never cached.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StabilitySnapshot {
    pub running_count: i32,
    pub pending_count: i32,
    pub desired_count: i32,
    pub deployment_count: usize,
    pub rollout_state: String,
    pub deployment_status: String,
}

/// Why a snapshot was judged unstable (first failing condition)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UnstableReason {
    DeploymentCount { count: usize },
    RolloutState { state: String },
    DeploymentStatus { status: String },
    TaskCounts { running: i32, desired: i32 },
    PendingTasks { pending: i32 },
}

impl fmt::Display for UnstableReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DeploymentCount { count } => {
                write!(f, "expected exactly one deployment, found {}", count)
            }
            Self::RolloutState { state } => write!(f, "rollout state is {:?}", state),
            Self::DeploymentStatus { status } => write!(f, "deployment status is {:?}", status),
            Self::TaskCounts { running, desired } => {
                write!(f, "running {} of {} desired tasks", running, desired)
            }
            Self::PendingTasks { pending } => write!(f, "{} tasks pending", pending),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Stability {
    Stable,
    Unstable { reason: UnstableReason },
}

impl Stability {
    pub fn is_stable(&self) -> bool {
        matches!(self, Stability::Stable)
    }
}

impl StabilitySnapshot {
    /// Build a snapshot from live registry state.
    ///
    /// Rollout state and status come from the first deployment; with zero
    /// deployments they are empty and the count check fails anyway.
    pub fn from_service_state(state: &ServiceState) -> Self {
        let first = state.deployments.first();
        Self {
            running_count: state.running_count,
            pending_count: state.pending_count,
            desired_count: state.desired_count,
            deployment_count: state.deployments.len(),
            rollout_state: first
                .and_then(|d| d.rollout_state.clone())
                .unwrap_or_default(),
            deployment_status: first.map(|d| d.status.clone()).unwrap_or_default(),
        }
    }

    /// Stable iff: one deployment, rollout COMPLETED, status PRIMARY,
    /// running == desired and nothing pending. All five must hold.
    pub fn evaluate(&self) -> Stability {
        let reason = if self.deployment_count != 1 {
            UnstableReason::DeploymentCount {
                count: self.deployment_count,
            }
        } else if self.rollout_state != ROLLOUT_COMPLETED {
            UnstableReason::RolloutState {
                state: self.rollout_state.clone(),
            }
        } else if self.deployment_status != STATUS_PRIMARY {
            UnstableReason::DeploymentStatus {
                status: self.deployment_status.clone(),
            }
        } else if self.running_count != self.desired_count {
            UnstableReason::TaskCounts {
                running: self.running_count,
                desired: self.desired_count,
            }
        } else if self.pending_count != 0 {
            UnstableReason::PendingTasks {
                pending: self.pending_count,
            }
        } else {
            return Stability::Stable;
        };
        Stability::Unstable { reason }
    }
}

// ============================================================================
// Alarms
// ============================================================================

/// Which dimension rule decides whether an alarm belongs to a service.
///
/// The two rules differ: `Enable` requires a `ServiceName` dimension whose
/// value is the service, `Disable` accepts a matching value under any
/// dimension name. Both are kept as observed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AlarmMatchMode {
    Enable,
    Disable,
}

/// Read-only view of one monitoring alarm
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AlarmBinding {
    pub alarm_name: String,
    pub metric_name: String,
    pub dimensions: BTreeMap<String, String>,
}

impl AlarmBinding {
    pub fn is_bound_to(&self, service_name: &str, mode: AlarmMatchMode) -> bool {
        if self.metric_name != CPU_UTILIZATION_METRIC {
            return false;
        }
        match mode {
            AlarmMatchMode::Enable => self
                .dimensions
                .get(SERVICE_NAME_DIMENSION)
                .is_some_and(|value| value == service_name),
            AlarmMatchMode::Disable => self.dimensions.values().any(|value| value == service_name),
        }
    }
}

// ============================================================================
// Deferred verification
// ============================================================================

/// Message carried from the refresh phase to the verification phase
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeferredVerificationRequest {
    #[serde(rename = "clusterName")]
    pub cluster_name: String,
    #[serde(rename = "refreshed_services")]
    pub refreshed_services: Vec<String>,
    pub region: String,
}

impl DeferredVerificationRequest {
    /// One request per refreshed service
    pub fn for_identity(identity: &ServiceIdentity) -> Self {
        Self {
            cluster_name: identity.cluster.clone(),
            refreshed_services: vec![identity.service.clone()],
            region: identity.region.clone(),
        }
    }
}

/// Event envelope handed to the event channel
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutboundEvent {
    pub source: String,
    pub detail_type: String,
    /// JSON-encoded [`DeferredVerificationRequest`]
    pub detail: String,
    pub bus_name: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stable_snapshot() -> StabilitySnapshot {
        StabilitySnapshot {
            running_count: 2,
            pending_count: 0,
            desired_count: 2,
            deployment_count: 1,
            rollout_state: ROLLOUT_COMPLETED.to_string(),
            deployment_status: STATUS_PRIMARY.to_string(),
        }
    }

    fn alarm(metric: &str, dims: &[(&str, &str)]) -> AlarmBinding {
        AlarmBinding {
            alarm_name: "cpu-high".to_string(),
            metric_name: metric.to_string(),
            dimensions: dims
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    #[test]
    fn test_parse_identity_ignores_extra_segments() {
        let id = ServiceIdentity::parse("clusterA|svcA|extra|more", "eu-west-1").unwrap();
        assert_eq!(id.cluster, "clusterA");
        assert_eq!(id.service, "svcA");
        assert_eq!(id.region, "eu-west-1");
        assert_eq!(id.key(), "clusterA|svcA");
    }

    #[test]
    fn test_parse_identity_rejects_single_segment() {
        let err = ServiceIdentity::parse("only-one-segment", "us-east-1").unwrap_err();
        assert_eq!(err.entity_value, "only-one-segment");
        assert!(ServiceIdentity::parse("", "us-east-1").is_err());
    }

    #[test]
    fn test_identity_round_trips_into_verification_request() {
        let id = ServiceIdentity::parse("clusterA|svcA", "us-east-1").unwrap();
        let request = DeferredVerificationRequest::for_identity(&id);
        assert_eq!(request.cluster_name, "clusterA");
        assert_eq!(request.refreshed_services, vec!["svcA".to_string()]);

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["clusterName"], "clusterA");
        assert_eq!(json["refreshed_services"][0], "svcA");
        assert_eq!(json["region"], "us-east-1");
    }

    #[test]
    fn test_stable_snapshot_is_stable() {
        assert_eq!(stable_snapshot().evaluate(), Stability::Stable);
    }

    #[test]
    fn test_any_single_deviation_is_unstable() {
        let deviations: Vec<(fn(&mut StabilitySnapshot), &str)> = vec![
            (|s| s.deployment_count = 0, "zero deployments"),
            (|s| s.deployment_count = 2, "two deployments"),
            (|s| s.rollout_state = "IN_PROGRESS".to_string(), "rollout"),
            (|s| s.rollout_state = "completed".to_string(), "rollout case"),
            (|s| s.deployment_status = "ACTIVE".to_string(), "status"),
            (|s| s.running_count = 1, "running below desired"),
            (|s| s.running_count = 3, "running above desired"),
            (|s| s.pending_count = 1, "pending"),
        ];

        for (mutate, label) in deviations {
            let mut snapshot = stable_snapshot();
            mutate(&mut snapshot);
            assert!(!snapshot.evaluate().is_stable(), "{} should be unstable", label);
        }
    }

    #[test]
    fn test_snapshot_from_service_state_with_two_deployments() {
        let state = ServiceState {
            service_name: "svcA".to_string(),
            running_count: 2,
            pending_count: 0,
            desired_count: 2,
            deployments: vec![
                DeploymentState {
                    id: Some("ecs-svc/1".to_string()),
                    rollout_state: Some(ROLLOUT_COMPLETED.to_string()),
                    status: STATUS_PRIMARY.to_string(),
                },
                DeploymentState {
                    id: Some("ecs-svc/0".to_string()),
                    rollout_state: Some(ROLLOUT_COMPLETED.to_string()),
                    status: "ACTIVE".to_string(),
                },
            ],
        };

        let snapshot = StabilitySnapshot::from_service_state(&state);
        assert_eq!(snapshot.deployment_count, 2);
        assert_eq!(
            snapshot.evaluate(),
            Stability::Unstable {
                reason: UnstableReason::DeploymentCount { count: 2 }
            }
        );
    }

    #[test]
    fn test_snapshot_from_service_state_without_deployments() {
        let snapshot = StabilitySnapshot::from_service_state(&ServiceState::default());
        assert_eq!(snapshot.deployment_count, 0);
        assert_eq!(snapshot.rollout_state, "");
        assert!(!snapshot.evaluate().is_stable());
    }

    #[test]
    fn test_alarm_requires_cpu_metric() {
        let binding = alarm("MemoryUtilization", &[("ServiceName", "svcA")]);
        assert!(!binding.is_bound_to("svcA", AlarmMatchMode::Enable));
        assert!(!binding.is_bound_to("svcA", AlarmMatchMode::Disable));
    }

    #[test]
    fn test_enable_and_disable_rules_differ_on_dimension_name() {
        // Same value under a different dimension name: only the disable rule matches.
        let binding = alarm(CPU_UTILIZATION_METRIC, &[("ClusterName", "svcA")]);
        assert!(binding.is_bound_to("svcA", AlarmMatchMode::Disable));
        assert!(!binding.is_bound_to("svcA", AlarmMatchMode::Enable));

        let binding = alarm(
            CPU_UTILIZATION_METRIC,
            &[("ClusterName", "clusterA"), ("ServiceName", "svcA")],
        );
        assert!(binding.is_bound_to("svcA", AlarmMatchMode::Disable));
        assert!(binding.is_bound_to("svcA", AlarmMatchMode::Enable));
        assert!(!binding.is_bound_to("svcB", AlarmMatchMode::Enable));
    }
}
