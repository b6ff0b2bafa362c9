//! Name constants for ECS refresh activities
//!
//! Naming convention: {crate-name}::{type}::{name}

/// Activity names
pub mod activities {
    /// Evaluate the five-condition stability predicate for one service
    ///
    /// **Input:** [`crate::activity_types::CheckStabilityInput`]  
    /// **Output:** [`crate::activity_types::CheckStabilityOutput`]  
    /// **Idempotent:** Yes (read-only)
    pub const CHECK_STABILITY: &str = "ecsrefresh-orchestrations::activity::check-stability";

    /// Fetch running/pending/desired counts for a set of services
    ///
    /// **Input:** [`crate::activity_types::DescribeServiceCountsInput`]  
    /// **Output:** [`crate::activity_types::DescribeServiceCountsOutput`]  
    /// **Idempotent:** Yes (read-only)
    pub const DESCRIBE_SERVICE_COUNTS: &str =
        "ecsrefresh-orchestrations::activity::describe-service-counts";

    /// List CPU alarms bound to a service under the enable or disable rule
    ///
    /// **Input:** [`crate::activity_types::DiscoverBoundAlarmsInput`]  
    /// **Output:** [`crate::activity_types::DiscoverBoundAlarmsOutput`]  
    /// **Idempotent:** Yes (read-only)
    pub const DISCOVER_BOUND_ALARMS: &str =
        "ecsrefresh-orchestrations::activity::discover-bound-alarms";

    /// Enable or disable alarm actions
    ///
    /// **Input:** [`crate::activity_types::SetAlarmActionsInput`]  
    /// **Output:** [`crate::activity_types::SetAlarmActionsOutput`]  
    /// **Idempotent:** Yes (toggling to the same state is a no-op)
    /// **Operations:**
    /// - Skips the provider call entirely for an empty name set
    pub const SET_ALARM_ACTIONS: &str = "ecsrefresh-orchestrations::activity::set-alarm-actions";

    /// Force a new deployment of a service
    ///
    /// **Input:** [`crate::activity_types::ForceRedeployInput`]  
    /// **Output:** [`crate::activity_types::ForceRedeployOutput`]  
    /// **Idempotent:** No (every call starts a new deployment)
    pub const FORCE_REDEPLOY: &str = "ecsrefresh-orchestrations::activity::force-redeploy";

    /// Publish a deferred verification request to the event channel
    ///
    /// **Input:** [`crate::activity_types::PublishVerificationInput`]  
    /// **Output:** [`crate::activity_types::PublishVerificationOutput`]  
    /// **Idempotent:** No (delivery is at-least-once; the consumer re-checks live state)
    pub const PUBLISH_VERIFICATION: &str =
        "ecsrefresh-orchestrations::activity::publish-verification";
}
