//! Name constants for ECS refresh orchestrations
//!
//! Naming convention: {crate-name}::{type}::{name}

/// Orchestration names
pub mod orchestrations {
    /// Phase 1: check, silence alarms, force redeploy, schedule verification
    ///
    /// **Input:** Raw health event payload, normalized to [`crate::types::RefreshServicesInput`]  
    /// **Output:** [`crate::types::RefreshServicesOutput`]  
    /// **Activities used:**
    /// - [`crate::activity_names::activities::CHECK_STABILITY`]
    /// - [`crate::activity_names::activities::DISCOVER_BOUND_ALARMS`]
    /// - [`crate::activity_names::activities::SET_ALARM_ACTIONS`]
    /// - [`crate::activity_names::activities::FORCE_REDEPLOY`]
    /// - [`crate::activity_names::activities::PUBLISH_VERIFICATION`]
    /// **Duration:** ~5 seconds per refreshed service (settle + pacing pauses)
    pub const REFRESH_SERVICES: &str = "ecsrefresh-orchestrations::orchestration::refresh-services";

    /// Phase 2: re-check refreshed services and re-enable their alarms
    ///
    /// **Input:** [`ecsrefresh_models::DeferredVerificationRequest`]  
    /// **Output:** [`crate::types::VerifyRefreshOutput`]  
    /// **Activities used:**
    /// - [`crate::activity_names::activities::DESCRIBE_SERVICE_COUNTS`]
    /// - [`crate::activity_names::activities::DISCOVER_BOUND_ALARMS`]
    /// - [`crate::activity_names::activities::SET_ALARM_ACTIONS`]
    /// **Note:** One-shot. A service that is not stable yet is reported, not rescheduled.
    pub const VERIFY_REFRESHED_SERVICES: &str =
        "ecsrefresh-orchestrations::orchestration::verify-refreshed-services";

    /// Unconditional forced redeploy of the configured service
    ///
    /// **Input:** None  
    /// **Output:** [`crate::types::ImmediateRefreshOutput`]  
    /// **Activities used:**
    /// - [`crate::activity_names::activities::FORCE_REDEPLOY`]
    pub const IMMEDIATE_REFRESH: &str = "ecsrefresh-orchestrations::orchestration::immediate-refresh";

    /// All orchestration names, in registration order
    pub const ALL: &[&str] = &[REFRESH_SERVICES, VERIFY_REFRESHED_SERVICES, IMMEDIATE_REFRESH];
}
