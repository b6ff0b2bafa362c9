pub mod check_stability;
pub mod describe_service_counts;
pub mod discover_bound_alarms;
pub mod set_alarm_actions;
pub mod force_redeploy;
pub mod publish_verification;
