//! Discover CPU alarms bound to a service

use ecsrefresh_models::CPU_UTILIZATION_METRIC;
use tracing::info;

use crate::activity_names::activities;
use crate::activity_types::{DiscoverBoundAlarmsInput, DiscoverBoundAlarmsOutput};
use crate::capabilities::AlarmStore;
use crate::error::RefreshError;

/// Activity name for logging and flow mapping
pub const NAME: &str = activities::DISCOVER_BOUND_ALARMS;

pub async fn activity(
    store: &dyn AlarmStore,
    input: DiscoverBoundAlarmsInput,
) -> Result<DiscoverBoundAlarmsOutput, RefreshError> {
    info!(
        activity = NAME,
        service = %input.service_name,
        region = %input.region,
        mode = ?input.mode,
        "Checking CPU utilization alarms"
    );

    let alarms = store
        .describe_alarms(&input.region, Some(CPU_UTILIZATION_METRIC))
        .await?;

    let mut alarm_names: Vec<String> = Vec::new();
    for alarm in alarms {
        if alarm.is_bound_to(&input.service_name, input.mode) && !alarm_names.contains(&alarm.alarm_name) {
            alarm_names.push(alarm.alarm_name);
        }
    }

    if alarm_names.is_empty() {
        info!(activity = NAME, service = %input.service_name, "No CPU utilization alarms found");
    } else {
        info!(
            activity = NAME,
            service = %input.service_name,
            alarms = ?alarm_names,
            "Found {} CPU utilization alarms",
            alarm_names.len()
        );
    }

    Ok(DiscoverBoundAlarmsOutput { alarm_names })
}
