//! Toggle alarm actions

use tracing::{debug, info};

use crate::activity_names::activities;
use crate::activity_types::{SetAlarmActionsInput, SetAlarmActionsOutput};
use crate::capabilities::AlarmStore;
use crate::error::RefreshError;

/// Activity name for logging and flow mapping
pub const NAME: &str = activities::SET_ALARM_ACTIONS;

pub async fn activity(
    store: &dyn AlarmStore,
    input: SetAlarmActionsInput,
) -> Result<SetAlarmActionsOutput, RefreshError> {
    if input.alarm_names.is_empty() {
        debug!(activity = NAME, "No alarms to toggle, skipping");
        return Ok(SetAlarmActionsOutput { toggled: 0 });
    }

    store
        .set_alarm_actions_enabled(&input.region, &input.alarm_names, input.enabled)
        .await?;

    info!(
        activity = NAME,
        region = %input.region,
        enabled = input.enabled,
        alarms = ?input.alarm_names,
        "{} alarm actions",
        if input.enabled { "Enabled" } else { "Disabled" }
    );

    Ok(SetAlarmActionsOutput {
        toggled: input.alarm_names.len(),
    })
}
