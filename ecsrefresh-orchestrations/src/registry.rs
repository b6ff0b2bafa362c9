//! Collaborator wiring and name-based dispatch of orchestrations

use std::sync::Arc;

use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, info_span, Instrument};
use uuid::Uuid;

use crate::capabilities::{AlarmStore, EventChannel, ServiceRegistry};
use crate::error::RefreshError;
use crate::names::orchestrations;
use crate::orchestrations::immediate_refresh::immediate_refresh_orchestration;
use crate::orchestrations::refresh_services::refresh_services_orchestration;
use crate::orchestrations::verify_refreshed::verify_refreshed_services_orchestration;
use crate::payload::{decode_refresh_payload, decode_verification_payload};
use crate::types::RefreshSettings;

/// Everything an orchestration needs from the outside world
#[derive(Clone)]
pub struct Collaborators {
    pub registry: Arc<dyn ServiceRegistry>,
    pub alarms: Arc<dyn AlarmStore>,
    pub events: Arc<dyn EventChannel>,
    pub settings: RefreshSettings,
}

/// Dispatches raw JSON payloads to orchestrations by name
#[derive(Clone)]
pub struct OrchestrationRegistry {
    collaborators: Collaborators,
}

/// Create an OrchestrationRegistry over the given collaborators
///
/// # Example
///
/// ```rust,no_run
/// use ecsrefresh_orchestrations::aws_client::AwsProvider;
/// use ecsrefresh_orchestrations::registry::create_orchestration_registry;
/// use ecsrefresh_orchestrations::names::orchestrations;
///
/// # async fn example() -> anyhow::Result<()> {
/// let provider = AwsProvider::load(None).await;
/// let registry = create_orchestration_registry(provider.collaborators(Default::default()));
/// let result = registry
///     .invoke(orchestrations::IMMEDIATE_REFRESH, &serde_json::Value::Null)
///     .await?;
/// # Ok(())
/// # }
/// ```
pub fn create_orchestration_registry(collaborators: Collaborators) -> OrchestrationRegistry {
    OrchestrationRegistry { collaborators }
}

impl OrchestrationRegistry {
    pub fn names(&self) -> &'static [&'static str] {
        orchestrations::ALL
    }

    pub fn settings(&self) -> &RefreshSettings {
        &self.collaborators.settings
    }

    /// Run one orchestration. Every outcome of a known orchestration is a
    /// structured result; only an unknown name is an `Err`.
    pub async fn invoke(&self, name: &str, payload: &Value) -> Result<Value, RefreshError> {
        let span = info_span!("invocation", orchestration = name, invocation_id = %Uuid::new_v4());
        self.dispatch(name, payload).instrument(span).await
    }

    async fn dispatch(&self, name: &str, payload: &Value) -> Result<Value, RefreshError> {
        debug!(payload = %payload, "Received event");
        let ctx = &self.collaborators;
        let default_region = ctx.settings.default_region.as_str();

        let result = match name {
            orchestrations::REFRESH_SERVICES => match decode_refresh_payload(payload, default_region) {
                Ok(input) => to_result(&refresh_services_orchestration(ctx, input).await),
                Err(e) => error_result(&e),
            },
            orchestrations::VERIFY_REFRESHED_SERVICES => {
                match decode_verification_payload(payload, default_region) {
                    Ok(input) => match verify_refreshed_services_orchestration(ctx, input).await {
                        Ok(output) => to_result(&output),
                        Err(e) => error_result(&e),
                    },
                    Err(e) => error_result(&e),
                }
            }
            orchestrations::IMMEDIATE_REFRESH => to_result(&immediate_refresh_orchestration(ctx).await),
            other => return Err(RefreshError::UnknownOrchestration(other.to_string())),
        };

        Ok(result)
    }
}

/// `{ "status": "error", "message": ... }`
pub fn error_result(err: &RefreshError) -> Value {
    let message = match err {
        RefreshError::MalformedInput(message) => message.clone(),
        other => other.to_string(),
    };
    json!({ "status": "error", "message": message })
}

fn to_result<T: Serialize>(output: &T) -> Value {
    serde_json::to_value(output).unwrap_or_else(|e| error_result(&RefreshError::from(e)))
}
