//! Boundary decoding of invocation payloads
//!
//! Loosely shaped JSON (string-or-object `Detail`, string-or-list
//! `refreshed_services`) is normalized here into the strict types the
//! orchestrations take. Anything that does not normalize is
//! [`RefreshError::MalformedInput`].

use ecsrefresh_models::DeferredVerificationRequest;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::error::RefreshError;
use crate::types::{AffectedEntity, HealthEvent, RefreshServicesInput};

/// Error message for a refresh payload whose detail cannot be decoded
pub const INVALID_DETAIL_MESSAGE: &str = "Invalid JSON format in 'Detail' field.";

/// Error message for a verification payload without cluster or services
pub const MISSING_NAMES_MESSAGE: &str = "Missing cluster or service names in event";

/// Decode a field that arrives either inline or as a JSON-encoded string
fn decode_embedded<T: DeserializeOwned>(value: Value) -> Result<T, serde_json::Error> {
    match value {
        Value::String(text) => serde_json::from_str(&text),
        inline => T::deserialize(inline),
    }
}

/// A field that arrives either as one string or a list of strings
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    fn into_vec(self) -> Vec<String> {
        match self {
            OneOrMany::One(name) => vec![name],
            OneOrMany::Many(names) => names,
        }
    }
}

// ============================================================================
// Refresh payload
// ============================================================================

#[derive(Debug, Deserialize)]
struct RawEnvelope {
    #[serde(rename = "Detail")]
    detail_upper: Option<Value>,
    detail: Option<Value>,
}

impl RawEnvelope {
    /// `Detail` wins over `detail`; null counts as absent
    fn take_detail(self) -> Option<Value> {
        self.detail_upper
            .filter(|v| !v.is_null())
            .or(self.detail.filter(|v| !v.is_null()))
    }
}

#[derive(Debug, Deserialize)]
struct RawHealthDetail {
    #[serde(default)]
    events: Vec<RawHealthEvent>,
}

#[derive(Debug, Deserialize)]
struct RawHealthEvent {
    region: Option<String>,
    /// Kept loose so one odd entity cannot reject its siblings
    #[serde(default)]
    entities: Vec<Value>,
}

fn affected_entity(raw: Value) -> AffectedEntity {
    AffectedEntity {
        entity_value: raw.get("entityValue").cloned().unwrap_or(Value::Null),
        status_code: raw
            .get("statusCode")
            .and_then(Value::as_str)
            .map(str::to_string),
    }
}

/// Normalize a Phase 1 payload
pub fn decode_refresh_payload(
    payload: &Value,
    default_region: &str,
) -> Result<RefreshServicesInput, RefreshError> {
    let envelope = RawEnvelope::deserialize(payload)
        .map_err(|e| RefreshError::MalformedInput(format!("{} ({})", INVALID_DETAIL_MESSAGE, e)))?;

    let detail = envelope
        .take_detail()
        .ok_or_else(|| RefreshError::MalformedInput("Missing 'detail' field.".to_string()))?;

    let detail = decode_embedded::<RawHealthDetail>(detail)
        .map_err(|e| RefreshError::MalformedInput(format!("{} ({})", INVALID_DETAIL_MESSAGE, e)))?;

    let events = detail
        .events
        .into_iter()
        .map(|event| HealthEvent {
            region: event
                .region
                .filter(|r| !r.is_empty())
                .unwrap_or_else(|| default_region.to_string()),
            entities: event.entities.into_iter().map(affected_entity).collect(),
        })
        .collect();

    Ok(RefreshServicesInput { events })
}

// ============================================================================
// Verification payload
// ============================================================================

#[derive(Debug, Deserialize)]
struct RawVerification {
    #[serde(rename = "clusterName")]
    cluster_name: Option<String>,
    refreshed_services: Option<OneOrMany>,
    /// Older publishers sent a single `serviceName`
    #[serde(rename = "serviceName")]
    service_name: Option<String>,
    region: Option<String>,
}

/// Normalize a Phase 2 payload.
///
/// Accepts the bare request or the request wrapped in an event envelope.
pub fn decode_verification_payload(
    payload: &Value,
    default_region: &str,
) -> Result<DeferredVerificationRequest, RefreshError> {
    let body = match payload.get("clusterName") {
        Some(_) => payload.clone(),
        None => RawEnvelope::deserialize(payload)
            .ok()
            .and_then(RawEnvelope::take_detail)
            .unwrap_or_else(|| payload.clone()),
    };

    let raw = decode_embedded::<RawVerification>(body).map_err(|e| {
        debug!(error = %e, "Verification payload did not decode");
        RefreshError::MalformedInput(MISSING_NAMES_MESSAGE.to_string())
    })?;

    let cluster_name = raw
        .cluster_name
        .filter(|c| !c.is_empty())
        .ok_or_else(|| RefreshError::MalformedInput(MISSING_NAMES_MESSAGE.to_string()))?;

    let mut refreshed_services: Vec<String> = Vec::new();
    let named = raw
        .refreshed_services
        .map(OneOrMany::into_vec)
        .unwrap_or_default()
        .into_iter()
        .chain(raw.service_name);
    for service in named.filter(|s| !s.is_empty()) {
        if !refreshed_services.contains(&service) {
            refreshed_services.push(service);
        }
    }

    if refreshed_services.is_empty() {
        return Err(RefreshError::MalformedInput(MISSING_NAMES_MESSAGE.to_string()));
    }

    Ok(DeferredVerificationRequest {
        cluster_name,
        refreshed_services,
        region: raw
            .region
            .filter(|r| !r.is_empty())
            .unwrap_or_else(|| default_region.to_string()),
    })
}
