//! Error types for collaborators and orchestrations

use ecsrefresh_models::MalformedEntity;

/// Failure reported by a collaborator (registry, alarm store, event channel)
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    /// The registry has no matching service
    #[error("service {service} not found in cluster {cluster}")]
    NotFound { cluster: String, service: String },

    /// Communication failure or provider-side rejection
    #[error("provider call failed: {0}")]
    Transient(String),
}

/// Errors surfaced by activities and orchestrations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RefreshError {
    /// The invocation payload could not be normalized; nothing was started
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// One batch entity had a bad composite key; only that entity is skipped
    #[error(transparent)]
    MalformedEntity(#[from] MalformedEntity),

    #[error("lookup failed: {0}")]
    Lookup(String),

    #[error("transient provider error: {0}")]
    TransientProvider(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("unknown orchestration: {0}")]
    UnknownOrchestration(String),
}

impl From<ProviderError> for RefreshError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::NotFound { .. } => RefreshError::Lookup(err.to_string()),
            ProviderError::Transient(message) => RefreshError::TransientProvider(message),
        }
    }
}

impl From<serde_json::Error> for RefreshError {
    fn from(err: serde_json::Error) -> Self {
        RefreshError::Serialization(err.to_string())
    }
}
