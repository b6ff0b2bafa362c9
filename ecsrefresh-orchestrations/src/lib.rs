//! ECS Refresh Orchestrations - refresh-and-verify workflow for ECS services
//!
//! Phase 1 ([`names::orchestrations::REFRESH_SERVICES`]) takes a batch of
//! `cluster|service` entities, and for every stable one silences its CPU
//! alarms, forces a redeploy and publishes a deferred verification request.
//! Phase 2 ([`names::orchestrations::VERIFY_REFRESHED_SERVICES`]) consumes that
//! request later and re-enables the alarms of services that came back.
//!
//! # Usage
//!
//! ```rust,no_run
//! use ecsrefresh_orchestrations::aws_client::AwsProvider;
//! use ecsrefresh_orchestrations::registry::create_orchestration_registry;
//! use ecsrefresh_orchestrations::names::orchestrations;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let provider = AwsProvider::load(Some("us-east-1".to_string())).await;
//! let registry = create_orchestration_registry(provider.collaborators(Default::default()));
//!
//! let payload = serde_json::json!({
//!     "clusterName": "clusterA",
//!     "refreshed_services": ["svcA"],
//! });
//! let result = registry
//!     .invoke(orchestrations::VERIFY_REFRESHED_SERVICES, &payload)
//!     .await?;
//! # Ok(())
//! # }
//! ```

// Orchestration exports
pub mod names;
pub mod types;
pub mod registry;
pub mod payload;
pub mod batch;

// Activity exports
pub mod activity_names;
pub mod activity_types;
pub mod capabilities;
pub mod aws_client;
pub mod error;

mod orchestrations;
mod activities;

#[cfg(test)]
mod testing;

pub use orchestrations::flows;

// Re-export key types for convenience
pub use types::*;
pub use activity_types::*;
pub use error::{ProviderError, RefreshError};
