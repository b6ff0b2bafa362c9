use ecsrefresh_orchestrations::aws_client::AwsProvider;
use ecsrefresh_orchestrations::registry::{create_orchestration_registry, OrchestrationRegistry};

use crate::config::Config;

/// Load AWS credentials and wire the orchestration registry
pub async fn initialize(config: &Config) -> OrchestrationRegistry {
    tracing::info!("Initializing AWS provider");

    let provider = AwsProvider::load(Some(config.settings.default_region.clone())).await;
    let registry = create_orchestration_registry(provider.collaborators(config.settings.clone()));

    tracing::info!(
        "✓ Registered {} orchestrations (default region: {})",
        registry.names().len(),
        config.settings.default_region
    );

    registry
}
