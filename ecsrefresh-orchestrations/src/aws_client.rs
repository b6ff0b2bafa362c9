//! AWS implementations of the collaborator capabilities
//!
//! ECS backs the service registry, CloudWatch the alarm store and EventBridge
//! the event channel. One [`SdkConfig`] is loaded per process; service clients
//! are built per call for the region the call targets.

use std::sync::Arc;

use async_trait::async_trait;
use aws_config::{BehaviorVersion, SdkConfig};
use aws_sdk_cloudwatch::error::DisplayErrorContext;
use ecsrefresh_models::{AlarmBinding, DeploymentState, OutboundEvent, RedeployAck, ServiceState};
use tracing::{debug, warn};

use crate::capabilities::{AlarmStore, EventChannel, ServiceRegistry};
use crate::error::ProviderError;
use crate::registry::Collaborators;
use crate::types::RefreshSettings;

/// Most services one `DescribeServices` call accepts
const DESCRIBE_SERVICES_LIMIT: usize = 10;

/// Most alarm names one `Enable/DisableAlarmActions` call accepts
const ALARM_ACTIONS_LIMIT: usize = 100;

/// Shared AWS configuration
#[derive(Clone)]
pub struct AwsProvider {
    sdk_config: SdkConfig,
}

impl AwsProvider {
    /// Load credentials and defaults from the environment.
    ///
    /// `region` overrides the default region, which is also where the event
    /// bus is addressed.
    pub async fn load(region: Option<String>) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = region {
            loader = loader.region(aws_config::Region::new(region));
        }
        Self {
            sdk_config: loader.load().await,
        }
    }

    pub fn from_sdk_config(sdk_config: SdkConfig) -> Self {
        Self { sdk_config }
    }

    /// Wire this provider into all three capabilities
    pub fn collaborators(&self, settings: RefreshSettings) -> Collaborators {
        let provider = Arc::new(self.clone());
        Collaborators {
            registry: provider.clone(),
            alarms: provider.clone(),
            events: provider,
            settings,
        }
    }

    fn ecs(&self, region: &str) -> aws_sdk_ecs::Client {
        let config = aws_sdk_ecs::config::Builder::from(&self.sdk_config)
            .region(aws_sdk_ecs::config::Region::new(region.to_string()))
            .build();
        aws_sdk_ecs::Client::from_conf(config)
    }

    fn cloudwatch(&self, region: &str) -> aws_sdk_cloudwatch::Client {
        let config = aws_sdk_cloudwatch::config::Builder::from(&self.sdk_config)
            .region(aws_sdk_cloudwatch::config::Region::new(region.to_string()))
            .build();
        aws_sdk_cloudwatch::Client::from_conf(config)
    }

    fn eventbridge(&self) -> aws_sdk_eventbridge::Client {
        aws_sdk_eventbridge::Client::new(&self.sdk_config)
    }
}

/// Split names into request-sized batches
fn name_batches(names: &[String], limit: usize) -> impl Iterator<Item = Vec<String>> + '_ {
    names.chunks(limit).map(<[String]>::to_vec)
}

fn transient<E>(context: &str, err: E) -> ProviderError
where
    E: std::error::Error,
{
    ProviderError::Transient(format!("{}: {}", context, DisplayErrorContext(&err)))
}

#[async_trait]
impl ServiceRegistry for AwsProvider {
    async fn describe_services(
        &self,
        region: &str,
        cluster: &str,
        services: &[String],
    ) -> Result<Vec<ServiceState>, ProviderError> {
        let client = self.ecs(region);
        let mut states = Vec::with_capacity(services.len());

        for batch in name_batches(services, DESCRIBE_SERVICES_LIMIT) {
            let output = client
                .describe_services()
                .cluster(cluster)
                .set_services(Some(batch))
                .send()
                .await
                .map_err(|e| transient("DescribeServices failed", e))?;

            for failure in output.failures() {
                debug!(
                    cluster = %cluster,
                    arn = ?failure.arn(),
                    reason = ?failure.reason(),
                    "DescribeServices reported a failure"
                );
            }

            states.extend(output.services().iter().map(|service| ServiceState {
                service_name: service.service_name().unwrap_or_default().to_string(),
                running_count: service.running_count(),
                pending_count: service.pending_count(),
                desired_count: service.desired_count(),
                deployments: service
                    .deployments()
                    .iter()
                    .map(|deployment| DeploymentState {
                        id: deployment.id().map(str::to_string),
                        rollout_state: deployment.rollout_state().map(|s| s.as_str().to_string()),
                        status: deployment.status().unwrap_or_default().to_string(),
                    })
                    .collect(),
            }));
        }

        Ok(states)
    }

    async fn force_new_deployment(
        &self,
        region: &str,
        cluster: &str,
        service: &str,
    ) -> Result<RedeployAck, ProviderError> {
        let output = self
            .ecs(region)
            .update_service()
            .cluster(cluster)
            .service(service)
            .force_new_deployment(true)
            .send()
            .await
            .map_err(|e| {
                let not_found = e
                    .as_service_error()
                    .is_some_and(|se| se.is_service_not_found_exception() || se.is_cluster_not_found_exception());
                if not_found {
                    ProviderError::NotFound {
                        cluster: cluster.to_string(),
                        service: service.to_string(),
                    }
                } else {
                    transient("UpdateService failed", e)
                }
            })?;

        let updated = output.service();
        let primary = updated.and_then(|s| {
            s.deployments()
                .iter()
                .find(|d| d.status() == Some(ecsrefresh_models::STATUS_PRIMARY))
        });

        Ok(RedeployAck {
            cluster: cluster.to_string(),
            service: service.to_string(),
            service_arn: updated.and_then(|s| s.service_arn()).map(str::to_string),
            status: updated.and_then(|s| s.status()).map(str::to_string),
            desired_count: updated.map(|s| s.desired_count()).unwrap_or_default(),
            running_count: updated.map(|s| s.running_count()).unwrap_or_default(),
            primary_deployment_id: primary.and_then(|d| d.id()).map(str::to_string),
        })
    }
}

#[async_trait]
impl AlarmStore for AwsProvider {
    async fn describe_alarms(
        &self,
        region: &str,
        metric_name: Option<&str>,
    ) -> Result<Vec<AlarmBinding>, ProviderError> {
        let mut alarms = Vec::new();
        let mut pages = self.cloudwatch(region).describe_alarms().into_paginator().send();

        while let Some(page) = pages.next().await {
            let output = page.map_err(|e| transient("DescribeAlarms failed", e))?;

            for alarm in output.metric_alarms() {
                let metric = alarm.metric_name().unwrap_or_default();
                if metric_name.is_some_and(|wanted| wanted != metric) {
                    continue;
                }
                alarms.push(AlarmBinding {
                    alarm_name: alarm.alarm_name().unwrap_or_default().to_string(),
                    metric_name: metric.to_string(),
                    dimensions: alarm
                        .dimensions()
                        .iter()
                        .map(|d| {
                            (
                                d.name().unwrap_or_default().to_string(),
                                d.value().unwrap_or_default().to_string(),
                            )
                        })
                        .collect(),
                });
            }
        }

        Ok(alarms)
    }

    async fn set_alarm_actions_enabled(
        &self,
        region: &str,
        alarm_names: &[String],
        enabled: bool,
    ) -> Result<(), ProviderError> {
        let client = self.cloudwatch(region);
        for batch in name_batches(alarm_names, ALARM_ACTIONS_LIMIT) {
            if enabled {
                client
                    .enable_alarm_actions()
                    .set_alarm_names(Some(batch))
                    .send()
                    .await
                    .map_err(|e| transient("EnableAlarmActions failed", e))?;
            } else {
                client
                    .disable_alarm_actions()
                    .set_alarm_names(Some(batch))
                    .send()
                    .await
                    .map_err(|e| transient("DisableAlarmActions failed", e))?;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl EventChannel for AwsProvider {
    async fn publish(&self, event: &OutboundEvent) -> Result<Option<String>, ProviderError> {
        let entry = aws_sdk_eventbridge::types::PutEventsRequestEntry::builder()
            .source(&event.source)
            .detail_type(&event.detail_type)
            .detail(&event.detail)
            .event_bus_name(&event.bus_name)
            .time(aws_sdk_eventbridge::primitives::DateTime::from_secs(
                event.timestamp.timestamp(),
            ))
            .build();

        let output = self
            .eventbridge()
            .put_events()
            .entries(entry)
            .send()
            .await
            .map_err(|e| transient("PutEvents failed", e))?;

        let result = output.entries().first();
        if output.failed_entry_count() > 0 {
            let message = result
                .and_then(|r| r.error_message())
                .unwrap_or("unknown error")
                .to_string();
            warn!(bus = %event.bus_name, "PutEvents rejected the entry: {}", message);
            return Err(ProviderError::Transient(format!("PutEvents rejected entry: {}", message)));
        }

        Ok(result.and_then(|r| r.event_id()).map(str::to_string))
    }
}
