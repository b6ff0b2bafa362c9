//! In-memory collaborators for tests
//!
//! Every fake records its calls into a shared [`Journal`] so tests can assert
//! both what was called and in which order.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;
use ecsrefresh_models::{
    AlarmBinding, DeploymentState, OutboundEvent, RedeployAck, ServiceState, ROLLOUT_COMPLETED,
    STATUS_PRIMARY,
};

use crate::capabilities::{AlarmStore, EventChannel, ServiceRegistry};
use crate::error::ProviderError;
use crate::registry::Collaborators;
use crate::types::RefreshSettings;

/// Ordered log of collaborator calls, e.g. `"redeploy clusterA|svcA"`,
/// stamped with the tokio clock so paused-time tests can see the pauses
#[derive(Debug, Clone, Default)]
pub struct Journal(Arc<Mutex<Vec<(Instant, String)>>>);

impl Journal {
    fn record(&self, entry: String) {
        self.0.lock().unwrap().push((Instant::now(), entry));
    }

    pub fn entries(&self) -> Vec<String> {
        self.0
            .lock()
            .unwrap()
            .iter()
            .map(|(_, entry)| entry.clone())
            .collect()
    }

    /// Entries with the time elapsed between `start` and each call
    pub fn timeline(&self, start: Instant) -> Vec<(Duration, String)> {
        self.0
            .lock()
            .unwrap()
            .iter()
            .map(|(at, entry)| (at.duration_since(start), entry.clone()))
            .collect()
    }
}

/// A service with one completed PRIMARY deployment and all tasks running
pub fn stable_service(name: &str, desired: i32) -> ServiceState {
    ServiceState {
        service_name: name.to_string(),
        running_count: desired,
        pending_count: 0,
        desired_count: desired,
        deployments: vec![DeploymentState {
            id: Some(format!("ecs-svc/{}", name)),
            rollout_state: Some(ROLLOUT_COMPLETED.to_string()),
            status: STATUS_PRIMARY.to_string(),
        }],
    }
}

/// A CPUUtilization alarm with the given dimensions
pub fn cpu_alarm(name: &str, dimensions: &[(&str, &str)]) -> AlarmBinding {
    AlarmBinding {
        alarm_name: name.to_string(),
        metric_name: ecsrefresh_models::CPU_UTILIZATION_METRIC.to_string(),
        dimensions: dimensions
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
    }
}

// ============================================================================
// Service registry
// ============================================================================

#[derive(Default)]
pub struct FakeRegistry {
    services: HashMap<(String, String), ServiceState>,
    describe_error: Option<String>,
    redeploy_errors: HashMap<String, String>,
    redeploys: Mutex<Vec<(String, String)>>,
    journal: Journal,
}

impl FakeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_service(mut self, cluster: &str, state: ServiceState) -> Self {
        self.services
            .insert((cluster.to_string(), state.service_name.clone()), state);
        self
    }

    pub fn failing_describe(mut self, message: &str) -> Self {
        self.describe_error = Some(message.to_string());
        self
    }

    pub fn failing_redeploy(mut self, service: &str, message: &str) -> Self {
        self.redeploy_errors
            .insert(service.to_string(), message.to_string());
        self
    }

    fn with_journal(mut self, journal: Journal) -> Self {
        self.journal = journal;
        self
    }

    /// `(cluster, service)` of every redeploy call, in call order
    pub fn redeploys(&self) -> Vec<(String, String)> {
        self.redeploys.lock().unwrap().clone()
    }
}

#[async_trait]
impl ServiceRegistry for FakeRegistry {
    async fn describe_services(
        &self,
        _region: &str,
        cluster: &str,
        services: &[String],
    ) -> Result<Vec<ServiceState>, ProviderError> {
        self.journal
            .record(format!("describe {}|{}", cluster, services.join(",")));
        if let Some(message) = &self.describe_error {
            return Err(ProviderError::Transient(message.clone()));
        }
        Ok(services
            .iter()
            .filter_map(|name| self.services.get(&(cluster.to_string(), name.clone())))
            .cloned()
            .collect())
    }

    async fn force_new_deployment(
        &self,
        _region: &str,
        cluster: &str,
        service: &str,
    ) -> Result<RedeployAck, ProviderError> {
        self.journal.record(format!("redeploy {}|{}", cluster, service));
        self.redeploys
            .lock()
            .unwrap()
            .push((cluster.to_string(), service.to_string()));

        if let Some(message) = self.redeploy_errors.get(service) {
            return Err(ProviderError::Transient(message.clone()));
        }
        let state = self
            .services
            .get(&(cluster.to_string(), service.to_string()))
            .ok_or_else(|| ProviderError::NotFound {
                cluster: cluster.to_string(),
                service: service.to_string(),
            })?;

        Ok(RedeployAck {
            cluster: cluster.to_string(),
            service: service.to_string(),
            service_arn: Some(format!("arn:aws:ecs:us-east-1:000000000000:service/{}/{}", cluster, service)),
            status: Some("ACTIVE".to_string()),
            desired_count: state.desired_count,
            running_count: state.running_count,
            primary_deployment_id: Some(format!("ecs-svc/{}-new", service)),
        })
    }
}

// ============================================================================
// Alarm store
// ============================================================================

#[derive(Default)]
pub struct FakeAlarmStore {
    alarms: Vec<AlarmBinding>,
    describe_error: Option<String>,
    toggles: Mutex<Vec<(Vec<String>, bool)>>,
    journal: Journal,
}

impl FakeAlarmStore {
    pub fn new(alarms: Vec<AlarmBinding>) -> Self {
        Self {
            alarms,
            ..Self::default()
        }
    }

    pub fn failing_describe(mut self, message: &str) -> Self {
        self.describe_error = Some(message.to_string());
        self
    }

    fn with_journal(mut self, journal: Journal) -> Self {
        self.journal = journal;
        self
    }

    /// Every toggle call as `(names, enabled)`
    pub fn toggles(&self) -> Vec<(Vec<String>, bool)> {
        self.toggles.lock().unwrap().clone()
    }
}

#[async_trait]
impl AlarmStore for FakeAlarmStore {
    async fn describe_alarms(
        &self,
        _region: &str,
        metric_name: Option<&str>,
    ) -> Result<Vec<AlarmBinding>, ProviderError> {
        if let Some(message) = &self.describe_error {
            return Err(ProviderError::Transient(message.clone()));
        }
        Ok(self
            .alarms
            .iter()
            .filter(|a| metric_name.map_or(true, |m| a.metric_name == m))
            .cloned()
            .collect())
    }

    async fn set_alarm_actions_enabled(
        &self,
        _region: &str,
        alarm_names: &[String],
        enabled: bool,
    ) -> Result<(), ProviderError> {
        let verb = if enabled { "enable" } else { "disable" };
        self.journal
            .record(format!("{} {}", verb, alarm_names.join(",")));
        self.toggles
            .lock()
            .unwrap()
            .push((alarm_names.to_vec(), enabled));
        Ok(())
    }
}

// ============================================================================
// Event channel
// ============================================================================

#[derive(Default)]
pub struct FakeEventChannel {
    published: Mutex<Vec<OutboundEvent>>,
    journal: Journal,
}

impl FakeEventChannel {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_journal(mut self, journal: Journal) -> Self {
        self.journal = journal;
        self
    }

    pub fn published(&self) -> Vec<OutboundEvent> {
        self.published.lock().unwrap().clone()
    }
}

#[async_trait]
impl EventChannel for FakeEventChannel {
    async fn publish(&self, event: &OutboundEvent) -> Result<Option<String>, ProviderError> {
        self.journal.record(format!("publish {}", event.detail));
        let mut published = self.published.lock().unwrap();
        published.push(event.clone());
        Ok(Some(format!("event-{}", published.len())))
    }
}

// ============================================================================
// Bundle
// ============================================================================

/// The three fakes wired to one journal
pub struct Fakes {
    pub registry: Arc<FakeRegistry>,
    pub alarms: Arc<FakeAlarmStore>,
    pub events: Arc<FakeEventChannel>,
    pub journal: Journal,
}

impl Fakes {
    pub fn new(registry: FakeRegistry, alarms: FakeAlarmStore) -> Self {
        let journal = Journal::default();
        Self {
            registry: Arc::new(registry.with_journal(journal.clone())),
            alarms: Arc::new(alarms.with_journal(journal.clone())),
            events: Arc::new(FakeEventChannel::new().with_journal(journal.clone())),
            journal,
        }
    }

    /// Collaborators with zero settle and pacing delays
    pub fn collaborators(&self) -> Collaborators {
        self.collaborators_with(RefreshSettings {
            alarm_settle: Duration::ZERO,
            event_pacing: Duration::ZERO,
            ..RefreshSettings::default()
        })
    }

    pub fn collaborators_with(&self, settings: RefreshSettings) -> Collaborators {
        Collaborators {
            registry: self.registry.clone(),
            alarms: self.alarms.clone(),
            events: self.events.clone(),
            settings,
        }
    }
}
