//! Snapshot types for installer pods and namespace events, plus the analysis
//! steps that turn them into degraded conditions.

pub mod condition;
pub mod evidence;
pub mod pending;
pub mod revision;

use chrono::{DateTime, Utc};
use k8s_openapi::api::core::v1::{Event, Pod};

pub use condition::{ConditionStatus, ConditionType, OperatorCondition};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PodPhase {
    Pending,
    Running,
    Succeeded,
    Failed,
    Unknown,
}

impl From<&str> for PodPhase {
    fn from(phase: &str) -> Self {
        match phase {
            "Pending" => PodPhase::Pending,
            "Running" => PodPhase::Running,
            "Succeeded" => PodPhase::Succeeded,
            "Failed" => PodPhase::Failed,
            _ => PodPhase::Unknown,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitingState {
    pub reason: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerSnapshot {
    pub name: String,
    pub waiting: Option<WaitingState>,
}

/// One installer pod as observed at the start of a sync pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallerPod {
    pub name: String,
    pub node_name: String,
    pub phase: PodPhase,
    pub start_time: Option<DateTime<Utc>>,
    pub reason: Option<String>,
    pub message: Option<String>,
    pub containers: Vec<ContainerSnapshot>,
}

impl InstallerPod {
    /// Pending with a start time. Pods without one have not been scheduled far
    /// enough to count as stuck.
    pub fn is_started_pending(&self) -> bool {
        self.phase == PodPhase::Pending && self.start_time.is_some()
    }
}

impl From<&Pod> for InstallerPod {
    fn from(pod: &Pod) -> Self {
        let status = pod.status.clone().unwrap_or_default();

        let phase = status
            .phase
            .as_deref()
            .map(PodPhase::from)
            .unwrap_or(PodPhase::Unknown);

        let containers = status
            .container_statuses
            .unwrap_or_default()
            .into_iter()
            .map(|cs| ContainerSnapshot {
                name: cs.name,
                waiting: cs.state.and_then(|s| s.waiting).map(|w| WaitingState {
                    reason: w.reason.unwrap_or_default(),
                    message: w.message.unwrap_or_default(),
                }),
            })
            .collect();

        Self {
            name: pod.metadata.name.clone().unwrap_or_default(),
            node_name: pod
                .spec
                .as_ref()
                .and_then(|s| s.node_name.clone())
                .unwrap_or_default(),
            phase,
            start_time: status.start_time.map(|t| t.0),
            reason: status.reason,
            message: status.message,
            containers,
        }
    }
}

/// A namespace event reduced to the fields used for correlation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterEvent {
    pub involved_kind: String,
    pub involved_name: String,
    pub reason: String,
    pub message: String,
}

impl From<&Event> for ClusterEvent {
    fn from(event: &Event) -> Self {
        Self {
            involved_kind: event.involved_object.kind.clone().unwrap_or_default(),
            involved_name: event.involved_object.name.clone().unwrap_or_default(),
            reason: event.reason.clone().unwrap_or_default(),
            message: event.message.clone().unwrap_or_default(),
        }
    }
}
