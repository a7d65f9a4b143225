use chrono::{DateTime, SecondsFormat, Utc};

use super::condition::{ConditionType, OperatorCondition, find_condition};
use super::{ClusterEvent, InstallerPod};

pub const POD_KIND: &str = "Pod";
pub const POD_NETWORK_FAILURE_MARKER: &str = "failed to create pod network";

fn format_since(start_time: DateTime<Utc>) -> String {
    start_time.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Conditions derived from the pod status of each stuck pod: one pending
/// condition per pod with a pending reason, and one container-waiting
/// condition per waiting container with a reason.
///
/// Only started pods are stuck; pods without a start time yield nothing.
pub fn pending_pod_conditions(pods: &[InstallerPod]) -> Vec<OperatorCondition> {
    let mut conditions = Vec::new();
    for pod in pods {
        let Some(started) = pod.start_time else {
            continue;
        };
        let since = format_since(started);

        if let Some(reason) = pod.reason.as_deref().filter(|r| !r.is_empty()) {
            conditions.push(OperatorCondition::degraded(
                ConditionType::InstallerPodPendingDegraded,
                reason,
                format!(
                    "Pod {:?} on node {:?} is Pending since {} because {}",
                    pod.name,
                    pod.node_name,
                    since,
                    pod.message.as_deref().unwrap_or_default()
                ),
            ));
        }

        for container in &pod.containers {
            let Some(waiting) = container.waiting.as_ref().filter(|w| !w.reason.is_empty()) else {
                continue;
            };
            let cause = if waiting.message.is_empty() {
                waiting.reason.clone()
            } else {
                format!("{:?}", waiting.message)
            };
            conditions.push(OperatorCondition::degraded(
                ConditionType::InstallerPodContainerWaitingDegraded,
                waiting.reason.clone(),
                format!(
                    "Pod {:?} on node {:?} container {:?} is waiting since {} because {}",
                    pod.name, pod.node_name, container.name, since, cause
                ),
            ));
        }
    }
    conditions
}

/// Networking conditions correlated from pod network failure events. Once a
/// true networking condition has been produced, further matches are dropped.
pub fn network_event_conditions(
    events: &[ClusterEvent],
    pods: &[InstallerPod],
) -> Vec<OperatorCondition> {
    let mut conditions = Vec::new();
    for event in events {
        if event.involved_kind != POD_KIND || !event.message.contains(POD_NETWORK_FAILURE_MARKER) {
            continue;
        }
        for pod in pods.iter().filter(|p| p.name == event.involved_name) {
            if find_condition(&conditions, ConditionType::InstallerPodNetworkingDegraded)
                .is_some_and(OperatorCondition::is_true)
            {
                break;
            }
            conditions.push(OperatorCondition::degraded(
                ConditionType::InstallerPodNetworkingDegraded,
                event.reason.clone(),
                format!(
                    "Pod {:?} on node {:?} observed degraded networking: {}",
                    pod.name, pod.node_name, event.message
                ),
            ));
        }
    }
    conditions
}
