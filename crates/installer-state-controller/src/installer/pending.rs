use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};

use super::InstallerPod;
use super::revision::installer_name_to_revision;

/// Maximum time an installer pod may sit in Pending before it is reported.
pub const MAX_TOLERATED_POD_PENDING_DURATION: Duration = Duration::minutes(5);

/// Pods pending for at least [`MAX_TOLERATED_POD_PENDING_DURATION`] whose
/// revision is not behind the highest settled revision on their node.
///
/// Unparseable names are read as revision 0 here; the authoritative check is
/// [`super::revision::highest_settled_revisions`].
pub fn stuck_pending_pods(
    pods: &[InstallerPod],
    highest_settled: &HashMap<String, u64>,
    now: DateTime<Utc>,
) -> Vec<InstallerPod> {
    pods.iter()
        .filter(|pod| {
            let Some(started) = pod.start_time.filter(|_| pod.is_started_pending()) else {
                return false;
            };
            let revision = installer_name_to_revision(&pod.name).unwrap_or(0);
            let baseline = highest_settled.get(&pod.node_name).copied().unwrap_or(0);
            now.signed_duration_since(started) >= MAX_TOLERATED_POD_PENDING_DURATION
                && revision >= baseline
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::installer::PodPhase;

    fn pending(name: &str, node: &str, pending_for: Duration, now: DateTime<Utc>) -> InstallerPod {
        InstallerPod {
            name: name.to_string(),
            node_name: node.to_string(),
            phase: PodPhase::Pending,
            start_time: Some(now - pending_for),
            reason: None,
            message: None,
            containers: vec![],
        }
    }

    #[test]
    fn test_tolerance_boundary() {
        let now = Utc::now();
        let pods = vec![
            pending("installer-4-n1", "n1", Duration::minutes(5), now),
            pending("installer-4-n2", "n2", Duration::minutes(4) + Duration::seconds(59), now),
        ];
        let stuck = stuck_pending_pods(&pods, &HashMap::new(), now);
        assert_eq!(stuck.len(), 1);
        assert_eq!(stuck[0].name, "installer-4-n1");
    }

    #[test]
    fn test_superseded_revision_is_ignored() {
        let now = Utc::now();
        let pods = vec![pending("installer-2-n1", "n1", Duration::minutes(10), now)];
        let highest = HashMap::from([("n1".to_string(), 3)]);
        assert!(stuck_pending_pods(&pods, &highest, now).is_empty());
    }

    #[test]
    fn test_same_revision_as_baseline_is_kept() {
        let now = Utc::now();
        let pods = vec![pending("installer-3-n1", "n1", Duration::minutes(10), now)];
        let highest = HashMap::from([("n1".to_string(), 3)]);
        assert_eq!(stuck_pending_pods(&pods, &highest, now).len(), 1);
    }

    #[test]
    fn test_malformed_name_is_lenient() {
        let now = Utc::now();
        let pods = vec![pending("installer", "n1", Duration::minutes(10), now)];
        assert_eq!(stuck_pending_pods(&pods, &HashMap::new(), now).len(), 1);

        let highest = HashMap::from([("n1".to_string(), 1)]);
        assert!(stuck_pending_pods(&pods, &highest, now).is_empty());
    }

    #[test]
    fn test_non_pending_and_unstarted_are_skipped() {
        let now = Utc::now();
        let mut running = pending("installer-4-n1", "n1", Duration::minutes(10), now);
        running.phase = PodPhase::Running;
        let mut unstarted = pending("installer-4-n2", "n2", Duration::minutes(10), now);
        unstarted.start_time = None;
        assert!(stuck_pending_pods(&[running, unstarted], &HashMap::new(), now).is_empty());
    }
}
