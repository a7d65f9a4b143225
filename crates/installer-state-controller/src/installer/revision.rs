use std::collections::HashMap;

use super::InstallerPod;
use crate::error::AppError;

/// Parses the revision out of an installer pod name such as `installer-7-master-0`.
pub fn installer_name_to_revision(name: &str) -> Result<u64, AppError> {
    let mut parts = name.split('-');
    let _ = parts.next();
    let Some(segment) = parts.next() else {
        return Err(AppError::InvalidInstallerName {
            name: name.to_string(),
        });
    };
    segment.parse::<u64>().map_err(|_| AppError::InvalidRevision {
        name: name.to_string(),
        segment: segment.to_string(),
    })
}

/// Highest revision per node among pods that are no longer pending. Pending
/// pods without a start time count as settled here.
///
/// A malformed name fails the whole computation.
pub fn highest_settled_revisions(pods: &[InstallerPod]) -> Result<HashMap<String, u64>, AppError> {
    let mut by_node: HashMap<&str, Vec<&InstallerPod>> = HashMap::new();
    for pod in pods {
        by_node.entry(pod.node_name.as_str()).or_default().push(pod);
    }

    let mut highest = HashMap::with_capacity(by_node.len());
    for (node, node_pods) in by_node {
        let mut max_rev = 0;
        for pod in node_pods {
            if pod.is_started_pending() {
                continue;
            }
            max_rev = max_rev.max(installer_name_to_revision(&pod.name)?);
        }
        highest.insert(node.to_string(), max_rev);
    }
    Ok(highest)
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::installer::PodPhase;

    fn pod(name: &str, node: &str, phase: PodPhase, started: bool) -> InstallerPod {
        InstallerPod {
            name: name.to_string(),
            node_name: node.to_string(),
            phase,
            start_time: started.then(Utc::now),
            reason: None,
            message: None,
            containers: vec![],
        }
    }

    #[test]
    fn test_revision_from_name() {
        assert_eq!(installer_name_to_revision("installer-7-nodeA").unwrap(), 7);
        assert_eq!(installer_name_to_revision("installer-12").unwrap(), 12);
    }

    #[test]
    fn test_revision_missing_segment() {
        let err = installer_name_to_revision("installer").unwrap_err();
        assert!(matches!(err, AppError::InvalidInstallerName { .. }));
    }

    #[test]
    fn test_revision_non_numeric() {
        let err = installer_name_to_revision("installer-abc-n1").unwrap_err();
        assert!(matches!(err, AppError::InvalidRevision { ref segment, .. } if segment == "abc"));
        assert!(installer_name_to_revision("installer--n1").is_err());
        assert!(installer_name_to_revision("installer--1-n1").is_err());
    }

    #[test]
    fn test_highest_settled_per_node() {
        let pods = vec![
            pod("installer-2-n1", "n1", PodPhase::Succeeded, true),
            pod("installer-3-n1", "n1", PodPhase::Failed, true),
            pod("installer-9-n1", "n1", PodPhase::Pending, true),
            pod("installer-5-n2", "n2", PodPhase::Running, true),
        ];
        let highest = highest_settled_revisions(&pods).unwrap();
        assert_eq!(highest.get("n1"), Some(&3));
        assert_eq!(highest.get("n2"), Some(&5));
    }

    #[test]
    fn test_pending_without_start_time_counts_as_settled() {
        let pods = vec![
            pod("installer-2-n1", "n1", PodPhase::Succeeded, true),
            pod("installer-4-n1", "n1", PodPhase::Pending, false),
        ];
        let highest = highest_settled_revisions(&pods).unwrap();
        assert_eq!(highest.get("n1"), Some(&4));
    }

    #[test]
    fn test_node_with_only_pending_pods_defaults_to_zero() {
        let pods = vec![pod("installer-6-n3", "n3", PodPhase::Pending, true)];
        let highest = highest_settled_revisions(&pods).unwrap();
        assert_eq!(highest.get("n3"), Some(&0));
    }

    #[test]
    fn test_malformed_settled_name_is_fatal() {
        let pods = vec![
            pod("installer-2-n1", "n1", PodPhase::Succeeded, true),
            pod("installer", "n1", PodPhase::Succeeded, true),
        ];
        assert!(highest_settled_revisions(&pods).is_err());
    }

    #[test]
    fn test_malformed_pending_name_is_skipped() {
        let pods = vec![pod("installer", "n1", PodPhase::Pending, true)];
        let highest = highest_settled_revisions(&pods).unwrap();
        assert_eq!(highest.get("n1"), Some(&0));
    }
}
