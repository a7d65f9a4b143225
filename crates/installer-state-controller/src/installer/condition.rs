use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The degraded conditions this controller owns on the operator status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConditionType {
    InstallerPodPendingDegraded,
    InstallerPodContainerWaitingDegraded,
    InstallerPodNetworkingDegraded,
}

impl ConditionType {
    pub const ALL: [ConditionType; 3] = [
        ConditionType::InstallerPodPendingDegraded,
        ConditionType::InstallerPodContainerWaitingDegraded,
        ConditionType::InstallerPodNetworkingDegraded,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ConditionType::InstallerPodPendingDegraded => "InstallerPodPendingDegraded",
            ConditionType::InstallerPodContainerWaitingDegraded => {
                "InstallerPodContainerWaitingDegraded"
            }
            ConditionType::InstallerPodNetworkingDegraded => "InstallerPodNetworkingDegraded",
        }
    }
}

impl fmt::Display for ConditionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConditionStatus {
    True,
    False,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperatorCondition {
    #[serde(rename = "type")]
    pub r#type: ConditionType,

    pub status: ConditionStatus,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub reason: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_transition_time: Option<DateTime<Utc>>,
}

impl OperatorCondition {
    pub fn degraded(r#type: ConditionType, reason: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            r#type,
            status: ConditionStatus::True,
            reason: reason.into(),
            message: message.into(),
            last_transition_time: None,
        }
    }

    pub fn clear(r#type: ConditionType) -> Self {
        Self {
            r#type,
            status: ConditionStatus::False,
            reason: String::new(),
            message: String::new(),
            last_transition_time: None,
        }
    }

    pub fn is_true(&self) -> bool {
        self.status == ConditionStatus::True
    }
}

pub fn find_condition(
    conditions: &[OperatorCondition],
    r#type: ConditionType,
) -> Option<&OperatorCondition> {
    conditions.iter().find(|c| c.r#type == r#type)
}

/// One condition per vocabulary type, in vocabulary order. Types without
/// evidence are explicitly cleared; otherwise the first found entry wins.
pub fn reconcile_vocabulary(found: &[OperatorCondition]) -> Vec<OperatorCondition> {
    ConditionType::ALL
        .iter()
        .map(|&r#type| {
            let mut updated = OperatorCondition::clear(r#type);
            if let Some(condition) = find_condition(found, r#type) {
                updated.status = condition.status;
                updated.reason = condition.reason.clone();
                updated.message = condition.message.clone();
            }
            updated
        })
        .collect()
}

/// Keeps the previous transition time for conditions whose status is unchanged
/// and stamps `now` on the rest.
pub fn carry_transition_times(
    previous: &[OperatorCondition],
    next: &mut [OperatorCondition],
    now: DateTime<Utc>,
) {
    for condition in next.iter_mut() {
        condition.last_transition_time = match find_condition(previous, condition.r#type) {
            Some(old) if old.status == condition.status => old.last_transition_time.or(Some(now)),
            _ => Some(now),
        };
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    #[test]
    fn test_empty_evidence_clears_every_type() {
        let reconciled = reconcile_vocabulary(&[]);
        assert_eq!(reconciled.len(), 3);
        for (condition, expected) in reconciled.iter().zip(ConditionType::ALL) {
            assert_eq!(condition.r#type, expected);
            assert_eq!(condition.status, ConditionStatus::False);
            assert!(condition.reason.is_empty());
        }
    }

    #[test]
    fn test_first_found_wins() {
        let found = vec![
            OperatorCondition::degraded(ConditionType::InstallerPodNetworkingDegraded, "A", "first"),
            OperatorCondition::degraded(ConditionType::InstallerPodNetworkingDegraded, "B", "second"),
        ];
        let reconciled = reconcile_vocabulary(&found);
        assert_eq!(reconciled.len(), 3);
        let net = find_condition(&reconciled, ConditionType::InstallerPodNetworkingDegraded).unwrap();
        assert!(net.is_true());
        assert_eq!(net.reason, "A");
        assert_eq!(net.message, "first");
        assert!(!reconciled[0].is_true());
        assert!(!reconciled[1].is_true());
    }

    #[test]
    fn test_wire_format() {
        let value = serde_json::to_value(OperatorCondition::degraded(
            ConditionType::InstallerPodPendingDegraded,
            "Unschedulable",
            "msg",
        ))
        .unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "type": "InstallerPodPendingDegraded",
                "status": "True",
                "reason": "Unschedulable",
                "message": "msg",
            })
        );

        let clear = serde_json::to_value(OperatorCondition::clear(
            ConditionType::InstallerPodNetworkingDegraded,
        ))
        .unwrap();
        assert_eq!(
            clear,
            serde_json::json!({ "type": "InstallerPodNetworkingDegraded", "status": "False" })
        );
    }

    #[test]
    fn test_carry_transition_times() {
        let now = Utc::now();
        let earlier = now - Duration::hours(1);
        let mut previous = reconcile_vocabulary(&[]);
        for c in previous.iter_mut() {
            c.last_transition_time = Some(earlier);
        }

        let mut next = reconcile_vocabulary(&[OperatorCondition::degraded(
            ConditionType::InstallerPodPendingDegraded,
            "Unschedulable",
            "msg",
        )]);
        carry_transition_times(&previous, &mut next, now);

        assert_eq!(next[0].last_transition_time, Some(now));
        assert_eq!(next[1].last_transition_time, Some(earlier));
        assert_eq!(next[2].last_transition_time, Some(earlier));
    }

    #[test]
    fn test_carry_transition_times_without_previous() {
        let now = Utc::now();
        let mut next = reconcile_vocabulary(&[]);
        carry_transition_times(&[], &mut next, now);
        assert!(next.iter().all(|c| c.last_transition_time == Some(now)));
    }
}
