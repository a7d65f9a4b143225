use async_trait::async_trait;
use chrono::{SubsecRound, Utc};
use kube::{
    Api, Client,
    api::{DynamicObject, Patch, PatchParams},
    core::GroupVersionKind,
    discovery::ApiResource,
};
use serde_json::json;

use crate::config::OperatorResourceConfig;
use crate::controller::StatusPublisher;
use crate::error::AppError;
use crate::installer::{OperatorCondition, condition::carry_transition_times};

/// Applies conditions to the status of the operator resource with server-side
/// apply, so conditions owned by other field managers are left alone.
pub struct OperatorStatusStore {
    api: Api<DynamicObject>,
    resource: ApiResource,
    name: String,
    field_manager: String,
}

impl OperatorStatusStore {
    pub fn new(client: Client, config: &OperatorResourceConfig, field_manager: impl Into<String>) -> Self {
        let gvk = GroupVersionKind::gvk(&config.group, &config.version, &config.kind);
        let resource = ApiResource::from_gvk_with_plural(&gvk, &config.plural);
        Self {
            api: Api::all_with(client, &resource),
            resource,
            name: config.name.clone(),
            field_manager: field_manager.into(),
        }
    }

    async fn current_conditions(&self) -> Result<Vec<OperatorCondition>, AppError> {
        let Some(obj) = self.api.get_opt(&self.name).await? else {
            tracing::warn!("Operator resource {} not found, applying without history", self.name);
            return Ok(vec![]);
        };
        Ok(conditions_from_status(&obj.data))
    }

    fn status_patch(&self, conditions: &[OperatorCondition]) -> serde_json::Value {
        json!({
            "apiVersion": self.resource.api_version,
            "kind": self.resource.kind,
            "metadata": {
                "name": self.name,
            },
            "status": {
                "conditions": conditions,
            }
        })
    }
}

/// Conditions of the supported types found under `status.conditions`. Entries
/// owned by other controllers do not parse and are skipped.
pub fn conditions_from_status(data: &serde_json::Value) -> Vec<OperatorCondition> {
    data.get("status")
        .and_then(|status| status.get("conditions"))
        .and_then(|conditions| conditions.as_array())
        .map(|items| {
            items
                .iter()
                .filter_map(|item| serde_json::from_value(item.clone()).ok())
                .collect()
        })
        .unwrap_or_default()
}

#[async_trait]
impl StatusPublisher for OperatorStatusStore {
    async fn apply_conditions(&self, conditions: &[OperatorCondition]) -> Result<(), AppError> {
        let previous = self.current_conditions().await?;
        let mut conditions = conditions.to_vec();
        carry_transition_times(&previous, &mut conditions, Utc::now().trunc_subsecs(0));

        let patch = self.status_patch(&conditions);
        self.api
            .patch_status(
                &self.name,
                &PatchParams::apply(&self.field_manager).force(),
                &Patch::Apply(&patch),
            )
            .await
            .map_err(AppError::from)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::installer::{ConditionStatus, ConditionType};

    #[test]
    fn test_conditions_from_status_skips_foreign_types() {
        let data = json!({
            "spec": {},
            "status": {
                "conditions": [
                    { "type": "NodeInstallerDegraded", "status": "False" },
                    {
                        "type": "InstallerPodPendingDegraded",
                        "status": "True",
                        "reason": "Unschedulable",
                        "message": "stuck",
                        "lastTransitionTime": "2026-10-16T08:00:00Z"
                    },
                    { "type": "InstallerPodNetworkingDegraded", "status": "False" }
                ]
            }
        });

        let conditions = conditions_from_status(&data);
        assert_eq!(conditions.len(), 2);
        assert_eq!(conditions[0].r#type, ConditionType::InstallerPodPendingDegraded);
        assert_eq!(conditions[0].status, ConditionStatus::True);
        assert!(conditions[0].last_transition_time.is_some());
        assert_eq!(conditions[1].r#type, ConditionType::InstallerPodNetworkingDegraded);
    }

    #[test]
    fn test_conditions_from_status_without_status() {
        assert!(conditions_from_status(&json!({ "spec": {} })).is_empty());
    }
}
