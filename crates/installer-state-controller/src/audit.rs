use async_trait::async_trait;
use k8s_openapi::api::core::v1::ObjectReference;
use kube::runtime::events::{Event, EventType, Recorder};

use crate::config::OperatorResourceConfig;
use crate::controller::AuditSink;

pub const AUDIT_ACTION: &str = "InstallerStateSync";

/// Publishes warnings as Kubernetes events on the operator resource.
pub struct KubeAuditSink {
    recorder: Recorder,
    reference: ObjectReference,
}

impl KubeAuditSink {
    pub fn new(recorder: Recorder, reference: ObjectReference) -> Self {
        Self { recorder, reference }
    }
}

/// Events about a cluster-scoped operator resource land in `namespace`.
pub fn operator_reference(config: &OperatorResourceConfig, namespace: &str) -> ObjectReference {
    let api_version = if config.group.is_empty() {
        config.version.clone()
    } else {
        format!("{}/{}", config.group, config.version)
    };
    ObjectReference {
        api_version: Some(api_version),
        kind: Some(config.kind.clone()),
        name: Some(config.name.clone()),
        namespace: Some(namespace.to_string()),
        ..Default::default()
    }
}

#[async_trait]
impl AuditSink for KubeAuditSink {
    async fn warning(&self, reason: &str, message: &str) {
        tracing::warn!(reason = %reason, "{}", message);
        let event = Event {
            type_: EventType::Warning,
            reason: reason.to_string(),
            note: Some(message.to_string()),
            action: AUDIT_ACTION.to_string(),
            secondary: None,
        };
        if let Err(err) = self.recorder.publish(&event, &self.reference).await {
            tracing::warn!("Failed to record {} event: {}", reason, err);
        }
    }
}
