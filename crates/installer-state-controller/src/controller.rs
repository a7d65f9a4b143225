//! The installer state sync pass.
//!
//! A pass lists the installer pods, works out which of them are stuck pending
//! on a revision that still matters, derives degraded conditions from their
//! status and from pod network failure events, and applies exactly one
//! condition per supported type to the operator status. Nothing is carried
//! between passes.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};

use crate::error::AppError;
use crate::installer::{
    ClusterEvent, InstallerPod, OperatorCondition,
    condition::reconcile_vocabulary,
    evidence::{network_event_conditions, pending_pod_conditions},
    pending::stuck_pending_pods,
    revision::highest_settled_revisions,
};

pub const CONTROLLER_NAME: &str = "InstallerState";

#[async_trait]
pub trait PodLister: Send + Sync {
    /// Installer pods (`app=installer`) in the target namespace.
    async fn list_installer_pods(&self) -> Result<Vec<InstallerPod>, AppError>;
}

#[async_trait]
pub trait EventLister: Send + Sync {
    /// All events in the target namespace.
    async fn list_events(&self) -> Result<Vec<ClusterEvent>, AppError>;
}

#[async_trait]
pub trait StatusPublisher: Send + Sync {
    async fn apply_conditions(&self, conditions: &[OperatorCondition]) -> Result<(), AppError>;
}

/// Receives one warning per degraded condition found. Delivery failures are
/// the sink's problem and never fail a pass.
#[async_trait]
pub trait AuditSink: Send + Sync {
    async fn warning(&self, reason: &str, message: &str);
}

pub fn controller_instance_name(instance_name: &str, controller_name: &str) -> String {
    if instance_name.is_empty() {
        controller_name.to_string()
    } else {
        format!("{}-{}", instance_name, controller_name)
    }
}

pub struct InstallerStateController {
    instance_name: String,
    pods: Arc<dyn PodLister>,
    events: Arc<dyn EventLister>,
    status: Arc<dyn StatusPublisher>,
    audit: Arc<dyn AuditSink>,
    now_fn: fn() -> DateTime<Utc>,
}

impl InstallerStateController {
    pub fn new(
        instance_name: &str,
        pods: Arc<dyn PodLister>,
        events: Arc<dyn EventLister>,
        status: Arc<dyn StatusPublisher>,
        audit: Arc<dyn AuditSink>,
    ) -> Self {
        Self {
            instance_name: controller_instance_name(instance_name, CONTROLLER_NAME),
            pods,
            events,
            status,
            audit,
            now_fn: Utc::now,
        }
    }

    pub fn with_clock(mut self, now_fn: fn() -> DateTime<Utc>) -> Self {
        self.now_fn = now_fn;
        self
    }

    pub fn instance_name(&self) -> &str {
        &self.instance_name
    }

    /// Runs one pass and returns the conditions that were applied.
    ///
    /// A failed read or a malformed settled pod name aborts the pass before
    /// anything is published.
    #[instrument(skip_all, fields(controller = %self.instance_name))]
    pub async fn sync(&self, ct: &CancellationToken) -> Result<Vec<OperatorCondition>, AppError> {
        let pods = cancellable(ct, self.pods.list_installer_pods()).await?;
        debug!("Observed {} installer pods", pods.len());

        let highest_settled = highest_settled_revisions(&pods)?;
        let pending = stuck_pending_pods(&pods, &highest_settled, (self.now_fn)());
        debug!("{} installer pods pending beyond tolerance", pending.len());

        let mut found = pending_pod_conditions(&pending);

        // Events are only worth listing when something is stuck.
        if !pending.is_empty() {
            let events = cancellable(ct, self.events.list_events()).await?;
            found.extend(network_event_conditions(&events, &pending));
        }

        cancellable(ct, async {
            for condition in &found {
                self.audit.warning(&condition.reason, &condition.message).await;
            }
            Ok(())
        })
        .await?;

        let conditions = reconcile_vocabulary(&found);
        cancellable(ct, self.status.apply_conditions(&conditions)).await?;

        info!(
            degraded = conditions.iter().filter(|c| c.is_true()).count(),
            "Applied installer state conditions"
        );
        Ok(conditions)
    }
}

async fn cancellable<T, F>(ct: &CancellationToken, fut: F) -> Result<T, AppError>
where
    F: Future<Output = Result<T, AppError>>,
{
    tokio::select! {
        biased;
        _ = ct.cancelled() => Err(AppError::Cancelled),
        res = fut => res,
    }
}
