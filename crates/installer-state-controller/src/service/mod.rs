pub mod util;

use std::sync::Arc;
use std::time::Duration;

use futures::TryStreamExt;
use k8s_openapi::api::core::v1::Pod;
use kube::{
    Api, ResourceExt,
    runtime::{WatchStreamExt, metadata_watcher, watcher::Config},
};
use tokio::sync::Notify;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::{
    controller::InstallerStateController, error::AppError, state::AppState,
    storage::labels::installer_pod_selector,
};

/// Watches installer pods and drives sync passes until `ct` is cancelled.
pub async fn run(
    state: AppState,
    controller: Arc<InstallerStateController>,
    resync: Duration,
    ct: CancellationToken,
) {
    let changed = Arc::new(Notify::new());
    let listener = tokio::spawn(installer_pod_listener(state, changed.clone(), ct.clone()));

    sync_loop(controller, changed, resync, ct).await;

    if let Err(err) = listener.await {
        tracing::error!("Installer pod listener ended abnormally: {}", err);
    }
    tracing::info!("Installer state controller stopped");
}

/// Runs a pass at startup, on every `changed` notification and on every
/// `resync` tick, until `ct` is cancelled. Passes never overlap and
/// notifications arriving during a pass collapse into a single follow-up pass.
/// A failed pass is logged and retried on the next trigger.
pub async fn sync_loop(
    controller: Arc<InstallerStateController>,
    changed: Arc<Notify>,
    resync: Duration,
    ct: CancellationToken,
) {
    let mut ticker = tokio::time::interval(resync);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ct.cancelled() => break,
            _ = ticker.tick() => tracing::debug!("Periodic resync"),
            _ = changed.notified() => tracing::debug!("Installer pods changed"),
        }

        match controller.sync(&ct).await {
            Ok(_) => {}
            Err(AppError::Cancelled) => break,
            Err(err) if err.is_transport() => {
                tracing::error!("Installer state sync failed, retrying on next trigger: {}", err);
            }
            Err(err) => {
                tracing::error!("Installer state sync rejected observed pods: {}", err);
            }
        }
    }
}

async fn installer_pod_listener(state: AppState, changed: Arc<Notify>, ct: CancellationToken) {
    let pods = Api::<Pod>::namespaced(state.kube_client.clone(), state.kube_store.namespace());
    let watch = metadata_watcher(pods, Config::default().labels(&installer_pod_selector()))
        .default_backoff()
        .touched_objects();
    let mut watch = Box::pin(watch);

    loop {
        tokio::select! {
            _ = ct.cancelled() => break,
            next = watch.try_next() => match next {
                Ok(Some(pod)) => {
                    tracing::debug!("Installer pod changed: {}", pod.name_any());
                    changed.notify_one();
                }
                Ok(None) => {
                    tracing::warn!("Installer pod watcher ended");
                    break;
                }
                Err(err) => {
                    tracing::warn!("Installer pod watcher error: {}", err);
                }
            },
        }
    }
}
