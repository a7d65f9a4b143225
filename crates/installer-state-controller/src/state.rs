use std::sync::Arc;

use kube::{
    Client,
    runtime::events::{Recorder, Reporter},
};

use crate::audit::{KubeAuditSink, operator_reference};
use crate::config::AppConfig;
use crate::controller::{CONTROLLER_NAME, InstallerStateController, controller_instance_name};
use crate::storage::store::KubeStore;

#[derive(Clone)]
pub struct AppState {
    pub kube_client: Client,
    pub kube_store: Arc<KubeStore>,
    pub kube_recorder: Recorder,
}

impl AppState {
    pub fn new(kube_client: Client, config: &AppConfig) -> Self {
        let reporter = Reporter {
            controller: controller_instance_name(&config.controller.instance_name, CONTROLLER_NAME),
            instance: std::env::var("POD_NAME").ok(),
        };
        Self {
            kube_store: Arc::new(KubeStore::from_config(kube_client.clone(), config)),
            kube_recorder: Recorder::new(kube_client.clone(), reporter),
            kube_client,
        }
    }

    pub fn installer_state_controller(&self, config: &AppConfig) -> InstallerStateController {
        let field_manager = controller_instance_name(&config.controller.instance_name, CONTROLLER_NAME);
        let audit = KubeAuditSink::new(
            self.kube_recorder.clone(),
            operator_reference(&config.operator, self.kube_store.namespace()),
        );
        InstallerStateController::new(
            &config.controller.instance_name,
            Arc::new(self.kube_store.installer_pods()),
            Arc::new(self.kube_store.events()),
            Arc::new(self.kube_store.operator_status(&config.operator, &field_manager)),
            Arc::new(audit),
        )
    }
}
