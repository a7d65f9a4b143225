use kube::Client;

use super::{EventStore, InstallerPodStore, OperatorStatusStore};
use crate::config::{AppConfig, OperatorResourceConfig};

pub struct KubeStore {
    client: Client,
    namespace: String,
    page_size: u32,
}

impl KubeStore {
    pub fn new(client: Client, namespace: impl Into<String>, page_size: u32) -> Self {
        Self {
            client,
            namespace: namespace.into(),
            page_size,
        }
    }

    pub fn from_config(client: Client, config: &AppConfig) -> Self {
        Self::new(
            client,
            &config.kubernetes.namespace,
            config.controller.list_page_size,
        )
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn installer_pods(&self) -> InstallerPodStore {
        InstallerPodStore::new(self.client.clone(), &self.namespace, self.page_size)
    }

    pub fn events(&self) -> EventStore {
        EventStore::new(self.client.clone(), &self.namespace, self.page_size)
    }

    pub fn operator_status(
        &self,
        operator: &OperatorResourceConfig,
        field_manager: &str,
    ) -> OperatorStatusStore {
        OperatorStatusStore::new(self.client.clone(), operator, field_manager)
    }
}
