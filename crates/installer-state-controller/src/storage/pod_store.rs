use async_trait::async_trait;
use k8s_openapi::api::core::v1::Pod;
use kube::{Api, Client};

use super::labels::installer_pod_selector;
use super::util_list::{ListOption, list_all};
use crate::controller::PodLister;
use crate::error::AppError;
use crate::installer::InstallerPod;

pub struct InstallerPodStore {
    client: Client,
    namespace: String,
    page_size: u32,
}

impl InstallerPodStore {
    pub fn new(client: Client, namespace: impl Into<String>, page_size: u32) -> Self {
        Self {
            client,
            namespace: namespace.into(),
            page_size,
        }
    }

    fn api(&self) -> Api<Pod> {
        Api::namespaced(self.client.clone(), &self.namespace)
    }
}

#[async_trait]
impl PodLister for InstallerPodStore {
    async fn list_installer_pods(&self) -> Result<Vec<InstallerPod>, AppError> {
        let option = ListOption::new(self.page_size).with_label_selector(installer_pod_selector());
        let pods = list_all(&self.api(), &option).await.map_err(|err| {
            tracing::error!("Failed to list installer pods in {}: {}", self.namespace, err);
            err
        })?;
        Ok(pods.iter().map(InstallerPod::from).collect())
    }
}
