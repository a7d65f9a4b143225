use async_trait::async_trait;
use k8s_openapi::api::core::v1::Event;
use kube::{Api, Client};

use super::util_list::{ListOption, list_all};
use crate::controller::EventLister;
use crate::error::AppError;
use crate::installer::ClusterEvent;

pub struct EventStore {
    client: Client,
    namespace: String,
    page_size: u32,
}

impl EventStore {
    pub fn new(client: Client, namespace: impl Into<String>, page_size: u32) -> Self {
        Self {
            client,
            namespace: namespace.into(),
            page_size,
        }
    }

    fn api(&self) -> Api<Event> {
        Api::namespaced(self.client.clone(), &self.namespace)
    }
}

#[async_trait]
impl EventLister for EventStore {
    async fn list_events(&self) -> Result<Vec<ClusterEvent>, AppError> {
        let events = list_all(&self.api(), &ListOption::new(self.page_size))
            .await
            .map_err(|err| {
                tracing::error!("Failed to list events in {}: {}", self.namespace, err);
                err
            })?;
        Ok(events.iter().map(ClusterEvent::from).collect())
    }
}
