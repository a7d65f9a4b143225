pub mod event_store;
pub mod labels;
pub mod operator_status_store;
pub mod pod_store;
pub mod store;
pub mod util_list;

pub use event_store::EventStore;
pub use operator_status_store::OperatorStatusStore;
pub use pod_store::InstallerPodStore;
pub use store::KubeStore;
