use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Kubernetes error: {0}")]
    Kube(#[from] kube::Error),

    #[error("Installer name {name} is invalid, missing revision number")]
    InvalidInstallerName { name: String },

    #[error("Installer name {name} has non-numeric revision segment {segment:?}")]
    InvalidRevision { name: String, segment: String },

    #[error("Sync pass cancelled")]
    Cancelled,
}

impl AppError {
    /// Whether the error comes from talking to the API server, as opposed to
    /// bad data observed in the cluster.
    pub fn is_transport(&self) -> bool {
        matches!(self, AppError::Kube(_))
    }
}
