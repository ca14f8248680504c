use std::path::Path;

use api_types::LocalQueue;
use error_stack::Report;
use kube::api::ListParams;
use kube::Api;
use kube::Client;
use tracing::debug;

use crate::k8s::kube_client;
use crate::k8s::types::KubernetesError;
use crate::k8s::types::RegistryError;

/// Read access to the Kueue LocalQueues of a namespace.
#[async_trait::async_trait]
pub trait LocalQueueRegistry: Send + Sync {
    /// List every LocalQueue in `namespace`, in the order the backend returns
    /// them.
    async fn list_local_queues(
        &self,
        namespace: &str,
    ) -> Result<Vec<LocalQueue>, Report<RegistryError>>;
}

/// LocalQueue registry reading `kueue.x-k8s.io/v1beta1` `localqueues`
/// through the Kubernetes API.
pub struct KubeLocalQueueRegistry {
    client: Client,
}

impl KubeLocalQueueRegistry {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Create a registry with a freshly initialised client.
    ///
    /// # Errors
    ///
    /// - [`KubernetesError::ConnectionFailed`] if no client can be built
    pub async fn connect(kubeconfig: Option<&Path>) -> Result<Self, Report<KubernetesError>> {
        let client = kube_client::init_kube_client(kubeconfig).await?;
        Ok(Self::new(client))
    }
}

#[async_trait::async_trait]
impl LocalQueueRegistry for KubeLocalQueueRegistry {
    #[tracing::instrument(skip(self))]
    async fn list_local_queues(
        &self,
        namespace: &str,
    ) -> Result<Vec<LocalQueue>, Report<RegistryError>> {
        let api: Api<LocalQueue> = Api::namespaced(self.client.clone(), namespace);

        match api.list(&ListParams::default()).await {
            Ok(list) => {
                debug!(count = list.items.len(), "Listed LocalQueues");
                Ok(list.items)
            }
            Err(kube::Error::Api(api_err)) => Err(Report::new(RegistryError::from_status(
                namespace,
                api_err.code,
                api_err.message.clone(),
            ))
            .attach_printable(format!("Kubernetes API error: {api_err}"))),
            Err(e) => Err(Report::new(RegistryError::Connection {
                message: e.to_string(),
            })),
        }
    }
}
