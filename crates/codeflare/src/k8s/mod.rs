//! Kubernetes integration module.
//!
//! The SDK reads exactly one kind of object from the cluster: Kueue
//! `LocalQueue`s, to validate or discover the admission queue a generated
//! workload is labelled with. The main components are:
//! - [`LocalQueueRegistry`]: read seam over the namespaced LocalQueue list
//! - [`KubeLocalQueueRegistry`]: implementation backed by a [`kube::Client`]
//! - [`InMemoryLocalQueueRegistry`]: fixed queue set for tests and offline use

pub mod kube_client;
pub mod local_queue;
pub mod mock;
pub mod types;

pub use local_queue::KubeLocalQueueRegistry;
pub use local_queue::LocalQueueRegistry;
pub use mock::InMemoryLocalQueueRegistry;
pub use types::KubernetesError;
pub use types::RegistryError;
