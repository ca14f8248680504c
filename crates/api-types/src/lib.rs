//! Shared API type definitions
//!
//! This crate contains the custom resource definitions the SDK reads and
//! writes: the KubeRay `RayCluster`, the CodeFlare `AppWrapper` envelope and
//! the Kueue `LocalQueue` used for admission.

mod appwrapper;
mod local_queue;
mod ray_cluster;

pub use appwrapper::AppWrapper;
pub use appwrapper::AppWrapperComponent;
pub use appwrapper::AppWrapperSpec;
pub use local_queue::LocalQueue;
pub use local_queue::LocalQueueSpec;
pub use local_queue::DEFAULT_QUEUE_ANNOTATION;
pub use local_queue::QUEUE_NAME_LABEL;
pub use ray_cluster::AutoscalerOptions;
pub use ray_cluster::HeadGroupSpec;
pub use ray_cluster::RayCluster;
pub use ray_cluster::RayClusterSpec;
pub use ray_cluster::WorkerGroupSpec;
