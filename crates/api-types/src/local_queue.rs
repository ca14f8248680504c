use kube::CustomResource;
use serde::Deserialize;
use serde::Serialize;

/// Label selecting the Kueue LocalQueue a workload is admitted through.
pub const QUEUE_NAME_LABEL: &str = "kueue.x-k8s.io/queue-name";

/// Annotation marking a LocalQueue as the namespace default.
pub const DEFAULT_QUEUE_ANNOTATION: &str = "kueue.x-k8s.io/default-queue";

/// Namespaced Kueue queue pointing at a cluster-wide ClusterQueue.
#[derive(CustomResource, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[kube(
    group = "kueue.x-k8s.io",
    version = "v1beta1",
    kind = "LocalQueue",
    plural = "localqueues",
    namespaced,
    derive = "PartialEq",
    schema = "disabled"
)]
#[serde(rename_all = "camelCase")]
pub struct LocalQueueSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster_queue: Option<String>,
}

impl LocalQueue {
    /// Whether the queue carries `kueue.x-k8s.io/default-queue: "true"`,
    /// compared case-insensitively.
    pub fn is_default(&self) -> bool {
        self.metadata
            .annotations
            .as_ref()
            .and_then(|annotations| annotations.get(DEFAULT_QUEUE_ANNOTATION))
            .is_some_and(|value| value.eq_ignore_ascii_case("true"))
    }
}
