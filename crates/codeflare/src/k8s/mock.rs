//! In-memory LocalQueue registry
//!
//! Serves a fixed set of queues, or a fixed API failure, without a cluster.
//! Used by the test suites and for offline manifest generation.

use std::collections::BTreeMap;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use api_types::LocalQueue;
use api_types::LocalQueueSpec;
use api_types::DEFAULT_QUEUE_ANNOTATION;
use error_stack::Report;

use crate::k8s::local_queue::LocalQueueRegistry;
use crate::k8s::types::RegistryError;

#[derive(Default)]
pub struct InMemoryLocalQueueRegistry {
    queues: Vec<LocalQueue>,
    failure_status: Option<u16>,
    list_calls: AtomicUsize,
}

impl InMemoryLocalQueueRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a queue to `namespace`.
    pub fn with_queue(mut self, namespace: &str, name: &str) -> Self {
        self.queues.push(local_queue(namespace, name, None));
        self
    }

    /// Add a queue carrying the default-queue annotation with `value`.
    pub fn with_annotated_queue(mut self, namespace: &str, name: &str, value: &str) -> Self {
        self.queues.push(local_queue(namespace, name, Some(value)));
        self
    }

    /// Add a queue marked as the namespace default.
    pub fn with_default_queue(self, namespace: &str, name: &str) -> Self {
        self.with_annotated_queue(namespace, name, "true")
    }

    /// Make every list fail as if the API answered with `code`.
    pub fn failing_with_status(mut self, code: u16) -> Self {
        self.failure_status = Some(code);
        self
    }

    /// Number of list requests served so far.
    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl LocalQueueRegistry for InMemoryLocalQueueRegistry {
    async fn list_local_queues(
        &self,
        namespace: &str,
    ) -> Result<Vec<LocalQueue>, Report<RegistryError>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(code) = self.failure_status {
            return Err(Report::new(RegistryError::from_status(
                namespace,
                code,
                "injected failure",
            )));
        }

        Ok(self
            .queues
            .iter()
            .filter(|queue| queue.metadata.namespace.as_deref() == Some(namespace))
            .cloned()
            .collect())
    }
}

fn local_queue(namespace: &str, name: &str, default_annotation: Option<&str>) -> LocalQueue {
    let mut queue = LocalQueue::new(
        name,
        LocalQueueSpec {
            cluster_queue: Some("cluster-queue".to_string()),
        },
    );
    queue.metadata.namespace = Some(namespace.to_string());
    queue.metadata.annotations = default_annotation.map(|value| {
        BTreeMap::from([(DEFAULT_QUEUE_ANNOTATION.to_string(), value.to_string())])
    });
    queue
}
