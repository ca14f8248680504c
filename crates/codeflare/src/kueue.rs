//! Kueue admission-queue labelling.

use std::collections::BTreeMap;

use api_types::LocalQueue;
use api_types::QUEUE_NAME_LABEL;
use error_stack::Report;
use error_stack::ResultExt;
use tracing::debug;

use crate::config::ClusterConfig;
use crate::error::BuildError;
use crate::k8s::LocalQueueRegistry;

/// Add the `kueue.x-k8s.io/queue-name` label to `labels`.
///
/// An explicit `local_queue` must exist in the namespace. Without one, the
/// first LocalQueue annotated as the namespace default is used; if the
/// queues cannot be found or read (404/403) the label is simply left out.
///
/// # Errors
///
/// - [`BuildError::LocalQueueNotFound`] if the explicit queue does not exist
/// - [`BuildError::QueueLookup`] if listing fails, except for 404/403 while
///   looking for a default queue
pub async fn resolve_queue_label(
    config: &ClusterConfig,
    registry: &dyn LocalQueueRegistry,
    labels: &mut BTreeMap<String, String>,
) -> Result<(), Report<BuildError>> {
    let namespace = config.namespace();

    let queue_name = match config.local_queue() {
        Some(name) => {
            let queues = registry
                .list_local_queues(namespace)
                .await
                .change_context(BuildError::QueueLookup {
                    namespace: namespace.to_string(),
                })?;
            if !queues
                .iter()
                .any(|queue| queue.metadata.name.as_deref() == Some(name))
            {
                return Err(Report::new(BuildError::LocalQueueNotFound {
                    name: name.to_string(),
                    namespace: namespace.to_string(),
                }));
            }
            Some(name.to_string())
        }
        None => default_local_queue(namespace, registry).await?,
    };

    match queue_name {
        Some(name) => {
            debug!(queue = %name, "Adding local queue label");
            labels.insert(QUEUE_NAME_LABEL.to_string(), name);
        }
        None => debug!(namespace, "No local queue to label"),
    }
    Ok(())
}

async fn default_local_queue(
    namespace: &str,
    registry: &dyn LocalQueueRegistry,
) -> Result<Option<String>, Report<BuildError>> {
    match registry.list_local_queues(namespace).await {
        Ok(queues) => Ok(queues
            .into_iter()
            .find(LocalQueue::is_default)
            .and_then(|queue| queue.metadata.name)),
        Err(report) if report.current_context().is_not_found_or_forbidden() => {
            debug!("Skipping default local queue: {}", report.current_context());
            Ok(None)
        }
        Err(report) => Err(report.change_context(BuildError::QueueLookup {
            namespace: namespace.to_string(),
        })),
    }
}
