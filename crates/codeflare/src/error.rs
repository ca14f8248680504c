use core::error::Error;

use derive_more::Display;

/// Errors that abort manifest generation. Nothing is emitted when one is
/// returned.
#[derive(Debug, Display)]
pub enum BuildError {
    #[display(
        "local_queue provided does not exist or is not in this namespace. Please provide the correct local_queue name in Cluster Configuration"
    )]
    LocalQueueNotFound { name: String, namespace: String },
    #[display("Failed to look up LocalQueues in namespace {namespace}")]
    QueueLookup { namespace: String },
    #[display("Failed to serialize manifest {name}")]
    Serialization { name: String },
    #[display("Failed to write manifest to {path}")]
    Write { path: String },
    #[display("Could not determine the home directory")]
    HomeDirectory,
}

impl Error for BuildError {}
