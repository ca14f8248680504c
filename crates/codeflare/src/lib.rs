//! Build Ray cluster manifests for CodeFlare.
//!
//! A [`ClusterConfig`](config::ClusterConfig) is turned into a `ray.io/v1`
//! RayCluster, optionally wrapped in a `workload.codeflare.dev/v1beta2`
//! AppWrapper, labelled for its Kueue LocalQueue and emitted either as a
//! YAML file or as an in-memory document.

pub mod appwrapper;
pub mod cluster;
pub mod config;
pub mod error;
pub mod k8s;
pub mod kueue;
pub mod manifest;
pub mod names;
pub mod output;

pub use cluster::ClusterManifestBuilder;
pub use error::BuildError;
pub use output::ManifestOutput;
pub use output::ResourceWriter;
