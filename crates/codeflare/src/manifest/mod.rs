//! RayCluster manifest composition.
//!
//! Turns a validated [`ClusterConfig`](crate::config::ClusterConfig) into a
//! typed [`RayCluster`](api_types::RayCluster): per-role resources, head and
//! worker containers, pod specs and metadata.

pub mod compose;
pub mod metadata;
pub mod pod;
pub mod resources;

pub use compose::compose;
pub use compose::RAY_VERSION;
pub use resources::RoleResources;
