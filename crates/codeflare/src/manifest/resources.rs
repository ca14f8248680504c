use std::collections::BTreeMap;

use k8s_openapi::api::core::v1::ResourceRequirements;
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;

use crate::config::ExtendedResourceKind;
use crate::config::RoleConfig;

/// Resources derived for one node role.
#[derive(Debug, Clone, PartialEq)]
pub struct RoleResources {
    /// GPUs reported to Ray via `num-gpus`
    pub gpus: u32,
    /// Non-GPU extended resources keyed by their Ray resource name
    pub summary: BTreeMap<String, u32>,
    /// Container requests and limits
    pub requirements: ResourceRequirements,
}

impl RoleResources {
    pub fn from_role(
        role: RoleConfig<'_>,
        mapping: &BTreeMap<String, ExtendedResourceKind>,
    ) -> Self {
        let requests = role.extended_resource_requests;
        Self {
            gpus: gpu_count(requests, mapping),
            summary: extended_resource_summary(requests, mapping),
            requirements: resource_requirements(
                role.cpu_requests.cpu_quantity(),
                role.cpu_limits.cpu_quantity(),
                role.memory_requests.memory_quantity(),
                role.memory_limits.memory_quantity(),
                requests,
            ),
        }
    }
}

/// Sum of the requested quantities mapped to [`ExtendedResourceKind::Gpu`].
pub fn gpu_count(
    requests: &BTreeMap<String, u32>,
    mapping: &BTreeMap<String, ExtendedResourceKind>,
) -> u32 {
    requests
        .iter()
        .filter(|(name, _)| mapping.get(*name) == Some(&ExtendedResourceKind::Gpu))
        .map(|(_, quantity)| quantity)
        .sum()
}

/// Requested quantities summed per custom Ray resource type. GPUs are left
/// out; they are reported separately.
pub fn extended_resource_summary(
    requests: &BTreeMap<String, u32>,
    mapping: &BTreeMap<String, ExtendedResourceKind>,
) -> BTreeMap<String, u32> {
    let mut summary = BTreeMap::new();
    for (name, quantity) in requests {
        if let Some(ExtendedResourceKind::Custom(kind)) = mapping.get(name) {
            *summary.entry(kind.clone()).or_insert(0) += quantity;
        }
    }
    summary
}

/// Container requirements with extended resources requested and limited at
/// the same quantity.
pub fn resource_requirements(
    cpu_requests: Quantity,
    cpu_limits: Quantity,
    memory_requests: Quantity,
    memory_limits: Quantity,
    extended_resource_requests: &BTreeMap<String, u32>,
) -> ResourceRequirements {
    let mut requests = BTreeMap::from([
        ("cpu".to_string(), cpu_requests),
        ("memory".to_string(), memory_requests),
    ]);
    let mut limits = BTreeMap::from([
        ("cpu".to_string(), cpu_limits),
        ("memory".to_string(), memory_limits),
    ]);

    for (name, quantity) in extended_resource_requests {
        requests.insert(name.clone(), Quantity(quantity.to_string()));
        limits.insert(name.clone(), Quantity(quantity.to_string()));
    }

    ResourceRequirements {
        requests: Some(requests),
        limits: Some(limits),
        ..Default::default()
    }
}
