use core::error::Error;
use std::collections::BTreeMap;
use std::str::FromStr;

use derive_more::Display;
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use serde::Deserialize;
use serde::Serialize;

/// Extended resource names known without any user mapping.
const DEFAULT_RESOURCE_MAPPING: [(&str, &str); 8] = [
    ("nvidia.com/gpu", "GPU"),
    ("intel.com/gpu", "GPU"),
    ("amd.com/gpu", "GPU"),
    ("aws.amazon.com/neuroncore", "neuron_cores"),
    ("google.com/tpu", "TPU"),
    ("habana.ai/gaudi", "HPU"),
    ("huawei.com/Ascend910", "NPU"),
    ("huawei.com/Ascend310", "NPU"),
];

/// Ray resource type an extended Kubernetes resource is accounted as.
///
/// GPUs feed the `num-gpus` start parameter; every other kind is reported
/// to Ray as a custom resource under its own name.
#[derive(Debug, Display, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ExtendedResourceKind {
    #[display("GPU")]
    Gpu,
    #[display("{_0}")]
    Custom(String),
}

/// CPU and memory are scheduled through dedicated fields and cannot be
/// declared as extended resource types.
#[derive(Debug, Display, Clone, PartialEq, Eq)]
#[display("resource type '{_0}' is reserved and cannot be used in extended_resource_mapping")]
pub struct ForbiddenResourceKind(pub String);

impl Error for ForbiddenResourceKind {}

impl FromStr for ExtendedResourceKind {
    type Err = ForbiddenResourceKind;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "GPU" => Ok(Self::Gpu),
            v if v.eq_ignore_ascii_case("cpu") || v.eq_ignore_ascii_case("memory") => {
                Err(ForbiddenResourceKind(v.to_string()))
            }
            v => Ok(Self::Custom(v.to_string())),
        }
    }
}

impl TryFrom<String> for ExtendedResourceKind {
    type Error = ForbiddenResourceKind;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ExtendedResourceKind> for String {
    fn from(kind: ExtendedResourceKind) -> Self {
        kind.to_string()
    }
}

/// Returns the built-in extended resource mapping.
pub fn default_resource_mapping() -> BTreeMap<String, ExtendedResourceKind> {
    DEFAULT_RESOURCE_MAPPING
        .iter()
        .map(|(name, kind)| {
            let kind = if *kind == "GPU" {
                ExtendedResourceKind::Gpu
            } else {
                ExtendedResourceKind::Custom((*kind).to_string())
            };
            ((*name).to_string(), kind)
        })
        .collect()
}

/// A CPU or memory amount as written in the cluster configuration.
///
/// Bare integers are cores for CPU and gigabytes for memory; strings are
/// passed through as Kubernetes quantities (`500m`, `512Mi`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResourceAmount {
    Whole(u32),
    Quantity(String),
}

impl ResourceAmount {
    pub fn cpu_quantity(&self) -> Quantity {
        match self {
            Self::Whole(cores) => Quantity(cores.to_string()),
            Self::Quantity(q) => Quantity(q.clone()),
        }
    }

    pub fn memory_quantity(&self) -> Quantity {
        match self {
            Self::Whole(gigabytes) => Quantity(format!("{gigabytes}G")),
            Self::Quantity(q) => Quantity(q.clone()),
        }
    }
}

impl From<u32> for ResourceAmount {
    fn from(value: u32) -> Self {
        Self::Whole(value)
    }
}

impl From<&str> for ResourceAmount {
    fn from(value: &str) -> Self {
        Self::Quantity(value.to_string())
    }
}
