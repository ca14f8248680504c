use kube::CustomResource;
use serde::Deserialize;
use serde::Serialize;

/// CodeFlare envelope bundling workload manifests for unified admission.
#[derive(CustomResource, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[kube(
    group = "workload.codeflare.dev",
    version = "v1beta2",
    kind = "AppWrapper",
    namespaced,
    derive = "PartialEq",
    schema = "disabled"
)]
pub struct AppWrapperSpec {
    pub components: Vec<AppWrapperComponent>,
}

/// A single wrapped resource, embedded verbatim as plain data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppWrapperComponent {
    pub template: serde_json::Value,
}
