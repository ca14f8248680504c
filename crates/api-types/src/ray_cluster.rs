use std::collections::BTreeMap;

use k8s_openapi::api::core::v1::PodTemplateSpec;
use k8s_openapi::api::core::v1::ResourceRequirements;
use kube::CustomResource;
use serde::Deserialize;
use serde::Serialize;

/// KubeRay cluster made of one head group and a list of worker groups.
#[derive(CustomResource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[kube(
    group = "ray.io",
    version = "v1",
    kind = "RayCluster",
    namespaced,
    derive = "PartialEq",
    schema = "disabled"
)]
#[serde(rename_all = "camelCase")]
pub struct RayClusterSpec {
    pub ray_version: String,
    pub enable_in_tree_autoscaling: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub autoscaler_options: Option<AutoscalerOptions>,
    pub head_group_spec: HeadGroupSpec,
    #[serde(default)]
    pub worker_group_specs: Vec<WorkerGroupSpec>,
}

/// Settings for the in-tree autoscaler sidecar.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoscalerOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upscaling_mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub idle_timeout_seconds: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_pull_policy: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<ResourceRequirements>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadGroupSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_ingress: Option<bool>,
    /// Arguments passed to `ray start`; values are always strings.
    #[serde(default)]
    pub ray_start_params: BTreeMap<String, String>,
    pub template: PodTemplateSpec,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerGroupSpec {
    pub group_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replicas: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_replicas: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_replicas: Option<i32>,
    #[serde(default)]
    pub ray_start_params: BTreeMap<String, String>,
    pub template: PodTemplateSpec,
}

#[cfg(test)]
mod tests {
    use similar_asserts::assert_eq;

    use super::*;

    fn minimal_spec() -> RayClusterSpec {
        RayClusterSpec {
            ray_version: "2.23.0".to_string(),
            enable_in_tree_autoscaling: false,
            autoscaler_options: None,
            head_group_spec: HeadGroupSpec::default(),
            worker_group_specs: vec![],
        }
    }

    #[test]
    fn serializes_type_meta_and_camel_case_fields() {
        let cluster = RayCluster::new("demo", minimal_spec());
        let value = serde_json::to_value(&cluster).unwrap();

        assert_eq!(value["apiVersion"], "ray.io/v1");
        assert_eq!(value["kind"], "RayCluster");
        assert_eq!(value["metadata"]["name"], "demo");
        assert_eq!(value["spec"]["rayVersion"], "2.23.0");
        assert_eq!(value["spec"]["enableInTreeAutoscaling"], false);
        assert!(value["spec"].get("autoscalerOptions").is_none());
    }

    #[test]
    fn worker_group_omits_unset_replica_bounds() {
        let group = WorkerGroupSpec {
            group_name: "small-group-demo".to_string(),
            replicas: Some(2),
            ..Default::default()
        };
        let value = serde_json::to_value(&group).unwrap();

        assert_eq!(value["groupName"], "small-group-demo");
        assert_eq!(value["replicas"], 2);
        assert!(value.get("minReplicas").is_none());
        assert!(value.get("maxReplicas").is_none());
    }

    #[test]
    fn deserializes_kuberay_yaml() {
        let yaml = r#"
apiVersion: ray.io/v1
kind: RayCluster
metadata:
  name: raycluster-sample
  namespace: default
spec:
  rayVersion: "2.23.0"
  enableInTreeAutoscaling: false
  headGroupSpec:
    serviceType: ClusterIP
    rayStartParams:
      dashboard-host: 0.0.0.0
    template:
      spec:
        containers:
          - name: ray-head
            image: rayproject/ray:2.23.0
  workerGroupSpecs:
    - groupName: small-group-raycluster-sample
      replicas: 1
      rayStartParams: {}
      template:
        spec:
          containers:
            - name: machine-learning
              image: rayproject/ray:2.23.0
"#;
        let cluster: RayCluster = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(cluster.metadata.namespace.as_deref(), Some("default"));
        assert_eq!(
            cluster.spec.head_group_spec.service_type.as_deref(),
            Some("ClusterIP")
        );
        assert_eq!(cluster.spec.worker_group_specs.len(), 1);
        assert_eq!(cluster.spec.worker_group_specs[0].replicas, Some(1));
    }
}
