use std::collections::BTreeMap;

use api_types::AutoscalerOptions;
use api_types::HeadGroupSpec;
use api_types::RayCluster;
use api_types::RayClusterSpec;
use api_types::WorkerGroupSpec;
use k8s_openapi::api::core::v1::Container;
use k8s_openapi::api::core::v1::PodTemplateSpec;
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

use crate::config::ClusterConfig;
use crate::manifest::pod;
use crate::manifest::resources::resource_requirements;
use crate::manifest::resources::RoleResources;

pub const RAY_VERSION: &str = "2.23.0";

/// Build the RayCluster for `config` under the given metadata.
///
/// The worker group is sized exactly to `num_workers`; the in-tree
/// autoscaler is disabled.
pub fn compose(config: &ClusterConfig, metadata: ObjectMeta) -> RayCluster {
    let name = metadata.name.clone().unwrap_or_default();
    let mapping = config.resource_mapping();
    let head = RoleResources::from_role(config.head(), mapping);
    let worker = RoleResources::from_role(config.worker(), mapping);
    let num_workers = config.num_workers();

    let head_container = pod::head_container(config, head.requirements);
    let worker_container = pod::worker_container(config, worker.requirements);

    let spec = RayClusterSpec {
        ray_version: RAY_VERSION.to_string(),
        enable_in_tree_autoscaling: false,
        autoscaler_options: Some(AutoscalerOptions {
            upscaling_mode: Some("Default".to_string()),
            idle_timeout_seconds: Some(60),
            image_pull_policy: Some(pod::IMAGE_PULL_POLICY.to_string()),
            resources: Some(resource_requirements(
                Quantity("500m".to_string()),
                Quantity("500m".to_string()),
                Quantity("512Mi".to_string()),
                Quantity("512Mi".to_string()),
                &BTreeMap::new(),
            )),
        }),
        head_group_spec: HeadGroupSpec {
            service_type: Some("ClusterIP".to_string()),
            enable_ingress: Some(false),
            ray_start_params: ray_start_params(
                [("dashboard-host", "0.0.0.0"), ("block", "true")],
                head.gpus,
                &head.summary,
            ),
            template: pod_template(config, head_container),
        },
        worker_group_specs: vec![WorkerGroupSpec {
            group_name: format!("small-group-{name}"),
            replicas: Some(num_workers),
            min_replicas: Some(num_workers),
            max_replicas: Some(num_workers),
            ray_start_params: ray_start_params([("block", "true")], worker.gpus, &worker.summary),
            template: pod_template(config, worker_container),
        }],
    };

    let mut cluster = RayCluster::new(&name, spec);
    cluster.metadata = metadata;
    cluster
}

fn pod_template(config: &ClusterConfig, container: Container) -> PodTemplateSpec {
    PodTemplateSpec {
        metadata: None,
        spec: Some(pod::pod_spec(config, vec![container])),
    }
}

/// `ray start` parameters. Custom resources are passed as a JSON object
/// encoded in a JSON string, the form KubeRay forwards to `--resources`.
fn ray_start_params<const N: usize>(
    fixed: [(&str, &str); N],
    gpus: u32,
    summary: &BTreeMap<String, u32>,
) -> BTreeMap<String, String> {
    let mut params: BTreeMap<String, String> = fixed
        .into_iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect();
    params.insert("num-gpus".to_string(), gpus.to_string());
    if !summary.is_empty() {
        let resources = serde_json::json!(summary).to_string();
        params.insert(
            "resources".to_string(),
            serde_json::Value::String(resources).to_string(),
        );
    }
    params
}
