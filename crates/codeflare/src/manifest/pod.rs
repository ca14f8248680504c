use k8s_openapi::api::core::v1::ConfigMapVolumeSource;
use k8s_openapi::api::core::v1::Container;
use k8s_openapi::api::core::v1::ContainerPort;
use k8s_openapi::api::core::v1::EnvVar;
use k8s_openapi::api::core::v1::ExecAction;
use k8s_openapi::api::core::v1::KeyToPath;
use k8s_openapi::api::core::v1::Lifecycle;
use k8s_openapi::api::core::v1::LifecycleHandler;
use k8s_openapi::api::core::v1::LocalObjectReference;
use k8s_openapi::api::core::v1::PodSpec;
use k8s_openapi::api::core::v1::ResourceRequirements;
use k8s_openapi::api::core::v1::Volume;
use k8s_openapi::api::core::v1::VolumeMount;

use crate::config::ClusterConfig;

pub const HEAD_CONTAINER_NAME: &str = "ray-head";
pub const WORKER_CONTAINER_NAME: &str = "machine-learning";
pub const IMAGE_PULL_POLICY: &str = "Always";

const TRUSTED_CA_BUNDLE_CONFIG_MAP: &str = "odh-trusted-ca-bundle";
const TRUSTED_CA_VOLUME: &str = "odh-trusted-ca-cert";
const TRUSTED_CA_FILE: &str = "odh-trusted-ca-bundle.crt";
const CA_VOLUME: &str = "odh-ca-cert";
const CA_FILE: &str = "odh-ca-bundle.crt";
const CERT_DIRS: [&str; 2] = ["/etc/pki/tls/certs", "/etc/ssl/certs"];

/// Head ports: GCS, dashboard and Ray client.
const HEAD_PORTS: [(&str, i32); 3] = [("gcs", 6379), ("dashboard", 8265), ("client", 10001)];

/// Optional config-map volumes holding the trusted CA bundles.
pub fn ca_bundle_volumes() -> Vec<Volume> {
    [
        (TRUSTED_CA_VOLUME, "ca-bundle.crt", TRUSTED_CA_FILE),
        (CA_VOLUME, CA_FILE, CA_FILE),
    ]
    .into_iter()
    .map(|(volume, key, path)| Volume {
        name: volume.to_string(),
        config_map: Some(ConfigMapVolumeSource {
            name: Some(TRUSTED_CA_BUNDLE_CONFIG_MAP.to_string()),
            items: Some(vec![KeyToPath {
                key: key.to_string(),
                path: path.to_string(),
                ..Default::default()
            }]),
            optional: Some(true),
            ..Default::default()
        }),
        ..Default::default()
    })
    .collect()
}

/// Each CA bundle mounted into both system certificate directories.
pub fn ca_bundle_volume_mounts() -> Vec<VolumeMount> {
    [(TRUSTED_CA_VOLUME, TRUSTED_CA_FILE), (CA_VOLUME, CA_FILE)]
        .into_iter()
        .flat_map(|(volume, file)| {
            CERT_DIRS.into_iter().map(move |dir| VolumeMount {
                mount_path: format!("{dir}/{file}"),
                name: volume.to_string(),
                sub_path: Some(file.to_string()),
                ..Default::default()
            })
        })
        .collect()
}

fn ray_stop_lifecycle() -> Lifecycle {
    Lifecycle {
        pre_stop: Some(LifecycleHandler {
            exec: Some(ExecAction {
                command: Some(vec![
                    "/bin/sh".to_string(),
                    "-c".to_string(),
                    "ray stop".to_string(),
                ]),
            }),
            ..Default::default()
        }),
        ..Default::default()
    }
}

fn ray_container(name: &str, image: &str, resources: ResourceRequirements) -> Container {
    Container {
        name: name.to_string(),
        image: Some(image.to_string()),
        image_pull_policy: Some(IMAGE_PULL_POLICY.to_string()),
        lifecycle: Some(ray_stop_lifecycle()),
        resources: Some(resources),
        volume_mounts: Some(ca_bundle_volume_mounts()),
        ..Default::default()
    }
}

pub fn head_container(config: &ClusterConfig, resources: ResourceRequirements) -> Container {
    let mut container = ray_container(HEAD_CONTAINER_NAME, config.image(), resources);
    container.ports = Some(
        HEAD_PORTS
            .into_iter()
            .map(|(name, port)| ContainerPort {
                name: Some(name.to_string()),
                container_port: port,
                ..Default::default()
            })
            .collect(),
    );
    if !config.envs().is_empty() {
        container.env = Some(
            config
                .envs()
                .iter()
                .map(|env| EnvVar {
                    name: env.name.clone(),
                    value: Some(env.value.clone()),
                    ..Default::default()
                })
                .collect(),
        );
    }
    container
}

pub fn worker_container(config: &ClusterConfig, resources: ResourceRequirements) -> Container {
    ray_container(WORKER_CONTAINER_NAME, config.image(), resources)
}

pub fn pod_spec(config: &ClusterConfig, containers: Vec<Container>) -> PodSpec {
    let image_pull_secrets = (!config.image_pull_secrets().is_empty()).then(|| {
        config
            .image_pull_secrets()
            .iter()
            .map(|secret| LocalObjectReference {
                name: Some(secret.clone()),
            })
            .collect()
    });

    PodSpec {
        containers,
        volumes: Some(ca_bundle_volumes()),
        image_pull_secrets,
        ..Default::default()
    }
}
