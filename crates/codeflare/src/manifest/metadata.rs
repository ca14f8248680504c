use std::collections::BTreeMap;

use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

use crate::config::ClusterConfig;

const CONTROLLER_TOOLS_LABEL: (&str, &str) = ("controller-tools.k8s.io", "1.0");

/// Set by Jupyter notebook servers; identifies the notebook managing the cluster.
pub const NOTEBOOK_PREFIX_ENV_VAR: &str = "NB_PREFIX";
pub const MANAGED_BY_ANNOTATION: &str = "app.kubernetes.io/managed-by";

/// Base label plus the user's labels, which win on conflict.
pub fn base_labels(config: &ClusterConfig) -> BTreeMap<String, String> {
    let mut labels = BTreeMap::from([(
        CONTROLLER_TOOLS_LABEL.0.to_string(),
        CONTROLLER_TOOLS_LABEL.1.to_string(),
    )]);
    labels.extend(
        config
            .labels()
            .iter()
            .map(|(key, value)| (key.clone(), value.clone())),
    );
    labels
}

pub fn notebook_annotations(nb_prefix: Option<&str>) -> BTreeMap<String, String> {
    nb_prefix
        .filter(|prefix| !prefix.is_empty())
        .map(|prefix| {
            BTreeMap::from([(MANAGED_BY_ANNOTATION.to_string(), prefix.to_string())])
        })
        .unwrap_or_default()
}

/// Annotations for the current process environment.
pub fn annotations_from_env() -> BTreeMap<String, String> {
    notebook_annotations(std::env::var(NOTEBOOK_PREFIX_ENV_VAR).ok().as_deref())
}

/// Object metadata; `annotations` is only set when non-empty.
pub fn object_meta(
    name: &str,
    namespace: &str,
    labels: BTreeMap<String, String>,
    annotations: BTreeMap<String, String>,
) -> ObjectMeta {
    ObjectMeta {
        name: Some(name.to_string()),
        namespace: Some(namespace.to_string()),
        labels: Some(labels),
        annotations: (!annotations.is_empty()).then_some(annotations),
        ..Default::default()
    }
}
