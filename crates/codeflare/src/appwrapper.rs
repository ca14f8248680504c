use std::collections::BTreeMap;

use api_types::AppWrapper;
use api_types::AppWrapperComponent;
use api_types::AppWrapperSpec;

use crate::config::ClusterConfig;

/// Wrap an already sanitized RayCluster document in a single-component
/// AppWrapper. `labels` are set on the envelope even when empty.
pub fn wrap(
    config: &ClusterConfig,
    name: &str,
    template: serde_json::Value,
    labels: BTreeMap<String, String>,
) -> AppWrapper {
    let mut wrapper = AppWrapper::new(
        name,
        AppWrapperSpec {
            components: vec![AppWrapperComponent { template }],
        },
    );
    wrapper.metadata.namespace = Some(config.namespace().to_string());
    wrapper.metadata.labels = Some(labels);
    wrapper
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use similar_asserts::assert_eq;

    use super::*;
    use crate::config::ClusterConfigSpec;

    fn config() -> ClusterConfig {
        ClusterConfig::new(ClusterConfigSpec {
            name: "aw".to_string(),
            namespace: Some("ns".to_string()),
            appwrapper: true,
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn envelope_layout() {
        let template = json!({"kind": "RayCluster", "metadata": {"name": "aw"}});

        let wrapper = wrap(&config(), "aw", template.clone(), BTreeMap::new());

        assert_eq!(
            serde_json::to_value(&wrapper).unwrap(),
            json!({
                "apiVersion": "workload.codeflare.dev/v1beta2",
                "kind": "AppWrapper",
                "metadata": {"name": "aw", "namespace": "ns", "labels": {}},
                "spec": {"components": [{"template": template}]}
            })
        );
    }

    #[test]
    fn envelope_carries_given_labels() {
        let labels = BTreeMap::from([(
            "kueue.x-k8s.io/queue-name".to_string(),
            "team-a".to_string(),
        )]);

        let wrapper = wrap(&config(), "aw", json!({}), labels.clone());

        assert_eq!(wrapper.metadata.labels, Some(labels));
    }
}
