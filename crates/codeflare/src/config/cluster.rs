use core::error::Error;
use std::collections::BTreeMap;
use std::path::Path;

use derive_more::Display;
use error_stack::Report;
use error_stack::ResultExt;
use serde::Deserialize;
use serde::Serialize;

use super::resources::default_resource_mapping;
use super::resources::ExtendedResourceKind;
use super::resources::ResourceAmount;

/// Ray image used when the configuration leaves `image` empty.
pub const DEFAULT_IMAGE: &str = "quay.io/rhoai/ray:2.23.0-py39-cu121";

/// Errors raised while loading or validating a cluster configuration.
#[derive(Debug, Display)]
pub enum ConfigError {
    #[display("namespace must be set in the cluster configuration")]
    MissingNamespace,
    #[display(
        "Failed to combine extended resource mapping, there are overlapping keys between default and user-provided mappings: {keys:?}"
    )]
    OverlappingResourceMapping { keys: Vec<String> },
    #[display(
        "extended resource '{name}' not found in extended_resource_mapping, available resources are {available:?}, to add more supported resources use extended_resource_mapping. i.e. extended_resource_mapping = {{'{name}': 'FOO_BAR'}}"
    )]
    UnknownExtendedResource {
        name: String,
        available: Vec<String>,
    },
    #[display("extended resource requests of the {role} sum to more than 4294967295")]
    ExtendedResourceOverflow { role: &'static str },
    #[display("num_workers must not exceed 2147483647, got {num_workers}")]
    TooManyWorkers { num_workers: u32 },
    #[display("Failed to read cluster configuration: {path}")]
    Read { path: String },
    #[display("Failed to parse cluster configuration: {path}")]
    Parse { path: String },
}

impl Error for ConfigError {}

/// A single environment variable for the head container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvVarSpec {
    pub name: String,
    pub value: String,
}

/// Raw cluster configuration as written by the user.
///
/// Every field has a default so a YAML file only needs the values it
/// changes. Convert with [`ClusterConfig::new`] before building manifests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClusterConfigSpec {
    /// Cluster name; generated when empty
    pub name: String,
    pub namespace: Option<String>,
    pub image: String,
    pub num_workers: u32,
    pub head_cpu_requests: ResourceAmount,
    pub head_cpu_limits: ResourceAmount,
    pub head_memory_requests: ResourceAmount,
    pub head_memory_limits: ResourceAmount,
    pub head_extended_resource_requests: BTreeMap<String, u32>,
    pub worker_cpu_requests: ResourceAmount,
    pub worker_cpu_limits: ResourceAmount,
    pub worker_memory_requests: ResourceAmount,
    pub worker_memory_limits: ResourceAmount,
    pub worker_extended_resource_requests: BTreeMap<String, u32>,
    /// User additions to the built-in extended resource mapping
    pub extended_resource_mapping: BTreeMap<String, ExtendedResourceKind>,
    /// Allow user mapping entries to replace built-in ones
    pub overwrite_default_resource_mapping: bool,
    pub labels: BTreeMap<String, String>,
    /// Environment variables for the head container, in order
    pub envs: Vec<EnvVarSpec>,
    pub image_pull_secrets: Vec<String>,
    pub local_queue: Option<String>,
    /// Wrap the RayCluster in an AppWrapper
    pub appwrapper: bool,
    pub write_to_file: bool,
}

impl Default for ClusterConfigSpec {
    fn default() -> Self {
        Self {
            name: String::new(),
            namespace: None,
            image: DEFAULT_IMAGE.to_string(),
            num_workers: 1,
            head_cpu_requests: ResourceAmount::Whole(2),
            head_cpu_limits: ResourceAmount::Whole(2),
            head_memory_requests: ResourceAmount::Whole(8),
            head_memory_limits: ResourceAmount::Whole(8),
            head_extended_resource_requests: BTreeMap::new(),
            worker_cpu_requests: ResourceAmount::Whole(1),
            worker_cpu_limits: ResourceAmount::Whole(1),
            worker_memory_requests: ResourceAmount::Whole(2),
            worker_memory_limits: ResourceAmount::Whole(2),
            worker_extended_resource_requests: BTreeMap::new(),
            extended_resource_mapping: BTreeMap::new(),
            overwrite_default_resource_mapping: false,
            labels: BTreeMap::new(),
            envs: Vec::new(),
            image_pull_secrets: Vec::new(),
            local_queue: None,
            appwrapper: false,
            write_to_file: false,
        }
    }
}

impl ClusterConfigSpec {
    /// Read a raw configuration from a YAML file without validating it.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::Read`] if the file cannot be read
    /// - [`ConfigError::Parse`] if the content is not a valid configuration
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, Report<ConfigError>> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).change_context(ConfigError::Read {
            path: path.display().to_string(),
        })?;
        serde_yaml::from_str(&content).change_context(ConfigError::Parse {
            path: path.display().to_string(),
        })
    }
}

/// Resource settings of one node role (head or worker).
#[derive(Debug, Clone, Copy)]
pub struct RoleConfig<'a> {
    pub cpu_requests: &'a ResourceAmount,
    pub cpu_limits: &'a ResourceAmount,
    pub memory_requests: &'a ResourceAmount,
    pub memory_limits: &'a ResourceAmount,
    pub extended_resource_requests: &'a BTreeMap<String, u32>,
}

/// Validated cluster configuration.
///
/// Construction guarantees a namespace is present and every requested
/// extended resource resolves to a kind in [`ClusterConfig::resource_mapping`].
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterConfig {
    spec: ClusterConfigSpec,
    namespace: String,
    num_workers: i32,
    resource_mapping: BTreeMap<String, ExtendedResourceKind>,
}

impl ClusterConfig {
    /// Validate a raw configuration.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::MissingNamespace`] if no namespace is given
    /// - [`ConfigError::OverlappingResourceMapping`] if user mapping entries
    ///   shadow built-in ones without `overwrite_default_resource_mapping`
    /// - [`ConfigError::UnknownExtendedResource`] if a requested resource has
    ///   no mapping entry
    /// - [`ConfigError::TooManyWorkers`] if `num_workers` exceeds `i32::MAX`
    /// - [`ConfigError::ExtendedResourceOverflow`] if a role's extended
    ///   resource requests do not sum within `u32`
    pub fn new(mut spec: ClusterConfigSpec) -> Result<Self, Report<ConfigError>> {
        let namespace = spec
            .namespace
            .as_deref()
            .map(str::trim)
            .filter(|ns| !ns.is_empty())
            .map(str::to_string)
            .ok_or_else(|| Report::new(ConfigError::MissingNamespace))?;

        if spec.image.trim().is_empty() {
            spec.image = DEFAULT_IMAGE.to_string();
        }

        let resource_mapping = combine_resource_mapping(
            &spec.extended_resource_mapping,
            spec.overwrite_default_resource_mapping,
        )?;

        let num_workers = i32::try_from(spec.num_workers).map_err(|_| {
            Report::new(ConfigError::TooManyWorkers {
                num_workers: spec.num_workers,
            })
        })?;

        for (role, requests) in [
            ("head", &spec.head_extended_resource_requests),
            ("worker", &spec.worker_extended_resource_requests),
        ] {
            // Bounds every per-kind total derived from the role's requests.
            if requests
                .values()
                .try_fold(0u32, |total, quantity| total.checked_add(*quantity))
                .is_none()
            {
                return Err(Report::new(ConfigError::ExtendedResourceOverflow { role }));
            }
        }

        for name in spec
            .head_extended_resource_requests
            .keys()
            .chain(spec.worker_extended_resource_requests.keys())
        {
            if !resource_mapping.contains_key(name) {
                return Err(Report::new(ConfigError::UnknownExtendedResource {
                    name: name.clone(),
                    available: resource_mapping.keys().cloned().collect(),
                }));
            }
        }

        Ok(Self {
            spec,
            namespace,
            num_workers,
            resource_mapping,
        })
    }

    /// Load and validate a YAML configuration file.
    ///
    /// # Errors
    ///
    /// - any error from [`ClusterConfigSpec::from_yaml_file`]
    /// - any validation error from [`ClusterConfig::new`]
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, Report<ConfigError>> {
        Self::new(ClusterConfigSpec::from_yaml_file(path)?)
    }

    pub fn name(&self) -> &str {
        &self.spec.name
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn image(&self) -> &str {
        &self.spec.image
    }

    /// Worker replica count, sized for the KubeRay `int32` fields.
    pub fn num_workers(&self) -> i32 {
        self.num_workers
    }

    pub fn head(&self) -> RoleConfig<'_> {
        RoleConfig {
            cpu_requests: &self.spec.head_cpu_requests,
            cpu_limits: &self.spec.head_cpu_limits,
            memory_requests: &self.spec.head_memory_requests,
            memory_limits: &self.spec.head_memory_limits,
            extended_resource_requests: &self.spec.head_extended_resource_requests,
        }
    }

    pub fn worker(&self) -> RoleConfig<'_> {
        RoleConfig {
            cpu_requests: &self.spec.worker_cpu_requests,
            cpu_limits: &self.spec.worker_cpu_limits,
            memory_requests: &self.spec.worker_memory_requests,
            memory_limits: &self.spec.worker_memory_limits,
            extended_resource_requests: &self.spec.worker_extended_resource_requests,
        }
    }

    /// Built-in mapping combined with the user's entries.
    pub fn resource_mapping(&self) -> &BTreeMap<String, ExtendedResourceKind> {
        &self.resource_mapping
    }

    pub fn labels(&self) -> &BTreeMap<String, String> {
        &self.spec.labels
    }

    pub fn envs(&self) -> &[EnvVarSpec] {
        &self.spec.envs
    }

    pub fn image_pull_secrets(&self) -> &[String] {
        &self.spec.image_pull_secrets
    }

    pub fn local_queue(&self) -> Option<&str> {
        self.spec.local_queue.as_deref()
    }

    pub fn appwrapper(&self) -> bool {
        self.spec.appwrapper
    }

    pub fn write_to_file(&self) -> bool {
        self.spec.write_to_file
    }
}

fn combine_resource_mapping(
    user_mapping: &BTreeMap<String, ExtendedResourceKind>,
    overwrite: bool,
) -> Result<BTreeMap<String, ExtendedResourceKind>, Report<ConfigError>> {
    let mut combined = default_resource_mapping();

    let overlapping: Vec<String> = user_mapping
        .keys()
        .filter(|name| combined.contains_key(*name))
        .cloned()
        .collect();
    if !overlapping.is_empty() && !overwrite {
        return Err(Report::new(ConfigError::OverlappingResourceMapping {
            keys: overlapping,
        }));
    }

    combined.extend(
        user_mapping
            .iter()
            .map(|(name, kind)| (name.clone(), kind.clone())),
    );
    Ok(combined)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use similar_asserts::assert_eq;

    use super::*;

    fn spec_in_namespace() -> ClusterConfigSpec {
        ClusterConfigSpec {
            name: "unit-test-cluster".to_string(),
            namespace: Some("ns".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn missing_namespace_is_rejected() {
        let spec = ClusterConfigSpec {
            namespace: Some("  ".to_string()),
            ..Default::default()
        };
        let err = ClusterConfig::new(spec).unwrap_err();
        assert!(matches!(
            err.current_context(),
            ConfigError::MissingNamespace
        ));
    }

    #[test]
    fn empty_image_falls_back_to_default() {
        let spec = ClusterConfigSpec {
            image: String::new(),
            ..spec_in_namespace()
        };
        let config = ClusterConfig::new(spec).unwrap();
        assert_eq!(config.image(), DEFAULT_IMAGE);
    }

    #[test]
    fn user_mapping_extends_defaults() {
        let spec = ClusterConfigSpec {
            extended_resource_mapping: BTreeMap::from([(
                "example.com/fpga".to_string(),
                ExtendedResourceKind::Custom("FPGA".to_string()),
            )]),
            worker_extended_resource_requests: BTreeMap::from([(
                "example.com/fpga".to_string(),
                1,
            )]),
            ..spec_in_namespace()
        };
        let config = ClusterConfig::new(spec).unwrap();

        assert_eq!(config.resource_mapping().len(), 9);
        assert_eq!(
            config.resource_mapping()["example.com/fpga"],
            ExtendedResourceKind::Custom("FPGA".to_string())
        );
    }

    #[test]
    fn overlapping_mapping_requires_overwrite() {
        let mapping = BTreeMap::from([(
            "nvidia.com/gpu".to_string(),
            ExtendedResourceKind::Custom("CUDA".to_string()),
        )]);
        let spec = ClusterConfigSpec {
            extended_resource_mapping: mapping.clone(),
            ..spec_in_namespace()
        };
        let err = ClusterConfig::new(spec).unwrap_err();
        assert_eq!(
            err.current_context().to_string(),
            "Failed to combine extended resource mapping, there are overlapping keys between default and user-provided mappings: [\"nvidia.com/gpu\"]"
        );

        let spec = ClusterConfigSpec {
            extended_resource_mapping: mapping,
            overwrite_default_resource_mapping: true,
            ..spec_in_namespace()
        };
        let config = ClusterConfig::new(spec).unwrap();
        assert_eq!(
            config.resource_mapping()["nvidia.com/gpu"],
            ExtendedResourceKind::Custom("CUDA".to_string())
        );
    }

    #[test]
    fn unknown_extended_resource_is_rejected() {
        let spec = ClusterConfigSpec {
            head_extended_resource_requests: BTreeMap::from([(
                "example.com/widget".to_string(),
                1,
            )]),
            ..spec_in_namespace()
        };
        let err = ClusterConfig::new(spec).unwrap_err();
        match err.current_context() {
            ConfigError::UnknownExtendedResource { name, available } => {
                assert_eq!(name, "example.com/widget");
                assert!(available.contains(&"nvidia.com/gpu".to_string()));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn overflowing_extended_requests_are_rejected() {
        let spec = ClusterConfigSpec {
            head_extended_resource_requests: BTreeMap::from([
                ("nvidia.com/gpu".to_string(), u32::MAX),
                ("amd.com/gpu".to_string(), 1),
            ]),
            ..spec_in_namespace()
        };
        let err = ClusterConfig::new(spec).unwrap_err();
        assert!(matches!(
            err.current_context(),
            ConfigError::ExtendedResourceOverflow { role: "head" }
        ));

        let spec = ClusterConfigSpec {
            worker_extended_resource_requests: BTreeMap::from([(
                "nvidia.com/gpu".to_string(),
                u32::MAX,
            )]),
            ..spec_in_namespace()
        };
        assert!(ClusterConfig::new(spec).is_ok());
    }

    #[test]
    fn worker_count_must_fit_replicas() {
        let spec = ClusterConfigSpec {
            num_workers: u32::MAX,
            ..spec_in_namespace()
        };
        let err = ClusterConfig::new(spec).unwrap_err();
        assert_eq!(
            err.current_context().to_string(),
            "num_workers must not exceed 2147483647, got 4294967295"
        );

        let spec = ClusterConfigSpec {
            num_workers: i32::MAX as u32,
            ..spec_in_namespace()
        };
        assert_eq!(ClusterConfig::new(spec).unwrap().num_workers(), i32::MAX);
    }

    #[test]
    fn role_views_expose_per_role_settings() {
        let spec = ClusterConfigSpec {
            head_extended_resource_requests: BTreeMap::from([("nvidia.com/gpu".to_string(), 2)]),
            worker_cpu_requests: "250m".into(),
            ..spec_in_namespace()
        };
        let config = ClusterConfig::new(spec).unwrap();

        assert_eq!(config.head().extended_resource_requests["nvidia.com/gpu"], 2);
        assert!(config.worker().extended_resource_requests.is_empty());
        assert_eq!(
            config.worker().cpu_requests,
            &ResourceAmount::Quantity("250m".to_string())
        );
        assert_eq!(config.head().memory_limits, &ResourceAmount::Whole(8));
    }

    #[test]
    fn loads_yaml_file_with_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
name: from-file
namespace: ns
num_workers: 3
worker_memory_limits: 6Gi
envs:
  - name: B
    value: "2"
  - name: A
    value: "1"
local_queue: team-a
appwrapper: true
"#
        )
        .unwrap();

        let config = ClusterConfig::from_yaml_file(file.path()).unwrap();

        assert_eq!(config.name(), "from-file");
        assert_eq!(config.num_workers(), 3);
        assert_eq!(
            config.worker().memory_limits,
            &ResourceAmount::Quantity("6Gi".to_string())
        );
        assert_eq!(config.head().cpu_requests, &ResourceAmount::Whole(2));
        assert_eq!(config.envs()[0].name, "B");
        assert_eq!(config.envs()[1].name, "A");
        assert_eq!(config.local_queue(), Some("team-a"));
        assert!(config.appwrapper());
        assert!(!config.write_to_file());
    }

    #[test]
    fn unknown_yaml_fields_are_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "namespace: ns\nnum_wokers: 3\n").unwrap();

        let err = ClusterConfig::from_yaml_file(file.path()).unwrap_err();
        assert!(matches!(err.current_context(), ConfigError::Parse { .. }));
    }
}
