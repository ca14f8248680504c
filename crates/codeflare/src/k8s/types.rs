use core::error::Error;

use derive_more::Display;

/// Errors that can occur while setting up Kubernetes access.
#[derive(Debug, Display)]
pub enum KubernetesError {
    #[display("Failed to connect to Kubernetes API: {message}")]
    ConnectionFailed { message: String },
}

impl Error for KubernetesError {}

/// Errors returned by a LocalQueue registry read.
#[derive(Debug, Display, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[display("LocalQueue resource not found in namespace {namespace}")]
    NotFound { namespace: String },
    #[display("Listing LocalQueues in namespace {namespace} is forbidden")]
    Forbidden { namespace: String },
    #[display(
        "Kubernetes API returned {code} listing LocalQueues in namespace {namespace}: {message}"
    )]
    Api {
        namespace: String,
        code: u16,
        message: String,
    },
    #[display("Failed to list LocalQueues: {message}")]
    Connection { message: String },
}

impl Error for RegistryError {}

impl RegistryError {
    /// Classify an API status code returned for a LocalQueue list.
    pub fn from_status(namespace: &str, code: u16, message: impl Into<String>) -> Self {
        let namespace = namespace.to_string();
        match code {
            404 => Self::NotFound { namespace },
            403 => Self::Forbidden { namespace },
            code => Self::Api {
                namespace,
                code,
                message: message.into(),
            },
        }
    }

    /// Whether the error means the queues are absent or hidden from the
    /// caller, as opposed to a failing API.
    pub const fn is_not_found_or_forbidden(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::Forbidden { .. })
    }
}

#[cfg(test)]
mod tests {
    use similar_asserts::assert_eq;

    use super::*;

    #[test]
    fn status_codes_are_classified() {
        assert_eq!(
            RegistryError::from_status("ns", 404, "gone"),
            RegistryError::NotFound {
                namespace: "ns".to_string()
            }
        );
        assert_eq!(
            RegistryError::from_status("ns", 403, "nope"),
            RegistryError::Forbidden {
                namespace: "ns".to_string()
            }
        );
        assert_eq!(
            RegistryError::from_status("ns", 500, "boom"),
            RegistryError::Api {
                namespace: "ns".to_string(),
                code: 500,
                message: "boom".to_string()
            }
        );
    }

    #[test]
    fn only_missing_or_forbidden_are_soft() {
        assert!(RegistryError::from_status("ns", 404, "").is_not_found_or_forbidden());
        assert!(RegistryError::from_status("ns", 403, "").is_not_found_or_forbidden());
        assert!(!RegistryError::from_status("ns", 401, "").is_not_found_or_forbidden());
        assert!(!RegistryError::Connection {
            message: "refused".to_string()
        }
        .is_not_found_or_forbidden());
    }

    #[test]
    fn display_formatting() {
        assert_eq!(
            RegistryError::from_status("team-a", 500, "internal").to_string(),
            "Kubernetes API returned 500 listing LocalQueues in namespace team-a: internal"
        );
        assert_eq!(
            KubernetesError::ConnectionFailed {
                message: "no kubeconfig".to_string()
            }
            .to_string(),
            "Failed to connect to Kubernetes API: no kubeconfig"
        );
    }
}
