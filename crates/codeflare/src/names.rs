//! Cluster and AppWrapper naming.

use uuid::Uuid;

/// Source of unique identifiers for configurations without a name.
pub trait NameGenerator: Send + Sync {
    fn generate_id(&self) -> String;
}

/// Random v4 UUIDs.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidNameGenerator;

impl NameGenerator for UuidNameGenerator {
    fn generate_id(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Names of the generated resources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceNames {
    pub appwrapper: String,
    pub cluster: String,
}

/// Reuse `name` for both resources, or draw two independent identifiers
/// when it is empty.
pub fn resolve_names(name: &str, generator: &dyn NameGenerator) -> ResourceNames {
    if name.is_empty() {
        ResourceNames {
            appwrapper: format!("appwrapper-{}", generator.generate_id()),
            cluster: format!("cluster-{}", generator.generate_id()),
        }
    } else {
        ResourceNames {
            appwrapper: name.to_string(),
            cluster: name.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;
    use std::sync::atomic::Ordering;

    use similar_asserts::assert_eq;

    use super::*;

    struct Sequential(AtomicUsize);

    impl NameGenerator for Sequential {
        fn generate_id(&self) -> String {
            self.0.fetch_add(1, Ordering::SeqCst).to_string()
        }
    }

    #[test]
    fn explicit_name_is_shared() {
        let names = resolve_names("demo", &Sequential(AtomicUsize::new(0)));
        assert_eq!(names.appwrapper, "demo");
        assert_eq!(names.cluster, "demo");
    }

    #[test]
    fn empty_name_draws_two_ids() {
        let generator = Sequential(AtomicUsize::new(7));
        let names = resolve_names("", &generator);
        assert_eq!(names.appwrapper, "appwrapper-7");
        assert_eq!(names.cluster, "cluster-8");
    }

    #[test]
    fn uuid_generator_is_random() {
        let generator = UuidNameGenerator;
        let first = generator.generate_id();
        assert_eq!(first.len(), 36);
        assert_ne!(first, generator.generate_id());
    }
}
