//! End-to-end manifest generation for a single cluster configuration.

use std::collections::BTreeMap;

use api_types::QUEUE_NAME_LABEL;
use error_stack::Report;

use crate::appwrapper;
use crate::config::ClusterConfig;
use crate::error::BuildError;
use crate::k8s::LocalQueueRegistry;
use crate::kueue;
use crate::manifest;
use crate::manifest::metadata;
use crate::names::resolve_names;
use crate::names::NameGenerator;
use crate::names::UuidNameGenerator;
use crate::output;
use crate::output::ManifestOutput;
use crate::output::ResourceWriter;

/// Builds the RayCluster, optionally wrapped in an AppWrapper, for a
/// configuration and emits it to disk or memory.
pub struct ClusterManifestBuilder<R, G = UuidNameGenerator> {
    registry: R,
    names: G,
    writer: ResourceWriter,
    annotations: BTreeMap<String, String>,
}

impl<R: LocalQueueRegistry> ClusterManifestBuilder<R> {
    /// Builder with random names and annotations taken from the process
    /// environment.
    pub fn new(registry: R, writer: ResourceWriter) -> Self {
        Self {
            registry,
            names: UuidNameGenerator,
            writer,
            annotations: metadata::annotations_from_env(),
        }
    }
}

impl<R: LocalQueueRegistry, G: NameGenerator> ClusterManifestBuilder<R, G> {
    pub fn with_name_generator<N: NameGenerator>(self, names: N) -> ClusterManifestBuilder<R, N> {
        ClusterManifestBuilder {
            registry: self.registry,
            names,
            writer: self.writer,
            annotations: self.annotations,
        }
    }

    /// Replace the annotations set on the RayCluster.
    pub fn with_annotations(mut self, annotations: BTreeMap<String, String>) -> Self {
        self.annotations = annotations;
        self
    }

    pub fn writer(&self) -> &ResourceWriter {
        &self.writer
    }

    /// Generate the top-level document for `config` without emitting it.
    ///
    /// Returns the document name and the sanitized document: the
    /// AppWrapper when `appwrapper` is set, otherwise the RayCluster.
    ///
    /// # Errors
    ///
    /// - [`BuildError::LocalQueueNotFound`] if an explicit queue is missing
    /// - [`BuildError::QueueLookup`] if the queue registry fails
    /// - [`BuildError::Serialization`] if a resource cannot be sanitized
    #[tracing::instrument(
        skip(self, config),
        fields(name = config.name(), namespace = config.namespace())
    )]
    pub async fn render(
        &self,
        config: &ClusterConfig,
    ) -> Result<(String, serde_json::Value), Report<BuildError>> {
        let names = resolve_names(config.name(), &self.names);

        // The queue label goes on whichever object Kueue admits, and only there.
        let mut cluster_labels = metadata::base_labels(config);
        let mut envelope_labels = BTreeMap::new();
        let queue_labels = if config.appwrapper() {
            cluster_labels.remove(QUEUE_NAME_LABEL);
            &mut envelope_labels
        } else {
            &mut cluster_labels
        };
        kueue::resolve_queue_label(config, &self.registry, queue_labels).await?;

        let cluster = manifest::compose(
            config,
            metadata::object_meta(
                &names.cluster,
                config.namespace(),
                cluster_labels,
                self.annotations.clone(),
            ),
        );
        let document = output::sanitize(&names.cluster, &cluster)?;

        if !config.appwrapper() {
            return Ok((names.cluster, document));
        }
        let wrapper = appwrapper::wrap(config, &names.appwrapper, document, envelope_labels);
        let document = output::sanitize(&names.appwrapper, &wrapper)?;
        Ok((names.appwrapper, document))
    }

    /// Generate the manifest for `config` and emit it.
    ///
    /// With `write_to_file` the document is written to
    /// `<resource dir>/<name>.yaml`, replacing any previous file; otherwise
    /// it is returned in memory. Nothing is emitted on error.
    ///
    /// # Errors
    ///
    /// Everything [`Self::render`] returns, plus [`BuildError::Write`].
    pub async fn build(
        &self,
        config: &ClusterConfig,
    ) -> Result<ManifestOutput, Report<BuildError>> {
        let (name, document) = self.render(config).await?;
        output::emit(&self.writer, config.write_to_file(), &name, document)
    }
}
