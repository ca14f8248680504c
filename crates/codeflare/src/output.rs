//! Manifest emission: in-memory documents or YAML files on disk.

use std::fs;
use std::fs::File;
use std::io::BufWriter;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use error_stack::Report;
use error_stack::ResultExt;
use serde::Serialize;
use tracing::info;

use crate::error::BuildError;

/// Resource directory relative to the user's home directory.
pub const RESOURCE_DIR: &str = ".codeflare/resources";

/// Result of a successful build.
#[derive(Debug, Clone, PartialEq)]
pub enum ManifestOutput {
    /// Manifest written to this file
    Written(PathBuf),
    /// Manifest kept in memory
    Loaded(serde_json::Value),
}

/// Convert a typed resource into a plain document, dropping unset fields.
///
/// # Errors
///
/// - [`BuildError::Serialization`] if the resource cannot be represented
pub fn sanitize<T: Serialize>(
    name: &str,
    resource: &T,
) -> Result<serde_json::Value, Report<BuildError>> {
    serde_json::to_value(resource).change_context_lazy(|| BuildError::Serialization {
        name: name.to_string(),
    })
}

/// Emit a sanitized document: written through `writer` when
/// `write_to_file` is set, otherwise returned as is without touching the
/// filesystem.
///
/// # Errors
///
/// - [`BuildError::Write`] if the document cannot be written
pub fn emit(
    writer: &ResourceWriter,
    write_to_file: bool,
    name: &str,
    document: serde_json::Value,
) -> Result<ManifestOutput, Report<BuildError>> {
    if write_to_file {
        Ok(ManifestOutput::Written(writer.write(name, &document)?))
    } else {
        info!("Yaml resources loaded for {name}");
        Ok(ManifestOutput::Loaded(document))
    }
}

/// Writes manifests as `<dir>/<name>.yaml`.
#[derive(Debug, Clone)]
pub struct ResourceWriter {
    dir: PathBuf,
}

impl ResourceWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Writer for `~/.codeflare/resources`.
    ///
    /// # Errors
    ///
    /// - [`BuildError::HomeDirectory`] if the home directory is unknown
    pub fn in_home() -> Result<Self, Report<BuildError>> {
        let home = dirs::home_dir().ok_or_else(|| Report::new(BuildError::HomeDirectory))?;
        Ok(Self::new(home.join(RESOURCE_DIR)))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.yaml"))
    }

    /// Write `document` to [`Self::path_for`], replacing any existing file.
    ///
    /// # Errors
    ///
    /// - [`BuildError::Write`] if the directory or file cannot be written
    pub fn write(
        &self,
        name: &str,
        document: &serde_json::Value,
    ) -> Result<PathBuf, Report<BuildError>> {
        let path = self.path_for(name);
        let write_error = || BuildError::Write {
            path: path.display().to_string(),
        };

        fs::create_dir_all(&self.dir)
            .change_context_lazy(write_error)
            .attach_printable_lazy(|| format!("creating {}", self.dir.display()))?;
        let mut writer = BufWriter::new(File::create(&path).change_context_lazy(write_error)?);
        serde_yaml::to_writer(&mut writer, document).change_context_lazy(write_error)?;
        writer.flush().change_context_lazy(write_error)?;

        info!("Written to: {}", path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use similar_asserts::assert_eq;

    use super::*;

    #[test]
    fn sanitize_drops_unset_fields() {
        let meta = k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta {
            name: Some("c".to_string()),
            ..Default::default()
        };

        assert_eq!(sanitize("c", &meta).unwrap(), json!({"name": "c"}));
    }

    #[test]
    fn write_creates_directory_and_overwrites() {
        let tmp = tempfile::tempdir().unwrap();
        let writer = ResourceWriter::new(tmp.path().join("nested/resources"));

        let first = writer.write("c", &json!({"a": 1})).unwrap();
        let second = writer.write("c", &json!({"b": "2"})).unwrap();

        assert_eq!(first, second);
        assert_eq!(first, tmp.path().join("nested/resources/c.yaml"));
        let written: serde_json::Value =
            serde_yaml::from_str(&fs::read_to_string(&second).unwrap()).unwrap();
        assert_eq!(written, json!({"b": "2"}));
    }

    #[test]
    fn emit_in_memory_leaves_filesystem_alone() {
        let tmp = tempfile::tempdir().unwrap();
        let writer = ResourceWriter::new(tmp.path().join("resources"));

        let output = emit(&writer, false, "c", json!({"kind": "RayCluster"})).unwrap();

        assert_eq!(output, ManifestOutput::Loaded(json!({"kind": "RayCluster"})));
        assert!(!writer.dir().exists());
    }

    #[test]
    fn emit_to_file_reports_path() {
        let tmp = tempfile::tempdir().unwrap();
        let writer = ResourceWriter::new(tmp.path());

        let output = emit(&writer, true, "c", json!({"kind": "RayCluster"})).unwrap();

        assert_eq!(output, ManifestOutput::Written(tmp.path().join("c.yaml")));
    }

    #[test]
    fn write_into_file_path_fails() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        let writer = ResourceWriter::new(tmp.path());

        let err = writer.write("c", &json!({})).unwrap_err();

        assert!(matches!(err.current_context(), BuildError::Write { .. }));
    }
}
