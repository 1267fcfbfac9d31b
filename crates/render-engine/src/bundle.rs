//! Bundle writers: package a batch export's named outputs.

use std::path::{Path, PathBuf};

use serde::Serialize;

use logomark_common::error::{LogomarkError, LogomarkResult};
use logomark_layout_model::size::OutputSize;

use crate::export::{BatchExport, ExportFailure};

/// Name of the manifest written next to the outputs.
pub const MANIFEST_FILE: &str = "manifest.json";

/// Consumes an ordered set of `(name, bytes)` outputs.
pub trait BundleWriter {
    /// Write all items of `export`, returning where the bundle landed.
    fn write_bundle(&mut self, export: &BatchExport) -> LogomarkResult<PathBuf>;

    /// Writer name, for logging.
    fn name(&self) -> &str;
}

/// Manifest describing a written bundle.
#[derive(Debug, Clone, Serialize)]
pub struct BundleManifest {
    /// Creation timestamp (RFC 3339).
    pub created_at: String,
    pub output_size: OutputSize,
    pub requested: usize,
    pub succeeded: usize,
    pub files: Vec<ManifestEntry>,
    pub failures: Vec<ExportFailure>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ManifestEntry {
    pub name: String,
    pub source: String,
    pub width: u32,
    pub height: u32,
}

impl BundleManifest {
    pub fn from_export(export: &BatchExport) -> Self {
        Self {
            created_at: chrono::Utc::now().to_rfc3339(),
            output_size: export.output_size.clone(),
            requested: export.requested,
            succeeded: export.succeeded(),
            files: export
                .items
                .iter()
                .map(|item| ManifestEntry {
                    name: item.name.clone(),
                    source: item.source_label.clone(),
                    width: item.width,
                    height: item.height,
                })
                .collect(),
            failures: export.failures.clone(),
        }
    }
}

/// Writes each output as a file in a directory, plus a manifest.
pub struct DirectoryBundleWriter {
    dir: PathBuf,
    write_manifest: bool,
}

impl DirectoryBundleWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            write_manifest: true,
        }
    }

    /// Skip writing `manifest.json`.
    pub fn without_manifest(mut self) -> Self {
        self.write_manifest = false;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl BundleWriter for DirectoryBundleWriter {
    fn write_bundle(&mut self, export: &BatchExport) -> LogomarkResult<PathBuf> {
        std::fs::create_dir_all(&self.dir).map_err(|e| {
            LogomarkError::export(format!("Cannot create {}: {e}", self.dir.display()))
        })?;

        for item in &export.items {
            write_file(&self.dir.join(&item.name), &item.data)?;
        }

        if self.write_manifest {
            let manifest = BundleManifest::from_export(export);
            let json = serde_json::to_string_pretty(&manifest)?;
            write_file(&self.dir.join(MANIFEST_FILE), json.as_bytes())?;
        }

        tracing::info!(
            dir = %self.dir.display(),
            files = export.items.len(),
            "Wrote export bundle"
        );
        Ok(self.dir.clone())
    }

    fn name(&self) -> &str {
        "directory"
    }
}

fn write_file(path: &Path, data: &[u8]) -> LogomarkResult<()> {
    std::fs::write(path, data)
        .map_err(|e| LogomarkError::export(format!("Cannot write {}: {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::AssetId;
    use crate::export::ExportedItem;

    fn sample_export() -> BatchExport {
        let item = |index: usize, name: &str| ExportedItem {
            index,
            name: name.to_string(),
            source_id: AssetId::next(),
            source_label: format!("photo-{index}.jpg"),
            width: 4,
            height: 3,
            data: vec![index as u8; 4],
        };
        BatchExport {
            output_size: OutputSize::native(),
            requested: 3,
            items: vec![item(0, "01.png"), item(2, "03.png")],
            failures: vec![ExportFailure {
                index: 1,
                source_label: "photo-1.jpg".to_string(),
                reason: "Decode error: truncated".to_string(),
            }],
        }
    }

    #[test]
    fn test_directory_bundle_writes_files_and_manifest() {
        let dir = std::env::temp_dir().join("logomark_test_bundle");
        let _ = std::fs::remove_dir_all(&dir);

        let mut writer = DirectoryBundleWriter::new(&dir);
        let out = writer.write_bundle(&sample_export()).unwrap();
        assert_eq!(out, dir);

        assert_eq!(std::fs::read(dir.join("01.png")).unwrap(), vec![0u8; 4]);
        assert_eq!(std::fs::read(dir.join("03.png")).unwrap(), vec![2u8; 4]);
        assert!(!dir.join("02.png").exists());

        let manifest: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(dir.join(MANIFEST_FILE)).unwrap())
                .unwrap();
        assert_eq!(manifest["requested"], 3);
        assert_eq!(manifest["succeeded"], 2);
        assert_eq!(manifest["files"][1]["name"], "03.png");
        assert_eq!(manifest["failures"][0]["index"], 1);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_manifest_can_be_skipped() {
        let dir = std::env::temp_dir().join("logomark_test_bundle_plain");
        let _ = std::fs::remove_dir_all(&dir);

        let mut writer = DirectoryBundleWriter::new(&dir).without_manifest();
        writer.write_bundle(&sample_export()).unwrap();
        assert!(!dir.join(MANIFEST_FILE).exists());
        assert_eq!(writer.name(), "directory");

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_unwritable_target_is_export_error() {
        let blocker = std::env::temp_dir().join("logomark_test_bundle_blocker");
        let _ = std::fs::remove_dir_all(&blocker);
        std::fs::write(&blocker, b"file, not a directory").unwrap();

        let mut writer = DirectoryBundleWriter::new(blocker.join("out"));
        let err = writer.write_bundle(&sample_export()).unwrap_err();
        assert!(matches!(err, LogomarkError::Export { .. }));

        std::fs::remove_file(&blocker).ok();
    }
}
