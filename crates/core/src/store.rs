//! Version-keyed dataset files on disk.

use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use tempfile::NamedTempFile;

use crate::{
    manifest::{self, Manifest},
    models::ResolvedDataset,
};

/// Reads and writes `champion_cooldowns_<version>.json` plus the manifest.
#[derive(Debug, Clone)]
pub struct DatasetStore {
    root: PathBuf,
}

impl DatasetStore {
    /// Create a store rooted at the given data directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Data directory backing the store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Dataset file name for a version.
    pub fn file_name(version: &str) -> String {
        format!("champion_cooldowns_{}.json", sanitize_component(version))
    }

    /// Full path of the dataset file for a version.
    pub fn dataset_path(&self, version: &str) -> PathBuf {
        self.root.join(Self::file_name(version))
    }

    /// Path of the manifest.
    pub fn manifest_path(&self) -> PathBuf {
        manifest::manifest_path(&self.root)
    }

    /// Whether a dataset for `version` was already written.
    pub fn exists(&self, version: &str) -> bool {
        self.dataset_path(version).is_file()
    }

    /// Write the dataset atomically; readers never observe a partial file.
    pub fn write(&self, version: &str, dataset: &ResolvedDataset) -> Result<PathBuf> {
        fs::create_dir_all(&self.root)
            .with_context(|| format!("failed to create {}", self.root.display()))?;

        let path = self.dataset_path(version);
        let serialised = serde_json::to_vec_pretty(dataset).context("failed to serialize dataset")?;

        let mut staging = NamedTempFile::new_in(&self.root)
            .with_context(|| format!("failed to stage dataset in {}", self.root.display()))?;
        staging
            .write_all(&serialised)
            .context("failed to write staged dataset")?;
        staging
            .persist(&path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        Ok(path)
    }

    /// Load a previously written dataset.
    pub fn read(&self, version: &str) -> Result<ResolvedDataset> {
        let path = self.dataset_path(version);
        let content = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        serde_json::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Point the manifest at the dataset for `version`.
    pub fn write_manifest(&self, version: &str) -> Result<Manifest> {
        let manifest = Manifest::new(version, Self::file_name(version));
        manifest.persist(self.manifest_path())?;
        Ok(manifest)
    }

    /// Current manifest, if one has been written.
    pub fn manifest(&self) -> Result<Option<Manifest>> {
        Manifest::load(self.manifest_path())
    }
}

fn sanitize_component(input: &str) -> String {
    let result: String = input
        .chars()
        .filter(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '.' | '-' | '_'))
        .collect();
    if result.is_empty() {
        "unknown".to_string()
    } else {
        result
    }
}
