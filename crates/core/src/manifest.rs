//! Manifest pointing the frontend at the current dataset file.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// File name of the manifest inside the data directory.
pub const MANIFEST_FILE: &str = "manifest.json";

/// Which dataset is current. Rewritten at the end of every successful run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    /// Provider version the dataset was built for.
    pub current_version: String,
    /// Dataset file name relative to the data directory.
    pub current_file: String,
    /// When this manifest was written.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<DateTime<Utc>>,
}

impl Manifest {
    /// Manifest for `version` stamped with the current time.
    pub fn new(version: impl Into<String>, file: impl Into<String>) -> Self {
        Self {
            current_version: version.into(),
            current_file: file.into(),
            generated_at: Some(Utc::now()),
        }
    }

    /// Load the manifest from the given path, returning `None` if it does not exist.
    pub fn load(path: impl AsRef<Path>) -> Result<Option<Self>> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read manifest {}", path.display()))?;
        let manifest = serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse manifest {}", path.display()))?;
        Ok(Some(manifest))
    }

    /// Persist the manifest, creating parent directories if needed.
    pub fn persist(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed to create manifest directory {}", parent.display())
            })?;
        }

        let serialized =
            serde_json::to_string_pretty(self).context("failed to serialize manifest")?;
        fs::write(path, serialized)
            .with_context(|| format!("failed to write manifest {}", path.display()))
    }
}

/// Manifest path inside a data directory.
pub fn manifest_path(data_dir: impl AsRef<Path>) -> PathBuf {
    data_dir.as_ref().join(MANIFEST_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn persist_and_reload() -> Result<()> {
        let dir = tempdir()?;
        let path = manifest_path(dir.path().join("data"));
        assert!(Manifest::load(&path)?.is_none());

        let manifest = Manifest::new("14.1.1", "champion_cooldowns_14.1.1.json");
        manifest.persist(&path)?;

        let raw: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path)?)?;
        assert_eq!(raw["currentVersion"], "14.1.1");
        assert_eq!(raw["currentFile"], "champion_cooldowns_14.1.1.json");

        let loaded = Manifest::load(&path)?.expect("manifest present");
        assert_eq!(loaded, manifest);
        Ok(())
    }
}
