//! Toolkit configuration file handling.
//!
//! The toolkit's configure step records where the simulation toolkit and the
//! FMI runtime-support sources live. fmuforge reads that record
//! (`fmuforge_conf.json`) instead of asking the user on every invocation.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// File name of the configuration record, located in the export root.
pub const CONFIG_FILE_NAME: &str = "fmuforge_conf.json";

/// Locations recorded by the toolkit configure step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolkitConfig {
    /// Simulation toolkit install directory.
    pub toolkit_root: PathBuf,

    /// FMI runtime-support include directory (passed to schema-1 builds).
    pub runtime_include_dir: PathBuf,

    /// FMI runtime-support library directory (passed to schema-1 builds).
    pub runtime_lib_dir: PathBuf,
}

impl ToolkitConfig {
    /// Load the configuration record from the export root.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigMissing`] if the file does not exist and
    /// [`Error::ConfigInvalid`] if it cannot be parsed.
    pub fn load(export_root: &Path) -> Result<Self> {
        let path = export_root.join(CONFIG_FILE_NAME);
        if !path.is_file() {
            return Err(Error::ConfigMissing(path));
        }

        let text = fs::read_to_string(&path)?;
        let config: ToolkitConfig = serde_json::from_str(&text)
            .map_err(|e| Error::ConfigInvalid(format!("{}: {}", path.display(), e)))?;

        tracing::debug!(toolkit_root = %config.toolkit_root.display(), "loaded toolkit config");
        Ok(config)
    }

    /// Write the configuration record into the export root.
    pub fn store(&self, export_root: &Path) -> Result<()> {
        let path = export_root.join(CONFIG_FILE_NAME);
        let text = serde_json::to_string_pretty(self)
            .map_err(|e| Error::ConfigInvalid(e.to_string()))?;
        fs::write(&path, text)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_config_is_reported() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let err = ToolkitConfig::load(temp.path()).unwrap_err();
        assert!(matches!(err, Error::ConfigMissing(_)));
        assert_eq!(err.exit_code(), 5);
    }

    #[test]
    fn store_then_load_roundtrip() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let config = ToolkitConfig {
            toolkit_root: PathBuf::from("/opt/simkit"),
            runtime_include_dir: PathBuf::from("/opt/fmirt/include"),
            runtime_lib_dir: PathBuf::from("/opt/fmirt/lib"),
        };
        config.store(temp.path()).expect("Failed to store config");

        let loaded = ToolkitConfig::load(temp.path()).expect("Failed to load config");
        assert_eq!(loaded.toolkit_root, config.toolkit_root);
        assert_eq!(loaded.runtime_lib_dir, config.runtime_lib_dir);
    }

    #[test]
    fn malformed_config_is_invalid() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        fs::write(temp.path().join(CONFIG_FILE_NAME), "not json").unwrap();

        let err = ToolkitConfig::load(temp.path()).unwrap_err();
        assert!(matches!(err, Error::ConfigInvalid(_)));
    }
}
