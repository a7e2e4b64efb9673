//! Per-run context for FMU generation.
//!
//! Every pipeline stage receives an explicit [`RunContext`] instead of
//! relying on the process working directory. Two runs with distinct
//! contexts never share mutable filesystem state.

use std::path::{Path, PathBuf};

use crate::manifest::SchemaVersion;

/// Context threaded through every generation stage.
#[derive(Debug, Clone)]
pub struct RunContext {
    /// Directory where intermediate files and the final package are created.
    pub work_dir: PathBuf,

    /// Root of the fmuforge installation (build scripts, support libraries,
    /// configuration record).
    pub export_root: PathBuf,

    /// Simulation toolkit install directory.
    pub toolkit_root: PathBuf,

    /// FMI model identifier; names the package and its shared library.
    pub model_id: String,

    /// Manifest schema version selected for this run.
    pub schema: SchemaVersion,

    /// Keep intermediate files after packaging ("litter" mode).
    pub keep_intermediates: bool,
}

impl RunContext {
    /// Path of a file inside the working directory.
    pub fn work_path(&self, name: &str) -> PathBuf {
        self.work_dir.join(name)
    }

    /// Staging directory for the package layout (`<work_dir>/<model_id>/`).
    pub fn staging_dir(&self) -> PathBuf {
        self.work_dir.join(&self.model_id)
    }

    /// Final package path (`<work_dir>/<model_id>.fmu`).
    pub fn package_path(&self) -> PathBuf {
        self.work_dir.join(format!("{}.fmu", self.model_id))
    }
}

/// Builder-style constructor keeping the call sites readable.
impl RunContext {
    pub fn new(
        work_dir: impl Into<PathBuf>,
        export_root: impl Into<PathBuf>,
        toolkit_root: impl Into<PathBuf>,
        model_id: impl Into<String>,
        schema: SchemaVersion,
    ) -> Self {
        Self {
            work_dir: work_dir.into(),
            export_root: export_root.into(),
            toolkit_root: toolkit_root.into(),
            model_id: model_id.into(),
            schema,
            keep_intermediates: false,
        }
    }

    /// Enable or disable litter mode.
    pub fn with_keep_intermediates(mut self, keep: bool) -> Self {
        self.keep_intermediates = keep;
        self
    }
}

/// True if `path` names a transient file from a previous run of `model_id`
/// that cleanup may remove (anything but the package itself or a backup).
pub fn is_removable_leftover(path: &Path, model_id: &str) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    name.starts_with(&format!("{}.", model_id)) && !name.ends_with(".fmu") && !name.contains(".~")
}
