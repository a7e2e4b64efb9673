//! External toolkit invocation.
//!
//! The simulation toolkit owns compilation and execution of the wrapped
//! script. fmuforge copies the script into the toolkit's scratch area,
//! drives the toolkit's build step, then runs the script once with a
//! discovery flag so it writes the variable metadata record. Both calls are
//! synchronous, run-to-completion invocations with no timeout.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::{Error, Result};

/// Name of the toolkit's build/run driver inside the toolkit root.
pub const RUN_TOOL: &str = "runner";

/// Flag that makes a prepared script dump its variable names and exit.
pub const DISCOVERY_FLAG: &str = "--only-write-variable-names-json";

/// Outcome of preparing a script with the toolkit.
#[derive(Debug)]
pub struct PreparedScript {
    /// Script name without directory or extension; becomes the model name.
    pub stem: String,

    /// Path of the metadata record the discovery run produced.
    pub metadata_path: PathBuf,
}

/// Copy the script into the toolkit, compile it and run the discovery step.
///
/// # Errors
///
/// [`Error::CompileFailed`] if the build step returns non-zero,
/// [`Error::RunFailed`] if the discovery run returns non-zero and
/// [`Error::MetadataMissing`] if the run succeeds but writes no record.
pub fn prepare_script(toolkit_root: &Path, script_path: &Path) -> Result<PreparedScript> {
    let script_name = script_path
        .file_name()
        .ok_or_else(|| Error::ScriptNotFound(script_path.to_path_buf()))?;
    let stem = script_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let scratch_dir = toolkit_root.join("scratch");
    fs::copy(script_path, scratch_dir.join(script_name))?;

    let driver = toolkit_root.join(RUN_TOOL);

    tracing::info!(script = %script_path.display(), "compiling script");
    let build = Command::new(&driver)
        .arg("build")
        .current_dir(toolkit_root)
        .output()
        .map_err(|e| Error::CompileFailed(format!("failed to run {}: {}", driver.display(), e)))?;
    if !build.status.success() {
        return Err(Error::CompileFailed(format!(
            "{} ({})",
            script_path.display(),
            String::from_utf8_lossy(&build.stderr).trim()
        )));
    }

    tracing::info!(%stem, "running variable discovery");
    let run = Command::new(&driver)
        .arg("--run")
        .arg(format!("{} {}", stem, DISCOVERY_FLAG))
        .current_dir(toolkit_root)
        .output()
        .map_err(|e| Error::RunFailed(format!("failed to run {}: {}", driver.display(), e)))?;
    if !run.status.success() {
        return Err(Error::RunFailed(format!(
            "discovery run exited with {}",
            run.status
        )));
    }

    let metadata_path = toolkit_root
        .join("build")
        .join("scratch")
        .join(format!("{}.json", stem));
    if !metadata_path.is_file() {
        return Err(Error::MetadataMissing(metadata_path));
    }

    Ok(PreparedScript {
        stem,
        metadata_path,
    })
}

/// Parse the metadata record the discovery run wrote.
pub fn load_metadata(path: &Path) -> Result<serde_json::Value> {
    let text = fs::read_to_string(path)?;
    serde_json::from_str(&text)
        .map_err(|e| Error::Classification(format!("{}: {}", path.display(), e)))
}

/// `file:` locator URI for the toolkit's run tool, embedded in the manifest.
pub fn run_tool_uri(toolkit_root: &Path) -> String {
    let mut path = toolkit_root.to_string_lossy().replace('\\', "/");
    if !path.starts_with('/') {
        path.insert(0, '/');
    }
    format!("file://{}/{}", path, RUN_TOOL)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn run_tool_uri_is_a_file_uri() {
        let uri = run_tool_uri(Path::new("/opt/simkit"));
        assert_eq!(uri, "file:///opt/simkit/runner");
    }

    #[test]
    fn metadata_parse_failure_is_a_classification_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("meta.json");
        fs::write(&path, "{ broken").unwrap();

        let err = load_metadata(&path).unwrap_err();
        assert!(matches!(err, Error::Classification(_)));
    }

    #[cfg(unix)]
    mod driver {
        use super::*;
        use std::os::unix::fs::PermissionsExt;

        /// Lay out a fake toolkit whose driver script writes the metadata
        /// record on the discovery run.
        fn fake_toolkit(driver_body: &str) -> TempDir {
            let temp = TempDir::new().unwrap();
            fs::create_dir_all(temp.path().join("scratch")).unwrap();
            fs::create_dir_all(temp.path().join("build/scratch")).unwrap();

            let driver = temp.path().join(RUN_TOOL);
            fs::write(&driver, driver_body).unwrap();
            let mut perms = fs::metadata(&driver).unwrap().permissions();
            perms.set_mode(0o755);
            fs::set_permissions(&driver, perms).unwrap();
            temp
        }

        #[test]
        fn prepare_script_drives_build_and_discovery() {
            let toolkit = fake_toolkit(
                "#!/bin/sh\n\
                 if [ \"$1\" = \"build\" ]; then exit 0; fi\n\
                 echo '{\"RealInputs\": [\"x\"]}' > build/scratch/sim.json\n",
            );
            let script = toolkit.path().join("sim.cc");
            fs::write(&script, "// sim").unwrap();

            let prepared = prepare_script(toolkit.path(), &script).expect("prepare failed");
            assert_eq!(prepared.stem, "sim");
            assert!(prepared.metadata_path.is_file());
            assert!(toolkit.path().join("scratch/sim.cc").is_file());

            let metadata = load_metadata(&prepared.metadata_path).unwrap();
            assert!(metadata.get("RealInputs").is_some());
        }

        #[test]
        fn failing_build_reports_compile_error() {
            let toolkit = fake_toolkit("#!/bin/sh\nexit 1\n");
            let script = toolkit.path().join("sim.cc");
            fs::write(&script, "// sim").unwrap();

            let err = prepare_script(toolkit.path(), &script).unwrap_err();
            assert!(matches!(err, Error::CompileFailed(_)));
            assert_eq!(err.exit_code(), 8);
        }

        #[test]
        fn missing_metadata_after_run_is_reported() {
            let toolkit = fake_toolkit("#!/bin/sh\nexit 0\n");
            let script = toolkit.path().join("sim.cc");
            fs::write(&script, "// sim").unwrap();

            let err = prepare_script(toolkit.path(), &script).unwrap_err();
            assert!(matches!(err, Error::MetadataMissing(_)));
            assert_eq!(err.exit_code(), 9);
        }
    }
}
