//! Shared-library acquisition.
//!
//! The package must contain a platform shared library named after the model
//! identifier. Schema 1 compiles it with a platform-specific build script
//! shipped in the export root; schema 2 ships a pre-built runtime-support
//! library that is only copied into place.

use std::fs;
use std::path::PathBuf;
use std::process::Command;

use crate::config::ToolkitConfig;
use crate::context::RunContext;
use crate::error::{Error, Result};
use crate::manifest::SchemaVersion;
use crate::platform::PlatformTriplet;

/// Produce `<model_id>.<native-ext>` in the working directory.
///
/// Returns the path of the produced library.
pub fn acquire(
    ctx: &RunContext,
    config: &ToolkitConfig,
    triplet: PlatformTriplet,
) -> Result<PathBuf> {
    match ctx.schema {
        SchemaVersion::V1 => build_library(ctx, config, triplet),
        SchemaVersion::V2 => copy_support_library(ctx, triplet),
    }
}

/// Schema 1: invoke the platform build script from the export root.
fn build_library(
    ctx: &RunContext,
    config: &ToolkitConfig,
    triplet: PlatformTriplet,
) -> Result<PathBuf> {
    let script_name = match triplet {
        PlatformTriplet::Linux64 => "fmi1_build.sh",
        PlatformTriplet::Cygwin32 | PlatformTriplet::Cygwin64 => "fmi1_build_cygwin.sh",
        PlatformTriplet::Win32 | PlatformTriplet::Win64 => "fmi1_build_win.bat",
    };
    let build_script = ctx.export_root.join("scripts").join(script_name);
    if !build_script.is_file() {
        return Err(Error::BuildScriptMissing(build_script));
    }

    remove_stale_artifacts(ctx)?;

    tracing::info!(script = %build_script.display(), "building shared library");
    let output = Command::new(&build_script)
        .arg(&ctx.model_id)
        .arg(&config.runtime_include_dir)
        .arg(&config.runtime_lib_dir)
        .current_dir(&ctx.work_dir)
        .output()
        .map_err(|e| Error::CompileFailed(format!("failed to run build script: {}", e)))?;

    if !output.status.success() {
        tracing::debug!(
            status = %output.status,
            stderr = %String::from_utf8_lossy(&output.stderr),
            "build script returned non-zero"
        );
    }

    // The build script's exit status is unreliable across shells; the
    // expected output file is the ground truth.
    let library = ctx.work_path(&library_file_name(ctx, triplet));
    if !library.is_file() {
        return Err(Error::LibraryNotProduced(library));
    }
    Ok(library)
}

/// Schema 2: copy the pre-built runtime-support library into place.
fn copy_support_library(ctx: &RunContext, triplet: PlatformTriplet) -> Result<PathBuf> {
    let support_name = match triplet {
        PlatformTriplet::Linux64 => "libfmi2.so",
        PlatformTriplet::Cygwin32 | PlatformTriplet::Cygwin64 => "cygfmi2.dll",
        PlatformTriplet::Win32 | PlatformTriplet::Win64 => "fmi2.dll",
    };
    let support_library = ctx.export_root.join("lib").join(support_name);
    if !support_library.is_file() {
        return Err(Error::SupportLibraryMissing(support_library));
    }

    let library = ctx.work_path(&library_file_name(ctx, triplet));
    fs::copy(&support_library, &library)?;

    if !library.is_file() {
        return Err(Error::LibraryNotProduced(library));
    }

    tracing::debug!(library = %library.display(), "copied runtime-support library");
    Ok(library)
}

/// `<model_id>.<native-ext>`
fn library_file_name(ctx: &RunContext, triplet: PlatformTriplet) -> String {
    format!("{}.{}", ctx.model_id, triplet.library_extension())
}

/// Remove leftovers from a previous build of the same model identifier.
fn remove_stale_artifacts(ctx: &RunContext) -> Result<()> {
    let prefix = format!("{}.", ctx.model_id);
    if ctx.work_dir.is_dir() {
        for entry in fs::read_dir(&ctx.work_dir)? {
            let entry = entry?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            if name.starts_with(&prefix) && entry.path().is_file() {
                fs::remove_file(entry.path())?;
            }
        }
    }

    let stale_object = ctx.work_path("fmiFunctions.obj");
    if stale_object.is_file() {
        fs::remove_file(stale_object)?;
    }
    Ok(())
}
