//! Package assembly.
//!
//! Builds the on-disk package layout, compresses it into a zip archive and
//! renames the archive to the final `.fmu` extension. The final rename only
//! happens when every preceding step succeeded; cleanup afterwards leaves
//! either a finished package or (in litter mode) the full working state.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use crate::context::{is_removable_leftover, RunContext};
use crate::error::Result;
use crate::platform::PlatformTriplet;

/// Assemble the final package from the synthesized manifest, the acquired
/// shared library and the auxiliary files.
///
/// Returns the path of the finished `.fmu` package.
pub fn assemble(
    ctx: &RunContext,
    manifest: &Path,
    library: &Path,
    aux_files: &[PathBuf],
    triplet: PlatformTriplet,
) -> Result<PathBuf> {
    let staging = ctx.staging_dir();

    // A previous aborted run may have left the staging tree behind.
    if staging.is_dir() {
        fs::remove_dir_all(&staging)?;
    }

    let binaries_dir = staging.join("binaries").join(triplet.dir_name());
    let resources_dir = staging.join("resources");
    fs::create_dir_all(&binaries_dir)?;
    fs::create_dir_all(&resources_dir)?;

    copy_into(manifest, &staging)?;
    for file in aux_files {
        copy_into(file, &resources_dir)?;
    }
    copy_into(library, &binaries_dir)?;

    let archive = ctx.work_path(&format!("{}.zip", ctx.model_id));
    if archive.is_file() {
        fs::remove_file(&archive)?;
    }
    compress_dir(&staging, &archive)?;

    let package = ctx.package_path();
    if package.is_file() {
        fs::remove_file(&package)?;
    }
    fs::rename(&archive, &package)?;

    tracing::info!(package = %package.display(), "created package");
    Ok(package)
}

/// Remove intermediate state after a successful run.
///
/// Deletes the manifest, transient build byproducts, the staging tree and
/// loose `<model_id>.*` files that are neither the package nor a backup.
/// A no-op in litter mode.
pub fn cleanup(ctx: &RunContext, manifest: &Path) -> Result<()> {
    if ctx.keep_intermediates {
        tracing::debug!("litter mode: keeping intermediate files");
        return Ok(());
    }

    for transient in [
        manifest.to_path_buf(),
        ctx.work_path("build.log"),
        ctx.work_path("fmiFunctions.o"),
    ] {
        if transient.is_file() {
            fs::remove_file(&transient)?;
        }
    }

    let staging = ctx.staging_dir();
    if staging.is_dir() {
        fs::remove_dir_all(&staging)?;
    }

    for entry in fs::read_dir(&ctx.work_dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_file() && is_removable_leftover(&path, &ctx.model_id) {
            fs::remove_file(&path)?;
        }
    }

    Ok(())
}

/// Copy `file` into `dir`, keeping its base name.
fn copy_into(file: &Path, dir: &Path) -> Result<()> {
    let base = file.file_name().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("not a file path: {}", file.display()),
        )
    })?;
    fs::copy(file, dir.join(base))?;
    Ok(())
}

/// Compress a directory tree into a zip archive.
///
/// Entries are the files below `root` with forward-slash relative paths;
/// empty directories produce no entries.
fn compress_dir(root: &Path, archive: &Path) -> Result<()> {
    let file = File::create(archive)?;
    let mut writer = ZipWriter::new(file);
    let options = SimpleFileOptions::default();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(io::Error::from)?;
        if !entry.file_type().is_file() {
            continue;
        }

        let relative = entry
            .path()
            .strip_prefix(root)
            .expect("walkdir yields paths below root");
        let name = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        writer.start_file(name, options)?;
        let contents = fs::read(entry.path())?;
        writer.write_all(&contents)?;
    }

    writer.finish()?;
    Ok(())
}
