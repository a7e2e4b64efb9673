//! Generation pipeline.
//!
//! Single linear pass with no back-edges:
//!
//! ```text
//! PreFlight → Prepare → Classify → Allocate → Synthesize
//!     → ResolvePlatform → AcquireLibrary → Assemble → [Cleanup]
//! ```
//!
//! No stage is retried; the first failure aborts the run and surfaces a
//! stage-specific error. A fatal abort leaves partially created files in
//! place unless the run reached the cleanup stage.

use std::collections::HashMap;
use std::path::PathBuf;

use crate::allocate::allocate;
use crate::classify::classify;
use crate::config::ToolkitConfig;
use crate::context::RunContext;
use crate::error::{Error, Result};
use crate::manifest::{self, ManifestDescriptor};
use crate::{library, package, platform, toolkit};

/// Caller-supplied inputs for one generation run.
#[derive(Debug, Default)]
pub struct GenerationRequest {
    /// Path to the simulation script to wrap.
    pub script_path: PathBuf,

    /// Auxiliary resource files to ship inside the package.
    pub aux_files: Vec<PathBuf>,

    /// Start values for input/output/parameter variables.
    pub start_values: HashMap<String, String>,
}

/// Pipeline stage, used for progress reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    PreFlight,
    Prepare,
    Classify,
    Allocate,
    Synthesize,
    ResolvePlatform,
    AcquireLibrary,
    Assemble,
    Cleanup,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::PreFlight => "pre-flight",
            Stage::Prepare => "prepare",
            Stage::Classify => "classify",
            Stage::Allocate => "allocate",
            Stage::Synthesize => "synthesize",
            Stage::ResolvePlatform => "resolve-platform",
            Stage::AcquireLibrary => "acquire-library",
            Stage::Assemble => "assemble",
            Stage::Cleanup => "cleanup",
        };
        f.write_str(name)
    }
}

/// Run the whole pipeline; returns the path of the finished package.
pub fn generate(
    ctx: &RunContext,
    config: &ToolkitConfig,
    request: &GenerationRequest,
) -> Result<PathBuf> {
    tracing::debug!(stage = %Stage::PreFlight, model_id = %ctx.model_id, schema = %ctx.schema, "starting run");
    if !request.script_path.is_file() {
        return Err(Error::ScriptNotFound(request.script_path.clone()));
    }
    if !ctx.toolkit_root.is_dir() {
        return Err(Error::ToolkitDirMissing(ctx.toolkit_root.clone()));
    }

    tracing::debug!(stage = %Stage::Prepare, "compiling and discovering variables");
    let prepared = toolkit::prepare_script(&ctx.toolkit_root, &request.script_path)?;
    let metadata = toolkit::load_metadata(&prepared.metadata_path)?;

    tracing::debug!(stage = %Stage::Classify, "classifying variables");
    let classified = classify(&metadata)?;

    tracing::debug!(stage = %Stage::Allocate, "assigning value references");
    let allocation = allocate(&classified);
    tracing::debug!(
        inputs = allocation.inputs.len(),
        outputs = allocation.outputs.len(),
        parameters = allocation.parameters.len(),
        "allocated value references"
    );

    tracing::debug!(stage = %Stage::Synthesize, "rendering model description");
    let descriptor = ManifestDescriptor::new(
        ctx.model_id.clone(),
        prepared.stem.clone(),
        toolkit::run_tool_uri(&ctx.toolkit_root),
        request.aux_files.clone(),
        request.start_values.clone(),
    );
    let manifest_path = manifest::synthesize(ctx, &descriptor, &allocation)?;

    tracing::debug!(stage = %Stage::ResolvePlatform, "resolving host platform");
    let triplet = platform::host()?;

    tracing::debug!(stage = %Stage::AcquireLibrary, triplet = %triplet, "acquiring shared library");
    let library_path = library::acquire(ctx, config, triplet)?;

    tracing::debug!(stage = %Stage::Assemble, "assembling package");
    let package_path = package::assemble(
        ctx,
        &manifest_path,
        &library_path,
        &request.aux_files,
        triplet,
    )?;

    tracing::debug!(stage = %Stage::Cleanup, keep = ctx.keep_intermediates, "cleaning up");
    package::cleanup(ctx, &manifest_path)?;

    Ok(package_path)
}
