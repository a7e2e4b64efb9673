//! Create command implementation for the fmuforge CLI.
//!
//! Validates the command line, loads the toolkit configuration and hands a
//! fully populated run context to the core pipeline.

use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};

use fmuforge_core::{
    generate, Error, GenerationRequest, Result, RunContext, SchemaVersion, ToolkitConfig,
};

/// Parsed `create` subcommand arguments.
pub struct CreateArgs {
    pub model_id: String,
    pub script: PathBuf,
    pub toolkit_dir: Option<PathBuf>,
    pub fmi_version: String,
    pub litter: bool,
    pub extra: Vec<String>,
}

/// Generate one FMU; returns the path of the created package.
pub fn execute(args: CreateArgs) -> Result<PathBuf> {
    if !args.script.is_file() {
        return Err(Error::ScriptNotFound(args.script));
    }

    let (aux_files, start_values) = parse_extra_arguments(&args.extra)?;

    let export_root = export_root();
    let config = ToolkitConfig::load(&export_root)?;

    // CLI override wins over the configured toolkit location.
    let toolkit_root = args
        .toolkit_dir
        .unwrap_or_else(|| config.toolkit_root.clone());
    if !toolkit_root.is_dir() {
        return Err(Error::ToolkitDirMissing(toolkit_root));
    }

    let schema = match args.fmi_version.as_str() {
        "1" => SchemaVersion::V1,
        _ => SchemaVersion::V2,
    };

    let work_dir = env::current_dir()?;
    let ctx = RunContext::new(work_dir, export_root, toolkit_root, args.model_id, schema)
        .with_keep_intermediates(args.litter);

    let request = GenerationRequest {
        script_path: args.script,
        aux_files,
        start_values,
    };

    generate(&ctx, &config, &request)
}

/// Split the trailing arguments into auxiliary files and start values.
///
/// A token containing `=` is a start value; otherwise it must name an
/// existing file. Anything else is a fatal input error.
fn parse_extra_arguments(
    extra: &[String],
) -> Result<(Vec<PathBuf>, HashMap<String, String>)> {
    let mut aux_files = Vec::new();
    let mut start_values = HashMap::new();

    for token in extra {
        if let Some((name, value)) = token.split_once('=') {
            let name = trim_token(name);
            let value = trim_token(value);
            tracing::debug!(%name, %value, "found start value");
            start_values.insert(name.to_string(), value.to_string());
        } else if Path::new(token).is_file() {
            tracing::debug!(%token, "found auxiliary file");
            aux_files.push(PathBuf::from(token));
        } else {
            return Err(Error::InvalidArgument(token.clone()));
        }
    }

    Ok((aux_files, start_values))
}

/// Strip surrounding whitespace and quotes from a start-value token part.
fn trim_token(part: &str) -> &str {
    part.trim_matches(|c: char| c.is_whitespace() || c == '"')
}

/// Root of the fmuforge installation: `FMUFORGE_ROOT` when set, otherwise
/// the directory holding the executable.
fn export_root() -> PathBuf {
    if let Ok(root) = env::var("FMUFORGE_ROOT") {
        return PathBuf::from(root);
    }
    env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}
