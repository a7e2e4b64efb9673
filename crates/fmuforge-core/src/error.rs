//! Error types for fmuforge-core.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for fmuforge-core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while generating an FMU.
///
/// Every variant maps to a distinct process exit code via
/// [`Error::exit_code`]; the codes are the CLI-facing contract for
/// automation wrapping this pipeline.
#[derive(Debug, Error)]
pub enum Error {
    /// The simulation script passed on the command line does not exist.
    #[error("invalid simulation script: {0}")]
    ScriptNotFound(PathBuf),

    /// The toolkit configuration file is missing.
    #[error("configuration file not found: {0} (run the toolkit configure step first)")]
    ConfigMissing(PathBuf),

    /// The toolkit configuration file could not be parsed.
    #[error("invalid configuration file: {0}")]
    ConfigInvalid(String),

    /// The configured toolkit install directory does not exist.
    #[error("toolkit install directory does not exist: {0}")]
    ToolkitDirMissing(PathBuf),

    /// An extra argument is neither `name=value` nor an existing file.
    #[error("invalid input argument: {0}")]
    InvalidArgument(String),

    /// The external toolkit build step returned non-zero.
    #[error("compilation of script failed: {0}")]
    CompileFailed(String),

    /// The schema-1 build script is missing.
    #[error("could not find build script: {0}")]
    BuildScriptMissing(PathBuf),

    /// The external script run returned non-zero.
    #[error("variable discovery run failed: {0}")]
    RunFailed(String),

    /// The script run completed but produced no metadata file.
    #[error("variable metadata file not found: {0}")]
    MetadataMissing(PathBuf),

    /// The variable metadata record is structurally malformed.
    #[error("malformed variable metadata: {0}")]
    Classification(String),

    /// The host platform is not supported.
    #[error("platform not supported: {0}")]
    UnsupportedPlatform(String),

    /// The pre-built runtime-support library (schema 2) is missing.
    #[error("runtime-support library not found: {0}")]
    SupportLibraryMissing(PathBuf),

    /// The expected shared library is absent after the build/copy step.
    #[error("not able to create shared library: {0}")]
    LibraryNotProduced(PathBuf),

    /// Filesystem error during packaging or staging.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Archive error while compressing the package.
    #[error("archive error: {0}")]
    Zip(#[from] zip::result::ZipError),
}

impl Error {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::ScriptNotFound(_) => 4,
            Error::ConfigMissing(_) | Error::ConfigInvalid(_) | Error::ToolkitDirMissing(_) => 5,
            Error::UnsupportedPlatform(_) => 6,
            Error::InvalidArgument(_) => 7,
            Error::CompileFailed(_) | Error::BuildScriptMissing(_) => 8,
            Error::RunFailed(_) | Error::MetadataMissing(_) => 9,
            Error::Classification(_) => 10,
            Error::SupportLibraryMissing(_) => 16,
            Error::LibraryNotProduced(_) => 17,
            Error::Io(_) | Error::Zip(_) => 18,
        }
    }
}
