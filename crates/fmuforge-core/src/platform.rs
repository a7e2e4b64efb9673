//! Host platform resolution.
//!
//! Maps a platform description plus architecture bit width onto the fixed
//! set of binary-directory triplets a downstream FMI loader understands,
//! and onto the native shared-library file extension.

use crate::error::{Error, Result};

/// Directory-layout triplet inside the package's `binaries/` subtree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformTriplet {
    Linux64,
    Cygwin32,
    Cygwin64,
    Win32,
    Win64,
}

impl PlatformTriplet {
    /// Directory name under `binaries/`.
    pub fn dir_name(&self) -> &'static str {
        match self {
            PlatformTriplet::Linux64 => "linux64",
            PlatformTriplet::Cygwin32 => "cygwin32",
            PlatformTriplet::Cygwin64 => "cygwin64",
            PlatformTriplet::Win32 => "win32",
            PlatformTriplet::Win64 => "win64",
        }
    }

    /// Native shared-library file extension for this platform.
    pub fn library_extension(&self) -> &'static str {
        match self {
            PlatformTriplet::Linux64 => "so",
            _ => "dll",
        }
    }
}

impl std::fmt::Display for PlatformTriplet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// Resolve a platform description and bit width into a triplet.
///
/// Matching is by substring on the lowercased description, exactly the set
/// of platforms the packaged runtime-support code is built for. Anything
/// else is fatal for the whole generation run.
pub fn resolve(description: &str, bits: u32) -> Result<PlatformTriplet> {
    let description_lower = description.to_lowercase();

    let triplet = if description_lower.contains("linux") {
        match bits {
            64 => Some(PlatformTriplet::Linux64),
            _ => None,
        }
    } else if description_lower.contains("cygwin") {
        match bits {
            32 => Some(PlatformTriplet::Cygwin32),
            64 => Some(PlatformTriplet::Cygwin64),
            _ => None,
        }
    } else if description_lower.contains("windows") {
        match bits {
            32 => Some(PlatformTriplet::Win32),
            64 => Some(PlatformTriplet::Win64),
            _ => None,
        }
    } else {
        None
    };

    triplet.ok_or_else(|| Error::UnsupportedPlatform(format!("{} ({} bit)", description, bits)))
}

/// Resolve the triplet for the machine this process runs on.
///
/// `uname -s` distinguishes a Cygwin environment from native Windows at
/// runtime; where the probe is unavailable the compile-time target OS is
/// used instead.
pub fn host() -> Result<PlatformTriplet> {
    let bits = if cfg!(target_pointer_width = "64") { 64 } else { 32 };
    resolve(&host_description(), bits)
}

fn host_description() -> String {
    std::process::Command::new("uname")
        .arg("-s")
        .output()
        .ok()
        .filter(|out| out.status.success())
        .map(|out| String::from_utf8_lossy(&out.stdout).trim().to_string())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| std::env::consts::OS.to_string())
}
