//! Core packaging pipeline for fmuforge.
//!
//! This crate provides:
//! - Variable classification and value-reference allocation
//! - Manifest synthesis for both FMI schema versions
//! - Shared-library acquisition (native build or pre-built copy)
//! - Platform resolution and zip package assembly
//! - External toolkit invocation (compile + variable discovery)

pub mod allocate;
pub mod classify;
pub mod config;
pub mod context;
pub mod error;
pub mod library;
pub mod manifest;
pub mod package;
pub mod pipeline;
pub mod platform;
pub mod toolkit;

pub use allocate::{allocate, AllocatedVariable, Allocation};
pub use classify::{classify, ClassifiedVariables, PrimitiveType, VarCategory};
pub use config::ToolkitConfig;
pub use context::RunContext;
pub use error::{Error, Result};
pub use manifest::{ManifestDescriptor, SchemaVersion, MANIFEST_FILE_NAME};
pub use pipeline::{generate, GenerationRequest, Stage};
pub use platform::PlatformTriplet;
