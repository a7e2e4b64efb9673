//! Manifest synthesis.
//!
//! Renders the `modelDescription.xml` document that a downstream loader
//! parses to discover variable names, value references and the package's
//! entry-point library. Two mutually incompatible schema versions exist;
//! the variant is selected once per run and threaded through the pipeline.

mod fmi1;
mod fmi2;

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use crate::allocate::{AllocatedVariable, Allocation};
use crate::classify::VarCategory;
use crate::context::RunContext;
use crate::error::Result;

/// Fixed manifest file name inside the package root.
pub const MANIFEST_FILE_NAME: &str = "modelDescription.xml";

/// Manifest schema version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaVersion {
    /// FMI 1.0 (tool-coupling layout with an `Implementation` block).
    V1,
    /// FMI 2.0 (`CoSimulation` element, `initial="exact"` markers).
    V2,
}

impl SchemaVersion {
    /// Causality marker for a variable category.
    pub fn causality(&self, category: VarCategory) -> &'static str {
        match (category, self) {
            (VarCategory::Input, _) => "input",
            (VarCategory::Output, _) => "output",
            (VarCategory::Parameter, SchemaVersion::V1) => "internal",
            (VarCategory::Parameter, SchemaVersion::V2) => "parameter",
        }
    }

    /// Variability marker for a variable category.
    ///
    /// Inputs and outputs are always discrete event-point values.
    pub fn variability(&self, category: VarCategory) -> &'static str {
        match (category, self) {
            (VarCategory::Input | VarCategory::Output, _) => "discrete",
            (VarCategory::Parameter, SchemaVersion::V1) => "parameter",
            (VarCategory::Parameter, SchemaVersion::V2) => "fixed",
        }
    }
}

impl std::fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SchemaVersion::V1 => f.write_str("1.0"),
            SchemaVersion::V2 => f.write_str("2.0"),
        }
    }
}

/// Everything the synthesizer needs to emit one manifest.
///
/// Constructed once per generation run and discarded after the manifest is
/// written.
#[derive(Debug)]
pub struct ManifestDescriptor {
    /// FMI model identifier.
    pub model_id: String,

    /// Model name; the stem of the wrapped script.
    pub model_name: String,

    /// Generation timestamp, `%Y-%m-%dT%H:%M:%S`.
    pub timestamp: String,

    /// Name of the user generating the package.
    pub author: String,

    /// Freshly generated globally unique identifier.
    pub guid: String,

    /// Locator URI of the external run tool.
    pub tool_uri: String,

    /// Auxiliary resource files copied into the package.
    pub aux_files: Vec<PathBuf>,

    /// Supplied start values, keyed by variable name.
    pub start_values: HashMap<String, String>,
}

impl ManifestDescriptor {
    /// Fill run-dependent fields (timestamp, author, GUID) from the
    /// environment.
    pub fn new(
        model_id: String,
        model_name: String,
        tool_uri: String,
        aux_files: Vec<PathBuf>,
        start_values: HashMap<String, String>,
    ) -> Self {
        Self {
            model_id,
            model_name,
            timestamp: chrono::Local::now().format("%Y-%m-%dT%H:%M:%S").to_string(),
            author: std::env::var("USER")
                .or_else(|_| std::env::var("USERNAME"))
                .unwrap_or_else(|_| "unknown".to_string()),
            guid: uuid::Uuid::new_v4().to_string(),
            tool_uri,
            aux_files,
            start_values,
        }
    }

    /// Start value supplied for a variable, if any.
    fn start_value(&self, name: &str) -> Option<&str> {
        self.start_values.get(name).map(String::as_str)
    }
}

/// Render the complete manifest text for one schema version.
pub fn render(schema: SchemaVersion, descriptor: &ManifestDescriptor, allocation: &Allocation) -> String {
    let mut xml = match schema {
        SchemaVersion::V1 => fmi1::render_header(descriptor),
        SchemaVersion::V2 => fmi2::render_header(descriptor),
    };

    for var in allocation.all() {
        let node = match schema {
            SchemaVersion::V1 => fmi1::render_variable(schema, descriptor, var),
            SchemaVersion::V2 => fmi2::render_variable(schema, descriptor, var),
        };
        xml.push_str(&node);
    }

    match schema {
        SchemaVersion::V1 => xml.push_str(&fmi1::render_footer(descriptor)),
        SchemaVersion::V2 => xml.push_str(&fmi2::render_footer()),
    }

    xml
}

/// Render the manifest and write it into the working directory.
///
/// Returns the path of the written file. The only I/O at this layer is the
/// single write; a failure propagates as a filesystem error.
pub fn synthesize(
    ctx: &RunContext,
    descriptor: &ManifestDescriptor,
    allocation: &Allocation,
) -> Result<PathBuf> {
    let text = render(ctx.schema, descriptor, allocation);
    let path = ctx.work_path(MANIFEST_FILE_NAME);
    fs::write(&path, text)?;

    tracing::debug!(
        path = %path.display(),
        variables = allocation.len(),
        "wrote model description"
    );
    Ok(path)
}

/// Escape a string for use in an XML attribute value.
fn xml_escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Typed inner element of a scalar variable, e.g. `<Real start="0.5"/>`.
fn typed_element(descriptor: &ManifestDescriptor, var: &AllocatedVariable) -> String {
    match descriptor.start_value(&var.name) {
        Some(value) => format!(
            "<{} start=\"{}\"/>",
            var.ty.element_name(),
            xml_escape(value)
        ),
        None => format!("<{}/>", var.ty.element_name()),
    }
}

/// `<File file="fmu://resources/<basename>"/>` entries for the auxiliary
/// file list. Empty input renders as an empty string.
fn render_file_list(aux_files: &[PathBuf], indent: &str) -> String {
    if aux_files.is_empty() {
        return String::new();
    }

    let mut list = String::new();
    for file in aux_files {
        let base = file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        list.push_str(&format!(
            "\n{}\t<File file=\"fmu://resources/{}\"/>",
            indent,
            xml_escape(&base)
        ));
    }
    list
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::classify;
    use serde_json::json;

    fn descriptor() -> ManifestDescriptor {
        ManifestDescriptor {
            model_id: "Net1".to_string(),
            model_name: "udp-echo".to_string(),
            timestamp: "2026-08-28T12:00:00".to_string(),
            author: "tester".to_string(),
            guid: "0000-test-guid".to_string(),
            tool_uri: "file:///opt/simkit/runner".to_string(),
            aux_files: Vec::new(),
            start_values: HashMap::new(),
        }
    }

    fn simple_allocation() -> Allocation {
        let classified = classify(&json!({
            "RealInputs": ["x"],
            "IntegerOutputs": ["y"],
        }))
        .unwrap();
        crate::allocate::allocate(&classified)
    }

    #[test]
    fn causality_policy_differs_only_for_parameters() {
        assert_eq!(SchemaVersion::V1.causality(VarCategory::Input), "input");
        assert_eq!(SchemaVersion::V2.causality(VarCategory::Input), "input");
        assert_eq!(SchemaVersion::V1.causality(VarCategory::Parameter), "internal");
        assert_eq!(SchemaVersion::V2.causality(VarCategory::Parameter), "parameter");
    }

    #[test]
    fn variability_policy_matches_schema() {
        assert_eq!(SchemaVersion::V1.variability(VarCategory::Output), "discrete");
        assert_eq!(SchemaVersion::V1.variability(VarCategory::Parameter), "parameter");
        assert_eq!(SchemaVersion::V2.variability(VarCategory::Parameter), "fixed");
    }

    #[test]
    fn v2_manifest_contains_all_header_fields() {
        let xml = render(SchemaVersion::V2, &descriptor(), &simple_allocation());

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains("fmiVersion=\"2.0\""));
        assert!(xml.contains("modelName=\"udp-echo\""));
        assert!(xml.contains("modelIdentifier=\"Net1\""));
        assert!(xml.contains("guid=\"{0000-test-guid}\""));
        assert!(xml.contains("author=\"tester\""));
        assert!(xml.contains("generationDateAndTime=\"2026-08-28T12:00:00\""));
        assert!(xml.contains("executableURI=\"file:///opt/simkit/runner\""));
        assert!(xml.contains("arguments=\"udp-echo\""));
        assert!(xml.ends_with("</fmiModelDescription>"));
    }

    #[test]
    fn v1_manifest_uses_implementation_block() {
        let xml = render(SchemaVersion::V1, &descriptor(), &simple_allocation());

        assert!(xml.contains("fmiVersion=\"1.0\""));
        assert!(xml.contains("<Implementation>"));
        assert!(xml.contains("<CoSimulation_Tool>"));
        assert!(xml.contains("type=\"application/x-fmuforge\""));
        assert!(!xml.contains("<ModelStructure/>"));
    }

    #[test]
    fn no_dangling_placeholders_with_empty_aux_list() {
        for schema in [SchemaVersion::V1, SchemaVersion::V2] {
            let xml = render(schema, &descriptor(), &simple_allocation());
            assert!(!xml.contains("__"), "placeholder left in {} manifest", schema);
            assert!(!xml.contains("<File"));
        }
    }

    #[test]
    fn aux_files_render_one_element_per_file() {
        let mut d = descriptor();
        d.aux_files = vec![
            PathBuf::from("/data/weather.csv"),
            PathBuf::from("topology.json"),
        ];
        let xml = render(SchemaVersion::V2, &d, &simple_allocation());

        assert_eq!(xml.matches("<File ").count(), 2);
        assert!(xml.contains("fmu://resources/weather.csv"));
        assert!(xml.contains("fmu://resources/topology.json"));
    }

    #[test]
    fn start_value_renders_verbatim() {
        let mut d = descriptor();
        d.start_values.insert("x".to_string(), "0.25".to_string());
        let xml = render(SchemaVersion::V2, &d, &simple_allocation());

        assert!(xml.contains("<Real start=\"0.25\"/>"));
        // y has no start value: no empty start attribute.
        assert!(xml.contains("<Integer/>"));
        assert!(!xml.contains("start=\"\""));
    }

    #[test]
    fn output_start_value_marks_initial_exact_in_v2_only() {
        let mut d = descriptor();
        d.start_values.insert("y".to_string(), "0".to_string());

        let v2 = render(SchemaVersion::V2, &d, &simple_allocation());
        assert!(v2.contains("initial=\"exact\""));
        assert!(v2.contains("<Integer start=\"0\"/>"));

        let v1 = render(SchemaVersion::V1, &d, &simple_allocation());
        assert!(!v1.contains("initial="));
    }

    #[test]
    fn input_start_value_does_not_mark_initial() {
        let mut d = descriptor();
        d.start_values.insert("x".to_string(), "1.5".to_string());
        let xml = render(SchemaVersion::V2, &d, &simple_allocation());
        assert!(!xml.contains("initial="));
    }

    #[test]
    fn attribute_values_are_escaped() {
        let mut d = descriptor();
        d.model_name = "a<b&c".to_string();
        d.start_values.insert("x".to_string(), "\"2\"".to_string());
        let xml = render(SchemaVersion::V2, &d, &simple_allocation());

        assert!(xml.contains("modelName=\"a&lt;b&amp;c\""));
        assert!(xml.contains("start=\"&quot;2&quot;\""));
    }

    #[test]
    fn variable_nodes_carry_reference_and_markers() {
        let xml = render(SchemaVersion::V2, &descriptor(), &simple_allocation());

        assert!(xml.contains(
            "<ScalarVariable name=\"x\" valueReference=\"1\" variability=\"discrete\" causality=\"input\">"
        ));
        assert!(xml.contains(
            "<ScalarVariable name=\"y\" valueReference=\"1001\" variability=\"discrete\" causality=\"output\">"
        ));
    }
}
