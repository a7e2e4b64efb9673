//! FMI 1.0 manifest structure.
//!
//! Tool-coupling layout: the run tool lives in a `VendorAnnotations` block,
//! auxiliary files and capabilities in a trailing `Implementation` block.

use super::{render_file_list, typed_element, xml_escape, ManifestDescriptor, SchemaVersion};
use crate::allocate::AllocatedVariable;

pub(super) fn render_header(d: &ManifestDescriptor) -> String {
    let mut xml = String::new();
    xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    xml.push_str(&format!(
        "<fmiModelDescription fmiVersion=\"1.0\" modelName=\"{}\" modelIdentifier=\"{}\" \
         description=\"fmuforge co-simulation export\" generationTool=\"fmuforge\" \
         generationDateAndTime=\"{}\" variableNamingConvention=\"flat\" \
         numberOfContinuousStates=\"0\" numberOfEventIndicators=\"0\" author=\"{}\" guid=\"{{{}}}\">\n",
        xml_escape(&d.model_name),
        xml_escape(&d.model_id),
        xml_escape(&d.timestamp),
        xml_escape(&d.author),
        xml_escape(&d.guid),
    ));
    xml.push_str("\t<VendorAnnotations>\n");
    xml.push_str("\t\t<Tool name=\"fmuforge\">\n");
    xml.push_str(&format!(
        "\t\t\t<Executable preArguments=\"--run\" arguments=\"{}\" executableURI=\"{}\"/>\n",
        xml_escape(&d.model_name),
        xml_escape(&d.tool_uri),
    ));
    xml.push_str("\t\t</Tool>\n");
    xml.push_str("\t</VendorAnnotations>\n");
    xml.push_str("\t<ModelVariables>\n");
    xml
}

pub(super) fn render_variable(
    schema: SchemaVersion,
    d: &ManifestDescriptor,
    var: &AllocatedVariable,
) -> String {
    format!(
        "\t\t<ScalarVariable name=\"{}\" valueReference=\"{}\" variability=\"{}\" causality=\"{}\">\n\
         \t\t\t{}\n\
         \t\t</ScalarVariable>\n",
        xml_escape(&var.name),
        var.value_reference,
        schema.variability(var.category),
        schema.causality(var.category),
        typed_element(d, var),
    )
}

pub(super) fn render_footer(d: &ManifestDescriptor) -> String {
    let mut xml = String::new();
    xml.push_str("\t</ModelVariables>\n");
    xml.push_str("\t<Implementation>\n");
    xml.push_str("\t\t<CoSimulation_Tool>\n");
    xml.push_str(
        "\t\t\t<Capabilities canHandleVariableCommunicationStepSize=\"true\" \
         canHandleEvents=\"true\" canRejectSteps=\"false\" canInterpolateInputs=\"false\" \
         maxOutputDerivativeOrder=\"0\" canRunAsynchronuously=\"false\" \
         canBeInstantiatedOnlyOncePerProcess=\"true\" canNotUseMemoryManagementFunctions=\"true\"/>\n",
    );
    xml.push_str(&format!(
        "\t\t\t<Model entryPoint=\"\" manualStart=\"false\" type=\"application/x-fmuforge\">{}\n",
        render_file_list(&d.aux_files, "\t\t\t"),
    ));
    xml.push_str("\t\t\t</Model>\n");
    xml.push_str("\t\t</CoSimulation_Tool>\n");
    xml.push_str("\t</Implementation>\n");
    xml.push_str("</fmiModelDescription>");
    xml
}
