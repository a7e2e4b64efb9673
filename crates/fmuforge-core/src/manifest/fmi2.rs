//! FMI 2.0 manifest structure.
//!
//! `CoSimulation` element in the header, auxiliary files inside the vendor
//! annotation, outputs with a start value marked `initial="exact"`, and an
//! empty `ModelStructure` footer.

use super::{render_file_list, typed_element, xml_escape, ManifestDescriptor, SchemaVersion};
use crate::allocate::AllocatedVariable;
use crate::classify::VarCategory;

pub(super) fn render_header(d: &ManifestDescriptor) -> String {
    let mut xml = String::new();
    xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    xml.push_str("<fmiModelDescription\n");
    xml.push_str("\txmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\"\n");
    xml.push_str("\tfmiVersion=\"2.0\"\n");
    xml.push_str(&format!("\tmodelName=\"{}\"\n", xml_escape(&d.model_name)));
    xml.push_str(&format!("\tguid=\"{{{}}}\"\n", xml_escape(&d.guid)));
    xml.push_str("\tgenerationTool=\"fmuforge\"\n");
    xml.push_str(&format!("\tauthor=\"{}\"\n", xml_escape(&d.author)));
    xml.push_str(&format!(
        "\tgenerationDateAndTime=\"{}\"\n",
        xml_escape(&d.timestamp)
    ));
    xml.push_str("\tvariableNamingConvention=\"flat\"\n");
    xml.push_str("\tnumberOfEventIndicators=\"0\">\n");
    xml.push_str("\t<CoSimulation\n");
    xml.push_str(&format!(
        "\t\tmodelIdentifier=\"{}\"\n",
        xml_escape(&d.model_id)
    ));
    xml.push_str("\t\tneedsExecutionTool=\"true\"\n");
    xml.push_str("\t\tcanHandleVariableCommunicationStepSize=\"false\"\n");
    xml.push_str("\t\tcanNotUseMemoryManagementFunctions=\"true\"\n");
    xml.push_str("\t\tcanInterpolateInputs=\"false\"\n");
    xml.push_str("\t\tmaxOutputDerivativeOrder=\"0\"\n");
    xml.push_str("\t\tcanGetAndSetFMUstate=\"false\"\n");
    xml.push_str("\t\tprovidesDirectionalDerivative=\"false\"/>\n");
    xml.push_str("\t<VendorAnnotations>\n");
    xml.push_str("\t\t<Tool name=\"fmuforge\">\n");
    xml.push_str(&format!(
        "\t\t\t<Executable\n\t\t\t\texecutableURI=\"{}\"\n\t\t\t\tpreArguments=\"--run\"\n\t\t\t\targuments=\"{}\"/>{}\n",
        xml_escape(&d.tool_uri),
        xml_escape(&d.model_name),
        render_file_list(&d.aux_files, "\t\t"),
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
    // Only outputs with a supplied start value carry the exact-initial marker.
    let initial = if var.category == VarCategory::Output
        && d.start_values.contains_key(&var.name)
    {
        " initial=\"exact\""
    } else {
        ""
    };

    format!(
        "\t\t<ScalarVariable name=\"{}\" valueReference=\"{}\" variability=\"{}\" causality=\"{}\"{}>\n\
         \t\t\t{}\n\
         \t\t</ScalarVariable>\n",
        xml_escape(&var.name),
        var.value_reference,
        schema.variability(var.category),
        schema.causality(var.category),
        initial,
        typed_element(d, var),
    )
}

pub(super) fn render_footer() -> String {
    "\t</ModelVariables>\n\t<ModelStructure/>\n</fmiModelDescription>".to_string()
}
