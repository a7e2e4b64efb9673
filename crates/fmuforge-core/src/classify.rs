//! Variable classification.
//!
//! The compiled script is run once with a discovery flag and writes a JSON
//! record listing its exposed variables under up to 12 labels
//! (`RealInputs`, `IntegerOutputs`, `BooleanParameters`, ...). This module
//! turns that record into three typed collections: inputs, outputs and
//! parameters.

use serde_json::Value;

use crate::error::{Error, Result};

/// FMI primitive type of a scalar variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    Real,
    Integer,
    Boolean,
    String,
}

impl PrimitiveType {
    /// All primitive types in canonical iteration order.
    ///
    /// Classification and allocation always walk types in this order,
    /// keeping value-reference assignment independent of JSON key order.
    pub const ALL: [PrimitiveType; 4] = [
        PrimitiveType::Real,
        PrimitiveType::Integer,
        PrimitiveType::Boolean,
        PrimitiveType::String,
    ];

    /// XML element name used for this type in the manifest.
    pub fn element_name(&self) -> &'static str {
        match self {
            PrimitiveType::Real => "Real",
            PrimitiveType::Integer => "Integer",
            PrimitiveType::Boolean => "Boolean",
            PrimitiveType::String => "String",
        }
    }
}

/// Causality category of a scalar variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarCategory {
    Input,
    Output,
    Parameter,
}

impl VarCategory {
    /// Metadata label suffix for this category.
    fn label_suffix(&self) -> &'static str {
        match self {
            VarCategory::Input => "Inputs",
            VarCategory::Output => "Outputs",
            VarCategory::Parameter => "Parameters",
        }
    }
}

/// Ordered variable names of one category, keyed by primitive type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypedNames {
    pub real: Vec<String>,
    pub integer: Vec<String>,
    pub boolean: Vec<String>,
    pub string: Vec<String>,
}

impl TypedNames {
    /// Iterate non-empty type groups in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (PrimitiveType, &[String])> {
        PrimitiveType::ALL
            .iter()
            .map(move |ty| (*ty, self.names(*ty)))
    }

    /// Names declared for one primitive type.
    pub fn names(&self, ty: PrimitiveType) -> &[String] {
        match ty {
            PrimitiveType::Real => &self.real,
            PrimitiveType::Integer => &self.integer,
            PrimitiveType::Boolean => &self.boolean,
            PrimitiveType::String => &self.string,
        }
    }

    fn names_mut(&mut self, ty: PrimitiveType) -> &mut Vec<String> {
        match ty {
            PrimitiveType::Real => &mut self.real,
            PrimitiveType::Integer => &mut self.integer,
            PrimitiveType::Boolean => &mut self.boolean,
            PrimitiveType::String => &mut self.string,
        }
    }

    /// Total number of variables in this category.
    pub fn len(&self) -> usize {
        self.real.len() + self.integer.len() + self.boolean.len() + self.string.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Result of classifying the discovery metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassifiedVariables {
    pub inputs: TypedNames,
    pub outputs: TypedNames,
    pub parameters: TypedNames,
}

impl ClassifiedVariables {
    /// Names of one category.
    pub fn category(&self, category: VarCategory) -> &TypedNames {
        match category {
            VarCategory::Input => &self.inputs,
            VarCategory::Output => &self.outputs,
            VarCategory::Parameter => &self.parameters,
        }
    }
}

/// Classify a discovery metadata record.
///
/// Labels that do not match one of the 12 recognized
/// `<PrimitiveType><Category>` forms are silently ignored. A non-object
/// root, a non-array label value or a non-string name is a classification
/// error.
pub fn classify(metadata: &Value) -> Result<ClassifiedVariables> {
    let Some(record) = metadata.as_object() else {
        return Err(Error::Classification(
            "metadata root is not a JSON object".to_string(),
        ));
    };

    let mut classified = ClassifiedVariables::default();

    for (label, value) in record {
        let Some((ty, category)) = parse_label(label) else {
            tracing::debug!(%label, "ignoring unrecognized metadata label");
            continue;
        };

        let names = value.as_array().ok_or_else(|| {
            Error::Classification(format!("label '{}' does not map to an array", label))
        })?;

        let target = match category {
            VarCategory::Input => &mut classified.inputs,
            VarCategory::Output => &mut classified.outputs,
            VarCategory::Parameter => &mut classified.parameters,
        };
        let list = target.names_mut(ty);

        for name in names {
            let name = name.as_str().ok_or_else(|| {
                Error::Classification(format!("label '{}' contains a non-string name", label))
            })?;
            list.push(name.to_string());
        }
    }

    Ok(classified)
}

/// Split a metadata label into primitive type and category.
///
/// The primitive type is recovered by stripping the category suffix.
fn parse_label(label: &str) -> Option<(PrimitiveType, VarCategory)> {
    for category in [VarCategory::Input, VarCategory::Output, VarCategory::Parameter] {
        let Some(type_part) = label.strip_suffix(category.label_suffix()) else {
            continue;
        };
        let ty = match type_part {
            "Real" => PrimitiveType::Real,
            "Integer" => PrimitiveType::Integer,
            "Boolean" => PrimitiveType::Boolean,
            "String" => PrimitiveType::String,
            _ => return None,
        };
        return Some((ty, category));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn classifies_all_twelve_labels() {
        let metadata = json!({
            "RealInputs": ["u1", "u2"],
            "IntegerInputs": ["n"],
            "BooleanInputs": ["flag"],
            "StringInputs": ["tag"],
            "RealOutputs": ["y"],
            "IntegerOutputs": ["count"],
            "BooleanOutputs": ["done"],
            "StringOutputs": ["status"],
            "RealParameters": ["gain"],
            "IntegerParameters": ["seed"],
            "BooleanParameters": ["enabled"],
            "StringParameters": ["mode"],
        });

        let classified = classify(&metadata).expect("classification failed");
        assert_eq!(classified.inputs.real, vec!["u1", "u2"]);
        assert_eq!(classified.inputs.len(), 5);
        assert_eq!(classified.outputs.len(), 4);
        assert_eq!(classified.parameters.string, vec!["mode"]);
    }

    #[test]
    fn unrecognized_labels_are_ignored() {
        let metadata = json!({
            "RealInputs": ["u"],
            "ComplexInputs": ["z"],
            "Notes": "free text",
        });

        let classified = classify(&metadata).expect("classification failed");
        assert_eq!(classified.inputs.real, vec!["u"]);
        assert!(classified.outputs.is_empty());
        assert!(classified.parameters.is_empty());
    }

    #[test]
    fn non_object_root_is_an_error() {
        let err = classify(&json!(["RealInputs"])).unwrap_err();
        assert!(matches!(err, Error::Classification(_)));
        assert_eq!(err.exit_code(), 10);
    }

    #[test]
    fn non_array_label_is_an_error() {
        let err = classify(&json!({ "RealInputs": "u" })).unwrap_err();
        assert!(matches!(err, Error::Classification(_)));
    }

    #[test]
    fn non_string_name_is_an_error() {
        let err = classify(&json!({ "RealInputs": ["u", 7] })).unwrap_err();
        assert!(matches!(err, Error::Classification(_)));
    }

    #[test]
    fn declaration_order_is_preserved() {
        let metadata = json!({ "StringParameters": ["c", "a", "b"] });
        let classified = classify(&metadata).expect("classification failed");
        assert_eq!(classified.parameters.string, vec!["c", "a", "b"]);
    }
}
