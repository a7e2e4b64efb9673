//! Value-reference allocation.
//!
//! Assigns every classified variable a unique integer value reference under
//! a fixed banding rule: inputs from 1, outputs from 1001, parameters from
//! 2001. A band's actual start is the larger of its nominal floor and one
//! past the previous band's last assigned reference, so bands never overlap
//! even for very large variable sets.

use crate::classify::{ClassifiedVariables, PrimitiveType, TypedNames, VarCategory};

/// Nominal band floors per category.
const INPUT_FLOOR: u32 = 1;
const OUTPUT_FLOOR: u32 = 1001;
const PARAMETER_FLOOR: u32 = 2001;

/// A variable with its assigned value reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocatedVariable {
    pub name: String,
    pub ty: PrimitiveType,
    pub category: VarCategory,
    pub value_reference: u32,
}

/// Allocator output: ordered variables per category.
#[derive(Debug, Clone, Default)]
pub struct Allocation {
    pub inputs: Vec<AllocatedVariable>,
    pub outputs: Vec<AllocatedVariable>,
    pub parameters: Vec<AllocatedVariable>,
}

impl Allocation {
    /// All allocated variables in manifest order (inputs, outputs, parameters).
    pub fn all(&self) -> impl Iterator<Item = &AllocatedVariable> {
        self.inputs
            .iter()
            .chain(self.outputs.iter())
            .chain(self.parameters.iter())
    }

    /// Total number of allocated variables.
    pub fn len(&self) -> usize {
        self.inputs.len() + self.outputs.len() + self.parameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Assign value references to all classified variables.
///
/// Deterministic: the same classified input always yields the same
/// references. Types are walked in canonical order, names in declaration
/// order.
pub fn allocate(classified: &ClassifiedVariables) -> Allocation {
    let mut allocation = Allocation::default();

    let mut next = INPUT_FLOOR;
    next = allocate_category(
        &classified.inputs,
        VarCategory::Input,
        next,
        &mut allocation.inputs,
    );

    next = next.max(OUTPUT_FLOOR);
    next = allocate_category(
        &classified.outputs,
        VarCategory::Output,
        next,
        &mut allocation.outputs,
    );

    next = next.max(PARAMETER_FLOOR);
    allocate_category(
        &classified.parameters,
        VarCategory::Parameter,
        next,
        &mut allocation.parameters,
    );

    allocation
}

/// Allocate one category starting at `next`; returns one past the last
/// assigned reference.
fn allocate_category(
    names: &TypedNames,
    category: VarCategory,
    mut next: u32,
    out: &mut Vec<AllocatedVariable>,
) -> u32 {
    for (ty, type_names) in names.iter() {
        for name in type_names {
            out.push(AllocatedVariable {
                name: name.clone(),
                ty,
                category,
                value_reference: next,
            });
            next += 1;
        }
    }
    next
}
