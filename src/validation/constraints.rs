use alloc::collections::BTreeMap;

use tracing::{debug, warn};

use super::{
    metadata::ContractMetadata,
    signature::{is_array_type, is_uint_type, parse_dimensions, DimensionConstraint},
};
use crate::errors::ValidationError;

// DIMENSION CONSTRAINTS
// ================================================================================================

/// Per-dimension restrictions of an array parameter.
///
/// Dimension `0` is the outermost array; each deeper nesting level uses the next index.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DimensionConstraints {
    dimensions: Vec<DimensionConstraint>,
    contains_uint: bool,
}

impl DimensionConstraints {
    pub fn new(dimensions: Vec<DimensionConstraint>, contains_uint: bool) -> Self {
        Self { dimensions, contains_uint }
    }

    /// Returns the constraint of the given nesting level, or `None` if the declared type has
    /// fewer dimensions.
    pub fn get(&self, level: usize) -> Option<DimensionConstraint> {
        self.dimensions.get(level).copied()
    }

    pub fn num_dimensions(&self) -> usize {
        self.dimensions.len()
    }

    /// Returns true if the innermost elements must be unsigned integers.
    pub fn contains_uint(&self) -> bool {
        self.contains_uint
    }

    pub fn iter(&self) -> impl Iterator<Item = &DimensionConstraint> {
        self.dimensions.iter()
    }
}

// PARAMETER CONSTRAINT
// ================================================================================================

/// Restricted parameters of a single method. Parameters without a restriction are not tracked.
///
/// Parameters whose declared array type could not be parsed keep the parse error, which is
/// reported when an argument for that parameter is validated.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ParameterConstraint {
    uint_params: Vec<String>,
    array_params: BTreeMap<String, DimensionConstraints>,
    invalid_params: BTreeMap<String, ValidationError>,
}

impl ParameterConstraint {
    /// Names of the parameters declared as bare unsigned integers, in declaration order.
    pub fn uint_params(&self) -> &[String] {
        &self.uint_params
    }

    pub fn array_params(&self) -> &BTreeMap<String, DimensionConstraints> {
        &self.array_params
    }

    pub fn is_uint_param(&self, name: &str) -> bool {
        self.uint_params.iter().any(|param| param == name)
    }

    pub fn array_param(&self, name: &str) -> Option<&DimensionConstraints> {
        self.array_params.get(name)
    }

    /// Returns the parse error of the parameter's declared type, if it is malformed.
    pub fn invalid_param(&self, name: &str) -> Option<&ValidationError> {
        self.invalid_params.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.uint_params.is_empty() && self.array_params.is_empty() && self.invalid_params.is_empty()
    }
}

// METHOD CONSTRAINTS
// ================================================================================================

/// Parameter restrictions of every method of a contract, derived from its metadata.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct MethodConstraints {
    methods: BTreeMap<String, ParameterConstraint>,
}

impl MethodConstraints {
    /// Extracts the parameter restrictions declared by the contract metadata.
    ///
    /// A parameter whose type signature is an array gets per-dimension constraints. A bare
    /// parameter of `uint` base type must be a non-negative integer. Everything else is left
    /// unrestricted. A malformed array type signature only affects its own parameter.
    pub fn from_metadata(metadata: &ContractMetadata) -> Self {
        let mut methods = BTreeMap::new();

        for (method_name, method) in &metadata.contract.methods {
            let mut constraint = ParameterConstraint::default();

            for param in &method.params {
                let is_uint = is_uint_type(&param.type_signature);

                if is_array_type(&param.type_signature) {
                    match parse_dimensions(&param.type_signature) {
                        Ok(dimensions) => {
                            constraint.array_params.insert(
                                param.name.clone(),
                                DimensionConstraints::new(dimensions, is_uint),
                            );
                        },
                        Err(err) => {
                            warn!(
                                method = method_name.as_str(),
                                param = param.name.as_str(),
                                "malformed type signature: {err}"
                            );
                            constraint.invalid_params.insert(param.name.clone(), err);
                        },
                    }
                } else if is_uint {
                    constraint.uint_params.push(param.name.clone());
                }
            }

            debug!(
                method = method_name.as_str(),
                uint_params = constraint.uint_params.len(),
                array_params = constraint.array_params.len(),
                "extracted parameter constraints"
            );
            methods.insert(method_name.clone(), constraint);
        }

        Self { methods }
    }

    /// Returns the constraints of the given method, if the contract declares it.
    pub fn get(&self, method_name: &str) -> Option<&ParameterConstraint> {
        self.methods.get(method_name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ParameterConstraint)> {
        self.methods.iter()
    }
}

// TESTS
// ================================================================================================
