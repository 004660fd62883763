use tracing::{debug, warn};

use super::{
    constraints::{DimensionConstraints, MethodConstraints},
    signature::DimensionConstraint,
    value::{ArgumentValue, Arguments, UintClass},
};
use crate::errors::ValidationError;

// ARGUMENT VALIDATION
// ================================================================================================

/// Validates the arguments of a call to `method_name` against the method's constraints.
///
/// Methods without declared constraints accept any arguments, as do arguments that match no
/// restricted parameter. Arguments are checked in parameter-name order, not in the order the
/// caller supplied them, and validation stops at the first violation. When several arguments are
/// invalid, the reported error is the one for the alphabetically first parameter.
///
/// An argument for a parameter whose declared type signature is malformed is rejected with
/// [ValidationError::InvalidTypeSignature]. Other methods of the contract are unaffected.
pub fn validate_params(
    method_name: &str,
    inputs: &Arguments,
    constraints: &MethodConstraints,
) -> Result<(), ValidationError> {
    let Some(method_constraint) = constraints.get(method_name) else {
        debug!(method = method_name, "no constraints declared, skipping validation");
        return Ok(());
    };

    for (name, value) in inputs {
        let result = if let Some(err) = method_constraint.invalid_param(name) {
            Err(err.clone())
        } else if method_constraint.is_uint_param(name) {
            validate_uint(name, value)
        } else if let Some(dimensions) = method_constraint.array_param(name) {
            validate_array(value, name, dimensions, 0)
        } else {
            Ok(())
        };

        if let Err(err) = result {
            warn!(method = method_name, param = name.as_str(), "argument validation failed: {err}");
            return Err(err);
        }
    }

    Ok(())
}

/// Checks that a bare parameter holds a non-negative integer.
pub fn validate_uint(param: &str, value: &ArgumentValue) -> Result<(), ValidationError> {
    match value.uint_class() {
        UintClass::Unsigned => Ok(()),
        UintClass::Negative => Err(ValidationError::NotNonNegative { param: param.to_string() }),
        UintClass::NotWhole => Err(ValidationError::NotInteger { param: param.to_string() }),
    }
}

/// Checks an array argument against its dimension constraints, starting at nesting `level`.
///
/// Each nesting level must respect the fixed length declared for it, hold siblings of a single
/// kind, and not nest deeper than the declared dimensions. Scalar elements of a `uint` array must
/// be non-negative integers.
pub fn validate_array(
    value: &ArgumentValue,
    param: &str,
    dimensions: &DimensionConstraints,
    level: usize,
) -> Result<(), ValidationError> {
    let elements = value.as_sequence().ok_or_else(|| ValidationError::NotAnArray {
        param: param.to_string(),
        found: value.kind(),
    })?;

    let constraint = dimensions
        .get(level)
        .ok_or_else(|| ValidationError::TooManyDimensions { param: param.to_string(), level })?;

    if let DimensionConstraint::FixedLength(expected) = constraint {
        if elements.len() != expected {
            return Err(ValidationError::ArrayLengthMismatch {
                param: param.to_string(),
                expected,
                actual: elements.len(),
            });
        }
    }

    for pair in elements.windows(2) {
        let (first, second) = (pair[0].kind(), pair[1].kind());
        if first != second {
            return Err(ValidationError::ArrayElementTypeMismatch {
                param: param.to_string(),
                first,
                second,
            });
        }
    }

    for element in elements {
        match element {
            ArgumentValue::Sequence(_) => validate_array(element, param, dimensions, level + 1)?,
            _ if dimensions.contains_uint() => validate_array_element(param, element)?,
            _ => {},
        }
    }

    Ok(())
}

fn validate_array_element(param: &str, element: &ArgumentValue) -> Result<(), ValidationError> {
    match element.uint_class() {
        UintClass::Unsigned => Ok(()),
        UintClass::Negative => {
            Err(ValidationError::ArrayElementNotUint { param: param.to_string() })
        },
        UintClass::NotWhole => Err(ValidationError::ArrayElementNotInt { param: param.to_string() }),
    }
}

// TESTS
// ================================================================================================
