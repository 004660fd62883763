//! Parsing of bracket-notation type signatures such as `uint[3][40][]`.
//!
//! A signature is a base type followed by any number of `[]` or `[n]` groups. The rightmost group
//! is the outermost array dimension, so dimensions are returned outermost-first: index `0` is the
//! last bracket group in the string and the highest index is the group next to the base type.

use core::fmt;

use crate::errors::ValidationError;

const UINT_PREFIX: &str = "uint";

// DIMENSION CONSTRAINT
// ================================================================================================

/// Length restriction of a single array dimension.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DimensionConstraint {
    /// Dynamically sized dimension (`[]`).
    NoConstraint,
    /// Dimension that must hold exactly this many elements (`[n]`).
    FixedLength(usize),
}

impl fmt::Display for DimensionConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DimensionConstraint::NoConstraint => write!(f, "[]"),
            DimensionConstraint::FixedLength(length) => write!(f, "[{length}]"),
        }
    }
}

// SIGNATURE HELPERS
// ================================================================================================

/// Returns true if the type signature denotes an array, i.e. it ends with `]`.
pub fn is_array_type(type_signature: &str) -> bool {
    type_signature.ends_with(']')
}

/// Returns the number of bracket groups in the type signature.
pub fn count_dimensions(type_signature: &str) -> usize {
    type_signature.matches('[').count()
}

/// Returns true if the base type of the signature is an unsigned integer.
pub fn is_uint_type(type_signature: &str) -> bool {
    type_signature.starts_with(UINT_PREFIX)
}

/// Parses the per-dimension length constraints of a type signature, outermost dimension first.
///
/// The signature is reversed with `[` and `]` swapped, which turns the outermost group into the
/// first group of the reversed string. Groups are then consumed left to right.
///
/// # Errors
/// Returns [ValidationError::InvalidTypeSignature] if a bracket group is not closed or holds
/// something other than a non-negative decimal length.
pub fn parse_dimensions(type_signature: &str) -> Result<Vec<DimensionConstraint>, ValidationError> {
    let reversed: String = type_signature
        .chars()
        .rev()
        .map(|c| match c {
            '[' => ']',
            ']' => '[',
            c => c,
        })
        .collect();

    let dimension_count = count_dimensions(type_signature);
    let mut dimensions = Vec::with_capacity(dimension_count);
    let mut remaining = reversed.as_str();

    for _ in 0..dimension_count {
        let open = remaining
            .find('[')
            .ok_or_else(|| invalid_signature(type_signature, "unbalanced brackets"))?;
        let close = remaining[open..]
            .find(']')
            .map(|offset| open + offset)
            .ok_or_else(|| invalid_signature(type_signature, "unclosed bracket group"))?;

        let segment = &remaining[open + 1..close];
        if segment.is_empty() {
            dimensions.push(DimensionConstraint::NoConstraint);
        } else {
            // the reversal also reversed the digits of the length
            let length: String = segment.chars().rev().collect();
            let length = length.parse::<usize>().map_err(|err| {
                invalid_signature(type_signature, &format!("invalid length `{length}`: {err}"))
            })?;
            dimensions.push(DimensionConstraint::FixedLength(length));
        }

        remaining = &remaining[close + 1..];
    }

    Ok(dimensions)
}

fn invalid_signature(type_signature: &str, reason: &str) -> ValidationError {
    ValidationError::InvalidTypeSignature {
        type_signature: type_signature.to_string(),
        reason: reason.to_string(),
    }
}

// TESTS
// ================================================================================================
