//! Validation of method arguments against contract metadata.
//!
//! Contract metadata declares a type signature for every method parameter. Before a method is
//! invoked, [MethodConstraints] are extracted from that metadata and the caller's arguments are
//! checked against them: bare `uint` parameters must be non-negative integers, and array
//! parameters must match the declared nesting depth, fixed lengths and element types.
//!
//! ```
//! # use contract_client::validation::{validate_arguments, Arguments, ContractMetadata};
//! let metadata: ContractMetadata = serde_json::from_str(
//!     r#"{"contract": {"methods": {"store": {"params": [{"name": "grid", "type": "uint[2][]"}]}}}}"#,
//! )
//! .unwrap();
//!
//! let inputs: Arguments = serde_json::from_str(r#"{"grid": [[1, 2], [3, 4]]}"#).unwrap();
//! assert!(validate_arguments("store", &inputs, &metadata).is_ok());
//!
//! let inputs: Arguments = serde_json::from_str(r#"{"grid": [[1, 2, 3]]}"#).unwrap();
//! assert!(validate_arguments("store", &inputs, &metadata).is_err());
//! ```

mod constraints;
mod metadata;
mod signature;
mod validator;
mod value;

pub use constraints::{DimensionConstraints, MethodConstraints, ParameterConstraint};
pub use metadata::{ContractDescriptor, ContractMetadata, MethodDescriptor, ParamDescriptor};
pub use signature::{
    count_dimensions, is_array_type, is_uint_type, parse_dimensions, DimensionConstraint,
};
pub use validator::{validate_array, validate_params, validate_uint};
pub use value::{ArgumentValue, Arguments, ValueKind};

use crate::errors::ValidationError;

/// Extracts the constraints declared by `metadata` and validates `inputs` for `method_name`.
pub fn validate_arguments(
    method_name: &str,
    inputs: &Arguments,
    metadata: &ContractMetadata,
) -> Result<(), ValidationError> {
    let constraints = MethodConstraints::from_metadata(metadata);
    validate_params(method_name, inputs, &constraints)
}
