use alloc::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// CONTRACT METADATA
// ================================================================================================

/// Signature information of a deployed contract version, as served by the platform.
///
/// ```json
/// { "contract": { "methods": { "setValues": { "params": [{ "name": "values", "type": "uint[]" }] } } } }
/// ```
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct ContractMetadata {
    pub contract: ContractDescriptor,
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct ContractDescriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default)]
    pub methods: BTreeMap<String, MethodDescriptor>,
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct MethodDescriptor {
    #[serde(default)]
    pub params: Vec<ParamDescriptor>,
}

/// A single declared method parameter.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ParamDescriptor {
    pub name: String,
    /// Raw type signature, e.g. `uint256` or `uint[3][]`.
    #[serde(rename = "type")]
    pub type_signature: String,
}

impl ParamDescriptor {
    pub fn new(name: impl Into<String>, type_signature: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_signature: type_signature.into(),
        }
    }
}

impl ContractMetadata {
    /// Returns the descriptor of the given method, if the contract declares it.
    pub fn method(&self, method_name: &str) -> Option<&MethodDescriptor> {
        self.contract.methods.get(method_name)
    }
}
