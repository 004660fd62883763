use alloc::collections::BTreeMap;
use core::fmt;

use serde::{ser::SerializeMap, ser::SerializeSeq, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Number, Value};

/// Arguments of a single method call, keyed by parameter name.
pub type Arguments = BTreeMap<String, ArgumentValue>;

// ARGUMENT VALUE
// ================================================================================================

/// A caller-supplied argument for a contract method.
///
/// Values arrive as untyped JSON, so they are modelled as a closed set of variants. Element type
/// checks compare [ValueKind]s instead of inspecting the payload.
#[derive(Clone, Debug, PartialEq)]
pub enum ArgumentValue {
    Null,
    Bool(bool),
    Integer(i128),
    Float(f64),
    String(String),
    Sequence(Vec<ArgumentValue>),
    Mapping(BTreeMap<String, ArgumentValue>),
}

impl ArgumentValue {
    /// Returns the runtime kind of this value. Integers and floats share [ValueKind::Number].
    pub fn kind(&self) -> ValueKind {
        match self {
            ArgumentValue::Null => ValueKind::Null,
            ArgumentValue::Bool(_) => ValueKind::Bool,
            ArgumentValue::Integer(_) | ArgumentValue::Float(_) => ValueKind::Number,
            ArgumentValue::String(_) => ValueKind::String,
            ArgumentValue::Sequence(_) => ValueKind::Sequence,
            ArgumentValue::Mapping(_) => ValueKind::Mapping,
        }
    }

    pub fn as_sequence(&self) -> Option<&[ArgumentValue]> {
        match self {
            ArgumentValue::Sequence(elements) => Some(elements),
            _ => None,
        }
    }

    /// Classifies the value against the unsigned integer constraint.
    pub(crate) fn uint_class(&self) -> UintClass {
        match self {
            ArgumentValue::Integer(value) if *value < 0 => UintClass::Negative,
            ArgumentValue::Integer(_) => UintClass::Unsigned,
            ArgumentValue::Float(value) if !value.is_finite() || value.fract() != 0.0 => {
                UintClass::NotWhole
            },
            ArgumentValue::Float(value) if *value < 0.0 => UintClass::Negative,
            ArgumentValue::Float(_) => UintClass::Unsigned,
            _ => UintClass::NotWhole,
        }
    }
}

/// Outcome of checking a value against the unsigned integer constraint.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum UintClass {
    Unsigned,
    Negative,
    NotWhole,
}

// VALUE KIND
// ================================================================================================

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ValueKind {
    Null,
    Bool,
    Number,
    String,
    Sequence,
    Mapping,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::Null => write!(f, "null"),
            ValueKind::Bool => write!(f, "boolean"),
            ValueKind::Number => write!(f, "number"),
            ValueKind::String => write!(f, "string"),
            ValueKind::Sequence => write!(f, "array"),
            ValueKind::Mapping => write!(f, "object"),
        }
    }
}

// CONVERSIONS
// ================================================================================================

impl From<Value> for ArgumentValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => ArgumentValue::Null,
            Value::Bool(value) => ArgumentValue::Bool(value),
            Value::Number(number) => number_to_argument(&number),
            Value::String(value) => ArgumentValue::String(value),
            Value::Array(elements) => {
                ArgumentValue::Sequence(elements.into_iter().map(ArgumentValue::from).collect())
            },
            Value::Object(entries) => ArgumentValue::Mapping(
                entries.into_iter().map(|(key, value)| (key, ArgumentValue::from(value))).collect(),
            ),
        }
    }
}

impl From<&ArgumentValue> for Value {
    fn from(value: &ArgumentValue) -> Self {
        match value {
            ArgumentValue::Null => Value::Null,
            ArgumentValue::Bool(value) => Value::Bool(*value),
            ArgumentValue::Integer(value) => {
                if let Ok(value) = i64::try_from(*value) {
                    Value::from(value)
                } else if let Ok(value) = u64::try_from(*value) {
                    Value::from(value)
                } else {
                    Value::String(value.to_string())
                }
            },
            ArgumentValue::Float(value) => Number::from_f64(*value).map_or(Value::Null, Value::Number),
            ArgumentValue::String(value) => Value::String(value.clone()),
            ArgumentValue::Sequence(elements) => {
                Value::Array(elements.iter().map(Value::from).collect())
            },
            ArgumentValue::Mapping(entries) => Value::Object(
                entries.iter().map(|(key, value)| (key.clone(), Value::from(value))).collect(),
            ),
        }
    }
}

impl From<u64> for ArgumentValue {
    fn from(value: u64) -> Self {
        ArgumentValue::Integer(value.into())
    }
}

impl From<i64> for ArgumentValue {
    fn from(value: i64) -> Self {
        ArgumentValue::Integer(value.into())
    }
}

impl From<&str> for ArgumentValue {
    fn from(value: &str) -> Self {
        ArgumentValue::String(value.to_string())
    }
}

fn number_to_argument(number: &Number) -> ArgumentValue {
    if let Some(value) = number.as_i64() {
        ArgumentValue::Integer(value.into())
    } else if let Some(value) = number.as_u64() {
        ArgumentValue::Integer(value.into())
    } else {
        ArgumentValue::Float(number.as_f64().unwrap_or(f64::NAN))
    }
}

// SERIALIZATION
// ================================================================================================

impl Serialize for ArgumentValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ArgumentValue::Null => serializer.serialize_unit(),
            ArgumentValue::Bool(value) => serializer.serialize_bool(*value),
            ArgumentValue::Integer(value) => {
                if let Ok(value) = i64::try_from(*value) {
                    serializer.serialize_i64(value)
                } else if let Ok(value) = u64::try_from(*value) {
                    serializer.serialize_u64(value)
                } else {
                    serializer.serialize_i128(*value)
                }
            },
            ArgumentValue::Float(value) => serializer.serialize_f64(*value),
            ArgumentValue::String(value) => serializer.serialize_str(value),
            ArgumentValue::Sequence(elements) => {
                let mut seq = serializer.serialize_seq(Some(elements.len()))?;
                for element in elements {
                    seq.serialize_element(element)?;
                }
                seq.end()
            },
            ArgumentValue::Mapping(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            },
        }
    }
}

impl<'de> Deserialize<'de> for ArgumentValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(ArgumentValue::from)
    }
}

// TESTS
// ================================================================================================
