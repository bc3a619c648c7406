// Typed parameter values as the driver node receives them

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ParamsError;

/// A single ROS-style parameter value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParameterValue {
    Bool(bool),
    Integer(i64),
    Double(f64),
    String(String),
    Array(Vec<ParameterValue>),
}

impl ParameterValue {
    /// Infer the typed value of a textual launch argument.
    ///
    /// Launch arguments always arrive as text. They are typed once, the way
    /// launch substitutions become parameters: the text is read as a YAML
    /// scalar. Null reads as an empty string; anything that is not a scalar
    /// or does not parse stays the raw text.
    pub fn from_launch_string(raw: &str) -> Self {
        let raw_string = || ParameterValue::String(raw.to_string());
        match serde_yaml::from_str::<serde_yaml::Value>(raw) {
            Ok(serde_yaml::Value::Null) => ParameterValue::String(String::new()),
            Ok(serde_yaml::Value::Sequence(_)) | Ok(serde_yaml::Value::Mapping(_)) => raw_string(),
            Ok(scalar) => ParameterValue::from_yaml(raw, &scalar).unwrap_or_else(|_| raw_string()),
            Err(_) => raw_string(),
        }
    }

    /// Convert a YAML node from a parameter document.
    ///
    /// `key` is only used for error reporting.
    pub fn from_yaml(key: &str, value: &serde_yaml::Value) -> Result<Self, ParamsError> {
        match value {
            serde_yaml::Value::Bool(b) => Ok(ParameterValue::Bool(*b)),
            serde_yaml::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(ParameterValue::Integer(i))
                } else if let Some(f) = n.as_f64() {
                    Ok(ParameterValue::Double(f))
                } else {
                    Err(ParamsError::UnsupportedValue {
                        key: key.to_string(),
                        reason: format!("number {n} does not fit a 64-bit parameter"),
                    })
                }
            }
            serde_yaml::Value::String(s) => Ok(ParameterValue::String(s.clone())),
            serde_yaml::Value::Sequence(items) => items
                .iter()
                .map(|item| match item {
                    serde_yaml::Value::Sequence(_) | serde_yaml::Value::Mapping(_) => {
                        Err(ParamsError::UnsupportedValue {
                            key: key.to_string(),
                            reason: "arrays may only contain scalar values".to_string(),
                        })
                    }
                    other => ParameterValue::from_yaml(key, other),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(ParameterValue::Array),
            serde_yaml::Value::Tagged(tagged) => ParameterValue::from_yaml(key, &tagged.value),
            serde_yaml::Value::Null => Err(ParamsError::UnsupportedValue {
                key: key.to_string(),
                reason: "null is not a valid parameter value".to_string(),
            }),
            serde_yaml::Value::Mapping(_) => Err(ParamsError::UnsupportedValue {
                key: key.to_string(),
                reason: "nested mappings must be flattened before conversion".to_string(),
            }),
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ParameterValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParameterValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            ParameterValue::Bool(_) => "bool",
            ParameterValue::Integer(_) => "integer",
            ParameterValue::Double(_) => "double",
            ParameterValue::String(_) => "string",
            ParameterValue::Array(_) => "array",
        }
    }
}

impl fmt::Display for ParameterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterValue::Bool(b) => write!(f, "{b}"),
            ParameterValue::Integer(i) => write!(f, "{i}"),
            ParameterValue::Double(d) => write!(f, "{d:?}"),
            ParameterValue::String(s) => write!(f, "{s}"),
            ParameterValue::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
        }
    }
}

impl From<bool> for ParameterValue {
    fn from(value: bool) -> Self {
        ParameterValue::Bool(value)
    }
}

impl From<i64> for ParameterValue {
    fn from(value: i64) -> Self {
        ParameterValue::Integer(value)
    }
}

impl From<f64> for ParameterValue {
    fn from(value: f64) -> Self {
        ParameterValue::Double(value)
    }
}

impl From<&str> for ParameterValue {
    fn from(value: &str) -> Self {
        ParameterValue::String(value.to_string())
    }
}

impl From<String> for ParameterValue {
    fn from(value: String) -> Self {
        ParameterValue::String(value)
    }
}
