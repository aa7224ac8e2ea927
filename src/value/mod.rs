// Author: Dustin Pilgrim
// License: MIT

use std::fmt;

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use crate::DlError;

mod conversion;

/// A field or own value: a numeric array, a string array, or a reference
/// to another field of the same struct.
#[derive(Debug, Clone)]
pub enum Value {
    NumberArray(Vec<f64>),
    StringArray(Vec<String>),
    /// Names a sibling field. Only ever built through the API, never by the grammar.
    Reference(String),
}

/// Canonical text of a number: integral values print without a fraction.
pub fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

impl Value {
    pub fn reference(name: impl Into<String>) -> Self {
        Value::Reference(name.into())
    }

    pub fn len(&self) -> usize {
        match self {
            Value::NumberArray(v) => v.len(),
            Value::StringArray(v) => v.len(),
            Value::Reference(_) => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::NumberArray(_))
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Value::StringArray(_))
    }

    pub fn is_reference(&self) -> bool {
        matches!(self, Value::Reference(_))
    }

    pub fn as_reference(&self) -> Option<&str> {
        match self {
            Value::Reference(name) => Some(name),
            _ => None,
        }
    }

    /// Appends a number. String arrays receive its canonical text.
    pub fn append_number(&mut self, n: f64) {
        match self {
            Value::NumberArray(v) => v.push(n),
            Value::StringArray(v) => v.push(format_number(n)),
            Value::Reference(_) => {}
        }
    }

    /// Appends a string. A numeric array is converted to strings first.
    pub fn append_string(&mut self, s: &str) {
        match self {
            Value::NumberArray(v) => {
                let mut promoted: Vec<String> = v.iter().map(|n| format_number(*n)).collect();
                promoted.push(s.to_string());
                *self = Value::StringArray(promoted);
            }
            Value::StringArray(v) => v.push(s.to_string()),
            Value::Reference(_) => {}
        }
    }

    pub fn append_bool(&mut self, b: bool) {
        self.append_number(if b { 1.0 } else { 0.0 });
    }

    /// Appends every element of `other`, promoting as the single-element appends do.
    pub fn append_value(&mut self, other: &Value) {
        match other {
            Value::NumberArray(v) => v.iter().for_each(|n| self.append_number(*n)),
            Value::StringArray(v) => v.iter().for_each(|s| self.append_string(s)),
            Value::Reference(_) => {}
        }
    }

    /// The canonical rendering used for equality and display.
    pub fn to_string_array(&self) -> Vec<String> {
        match self {
            Value::NumberArray(v) => v.iter().map(|n| format_number(*n)).collect(),
            Value::StringArray(v) => v.clone(),
            Value::Reference(name) => vec![name.clone()],
        }
    }

    /// Numeric view of the value; empty strings read as zero.
    pub fn to_f64_array(&self) -> Result<Vec<f64>, DlError> {
        match self {
            Value::NumberArray(v) => Ok(v.clone()),
            Value::StringArray(v) => v.iter().map(|s| parse_number(s)).collect(),
            Value::Reference(name) => Err(DlError::type_error(
                format!("Unresolved reference '{}' has no numeric value", name),
                "Read references through StructNode::get_value",
                401,
            )),
        }
    }

    /// Splits the value into one single-element value per element.
    pub fn elements(&self) -> Vec<Value> {
        match self {
            Value::NumberArray(v) => v.iter().map(|n| Value::NumberArray(vec![*n])).collect(),
            Value::StringArray(v) => v.iter().map(|s| Value::StringArray(vec![s.clone()])).collect(),
            Value::Reference(_) => vec![self.clone()],
        }
    }
}

pub(crate) fn parse_number(s: &str) -> Result<f64, DlError> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Ok(0.0);
    }
    trimmed.parse::<f64>().map_err(|_| {
        DlError::type_error(
            format!("Expected number, got string \"{}\"", s),
            "Use a numeric value for this field",
            402,
        )
    })
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.to_string_array() == other.to_string_array()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts = self.to_string_array();
        if parts.len() == 1 {
            write!(f, "{}", parts[0])
        } else {
            write!(f, "[{}]", parts.join(", "))
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::NumberArray(v) if v.len() == 1 => serializer.serialize_f64(v[0]),
            Value::StringArray(v) if v.len() == 1 => serializer.serialize_str(&v[0]),
            Value::NumberArray(v) => {
                let mut seq = serializer.serialize_seq(Some(v.len()))?;
                for n in v {
                    seq.serialize_element(n)?;
                }
                seq.end()
            }
            Value::StringArray(v) => {
                let mut seq = serializer.serialize_seq(Some(v.len()))?;
                for s in v {
                    seq.serialize_element(s)?;
                }
                seq.end()
            }
            Value::Reference(name) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("ref", name)?;
                map.end()
            }
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::NumberArray(vec![n])
    }
}

impl From<f32> for Value {
    fn from(n: f32) -> Self {
        Value::NumberArray(vec![n as f64])
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::NumberArray(vec![n as f64])
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::NumberArray(vec![n as f64])
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::NumberArray(vec![n as f64])
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::NumberArray(vec![if b { 1.0 } else { 0.0 }])
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::StringArray(vec![s.to_string()])
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::StringArray(vec![s])
    }
}

impl From<Vec<f64>> for Value {
    fn from(v: Vec<f64>) -> Self {
        Value::NumberArray(v)
    }
}

impl From<&[f64]> for Value {
    fn from(v: &[f64]) -> Self {
        Value::NumberArray(v.to_vec())
    }
}

impl From<Vec<String>> for Value {
    fn from(v: Vec<String>) -> Self {
        Value::StringArray(v)
    }
}

impl From<&[&str]> for Value {
    fn from(v: &[&str]) -> Self {
        Value::StringArray(v.iter().map(|s| s.to_string()).collect())
    }
}

impl From<Vec<bool>> for Value {
    fn from(v: Vec<bool>) -> Self {
        Value::NumberArray(v.into_iter().map(|b| if b { 1.0 } else { 0.0 }).collect())
    }
}
