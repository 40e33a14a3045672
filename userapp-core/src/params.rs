//! Request parameter trees.
//!
//! A method call carries its arguments as an ordered list of named
//! [`Parameter`]s. Values may nest arbitrarily through [`ParamStruct`]
//! (rendered as a JSON object) and [`ParamArray`] (rendered as a JSON array).
//! Insertion order is kept and duplicate names are emitted as-is, leaving
//! last-key-wins resolution to the receiving side.

use crate::error::ParamError;
use serde::ser::{Error as _, SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use serde_json::Value;

/// A single parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    String(String),
    Struct(ParamStruct),
    Array(ParamArray),
}

/// A named parameter. Immutable once constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    name: String,
    value: ParamValue,
}

/// Ordered sequence of named parameters, serialized as a JSON object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParamStruct {
    parameters: Vec<Parameter>,
}

/// Ordered sequence of values, serialized as a JSON array.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParamArray {
    items: Vec<ParamValue>,
}

impl Parameter {
    pub fn new(name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &ParamValue {
        &self.value
    }
}

impl ParamValue {
    pub fn kind(&self) -> &'static str {
        match self {
            ParamValue::Null => "null",
            ParamValue::Bool(_) => "boolean",
            ParamValue::Int(_) | ParamValue::UInt(_) => "integer",
            ParamValue::Float(f) if !f.is_finite() => "non-finite number",
            ParamValue::Float(_) => "number",
            ParamValue::String(_) => "string",
            ParamValue::Struct(_) => "struct",
            ParamValue::Array(_) => "array",
        }
    }

    /// Render the value as JSON text.
    pub fn to_json(&self) -> Result<String, ParamError> {
        self.check(&mut String::new())?;
        Ok(serde_json::to_string(self)?)
    }

    /// Walk the tree and reject anything JSON cannot represent.
    fn check(&self, path: &mut String) -> Result<(), ParamError> {
        match self {
            ParamValue::Float(f) if !f.is_finite() => Err(ParamError::UnsupportedValueKind {
                kind: self.kind(),
                path: if path.is_empty() { "$".to_string() } else { path.clone() },
            }),
            ParamValue::Struct(s) => s.check(path),
            ParamValue::Array(a) => a.check(path),
            _ => Ok(()),
        }
    }
}

impl ParamStruct {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a named parameter, keeping insertion order.
    pub fn parameter(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.push(Parameter::new(name, value));
        self
    }

    pub fn push(&mut self, parameter: Parameter) {
        self.parameters.push(parameter);
    }

    pub fn clear(&mut self) {
        self.parameters.clear();
    }

    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Parameter> {
        self.parameters.iter()
    }

    pub fn to_json(&self) -> Result<String, ParamError> {
        self.check(&mut String::new())?;
        Ok(serde_json::to_string(self)?)
    }

    fn check(&self, path: &mut String) -> Result<(), ParamError> {
        for parameter in &self.parameters {
            let mark = path.len();
            if !path.is_empty() {
                path.push('.');
            }
            path.push_str(&parameter.name);
            parameter.value.check(path)?;
            path.truncate(mark);
        }
        Ok(())
    }
}

impl ParamArray {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an item.
    pub fn item(mut self, value: impl Into<ParamValue>) -> Self {
        self.items.push(value.into());
        self
    }

    pub fn push(&mut self, value: impl Into<ParamValue>) {
        self.items.push(value.into());
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ParamValue> {
        self.items.iter()
    }

    pub fn to_json(&self) -> Result<String, ParamError> {
        self.check(&mut String::new())?;
        Ok(serde_json::to_string(self)?)
    }

    fn check(&self, path: &mut String) -> Result<(), ParamError> {
        for (index, item) in self.items.iter().enumerate() {
            let mark = path.len();
            path.push_str(&format!("[{}]", index));
            item.check(path)?;
            path.truncate(mark);
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a ParamStruct {
    type Item = &'a Parameter;
    type IntoIter = std::slice::Iter<'a, Parameter>;

    fn into_iter(self) -> Self::IntoIter {
        self.parameters.iter()
    }
}

impl FromIterator<Parameter> for ParamStruct {
    fn from_iter<I: IntoIterator<Item = Parameter>>(iter: I) -> Self {
        Self {
            parameters: iter.into_iter().collect(),
        }
    }
}

impl<V: Into<ParamValue>> FromIterator<V> for ParamArray {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl Serialize for ParamValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ParamValue::Null => serializer.serialize_unit(),
            ParamValue::Bool(b) => serializer.serialize_bool(*b),
            ParamValue::Int(i) => serializer.serialize_i64(*i),
            ParamValue::UInt(u) => serializer.serialize_u64(*u),
            // serde_json would quietly write `null` for NaN and infinities
            ParamValue::Float(f) if !f.is_finite() => Err(S::Error::custom(format!(
                "unsupported value kind: {}",
                self.kind()
            ))),
            ParamValue::Float(f) => serializer.serialize_f64(*f),
            ParamValue::String(s) => serializer.serialize_str(s),
            ParamValue::Struct(s) => s.serialize(serializer),
            ParamValue::Array(a) => a.serialize(serializer),
        }
    }
}

impl Serialize for ParamStruct {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.parameters.len()))?;
        for parameter in &self.parameters {
            map.serialize_entry(&parameter.name, &parameter.value)?;
        }
        map.end()
    }
}

impl Serialize for ParamArray {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.items.len()))?;
        for item in &self.items {
            seq.serialize_element(item)?;
        }
        seq.end()
    }
}

macro_rules! impl_from_signed {
    ($($t:ty),*) => {
        $(impl From<$t> for ParamValue {
            fn from(value: $t) -> Self {
                ParamValue::Int(i64::from(value))
            }
        })*
    };
}

macro_rules! impl_from_unsigned {
    ($($t:ty),*) => {
        $(impl From<$t> for ParamValue {
            fn from(value: $t) -> Self {
                ParamValue::UInt(u64::from(value))
            }
        })*
    };
}

impl_from_signed!(i8, i16, i32, i64);
impl_from_unsigned!(u8, u16, u32, u64);

impl From<usize> for ParamValue {
    fn from(value: usize) -> Self {
        ParamValue::UInt(value as u64)
    }
}

impl From<isize> for ParamValue {
    fn from(value: isize) -> Self {
        ParamValue::Int(value as i64)
    }
}

impl From<f32> for ParamValue {
    fn from(value: f32) -> Self {
        ParamValue::Float(f64::from(value))
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Float(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Bool(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::String(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::String(value)
    }
}

impl From<&String> for ParamValue {
    fn from(value: &String) -> Self {
        ParamValue::String(value.clone())
    }
}

impl From<ParamStruct> for ParamValue {
    fn from(value: ParamStruct) -> Self {
        ParamValue::Struct(value)
    }
}

impl From<ParamArray> for ParamValue {
    fn from(value: ParamArray) -> Self {
        ParamValue::Array(value)
    }
}

impl<T: Into<ParamValue>> From<Option<T>> for ParamValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(ParamValue::Null, Into::into)
    }
}

impl<T: Into<ParamValue>> From<Vec<T>> for ParamValue {
    fn from(value: Vec<T>) -> Self {
        ParamValue::Array(value.into_iter().collect())
    }
}

impl From<Value> for ParamValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => ParamValue::Null,
            Value::Bool(b) => ParamValue::Bool(b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    ParamValue::Int(i)
                } else if let Some(u) = n.as_u64() {
                    ParamValue::UInt(u)
                } else {
                    ParamValue::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            Value::String(s) => ParamValue::String(s),
            Value::Array(items) => ParamValue::Array(items.into_iter().collect()),
            Value::Object(map) => ParamValue::Struct(
                map.into_iter()
                    .map(|(name, value)| Parameter::new(name, value))
                    .collect(),
            ),
        }
    }
}

/// Build a [`ParamStruct`] from `name => value` pairs.
///
/// ```rust
/// use userapp_core::{param_struct, param_array};
/// let sort = param_struct! {
///     "created_at" => "asc",
///     "fields" => param_array!["invoice_id", "created_at"],
/// };
/// assert_eq!(sort.len(), 2);
/// ```
#[macro_export]
macro_rules! param_struct {
    { $($name:expr => $value:expr),* $(,)? } => {
        $crate::params::ParamStruct::new()$(.parameter($name, $value))*
    };
}

/// Build a [`ParamArray`] from a list of values.
#[macro_export]
macro_rules! param_array {
    [$($value:expr),* $(,)?] => {
        $crate::params::ParamArray::new()$(.item($value))*
    };
}
