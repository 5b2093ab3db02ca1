use std::fmt;
use std::rc::Rc;

use serde_json::Value;

use crate::data::domain::DataType;

/// Abstract attribute reference resolved by a registered resolver.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AttributeIdentifier {
    /// Resolver tag, e.g. `"SAMPLE_ATTRIBUTE"`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Resolver-specific detail, e.g. the attribute name.
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub specifier: Value,
}

impl AttributeIdentifier {
    /// Identifier with a specifier.
    pub fn new(kind: impl Into<String>, specifier: impl Into<Value>) -> Self {
        Self {
            kind: kind.into(),
            specifier: specifier.into(),
        }
    }

    pub(crate) fn to_config(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

impl fmt::Display for AttributeIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.specifier {
            Value::Null => f.write_str(&self.kind),
            Value::String(s) => write!(f, "{}:{s}", self.kind),
            other => write!(f, "{}:{other}", self.kind),
        }
    }
}

/// Maps a sample id to its attribute value. `Null` means undefined.
pub type Accessor = Rc<dyn Fn(&str) -> Value>;

/// A resolved attribute.
#[derive(Clone)]
pub struct AttributeInfo {
    /// Display name.
    pub name: String,
    /// Value accessor.
    pub accessor: Accessor,
    /// Measurement type.
    pub data_type: DataType,
    /// Scale configuration; an ordinal sort uses its `domain` array.
    pub scale: Option<Value>,
}

impl AttributeInfo {
    /// Attribute without a scale.
    pub fn new(
        name: impl Into<String>,
        data_type: DataType,
        accessor: impl Fn(&str) -> Value + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            accessor: Rc::new(accessor),
            data_type,
            scale: None,
        }
    }

    /// Attach a scale configuration.
    pub fn with_scale(mut self, scale: Value) -> Self {
        self.scale = Some(scale);
        self
    }

    /// Explicit ordinal domain of the scale, if any.
    pub fn scale_domain(&self) -> Option<&[Value]> {
        self.scale
            .as_ref()
            .and_then(|s| s.get("domain"))
            .and_then(Value::as_array)
            .map(Vec::as_slice)
    }
}

impl fmt::Debug for AttributeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttributeInfo")
            .field("name", &self.name)
            .field("data_type", &self.data_type)
            .field("scale", &self.scale)
            .finish_non_exhaustive()
    }
}

/// Resolves identifiers of one attribute type. `None` means unknown attribute.
pub type AttributeResolver = Box<dyn Fn(&AttributeIdentifier) -> Option<AttributeInfo>>;

#[cfg(test)]
#[path = "../../tests/unit/samples/attributes.rs"]
mod tests;
