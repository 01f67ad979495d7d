use std::fmt;

use serde::{Deserialize, Serialize};

/// The value carried by a container or item attribute.
///
/// Values are usually numeric (a weight, a capacity) but may also be
/// free text or a flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    /// A boolean flag.
    Bool(bool),
    /// A numeric value, interpreted together with the attribute's unit.
    Number(f64),
    /// Free-form text.
    Text(String),
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// A typed property of a container.
///
/// When `compulsory` is set, items placed in the container (or any of its
/// descendants) are expected to satisfy the constraint the attribute
/// describes. The flag is carried by the data model only; enforcement is up
/// to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerAttribute {
    /// Name of the attribute (e.g. "max weight").
    pub name: String,
    /// The attribute's value.
    pub value: AttributeValue,
    /// Unit matching the value (e.g. "kg"). May be empty.
    pub unit: String,
    /// Category of the attribute (e.g. "quantity" or "property").
    pub kind: String,
    /// Whether contained items must satisfy this attribute.
    pub compulsory: bool,
}

impl ContainerAttribute {
    /// Creates a new container attribute.
    pub fn new(
        name: impl Into<String>,
        value: impl Into<AttributeValue>,
        unit: impl Into<String>,
        kind: impl Into<String>,
        compulsory: bool,
    ) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            unit: unit.into(),
            kind: kind.into(),
            compulsory,
        }
    }
}

/// A typed property of a catalog item.
///
/// Structurally identical to [`ContainerAttribute`] minus the compulsory
/// flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemAttribute {
    /// Name of the attribute (e.g. "weight").
    pub name: String,
    /// The attribute's value.
    pub value: AttributeValue,
    /// Unit matching the value. May be empty.
    pub unit: String,
    /// Category of the attribute (e.g. "quantity" or "property").
    pub kind: String,
}

impl ItemAttribute {
    /// Creates a new item attribute.
    pub fn new(
        name: impl Into<String>,
        value: impl Into<AttributeValue>,
        unit: impl Into<String>,
        kind: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            unit: unit.into(),
            kind: kind.into(),
        }
    }
}
