use serde::{Deserialize, Serialize};
use std::fmt;

/// Static description of a record type's fields.
///
/// Field order is declaration order, which is also the order fields are
/// serialized in.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct RecordSchema {
    pub record_type: &'static str,
    pub fields: &'static [FieldDef],
}

impl RecordSchema {
    /// Looks up a field by its wire name.
    pub fn field(&self, name: &str) -> Option<&'static FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Wire names of every field, in declaration order.
    pub fn field_names(&self) -> impl Iterator<Item = &'static str> {
        self.fields.iter().map(|f| f.name)
    }

    /// Fields holding values of the given kind.
    pub fn fields_of_type(&self, field_type: FieldType) -> impl Iterator<Item = &'static FieldDef> {
        self.fields.iter().filter(move |f| f.field_type == field_type)
    }
}

/// A single named, typed field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldDef {
    pub name: &'static str,
    pub field_type: FieldType,
}

impl FieldDef {
    /// Shorthand for an integer field.
    pub const fn number(name: &'static str) -> Self {
        Self {
            name,
            field_type: FieldType::Number,
        }
    }

    /// Shorthand for a free text field.
    pub const fn text(name: &'static str) -> Self {
        Self {
            name,
            field_type: FieldType::Text,
        }
    }
}

/// The kind of value a field holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Number,
    Text,
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Number => f.write_str("number"),
            FieldType::Text => f.write_str("text"),
        }
    }
}

/// A field value read from or written to a record by name.
///
/// Untagged on the wire: numbers stay JSON numbers and text stays a JSON string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(i64),
    Text(String),
}

impl FieldValue {
    /// The kind of this value.
    pub fn field_type(&self) -> FieldType {
        match self {
            FieldValue::Number(_) => FieldType::Number,
            FieldValue::Text(_) => FieldType::Text,
        }
    }

    pub fn as_number(&self) -> Option<i64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            FieldValue::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            FieldValue::Number(_) => None,
        }
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        FieldValue::Number(n)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}
