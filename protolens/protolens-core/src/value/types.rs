use std::{
    fmt::{Display, Formatter, Result},
    sync::Arc,
};

use crate::schema::{EnumType, MessageType, PrimitiveType};

/// Scalar value, always held in its canonical string form.
#[derive(Debug, Clone, PartialEq)]
pub struct PrimitiveValue {
    pub ty: Arc<PrimitiveType>,
    pub value: String,
}

/// Enum value resolved to its symbolic option name.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumValue {
    pub ty: Arc<EnumType>,
    pub selected: String,
}

/// Message value mirroring the groupings of its [`MessageType`].
///
/// Every grouping keeps schema declaration order; map entries keep the
/// iteration order of their source.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageValue {
    pub ty: Arc<MessageType>,
    pub single_fields: Vec<(String, ProtobufValue)>,
    pub repeated_fields: Vec<(String, Vec<ProtobufValue>)>,
    /// `(union name, (selected option name, value))`.
    pub one_of_fields: Vec<(String, (String, ProtobufValue))>,
    pub map_fields: Vec<(String, Vec<(String, ProtobufValue)>)>,
}

impl MessageValue {
    pub fn single(&self, name: &str) -> Option<&ProtobufValue> {
        self.single_fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }

    pub fn repeated(&self, name: &str) -> Option<&[ProtobufValue]> {
        self.repeated_fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, values)| values.as_slice())
    }

    /// Selected option name and value of the union called `union_name`.
    pub fn one_of(&self, union_name: &str) -> Option<(&str, &ProtobufValue)> {
        self.one_of_fields
            .iter()
            .find(|(union, _)| union == union_name)
            .map(|(_, (option, value))| (option.as_str(), value))
    }

    pub fn map(&self, name: &str) -> Option<&[(String, ProtobufValue)]> {
        self.map_fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, entries)| entries.as_slice())
    }

    pub fn is_empty(&self) -> bool {
        self.single_fields.is_empty()
            && self.repeated_fields.is_empty()
            && self.one_of_fields.is_empty()
            && self.map_fields.is_empty()
    }
}

/// A built value: one of the three value kinds, tagged like its schema node.
#[derive(Debug, Clone, PartialEq)]
pub enum ProtobufValue {
    Message(MessageValue),
    Primitive(PrimitiveValue),
    Enum(EnumValue),
}

impl ProtobufValue {
    /// Name of the schema type this value was built from.
    pub fn type_name(&self) -> &str {
        match self {
            ProtobufValue::Message(v) => &v.ty.name,
            ProtobufValue::Primitive(v) => &v.ty.name,
            ProtobufValue::Enum(v) => &v.ty.name,
        }
    }

    pub fn as_message(&self) -> Option<&MessageValue> {
        match self {
            ProtobufValue::Message(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_primitive(&self) -> Option<&PrimitiveValue> {
        match self {
            ProtobufValue::Primitive(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_enum(&self) -> Option<&EnumValue> {
        match self {
            ProtobufValue::Enum(v) => Some(v),
            _ => None,
        }
    }

    /// Short text form: the primitive string, the enum option name, or the
    /// compact generic JSON of a message.
    pub fn to_text(&self) -> String {
        match self {
            ProtobufValue::Primitive(v) => v.value.clone(),
            ProtobufValue::Enum(v) => v.selected.clone(),
            ProtobufValue::Message(_) => super::to_json(self).to_string(),
        }
    }
}

impl From<MessageValue> for ProtobufValue {
    fn from(value: MessageValue) -> Self {
        Self::Message(value)
    }
}

impl From<PrimitiveValue> for ProtobufValue {
    fn from(value: PrimitiveValue) -> Self {
        Self::Primitive(value)
    }
}

impl From<EnumValue> for ProtobufValue {
    fn from(value: EnumValue) -> Self {
        Self::Enum(value)
    }
}

impl Display for ProtobufValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let text = super::format_value(self)?;
        f.write_str(&text)
    }
}

impl Display for MessageValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let text = super::format::format_message_value(self)?;
        f.write_str(&text)
    }
}
