use std::{fmt, sync::Arc};

/// Default value of a primitive type, used when a field is absent from input.
#[derive(Debug, Clone, PartialEq)]
pub enum DefaultValue {
    String(String),
    Number(f64),
    Bool(bool),
}

impl DefaultValue {
    /// Canonical string form, identical to what the builder produces for the
    /// same value arriving from input.
    pub fn canonical(&self) -> String {
        match self {
            DefaultValue::String(s) => s.clone(),
            DefaultValue::Number(n) => canonical_f64(*n),
            DefaultValue::Bool(b) => b.to_string(),
        }
    }
}

/// Render a float the way a JSON-native environment does: integral values
/// drop the fractional part, magnitudes of at least `1e21` or below `1e-6`
/// use exponent notation (`1e+21`, `1.5e-7`) and non-finite values are
/// spelled out.
pub(crate) fn canonical_f64(value: f64) -> String {
    if value == 0.0 {
        "0".to_string()
    } else if value.is_nan() {
        "NaN".to_string()
    } else if value == f64::INFINITY {
        "Infinity".to_string()
    } else if value == f64::NEG_INFINITY {
        "-Infinity".to_string()
    } else if value.abs() >= 1e21 || value.abs() < 1e-6 {
        let text = format!("{value:e}");
        match text.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                format!("{mantissa}e+{exponent}")
            }
            _ => text,
        }
    } else {
        value.to_string()
    }
}

/// Scalar type such as `int32` or `string`.
#[derive(Debug, Clone, PartialEq)]
pub struct PrimitiveType {
    pub name: String,
    pub default_value: DefaultValue,
}

impl PrimitiveType {
    pub fn new(name: impl Into<String>, default_value: DefaultValue) -> Self {
        Self {
            name: name.into(),
            default_value,
        }
    }
}

/// Enum type with an ordered option table (`name -> number`).
#[derive(Debug, Clone, PartialEq)]
pub struct EnumType {
    pub name: String,
    pub options: Vec<(String, i32)>,
}

impl EnumType {
    pub fn new(name: impl Into<String>, options: Vec<(String, i32)>) -> Self {
        Self {
            name: name.into(),
            options,
        }
    }

    /// Name of the first option whose number equals `number`.
    pub fn option_by_number(&self, number: i64) -> Option<&str> {
        self.options
            .iter()
            .find(|(_, value)| i64::from(*value) == number)
            .map(|(name, _)| name.as_str())
    }

    /// Name of the first option called `name`.
    pub fn option_by_name(&self, name: &str) -> Option<&str> {
        self.options
            .iter()
            .find(|(option, _)| option == name)
            .map(|(option, _)| option.as_str())
    }
}

/// Message type with its fields split into four groupings.
///
/// Every field refers to its type by name; the name is resolved against a
/// [`SchemaRegistry`](super::SchemaRegistry) only when a value is built, so
/// self-referential messages are representable.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MessageType {
    pub name: String,
    /// `(field name, type name)`.
    pub single_fields: Vec<(String, String)>,
    /// `(field name, element type name)`.
    pub repeated_fields: Vec<(String, String)>,
    /// `(union name, [(option field name, type name)])`.
    pub one_of_fields: Vec<(String, Vec<(String, String)>)>,
    /// `(field name, value type name)`; keys are always strings.
    pub map_fields: Vec<(String, String)>,
}

impl MessageType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_single(mut self, name: impl Into<String>, type_name: impl Into<String>) -> Self {
        self.single_fields.push((name.into(), type_name.into()));
        self
    }

    pub fn with_repeated(
        mut self,
        name: impl Into<String>,
        type_name: impl Into<String>,
    ) -> Self {
        self.repeated_fields.push((name.into(), type_name.into()));
        self
    }

    pub fn with_one_of<N, T>(mut self, union_name: impl Into<String>, options: Vec<(N, T)>) -> Self
    where
        N: Into<String>,
        T: Into<String>,
    {
        let options = options
            .into_iter()
            .map(|(name, type_name)| (name.into(), type_name.into()))
            .collect();
        self.one_of_fields.push((union_name.into(), options));
        self
    }

    pub fn with_map(
        mut self,
        name: impl Into<String>,
        value_type_name: impl Into<String>,
    ) -> Self {
        self.map_fields.push((name.into(), value_type_name.into()));
        self
    }
}

/// A schema node: one of the three type kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum ProtobufType {
    Primitive(Arc<PrimitiveType>),
    Enum(Arc<EnumType>),
    Message(Arc<MessageType>),
}

impl ProtobufType {
    pub fn name(&self) -> &str {
        match self {
            ProtobufType::Primitive(t) => &t.name,
            ProtobufType::Enum(t) => &t.name,
            ProtobufType::Message(t) => &t.name,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            ProtobufType::Primitive(_) => "primitive",
            ProtobufType::Enum(_) => "enum",
            ProtobufType::Message(_) => "message",
        }
    }
}

impl From<PrimitiveType> for ProtobufType {
    fn from(value: PrimitiveType) -> Self {
        Self::Primitive(Arc::new(value))
    }
}

impl From<EnumType> for ProtobufType {
    fn from(value: EnumType) -> Self {
        Self::Enum(Arc::new(value))
    }
}

impl From<MessageType> for ProtobufType {
    fn from(value: MessageType) -> Self {
        Self::Message(Arc::new(value))
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "message {}", self.name)?;
        for (name, type_name) in &self.single_fields {
            writeln!(f, "    {name}: {type_name}")?;
        }
        for (name, type_name) in &self.repeated_fields {
            writeln!(f, "    {name}: repeated {type_name}")?;
        }
        for (union_name, options) in &self.one_of_fields {
            writeln!(f, "    oneof {union_name}:")?;
            for (name, type_name) in options {
                writeln!(f, "        {name}: {type_name}")?;
            }
        }
        for (name, type_name) in &self.map_fields {
            writeln!(f, "    {name}: map<string, {type_name}>")?;
        }
        Ok(())
    }
}
