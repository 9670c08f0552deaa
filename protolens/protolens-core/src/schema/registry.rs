use std::collections::HashMap;

use super::ProtobufType;

/// Strip the leading `.` of a fully-qualified protobuf type reference.
pub fn normalize_type_name(name: &str) -> &str {
    name.strip_prefix('.').unwrap_or(name)
}

/// Name-keyed collection of schema nodes.
///
/// Built once per schema load and shared read-only by every build against it.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    types: HashMap<String, ProtobufType>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a type under its (normalized) name, replacing any previous
    /// entry with the same name.
    pub fn insert(&mut self, ty: impl Into<ProtobufType>) {
        let ty = ty.into();
        self.types
            .insert(normalize_type_name(ty.name()).to_string(), ty);
    }

    pub fn with(mut self, ty: impl Into<ProtobufType>) -> Self {
        self.insert(ty);
        self
    }

    pub fn get(&self, name: &str) -> Option<&ProtobufType> {
        self.types.get(normalize_type_name(name))
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProtobufType> {
        self.types.values()
    }

    /// Names of all registered message types, sorted.
    pub fn message_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .types
            .iter()
            .filter(|(_, ty)| matches!(ty, ProtobufType::Message(_)))
            .map(|(name, _)| name.as_str())
            .collect();
        names.sort_unstable();
        names
    }
}

impl FromIterator<ProtobufType> for SchemaRegistry {
    fn from_iter<I: IntoIterator<Item = ProtobufType>>(iter: I) -> Self {
        let mut registry = Self::new();
        for ty in iter {
            registry.insert(ty);
        }
        registry
    }
}
