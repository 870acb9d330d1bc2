use crate::wire::{value::Value, wire_type::WireType};

/// Ordered field table of a FIXED_DICT type. Field order is the wire order.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedDictSpec {
    fields: Vec<(String, WireType)>,
}

impl FixedDictSpec {
    pub fn new(fields: Vec<(String, WireType)>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &[(String, WireType)] {
        &self.fields
    }

    pub fn field_type(&self, name: &str) -> Option<&WireType> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, wire_type)| wire_type)
    }
}

/// A decoded FIXED_DICT value, fields kept in declaration order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FixedDict {
    entries: Vec<(String, Value)>,
}

impl FixedDict {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.entries
            .iter_mut()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }

    /// Replaces an existing field in place, or appends a new one
    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        let name = name.into();
        match self.get_mut(&name) {
            Some(slot) => *slot = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value.into());
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }
}
