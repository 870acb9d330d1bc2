use std::{collections::HashMap, sync::Arc};

use kbe_shared::{EntityClassDescriptor, EntityComponentHeader, EntityId, Value};

/// A sub-object embedded in an entity, with its own property table.
///
/// The owner is held as an id, so the owning entity can be destroyed without visiting its
/// components.
#[derive(Debug, Clone)]
pub struct EntityComponent {
    owner: EntityId,
    name: String,
    class: Arc<EntityClassDescriptor>,
    header: EntityComponentHeader,
    properties: HashMap<String, Value>,
}

impl EntityComponent {
    pub fn new(
        owner: EntityId,
        name: impl Into<String>,
        class: Arc<EntityClassDescriptor>,
    ) -> Self {
        let properties = class
            .properties()
            .iter()
            .map(|property| (property.name.clone(), property.wire_type.default_value()))
            .collect();
        Self {
            owner,
            name: name.into(),
            class,
            header: EntityComponentHeader::default(),
            properties,
        }
    }

    pub fn owner(&self) -> EntityId {
        self.owner
    }

    /// Name of the owner's property holding this component
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn class(&self) -> &Arc<EntityClassDescriptor> {
        &self.class
    }

    pub fn header(&self) -> &EntityComponentHeader {
        &self.header
    }

    pub(crate) fn set_header(&mut self, header: EntityComponentHeader) {
        self.header = header;
    }

    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    pub(crate) fn set_property(&mut self, name: &str, value: Value) -> Option<Value> {
        self.properties.insert(name.to_string(), value)
    }
}
