use std::{collections::HashMap, sync::Arc};

use log::debug;

use crate::entity::{entity_def::EntityClassDescriptor, error::EntityDefError};

/// Every entity and component class this client knows, by name and by class id
#[derive(Debug, Clone, Default)]
pub struct EntityDefs {
    classes: Vec<Arc<EntityClassDescriptor>>,
    by_id: HashMap<u16, usize>,
    by_name: HashMap<String, usize>,
}

impl EntityDefs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, class: EntityClassDescriptor) -> Result<(), EntityDefError> {
        if let Some(existing) = self.by_id.get(&class.class_id()) {
            return Err(EntityDefError::DuplicateClassId {
                id: class.class_id(),
                existing: self.classes[*existing].name().to_string(),
                name: class.name().to_string(),
            });
        }
        if self.by_name.contains_key(class.name()) {
            return Err(EntityDefError::DuplicateClassName {
                name: class.name().to_string(),
            });
        }
        let index = self.classes.len();
        self.by_id.insert(class.class_id(), index);
        self.by_name.insert(class.name().to_string(), index);
        self.classes.push(Arc::new(class));
        Ok(())
    }

    /// Checks that every component property names a registered component class
    pub fn validate(&self) -> Result<(), EntityDefError> {
        for class in &self.classes {
            for property in class.properties() {
                let Some(component) = &property.component_class else {
                    continue;
                };
                let known = self
                    .class_by_name(component)
                    .map(|found| found.is_component())
                    .unwrap_or(false);
                if !known {
                    return Err(EntityDefError::UnknownComponentClass {
                        class: class.name().to_string(),
                        property: property.name.clone(),
                        component: component.clone(),
                    });
                }
            }
        }
        debug!("validated {} entity classes", self.classes.len());
        Ok(())
    }

    pub fn class_by_name(&self, name: &str) -> Result<&Arc<EntityClassDescriptor>, EntityDefError> {
        self.by_name
            .get(name)
            .map(|index| &self.classes[*index])
            .ok_or_else(|| EntityDefError::UnknownClass {
                name: name.to_string(),
            })
    }

    pub fn class_by_id(&self, id: u16) -> Result<&Arc<EntityClassDescriptor>, EntityDefError> {
        self.by_id
            .get(&id)
            .map(|index| &self.classes[*index])
            .ok_or(EntityDefError::UnknownClassId { id })
    }

    /// Class ids in `onEntityEnterWorld` are u8 when aliasing is on and the class table fits
    pub fn uses_class_alias(&self, entity_def_alias_id: bool) -> bool {
        entity_def_alias_id && self.classes.len() <= usize::from(u8::MAX)
    }

    pub fn classes(&self) -> impl Iterator<Item = &Arc<EntityClassDescriptor>> {
        self.classes.iter()
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}
