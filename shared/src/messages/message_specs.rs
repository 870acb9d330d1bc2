use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use log::debug;

use crate::messages::{
    catalog, error::MessageSpecError, message_spec::MessageSpec,
};

/// Message specs keyed by id. Hand-written (predefined) specs win over generated ones that
/// share an id.
#[derive(Debug, Clone, Default)]
pub struct MessageSpecs {
    by_id: HashMap<u16, Arc<MessageSpec>>,
    by_name: HashMap<String, u16>,
    predefined: HashSet<u16>,
}

impl MessageSpecs {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the hand-written catalog
    pub fn with_predefined() -> Result<Self, MessageSpecError> {
        let mut specs = Self::new();
        for spec in catalog::predefined_specs() {
            specs.add_predefined(spec)?;
        }
        Ok(specs)
    }

    /// Adds a hand-written spec, replacing whatever held its id
    pub fn add_predefined(&mut self, spec: MessageSpec) -> Result<(), MessageSpecError> {
        validate(&spec)?;
        if let Some(previous) = self.by_id.get(&spec.id()) {
            if self.predefined.contains(&spec.id()) {
                return Err(MessageSpecError::DuplicateId {
                    id: spec.id(),
                    existing: previous.name().to_string(),
                    name: spec.name().to_string(),
                });
            }
            debug!("predefined {:?} replaces generated {:?}", spec, previous);
            self.by_name.remove(previous.name());
        }
        self.predefined.insert(spec.id());
        self.insert(spec);
        Ok(())
    }

    /// Adds a generated spec. An id already held by a predefined spec keeps the predefined one.
    pub fn add_generated(&mut self, spec: MessageSpec) -> Result<(), MessageSpecError> {
        validate(&spec)?;
        if let Some(previous) = self.by_id.get(&spec.id()) {
            if self.predefined.contains(&spec.id()) {
                debug!("generated {:?} shadowed by predefined {:?}", spec, previous);
                return Ok(());
            }
            return Err(MessageSpecError::DuplicateId {
                id: spec.id(),
                existing: previous.name().to_string(),
                name: spec.name().to_string(),
            });
        }
        self.insert(spec);
        Ok(())
    }

    fn insert(&mut self, spec: MessageSpec) {
        self.by_name.insert(spec.name().to_string(), spec.id());
        self.by_id.insert(spec.id(), Arc::new(spec));
    }

    pub fn get(&self, id: u16) -> Option<&Arc<MessageSpec>> {
        self.by_id.get(&id)
    }

    pub fn get_by_name(&self, name: &str) -> Result<&Arc<MessageSpec>, MessageSpecError> {
        self.by_name
            .get(name)
            .and_then(|id| self.by_id.get(id))
            .ok_or_else(|| MessageSpecError::UnknownMessageName {
                name: name.to_string(),
            })
    }

    pub fn is_predefined(&self, id: u16) -> bool {
        self.predefined.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

fn validate(spec: &MessageSpec) -> Result<(), MessageSpecError> {
    if spec.is_variable() {
        return Ok(());
    }
    match spec.fields().iter().find(|field| field.fixed_size().is_none()) {
        Some(field) => Err(MessageSpecError::UnsizedFixedField {
            id: spec.id(),
            name: spec.name().to_string(),
            field_type: field.name().to_string(),
        }),
        None => Ok(()),
    }
}
