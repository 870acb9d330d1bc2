use thiserror::Error;

use crate::{
    entity::{entity_def::EntityClassDescriptor, entity_defs::EntityDefs, error::EntityDefError},
    messages::{
        catalog, error::MessageSpecError, message_spec::MessageSpec, message_specs::MessageSpecs,
    },
    wire::{TypeDef, TypeRegistry, TypeRegistryError, WireType},
};

/// Errors that can occur while assembling a protocol
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    /// Protocol is locked and cannot be modified
    #[error("Protocol is already locked and cannot be modified. Protocol.lock() has been called and no further changes are allowed")]
    AlreadyLocked,

    #[error("No type named {name} is registered with the protocol")]
    UnknownType { name: String },

    #[error(transparent)]
    Types(#[from] TypeRegistryError),

    #[error(transparent)]
    Messages(#[from] MessageSpecError),

    #[error(transparent)]
    EntityDefs(#[from] EntityDefError),
}

/// A bundle of definitions, typically produced by generated code
pub trait ProtocolPlugin {
    fn build(&self, protocol: &mut Protocol) -> Result<(), ProtocolError>;
}

/// The tables a client needs to speak to one server: user types, message specs and entity
/// classes. Built once at startup, then locked and shared.
#[derive(Debug, Clone, Default)]
pub struct Protocol {
    pub types: TypeRegistry,
    pub messages: MessageSpecs,
    pub entity_defs: EntityDefs,
    locked: bool,
}

impl Protocol {
    pub fn builder() -> Self {
        Self::default()
    }

    pub fn add_plugin<P: ProtocolPlugin>(&mut self, plugin: P) -> Result<&mut Self, ProtocolError> {
        self.check_lock()?;
        plugin.build(self)?;
        Ok(self)
    }

    /// Adds the hand-written message catalog
    pub fn add_predefined_messages(&mut self) -> Result<&mut Self, ProtocolError> {
        self.check_lock()?;
        for spec in catalog::predefined_specs() {
            self.messages.add_predefined(spec)?;
        }
        Ok(self)
    }

    pub fn add_types(
        &mut self,
        defs: impl IntoIterator<Item = TypeDef>,
    ) -> Result<&mut Self, ProtocolError> {
        self.check_lock()?;
        self.types.register_all(defs)?;
        Ok(self)
    }

    /// Adds a generated message spec; predefined specs keep their ids
    pub fn add_message(&mut self, spec: MessageSpec) -> Result<&mut Self, ProtocolError> {
        self.check_lock()?;
        self.messages.add_generated(spec)?;
        Ok(self)
    }

    pub fn add_predefined_message(
        &mut self,
        spec: MessageSpec,
    ) -> Result<&mut Self, ProtocolError> {
        self.check_lock()?;
        self.messages.add_predefined(spec)?;
        Ok(self)
    }

    pub fn add_entity_class(
        &mut self,
        class: EntityClassDescriptor,
    ) -> Result<&mut Self, ProtocolError> {
        self.check_lock()?;
        self.entity_defs.add(class)?;
        Ok(self)
    }

    /// Resolves a type by name, primitives included
    pub fn wire_type(&self, name: &str) -> Result<WireType, ProtocolError> {
        self.types.get(name).ok_or_else(|| ProtocolError::UnknownType {
            name: name.to_string(),
        })
    }

    /// Validates cross references and forbids further changes
    pub fn lock(&mut self) -> Result<(), ProtocolError> {
        self.check_lock()?;
        self.entity_defs.validate()?;
        self.locked = true;
        Ok(())
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Returns Err if protocol is locked
    pub fn check_lock(&self) -> Result<(), ProtocolError> {
        if self.locked {
            Err(ProtocolError::AlreadyLocked)
        } else {
            Ok(())
        }
    }

    pub fn build(&mut self) -> Self {
        std::mem::take(self)
    }
}
