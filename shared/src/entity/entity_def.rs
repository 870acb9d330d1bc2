use std::collections::HashMap;

use crate::{
    entity::error::EntityDefError,
    wire::WireType,
};

/// Where a method runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MethodContext {
    Base,
    Cell,
    Client,
}

impl MethodContext {
    pub fn name(&self) -> &'static str {
        match self {
            MethodContext::Base => "base",
            MethodContext::Cell => "cell",
            MethodContext::Client => "client",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDescriptor {
    pub uid: u16,
    /// Compact id used on the wire when property aliasing is on
    pub alias_id: Option<u8>,
    pub name: String,
    pub wire_type: WireType,
    /// For component properties, the component's own class
    pub component_class: Option<String>,
}

impl PropertyDescriptor {
    pub fn is_component(&self) -> bool {
        self.component_class.is_some()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodDescriptor {
    pub uid: u16,
    pub alias_id: Option<u8>,
    pub name: String,
    pub context: MethodContext,
    pub args: Vec<WireType>,
}

#[derive(Debug, Clone, Default, PartialEq)]
struct MethodTable {
    methods: Vec<MethodDescriptor>,
    by_uid: HashMap<u16, usize>,
    by_alias: HashMap<u8, usize>,
    by_name: HashMap<String, usize>,
}

impl MethodTable {
    fn push(&mut self, class: &str, method: MethodDescriptor) -> Result<(), EntityDefError> {
        if self.by_uid.contains_key(&method.uid) {
            return Err(EntityDefError::DuplicateMethodUid {
                class: class.to_string(),
                uid: method.uid,
            });
        }
        let index = self.methods.len();
        self.by_uid.insert(method.uid, index);
        if let Some(alias) = method.alias_id {
            self.by_alias.insert(alias, index);
        }
        self.by_name.insert(method.name.clone(), index);
        self.methods.push(method);
        Ok(())
    }
}

/// The static description of one entity (or component) class
#[derive(Debug, Clone, PartialEq)]
pub struct EntityClassDescriptor {
    class_id: u16,
    name: String,
    is_component: bool,
    properties: Vec<PropertyDescriptor>,
    property_by_uid: HashMap<u16, usize>,
    property_by_alias: HashMap<u8, usize>,
    property_by_name: HashMap<String, usize>,
    base_methods: MethodTable,
    cell_methods: MethodTable,
    client_methods: MethodTable,
}

impl EntityClassDescriptor {
    pub fn builder(class_id: u16, name: impl Into<String>) -> EntityClassBuilder {
        EntityClassBuilder::new(class_id, name.into(), false)
    }

    pub fn component_builder(class_id: u16, name: impl Into<String>) -> EntityClassBuilder {
        EntityClassBuilder::new(class_id, name.into(), true)
    }

    pub fn class_id(&self) -> u16 {
        self.class_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_component(&self) -> bool {
        self.is_component
    }

    pub fn properties(&self) -> &[PropertyDescriptor] {
        &self.properties
    }

    /// Property ids are sent as u8 aliases only when aliasing is negotiated and every
    /// property fits the one-byte table.
    pub fn uses_property_alias(&self, entity_def_alias_id: bool) -> bool {
        entity_def_alias_id && self.properties.len() <= usize::from(u8::MAX)
    }

    /// Client method ids follow the same rule against the client method table
    pub fn uses_method_alias(&self, entity_def_alias_id: bool) -> bool {
        entity_def_alias_id && self.client_methods.methods.len() <= usize::from(u8::MAX)
    }

    pub fn property_by_uid(&self, uid: u16) -> Option<&PropertyDescriptor> {
        self.property_by_uid.get(&uid).map(|index| &self.properties[*index])
    }

    pub fn property_by_alias(&self, alias: u8) -> Option<&PropertyDescriptor> {
        self.property_by_alias
            .get(&alias)
            .map(|index| &self.properties[*index])
    }

    pub fn property_by_name(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.property_by_name
            .get(name)
            .map(|index| &self.properties[*index])
    }

    /// Resolves a property id read off the wire, as an alias or a uid
    pub fn resolve_property(
        &self,
        id: u16,
        aliased: bool,
    ) -> Result<&PropertyDescriptor, EntityDefError> {
        let found = if aliased {
            u8::try_from(id).ok().and_then(|alias| self.property_by_alias(alias))
        } else {
            self.property_by_uid(id)
        };
        found.ok_or_else(|| EntityDefError::UnknownProperty {
            class: self.name.clone(),
            id,
        })
    }

    fn table(&self, context: MethodContext) -> &MethodTable {
        match context {
            MethodContext::Base => &self.base_methods,
            MethodContext::Cell => &self.cell_methods,
            MethodContext::Client => &self.client_methods,
        }
    }

    pub fn methods(&self, context: MethodContext) -> &[MethodDescriptor] {
        &self.table(context).methods
    }

    /// Resolves a client method id read off the wire, as an alias or a uid
    pub fn resolve_client_method(
        &self,
        id: u16,
        aliased: bool,
    ) -> Result<&MethodDescriptor, EntityDefError> {
        let table = &self.client_methods;
        let index = if aliased {
            u8::try_from(id).ok().and_then(|alias| table.by_alias.get(&alias))
        } else {
            table.by_uid.get(&id)
        };
        index
            .map(|index| &table.methods[*index])
            .ok_or_else(|| EntityDefError::UnknownMethod {
                class: self.name.clone(),
                context: MethodContext::Client.name(),
                id,
            })
    }

    pub fn method_by_name(
        &self,
        context: MethodContext,
        name: &str,
    ) -> Result<&MethodDescriptor, EntityDefError> {
        let table = self.table(context);
        table
            .by_name
            .get(name)
            .map(|index| &table.methods[*index])
            .ok_or_else(|| EntityDefError::UnknownMethodName {
                class: self.name.clone(),
                context: context.name(),
                name: name.to_string(),
            })
    }
}

/// Assembles an [`EntityClassDescriptor`]. Alias ids are assigned from 1 in declaration order
/// unless given explicitly.
pub struct EntityClassBuilder {
    class_id: u16,
    name: String,
    is_component: bool,
    properties: Vec<PropertyDescriptor>,
    methods: Vec<MethodDescriptor>,
}

impl EntityClassBuilder {
    fn new(class_id: u16, name: String, is_component: bool) -> Self {
        Self {
            class_id,
            name,
            is_component,
            properties: Vec::new(),
            methods: Vec::new(),
        }
    }

    fn next_property_alias(&self) -> Option<u8> {
        u8::try_from(self.properties.len() + 1).ok()
    }

    pub fn property(mut self, uid: u16, name: impl Into<String>, wire_type: WireType) -> Self {
        let alias_id = self.next_property_alias();
        self.properties.push(PropertyDescriptor {
            uid,
            alias_id,
            name: name.into(),
            wire_type,
            component_class: None,
        });
        self
    }

    pub fn property_with_alias(
        mut self,
        uid: u16,
        alias_id: u8,
        name: impl Into<String>,
        wire_type: WireType,
    ) -> Self {
        self.properties.push(PropertyDescriptor {
            uid,
            alias_id: Some(alias_id),
            name: name.into(),
            wire_type,
            component_class: None,
        });
        self
    }

    /// A property holding an embedded component of class `component_class`
    pub fn component(
        mut self,
        uid: u16,
        name: impl Into<String>,
        component_class: impl Into<String>,
    ) -> Self {
        let alias_id = self.next_property_alias();
        self.properties.push(PropertyDescriptor {
            uid,
            alias_id,
            name: name.into(),
            wire_type: WireType::entity_component(),
            component_class: Some(component_class.into()),
        });
        self
    }

    fn method(
        mut self,
        context: MethodContext,
        uid: u16,
        name: String,
        args: Vec<WireType>,
    ) -> Self {
        let declared = self
            .methods
            .iter()
            .filter(|method| method.context == context)
            .count();
        self.methods.push(MethodDescriptor {
            uid,
            alias_id: u8::try_from(declared + 1).ok(),
            name,
            context,
            args,
        });
        self
    }

    pub fn base_method(self, uid: u16, name: impl Into<String>, args: Vec<WireType>) -> Self {
        self.method(MethodContext::Base, uid, name.into(), args)
    }

    pub fn cell_method(self, uid: u16, name: impl Into<String>, args: Vec<WireType>) -> Self {
        self.method(MethodContext::Cell, uid, name.into(), args)
    }

    pub fn client_method(self, uid: u16, name: impl Into<String>, args: Vec<WireType>) -> Self {
        self.method(MethodContext::Client, uid, name.into(), args)
    }

    pub fn build(self) -> Result<EntityClassDescriptor, EntityDefError> {
        let mut property_by_uid = HashMap::new();
        let mut property_by_alias = HashMap::new();
        let mut property_by_name = HashMap::new();
        for (index, property) in self.properties.iter().enumerate() {
            if property_by_uid.insert(property.uid, index).is_some() {
                return Err(EntityDefError::DuplicatePropertyUid {
                    class: self.name,
                    uid: property.uid,
                });
            }
            if let Some(alias) = property.alias_id {
                if property_by_alias.insert(alias, index).is_some() {
                    return Err(EntityDefError::DuplicatePropertyAlias {
                        class: self.name,
                        alias,
                    });
                }
            }
            property_by_name.insert(property.name.clone(), index);
        }

        let mut base_methods = MethodTable::default();
        let mut cell_methods = MethodTable::default();
        let mut client_methods = MethodTable::default();
        for method in self.methods {
            let table = match method.context {
                MethodContext::Base => &mut base_methods,
                MethodContext::Cell => &mut cell_methods,
                MethodContext::Client => &mut client_methods,
            };
            table.push(&self.name, method)?;
        }

        Ok(EntityClassDescriptor {
            class_id: self.class_id,
            name: self.name,
            is_component: self.is_component,
            properties: self.properties,
            property_by_uid,
            property_by_alias,
            property_by_name,
            base_methods,
            cell_methods,
            client_methods,
        })
    }
}
