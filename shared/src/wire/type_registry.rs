use std::collections::{HashMap, HashSet};

use log::{debug, trace};

use crate::wire::{
    error::TypeRegistryError, fixed_dict::FixedDictSpec, primitive::PrimitiveKind,
    wire_type::WireType,
};

/// A raw, unresolved type definition. Referenced types are named, not linked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDef {
    pub id: u16,
    pub name: String,
    pub kind: TypeDefKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeDefKind {
    /// Another name for an existing type
    Alias { base: String },
    /// Ordered (field name, type name) pairs
    FixedDict { fields: Vec<(String, String)> },
    Array { element: String },
    EntityComponent,
}

impl TypeDef {
    pub fn alias(id: u16, name: impl Into<String>, base: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            kind: TypeDefKind::Alias { base: base.into() },
        }
    }

    pub fn fixed_dict<N, T>(id: u16, name: impl Into<String>, fields: Vec<(N, T)>) -> Self
    where
        N: Into<String>,
        T: Into<String>,
    {
        Self {
            id,
            name: name.into(),
            kind: TypeDefKind::FixedDict {
                fields: fields
                    .into_iter()
                    .map(|(field, type_name)| (field.into(), type_name.into()))
                    .collect(),
            },
        }
    }

    pub fn array(id: u16, name: impl Into<String>, element: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            kind: TypeDefKind::Array {
                element: element.into(),
            },
        }
    }

    pub fn entity_component(id: u16, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            kind: TypeDefKind::EntityComponent,
        }
    }

    /// Names of the types this definition refers to
    pub fn dependencies(&self) -> Vec<&str> {
        match &self.kind {
            TypeDefKind::Alias { base } => vec![base.as_str()],
            TypeDefKind::FixedDict { fields } => {
                fields.iter().map(|(_, type_name)| type_name.as_str()).collect()
            }
            TypeDefKind::Array { element } => vec![element.as_str()],
            TypeDefKind::EntityComponent => Vec::new(),
        }
    }

    fn base_name(&self) -> String {
        match &self.kind {
            TypeDefKind::Alias { base } => base.clone(),
            TypeDefKind::FixedDict { .. } => "FIXED_DICT".to_string(),
            TypeDefKind::Array { .. } => "ARRAY".to_string(),
            TypeDefKind::EntityComponent => "ENTITY_COMPONENT".to_string(),
        }
    }
}

/// A resolved, registered type
#[derive(Debug, Clone, PartialEq)]
pub struct TypeSpec {
    pub id: u16,
    /// The type this one was built from: a base type name for aliases, the composite kind otherwise
    pub base_name: String,
    pub name: String,
    pub wire_type: WireType,
}

/// Every user-defined type, keyed by id and name. Primitive types resolve by name without
/// being registered.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    specs: Vec<TypeSpec>,
    by_id: HashMap<u16, usize>,
    by_name: HashMap<String, usize>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> TypeRegistryBuilder {
        TypeRegistryBuilder::default()
    }

    /// Registers one definition. Every type it references must already be known.
    pub fn register(&mut self, def: TypeDef) -> Result<&TypeSpec, TypeRegistryError> {
        if PrimitiveKind::from_name(&def.name).is_some() {
            return Err(TypeRegistryError::ReservedName { name: def.name });
        }
        if self.by_id.contains_key(&def.id) {
            return Err(TypeRegistryError::DuplicateId {
                id: def.id,
                name: def.name,
            });
        }
        if self.by_name.contains_key(&def.name) {
            return Err(TypeRegistryError::DuplicateName { name: def.name });
        }

        let wire_type = match &def.kind {
            TypeDefKind::Alias { base } => self.resolve(&def.name, base)?.alias(def.name.as_str()),
            TypeDefKind::FixedDict { fields } => {
                let mut resolved = Vec::with_capacity(fields.len());
                for (field, type_name) in fields {
                    resolved.push((field.clone(), self.resolve(&def.name, type_name)?));
                }
                WireType::fixed_dict(def.name.as_str(), FixedDictSpec::new(resolved))
            }
            TypeDefKind::Array { element } => {
                WireType::array(def.name.as_str(), self.resolve(&def.name, element)?)
            }
            TypeDefKind::EntityComponent => WireType::entity_component().alias(def.name.as_str()),
        };

        trace!("registered type {} ({}) as {:?}", def.name, def.id, wire_type);

        let index = self.specs.len();
        self.by_id.insert(def.id, index);
        self.by_name.insert(def.name.clone(), index);
        self.specs.push(TypeSpec {
            id: def.id,
            base_name: def.base_name(),
            name: def.name,
            wire_type,
        });
        Ok(&self.specs[index])
    }

    fn resolve(&self, referenced_by: &str, name: &str) -> Result<WireType, TypeRegistryError> {
        self.get(name)
            .ok_or_else(|| TypeRegistryError::ForwardReference {
                name: referenced_by.to_string(),
                dependency: name.to_string(),
            })
    }

    /// Registers definitions given in any order, dependencies first. References may also name
    /// types registered earlier.
    pub fn register_all(
        &mut self,
        defs: impl IntoIterator<Item = TypeDef>,
    ) -> Result<(), TypeRegistryError> {
        let ordered =
            order_by_dependencies(defs.into_iter().collect(), |name| self.get(name).is_some())?;
        for def in ordered {
            self.register(def)?;
        }
        Ok(())
    }

    /// Looks a type up by name, primitives included
    pub fn get(&self, name: &str) -> Option<WireType> {
        match self.by_name.get(name) {
            Some(index) => Some(self.specs[*index].wire_type.clone()),
            None => WireType::primitive_by_name(name),
        }
    }

    pub fn get_by_id(&self, id: u16) -> Option<WireType> {
        self.spec(id).map(|spec| spec.wire_type.clone())
    }

    pub fn spec(&self, id: u16) -> Option<&TypeSpec> {
        self.by_id.get(&id).map(|index| &self.specs[*index])
    }

    /// Registered specs, in registration order
    pub fn specs(&self) -> impl Iterator<Item = &TypeSpec> {
        self.specs.iter()
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

/// Collects raw definitions in any order and registers them dependencies-first
#[derive(Debug, Default)]
pub struct TypeRegistryBuilder {
    defs: Vec<TypeDef>,
}

impl TypeRegistryBuilder {
    pub fn add(mut self, def: TypeDef) -> Self {
        self.defs.push(def);
        self
    }

    pub fn extend(mut self, defs: impl IntoIterator<Item = TypeDef>) -> Self {
        self.defs.extend(defs);
        self
    }

    pub fn build(self) -> Result<TypeRegistry, TypeRegistryError> {
        let mut registry = TypeRegistry::new();
        registry.register_all(self.defs)?;
        debug!("type registry built with {} types", registry.len());
        Ok(registry)
    }
}

/// Orders definitions by id, then moves every entry that references a later entry to just
/// after the latest of its dependencies, repeating until nothing references forward.
/// `is_known` accepts names that resolve outside `defs`.
pub fn order_by_dependencies(
    mut defs: Vec<TypeDef>,
    is_known: impl Fn(&str) -> bool,
) -> Result<Vec<TypeDef>, TypeRegistryError> {
    defs.sort_by_key(|def| def.id);

    let known: HashSet<&str> = defs.iter().map(|def| def.name.as_str()).collect();
    for def in &defs {
        for dependency in def.dependencies() {
            if !known.contains(dependency) && !is_known(dependency) {
                return Err(TypeRegistryError::UnknownType {
                    name: dependency.to_string(),
                    referenced_by: def.name.clone(),
                });
            }
        }
    }
    check_cycles(&defs)?;

    loop {
        let positions: HashMap<&str, usize> = defs
            .iter()
            .enumerate()
            .map(|(index, def)| (def.name.as_str(), index))
            .collect();

        let broken = defs.iter().enumerate().find_map(|(index, def)| {
            def.dependencies()
                .iter()
                .filter_map(|dependency| positions.get(dependency).copied())
                .max()
                .filter(|latest| *latest > index)
                .map(|latest| (index, latest))
        });

        let Some((index, latest)) = broken else {
            break;
        };
        let def = defs.remove(index);
        trace!("moving type {} after {}", def.name, defs[latest - 1].name);
        // `latest` shifted down by one after the removal
        defs.insert(latest, def);
    }

    Ok(defs)
}

fn check_cycles(defs: &[TypeDef]) -> Result<(), TypeRegistryError> {
    let by_name: HashMap<&str, &TypeDef> =
        defs.iter().map(|def| (def.name.as_str(), def)).collect();

    #[derive(Clone, Copy, PartialEq)]
    enum Mark {
        Visiting,
        Done,
    }

    fn visit<'a>(
        def: &'a TypeDef,
        by_name: &HashMap<&str, &'a TypeDef>,
        marks: &mut HashMap<&'a str, Mark>,
    ) -> Result<(), TypeRegistryError> {
        match marks.get(def.name.as_str()) {
            Some(Mark::Done) => return Ok(()),
            Some(Mark::Visiting) => {
                return Err(TypeRegistryError::DependencyCycle {
                    name: def.name.clone(),
                })
            }
            None => {}
        }
        marks.insert(def.name.as_str(), Mark::Visiting);
        for dependency in def.dependencies() {
            if let Some(next) = by_name.get(dependency) {
                visit(*next, by_name, marks)?;
            }
        }
        marks.insert(def.name.as_str(), Mark::Done);
        Ok(())
    }

    let mut marks = HashMap::new();
    for def in defs {
        visit(def, &by_name, &mut marks)?;
    }
    Ok(())
}
