use thiserror::Error;

/// Errors raised while building or querying entity class descriptors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntityDefError {
    #[error("Entity class id {id} is registered twice ({existing} and {name})")]
    DuplicateClassId {
        id: u16,
        existing: String,
        name: String,
    },

    #[error("Entity class {name} is registered twice")]
    DuplicateClassName { name: String },

    #[error("Property uid {uid} is declared twice on class {class}")]
    DuplicatePropertyUid { class: String, uid: u16 },

    #[error("Method uid {uid} is declared twice on class {class}")]
    DuplicateMethodUid { class: String, uid: u16 },

    #[error("Property alias {alias} is declared twice on class {class}")]
    DuplicatePropertyAlias { class: String, alias: u8 },

    /// The class name is not known to this client. Usually the server runs other definitions.
    #[error("Unknown entity class {name}")]
    UnknownClass { name: String },

    #[error("Unknown entity class id {id}")]
    UnknownClassId { id: u16 },

    #[error("Class {class} has no property with id {id}")]
    UnknownProperty { class: String, id: u16 },

    #[error("Class {class} has no property named {name}")]
    UnknownPropertyName { class: String, name: String },

    #[error("Class {class} has no {context} method with id {id}")]
    UnknownMethod {
        class: String,
        context: &'static str,
        id: u16,
    },

    #[error("Class {class} has no {context} method named {name}")]
    UnknownMethodName {
        class: String,
        context: &'static str,
        name: String,
    },

    /// A component property names a class that is missing or is not a component
    #[error("Property {property} of class {class} refers to component class {component}, which is not a registered component")]
    UnknownComponentClass {
        class: String,
        property: String,
        component: String,
    },

    #[error("Method {class}.{method} takes {expected} arguments, got {found}")]
    ArgumentCount {
        class: String,
        method: String,
        expected: usize,
        found: usize,
    },
}
