use thiserror::Error;

use kbe_serde::SerdeErr;

/// Errors raised by wire type codecs
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WireError {
    /// The underlying byte reader failed
    #[error("Wire read failed: {0}")]
    Serde(#[from] SerdeErr),

    /// The value handed to an encoder is not of a kind the type accepts
    #[error("Type {type_name} cannot encode a {found} value")]
    ValueMismatch {
        type_name: String,
        found: &'static str,
    },

    /// An integer value does not fit the width of the type
    #[error("Value {value} is out of range for type {type_name}")]
    OutOfRange { type_name: String, value: String },

    /// A FIXED_DICT value is missing a declared field
    #[error("FIXED_DICT {type_name} value is missing field {field:?}")]
    FieldMissing { type_name: String, field: String },

    /// STRING is NUL-terminated on the wire, so it cannot carry a NUL itself
    #[error("Type {type_name} cannot encode a NUL byte (at offset {position})")]
    InteriorNul { type_name: String, position: usize },

    /// UNICODE bytes were not valid UTF-8
    #[error("Type {type_name} received invalid UTF-8 ({length} bytes)")]
    InvalidUtf8 { type_name: String, length: usize },
}

impl WireError {
    /// True when decoding failed only because the input was truncated
    pub fn is_incomplete(&self) -> bool {
        match self {
            WireError::Serde(err) => err.is_incomplete(),
            _ => false,
        }
    }
}

/// Errors raised while building the type registry
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeRegistryError {
    #[error("Type id {id} is registered twice (second definition: {name})")]
    DuplicateId { id: u16, name: String },

    #[error("Type name {name} is registered twice")]
    DuplicateName { name: String },

    /// User types may not shadow a primitive
    #[error("Type name {name} is reserved for a primitive type")]
    ReservedName { name: String },

    #[error("Type {referenced_by} references unknown type {name}")]
    UnknownType { name: String, referenced_by: String },

    /// A definition was registered before a type it depends on
    #[error("Type {name} references {dependency}, which is not registered yet")]
    ForwardReference { name: String, dependency: String },

    #[error("Type {name} depends on itself")]
    DependencyCycle { name: String },
}
