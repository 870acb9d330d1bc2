use thiserror::Error;

use crate::wire::WireError;

/// Errors raised while decoding or encoding frames
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameError {
    /// No spec is registered for the id. The rest of the buffer cannot be framed.
    #[error("Unknown message id {id}; discarding {discarded} buffered bytes")]
    UnknownMessageId { id: u16, discarded: usize },

    /// A field of a fixed-length message failed to decode
    #[error("Failed to decode field {index} of message {name} ({id}): {source}")]
    FieldDecode {
        id: u16,
        name: String,
        index: usize,
        #[source]
        source: WireError,
    },

    /// A field or argument failed to encode
    #[error("Failed to encode message {name} ({id}): {source}")]
    Encode {
        id: u16,
        name: String,
        #[source]
        source: WireError,
    },

    /// The message does not carry as many values as its spec declares
    #[error("Message {name} ({id}) expects {expected} values, got {found}")]
    ArityMismatch {
        id: u16,
        name: String,
        expected: usize,
        found: usize,
    },

    /// A raw payload was attached to a fixed-length message
    #[error("Message {name} ({id}) is fixed-length and has no payload")]
    NotVariable { id: u16, name: String },

    #[error("Payload of {length} bytes exceeds the maximum frame length")]
    PayloadTooLarge { length: usize },
}

/// Errors raised while building the message spec registry
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessageSpecError {
    #[error("Message id {id} is registered twice ({existing} and {name})")]
    DuplicateId {
        id: u16,
        existing: String,
        name: String,
    },

    /// Fixed-length messages are framed without a length, so every field needs a known size
    #[error("Fixed-length message {name} ({id}) has field type {field_type} without a fixed size")]
    UnsizedFixedField {
        id: u16,
        name: String,
        field_type: String,
    },

    #[error("No message named {name} is registered")]
    UnknownMessageName { name: String },
}
