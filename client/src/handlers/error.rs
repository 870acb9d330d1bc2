use thiserror::Error;

use kbe_shared::{EntityDefError, EntityId, FrameError, WireError};

use crate::world::error::EntityError;

/// Errors raised while handling one message. Each is reported as a failed
/// [`HandlerResult`](crate::HandlerResult), never as a panic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandlerError {
    #[error("Malformed {message} payload: {source}")]
    Payload {
        message: String,
        #[source]
        source: WireError,
    },

    /// A fixed-length message lacks a field, or it does not fit the expected width
    #[error("Field {index} of {message} is missing or out of range")]
    MissingField { message: String, index: usize },

    /// A message that implicitly targets the player arrived before the player exists
    #[error("{message} targets the player, but no player entity exists")]
    NoPlayer { message: String },

    /// Both the component id and the property id were zero
    #[error("Property update for entity {entity_id} names no property")]
    EmptyPropertyId { entity_id: EntityId },

    /// Both the component id and the property id were set
    #[error("Property update for entity {entity_id} names component {component_uid} and property {property_uid}")]
    AmbiguousPropertyId {
        entity_id: EntityId,
        component_uid: u16,
        property_uid: u16,
    },

    #[error("Property {property} of entity {entity_id} is not a component")]
    NotAComponent { entity_id: EntityId, property: String },

    #[error("Component {property} of entity {entity_id} declared {declared} properties but the payload ended after {decoded}")]
    ComponentTruncated {
        entity_id: EntityId,
        property: String,
        declared: u16,
        decoded: u16,
    },

    #[error("Stream {stream_id} was never started")]
    UnknownStream { stream_id: i16 },

    #[error(transparent)]
    Entity(#[from] EntityError),

    #[error(transparent)]
    EntityDef(#[from] EntityDefError),

    #[error(transparent)]
    Frame(#[from] FrameError),
}

impl HandlerError {
    pub(crate) fn payload(message: &str, source: impl Into<WireError>) -> Self {
        HandlerError::Payload {
            message: message.to_string(),
            source: source.into(),
        }
    }
}
