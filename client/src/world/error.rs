use thiserror::Error;

use kbe_shared::{EntityDefError, EntityId, FrameError, WireError};

/// Errors raised by the entity manager
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntityError {
    /// The server named a class this client has no definition for
    #[error("Unknown entity class {class_name} for entity {entity_id}")]
    UnknownEntityClass { entity_id: EntityId, class_name: String },

    #[error("Alias {alias} is outside the alias table ({len} entries)")]
    AliasOutOfBounds { alias: u8, len: usize },

    #[error("Entity {entity_id} is not initialized")]
    NotInitialized { entity_id: EntityId },

    #[error("Entity {entity_id} is destroyed")]
    Destroyed { entity_id: EntityId },

    #[error("Player is already entity {current}, cannot become {entity_id}")]
    PlayerAlreadySet { current: EntityId, entity_id: EntityId },

    #[error(transparent)]
    EntityDef(#[from] EntityDefError),

    #[error("Failed to encode call {method}: {source}")]
    EncodeCall {
        method: String,
        #[source]
        source: WireError,
    },

    /// The protocol lacks a message the manager needs to send
    #[error("No message spec is registered for id {id}")]
    MissingMessageSpec { id: u16 },

    #[error(transparent)]
    Frame(#[from] FrameError),
}
