//! # KBE Shared
//! Wire types, message specs and entity class descriptors used by the kbe-client crate.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

pub use kbe_serde::{ByteReader, ByteWriter, ConstByteLength, Serde, SerdeErr};

mod entity;
mod messages;
mod protocol;
mod types;
mod wire;

pub use entity::{
    entity_def::{
        EntityClassBuilder, EntityClassDescriptor, MethodContext, MethodDescriptor,
        PropertyDescriptor,
    },
    entity_defs::EntityDefs,
    error::EntityDefError,
};
pub use messages::{
    catalog::{
        predefined_specs, update_data_variant, update_data_variants, DirectionFields,
        PositionFields, UpdateDataVariant,
    },
    error::{FrameError, MessageSpecError},
    framer::{decode_frame, decode_frames, DecodedFrames, Framer},
    message::{Message, EXTENDED_LENGTH_MARKER, MAX_PAYLOAD_LENGTH},
    message_ids,
    message_spec::{MessageArity, MessageSpec},
    message_specs::MessageSpecs,
};
pub use protocol::{Protocol, ProtocolError, ProtocolPlugin};
pub use types::{EntityClassId, EntityId, MessageId, SpaceId, StreamId};
pub use wire::{
    order_by_dependencies, Codec, EntityCallRef, EntityComponentHeader, FixedDict, FixedDictSpec,
    PrimitiveKind, TypeDef, TypeDefKind, TypeRegistry, TypeRegistryBuilder, TypeRegistryError,
    TypeSpec, Value, WireError, WireType,
};
