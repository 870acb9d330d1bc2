mod entity_call;
mod entity_component;
mod error;
mod fixed_dict;
mod primitive;
mod type_registry;
mod value;
mod wire_type;

pub use entity_call::EntityCallRef;
pub use entity_component::EntityComponentHeader;
pub use error::{TypeRegistryError, WireError};
pub use fixed_dict::{FixedDict, FixedDictSpec};
pub use primitive::PrimitiveKind;
pub use type_registry::{
    order_by_dependencies, TypeDef, TypeDefKind, TypeRegistry, TypeRegistryBuilder, TypeSpec,
};
pub use value::Value;
pub use wire_type::{Codec, WireType};
