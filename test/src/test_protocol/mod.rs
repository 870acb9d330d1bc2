use std::sync::Arc;

use kbe_shared::{
    EntityClassDescriptor, PrimitiveKind, Protocol, ProtocolError, ProtocolPlugin, TypeDef,
    WireType,
};

pub const ACCOUNT_CLASS_ID: u16 = 1;
pub const AVATAR_CLASS_ID: u16 = 2;
pub const MONSTER_CLASS_ID: u16 = 3;
pub const BAG_CLASS_ID: u16 = 4;

/// Property aliases of `Account`, in declaration order
pub mod account {
    pub const LEVEL: u8 = 1;
    pub const ACCOUNT_NAME: u8 = 2;
    pub const GOLD: u8 = 3;
    pub const MODEL_SCALE: u8 = 4;
    pub const MODEL_ID: u8 = 5;
}

/// Property aliases of `Avatar`
pub mod avatar {
    pub const HP: u8 = 1;
    pub const ITEMS: u8 = 2;
    pub const BAG: u8 = 3;
}

/// Property aliases of the `Bag` component
pub mod bag {
    pub const CAPACITY: u8 = 1;
    pub const WEIGHT: u8 = 2;
}

fn t(kind: PrimitiveKind) -> WireType {
    WireType::primitive(kind)
}

/// The entity definitions a small demo server would publish
pub struct TestProtocol;

impl ProtocolPlugin for TestProtocol {
    fn build(&self, protocol: &mut Protocol) -> Result<(), ProtocolError> {
        use PrimitiveKind::*;

        protocol.add_types(vec![
            TypeDef::alias(1, "ENTITY_ID", "INT32"),
            TypeDef::fixed_dict(2, "ITEM", vec![("id", "UINT64"), ("count", "UINT16")]),
            TypeDef::array(3, "ITEM_LIST", "ITEM"),
        ])?;
        let item_list = protocol.wire_type("ITEM_LIST")?;
        let entity_id = protocol.wire_type("ENTITY_ID")?;

        protocol.add_entity_class(
            EntityClassDescriptor::builder(ACCOUNT_CLASS_ID, "Account")
                .property(1, "level", t(UInt16))
                .property(2, "accountName", t(Unicode))
                .property(3, "gold", t(UInt32))
                .property(4, "modelScale", t(Float))
                .property(5, "modelID", t(UInt16))
                .base_method(1, "reqAvatarList", vec![])
                .base_method(2, "reqCreateAvatar", vec![t(UInt8), t(Unicode)])
                .cell_method(3, "relive", vec![t(UInt8)])
                .client_method(10, "onReqAvatarList", vec![t(Unicode)])
                .client_method(11, "onCreateAvatarResult", vec![t(UInt8), entity_id])
                .build()?,
        )?;
        protocol.add_entity_class(
            EntityClassDescriptor::builder(AVATAR_CLASS_ID, "Avatar")
                .property(41, "HP", t(Int32))
                .property(42, "items", item_list)
                .component(43, "bag", "Bag")
                .client_method(20, "onDamage", vec![t(Int32), t(Float)])
                .build()?,
        )?;
        protocol.add_entity_class(
            EntityClassDescriptor::builder(MONSTER_CLASS_ID, "Monster")
                .property(51, "HP", t(Int32))
                .property(52, "name", t(Unicode))
                .build()?,
        )?;
        protocol.add_entity_class(
            EntityClassDescriptor::component_builder(BAG_CLASS_ID, "Bag")
                .property(61, "capacity", t(UInt16))
                .property(62, "weight", t(Float))
                .client_method(70, "onFull", vec![t(UInt16)])
                .build()?,
        )?;
        Ok(())
    }
}

pub fn protocol() -> Arc<Protocol> {
    let mut protocol = Protocol::builder();
    protocol
        .add_predefined_messages()
        .expect("predefined messages")
        .add_plugin(TestProtocol)
        .expect("test protocol");
    protocol.lock().expect("protocol locks");
    Arc::new(protocol.build())
}
