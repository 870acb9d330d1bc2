use crate::{
    messages::{
        message_ids::{baseapp, client, loginapp},
        message_spec::MessageSpec,
    },
    wire::{PrimitiveKind, WireType},
};

/// Which position axes an `onUpdateData` variant carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionFields {
    None,
    /// x then z
    Xz,
    /// x, z, then y
    Xyz,
}

/// Which rotation axes an `onUpdateData` variant carries, in wire order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectionFields {
    pub yaw: bool,
    pub pitch: bool,
    pub roll: bool,
}

impl DirectionFields {
    const fn new(yaw: bool, pitch: bool, roll: bool) -> Self {
        Self { yaw, pitch, roll }
    }

    pub fn count(&self) -> usize {
        usize::from(self.yaw) + usize::from(self.pitch) + usize::from(self.roll)
    }

    fn suffix(&self) -> &'static str {
        match (self.yaw, self.pitch, self.roll) {
            (true, true, true) => "_ypr",
            (true, true, false) => "_yp",
            (true, false, true) => "_yr",
            (false, true, true) => "_pr",
            (true, false, false) => "_y",
            (false, true, false) => "_p",
            (false, false, true) => "_r",
            (false, false, false) => "",
        }
    }
}

/// One member of the `onUpdateData` family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateDataVariant {
    pub id: u16,
    pub position: PositionFields,
    pub direction: DirectionFields,
}

impl UpdateDataVariant {
    pub fn name(&self) -> String {
        let position = match self.position {
            PositionFields::None => "",
            PositionFields::Xz => "_xz",
            PositionFields::Xyz => "_xyz",
        };
        format!("Client_onUpdateData{}{}", position, self.direction.suffix())
    }

    /// Number of f32 values after the entity id
    pub fn float_count(&self) -> usize {
        let position = match self.position {
            PositionFields::None => 0,
            PositionFields::Xz => 2,
            PositionFields::Xyz => 3,
        };
        position + self.direction.count()
    }
}

const DIRECTIONS: [DirectionFields; 8] = [
    DirectionFields::new(false, false, false),
    DirectionFields::new(true, true, true),
    DirectionFields::new(true, true, false),
    DirectionFields::new(true, false, true),
    DirectionFields::new(false, true, true),
    DirectionFields::new(true, false, false),
    DirectionFields::new(false, true, false),
    DirectionFields::new(false, false, true),
];

const POSITIONS: [PositionFields; 3] = [
    PositionFields::None,
    PositionFields::Xz,
    PositionFields::Xyz,
];

/// The `onUpdateData` variants, numbered from `ON_UPDATE_DATA` in position-major order
pub fn update_data_variants() -> impl Iterator<Item = UpdateDataVariant> {
    POSITIONS
        .iter()
        .flat_map(|position| DIRECTIONS.iter().map(move |direction| (*position, *direction)))
        .enumerate()
        .map(|(offset, (position, direction))| UpdateDataVariant {
            id: client::ON_UPDATE_DATA + offset as u16,
            position,
            direction,
        })
}

pub fn update_data_variant(id: u16) -> Option<UpdateDataVariant> {
    if !(client::ON_UPDATE_DATA..=client::ON_UPDATE_DATA_LAST).contains(&id) {
        return None;
    }
    update_data_variants().find(|variant| variant.id == id)
}

fn t(kind: PrimitiveKind) -> WireType {
    WireType::primitive(kind)
}

/// The hand-written message catalog
pub fn predefined_specs() -> Vec<MessageSpec> {
    use PrimitiveKind::*;

    let mut specs = vec![
        // login app
        MessageSpec::variable(
            loginapp::REQ_CREATE_ACCOUNT,
            "Loginapp_reqCreateAccount",
            vec![t(String), t(String), t(Blob)],
        ),
        MessageSpec::variable(
            loginapp::LOGIN,
            "Loginapp_login",
            vec![t(Int8), t(Blob), t(String), t(String)],
        )
        .with_description("client type, client data, account name, password"),
        MessageSpec::variable(
            loginapp::HELLO,
            "Loginapp_hello",
            vec![t(String), t(String), t(Blob)],
        )
        .with_description("client version, script version, encrypted key"),
        MessageSpec::fixed(loginapp::ON_CLIENT_ACTIVE_TICK, "Loginapp_onClientActiveTick", vec![]),
        // base app
        MessageSpec::fixed(
            baseapp::LOGOUT_BASEAPP,
            "Baseapp_logoutBaseapp",
            vec![t(UInt64), t(Int32)],
        ),
        MessageSpec::variable(
            baseapp::HELLO,
            "Baseapp_hello",
            vec![t(String), t(String), t(Blob)],
        ),
        MessageSpec::variable(
            baseapp::LOGIN_BASEAPP,
            "Baseapp_loginBaseapp",
            vec![t(String), t(String)],
        ),
        MessageSpec::fixed(baseapp::ON_CLIENT_ACTIVE_TICK, "Baseapp_onClientActiveTick", vec![]),
        MessageSpec::variable(
            baseapp::RELOGIN_BASEAPP,
            "Baseapp_reloginBaseapp",
            vec![t(String), t(String), t(UInt64), t(Int32)],
        ),
        MessageSpec::variable(
            baseapp::ON_REMOTE_CALL_CELL_METHOD_FROM_CLIENT,
            "Baseapp_onRemoteCallCellMethodFromClient",
            vec![],
        )
        .with_description("entity id, component property id, method id, arguments"),
        MessageSpec::variable(
            baseapp::ON_REMOTE_METHOD_CALL,
            "Baseapp_onRemoteMethodCall",
            vec![],
        )
        .with_description("entity id, component property id, method id, arguments"),
        // client
        MessageSpec::fixed(
            client::ON_RELOGIN_BASEAPP_FAILED,
            "Client_onReloginBaseappFailed",
            vec![t(UInt16)],
        ),
        MessageSpec::variable(
            client::ON_LOGIN_SUCCESSFULLY,
            "Client_onLoginSuccessfully",
            vec![t(String), t(String), t(UInt16), t(UInt16), t(Blob)],
        )
        .with_description("account name, base app host, tcp port, udp port, server data"),
        MessageSpec::variable(
            client::ON_LOGIN_FAILED,
            "Client_onLoginFailed",
            vec![t(UInt16), t(Blob)],
        ),
        MessageSpec::variable(
            client::ON_CREATED_PROXIES,
            "Client_onCreatedProxies",
            vec![t(UInt64), t(Int32), t(String)],
        )
        .with_description("reconnect key, entity id, class name"),
        MessageSpec::fixed(
            client::ON_LOGIN_BASEAPP_FAILED,
            "Client_onLoginBaseappFailed",
            vec![t(UInt16)],
        ),
        MessageSpec::variable(client::ON_REMOTE_METHOD_CALL, "Client_onRemoteMethodCall", vec![]),
        MessageSpec::variable(client::ON_ENTITY_ENTER_WORLD, "Client_onEntityEnterWorld", vec![]),
        MessageSpec::fixed(
            client::ON_ENTITY_LEAVE_WORLD,
            "Client_onEntityLeaveWorld",
            vec![t(Int32)],
        ),
        MessageSpec::variable(
            client::ON_ENTITY_LEAVE_WORLD_OPTIMIZED,
            "Client_onEntityLeaveWorldOptimized",
            vec![],
        ),
        MessageSpec::variable(
            client::ON_ENTITY_ENTER_SPACE,
            "Client_onEntityEnterSpace",
            vec![t(Int32), t(UInt32)],
        )
        .with_description("entity id, space id, optional on-ground flag"),
        MessageSpec::variable(client::ON_UPDATE_PROPERTYS, "Client_onUpdatePropertys", vec![]),
        MessageSpec::variable(
            client::ON_UPDATE_PROPERTYS_OPTIMIZED,
            "Client_onUpdatePropertysOptimized",
            vec![],
        ),
        MessageSpec::fixed(
            client::ON_ENTITY_LEAVE_SPACE,
            "Client_onEntityLeaveSpace",
            vec![t(Int32)],
        ),
        MessageSpec::fixed(
            client::ON_ENTITY_DESTROYED,
            "Client_onEntityDestroyed",
            vec![t(Int32)],
        ),
        MessageSpec::variable(
            client::ON_REMOTE_METHOD_CALL_OPTIMIZED,
            "Client_onRemoteMethodCallOptimized",
            vec![],
        ),
        MessageSpec::fixed(client::ON_KICKED, "Client_onKicked", vec![t(UInt16)]),
        MessageSpec::variable(
            client::ON_CREATE_ACCOUNT_RESULT,
            "Client_onCreateAccountResult",
            vec![t(UInt16), t(Blob)],
        ),
        MessageSpec::variable(
            client::ON_STREAM_DATA_STARTED,
            "Client_onStreamDataStarted",
            vec![t(Int16), t(UInt32), t(String), t(Int8)],
        )
        .with_description("stream id, total size, description, stream type"),
        MessageSpec::variable(
            client::ON_STREAM_DATA_RECV,
            "Client_onStreamDataRecv",
            vec![t(Int16), t(Blob)],
        ),
        MessageSpec::fixed(
            client::ON_STREAM_DATA_COMPLETED,
            "Client_onStreamDataCompleted",
            vec![t(Int16)],
        ),
        MessageSpec::variable(
            client::ON_HELLO_CB,
            "Client_onHelloCB",
            vec![t(String), t(String), t(String), t(String), t(Int32)],
        )
        .with_description(
            "server version, script version, protocol digest, entity def digest, component type",
        ),
        MessageSpec::variable(
            client::ON_SCRIPT_VERSION_NOT_MATCH,
            "Client_onScriptVersionNotMatch",
            vec![t(String)],
        ),
        MessageSpec::variable(
            client::ON_VERSION_NOT_MATCH,
            "Client_onVersionNotMatch",
            vec![t(String)],
        ),
        MessageSpec::fixed(client::ON_APP_ACTIVE_TICK_CB, "Client_onAppActiveTickCB", vec![]),
        MessageSpec::variable(
            client::ON_RELOGIN_BASEAPP_SUCCESSFULLY,
            "Client_onReloginBaseappSuccessfully",
            vec![t(UInt64)],
        ),
        MessageSpec::variable(client::INIT_SPACE_DATA, "Client_initSpaceData", vec![])
            .with_description("space id, then (key, value) string pairs to the end"),
        MessageSpec::variable(
            client::SET_SPACE_DATA,
            "Client_setSpaceData",
            vec![t(UInt32), t(String), t(String)],
        ),
        MessageSpec::variable(
            client::DEL_SPACE_DATA,
            "Client_delSpaceData",
            vec![t(UInt32), t(String)],
        ),
        MessageSpec::variable(
            client::ON_UPDATE_BASE_POS,
            "Client_onUpdateBasePos",
            vec![t(Float), t(Float), t(Float)],
        ),
        MessageSpec::variable(
            client::ON_UPDATE_BASE_POS_XZ,
            "Client_onUpdateBasePosXZ",
            vec![t(Float), t(Float)],
        ),
        MessageSpec::variable(
            client::ON_UPDATE_BASE_DIR,
            "Client_onUpdateBaseDir",
            vec![t(Float), t(Float), t(Float)],
        ),
        MessageSpec::variable(
            client::ON_SET_ENTITY_POS_AND_DIR,
            "Client_onSetEntityPosAndDir",
            vec![t(Int32), t(Float), t(Float), t(Float), t(Float), t(Float), t(Float)],
        ),
        MessageSpec::fixed(
            client::ON_CONTROL_ENTITY,
            "Client_onControlEntity",
            vec![t(Int32), t(Int8)],
        ),
    ];

    for variant in update_data_variants() {
        specs.push(MessageSpec::variable(variant.id, variant.name(), vec![]));
    }
    specs
}
