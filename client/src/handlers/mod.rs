pub mod error;

mod entity_lifecycle;
mod remote_method_call;
mod session;
mod space_data;
mod stream_data;
mod update_data;
mod update_propertys;

use std::collections::HashMap;

use log::{trace, warn};
use once_cell::sync::Lazy;

use kbe_shared::{
    message_ids::client, update_data_variants, ByteReader, EntityId, Message, SerdeErr,
    UpdateDataVariant, Value, WireType,
};

use crate::{
    session::Session,
    world::{entity::Entity, entity_manager::EntityManager, World},
};

use self::error::HandlerError;

/// Outcome of handling one message.
///
/// `success` is false both when handling failed and when the message was queued on a
/// placeholder entity for later replay; `text` says which.
#[derive(Clone, Debug, PartialEq)]
pub struct HandlerResult {
    pub success: bool,
    pub result: Option<Value>,
    pub text: String,
}

impl HandlerResult {
    pub fn ok() -> Self {
        Self {
            success: true,
            result: None,
            text: String::new(),
        }
    }

    pub fn ok_with(result: Value) -> Self {
        Self {
            success: true,
            result: Some(result),
            text: String::new(),
        }
    }

    pub fn queued(message: &Message, entity_id: EntityId) -> Self {
        Self {
            success: false,
            result: None,
            text: format!(
                "Entity {} is not initialized yet, {} queued for replay",
                entity_id,
                message.name()
            ),
        }
    }

    pub fn failure(error: &HandlerError) -> Self {
        Self {
            success: false,
            result: None,
            text: error.to_string(),
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }
}

/// Every server message the client knows how to apply
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HandlerKind {
    HelloCb,
    VersionNotMatch,
    ScriptVersionNotMatch,
    LoginSuccessfully,
    LoginFailed,
    LoginBaseappFailed,
    ReloginBaseappFailed,
    ReloginBaseappSuccessfully,
    Kicked,
    AppActiveTickCb,
    CreateAccountResult,
    CreatedProxies,
    EntityEnterWorld,
    EntityLeaveWorld,
    EntityLeaveWorldOptimized,
    EntityEnterSpace,
    EntityLeaveSpace,
    EntityDestroyed,
    ControlEntity,
    UpdatePropertys,
    UpdatePropertysOptimized,
    RemoteMethodCall,
    RemoteMethodCallOptimized,
    UpdateBasePos,
    UpdateBasePosXz,
    UpdateBaseDir,
    SetEntityPosAndDir,
    UpdateData(UpdateDataVariant),
    InitSpaceData,
    SetSpaceData,
    DelSpaceData,
    StreamDataStarted,
    StreamDataRecv,
    StreamDataCompleted,
}

static HANDLERS: Lazy<HashMap<u16, HandlerKind>> = Lazy::new(|| {
    use HandlerKind::*;

    let mut handlers = HashMap::from([
        (client::ON_HELLO_CB, HelloCb),
        (client::ON_VERSION_NOT_MATCH, VersionNotMatch),
        (client::ON_SCRIPT_VERSION_NOT_MATCH, ScriptVersionNotMatch),
        (client::ON_LOGIN_SUCCESSFULLY, LoginSuccessfully),
        (client::ON_LOGIN_FAILED, LoginFailed),
        (client::ON_LOGIN_BASEAPP_FAILED, LoginBaseappFailed),
        (client::ON_RELOGIN_BASEAPP_FAILED, ReloginBaseappFailed),
        (client::ON_RELOGIN_BASEAPP_SUCCESSFULLY, ReloginBaseappSuccessfully),
        (client::ON_KICKED, Kicked),
        (client::ON_APP_ACTIVE_TICK_CB, AppActiveTickCb),
        (client::ON_CREATE_ACCOUNT_RESULT, CreateAccountResult),
        (client::ON_CREATED_PROXIES, CreatedProxies),
        (client::ON_ENTITY_ENTER_WORLD, EntityEnterWorld),
        (client::ON_ENTITY_LEAVE_WORLD, EntityLeaveWorld),
        (client::ON_ENTITY_LEAVE_WORLD_OPTIMIZED, EntityLeaveWorldOptimized),
        (client::ON_ENTITY_ENTER_SPACE, EntityEnterSpace),
        (client::ON_ENTITY_LEAVE_SPACE, EntityLeaveSpace),
        (client::ON_ENTITY_DESTROYED, EntityDestroyed),
        (client::ON_CONTROL_ENTITY, ControlEntity),
        (client::ON_UPDATE_PROPERTYS, UpdatePropertys),
        (client::ON_UPDATE_PROPERTYS_OPTIMIZED, UpdatePropertysOptimized),
        (client::ON_REMOTE_METHOD_CALL, RemoteMethodCall),
        (client::ON_REMOTE_METHOD_CALL_OPTIMIZED, RemoteMethodCallOptimized),
        (client::ON_UPDATE_BASE_POS, UpdateBasePos),
        (client::ON_UPDATE_BASE_POS_XZ, UpdateBasePosXz),
        (client::ON_UPDATE_BASE_DIR, UpdateBaseDir),
        (client::ON_SET_ENTITY_POS_AND_DIR, SetEntityPosAndDir),
        (client::INIT_SPACE_DATA, InitSpaceData),
        (client::SET_SPACE_DATA, SetSpaceData),
        (client::DEL_SPACE_DATA, DelSpaceData),
        (client::ON_STREAM_DATA_STARTED, StreamDataStarted),
        (client::ON_STREAM_DATA_RECV, StreamDataRecv),
        (client::ON_STREAM_DATA_COMPLETED, StreamDataCompleted),
    ]);
    for variant in update_data_variants() {
        handlers.insert(variant.id, UpdateData(variant));
    }
    handlers
});

impl HandlerKind {
    pub fn for_id(id: u16) -> Option<HandlerKind> {
        HANDLERS.get(&id).copied()
    }

    /// Applies `message`. Failures come back as an unsuccessful result, never as a panic.
    pub fn handle(
        self,
        world: &mut World,
        session: &mut Session,
        message: &Message,
    ) -> HandlerResult {
        trace!("handling {} ({} byte payload)", message.name(), message.payload().len());
        match self.apply(world, session, message) {
            Ok(result) => result,
            Err(error) => {
                warn!("{} failed: {}", message.name(), error);
                HandlerResult::failure(&error)
            }
        }
    }

    fn apply(
        self,
        world: &mut World,
        session: &mut Session,
        message: &Message,
    ) -> Result<HandlerResult, HandlerError> {
        use HandlerKind::*;

        match self {
            HelloCb => session::on_hello_cb(session, message),
            VersionNotMatch => session::on_version_not_match(session, message),
            ScriptVersionNotMatch => session::on_script_version_not_match(session, message),
            LoginSuccessfully => session::on_login_successfully(session, message),
            LoginFailed => session::on_login_failed(session, message),
            LoginBaseappFailed | ReloginBaseappFailed => {
                session::on_login_baseapp_failed(session, message)
            }
            ReloginBaseappSuccessfully => {
                session::on_relogin_baseapp_successfully(session, message)
            }
            Kicked => session::on_kicked(session, message),
            AppActiveTickCb => session::on_app_active_tick_cb(session),
            CreateAccountResult => session::on_create_account_result(session, message),
            CreatedProxies => entity_lifecycle::on_created_proxies(world, session, message),
            EntityEnterWorld => entity_lifecycle::on_entity_enter_world(world, message),
            EntityLeaveWorld => entity_lifecycle::on_entity_leave_world(world, message, false),
            EntityLeaveWorldOptimized => {
                entity_lifecycle::on_entity_leave_world(world, message, true)
            }
            EntityEnterSpace => entity_lifecycle::on_entity_enter_space(world, message),
            EntityLeaveSpace => entity_lifecycle::on_entity_leave_space(world, message),
            EntityDestroyed => entity_lifecycle::on_entity_destroyed(world, message),
            ControlEntity => entity_lifecycle::on_control_entity(world, message),
            UpdatePropertys => update_propertys::on_update_propertys(world, message, false),
            UpdatePropertysOptimized => update_propertys::on_update_propertys(world, message, true),
            RemoteMethodCall => remote_method_call::on_remote_method_call(world, message, false),
            RemoteMethodCallOptimized => {
                remote_method_call::on_remote_method_call(world, message, true)
            }
            UpdateBasePos => update_data::on_update_base_pos(world, message, true),
            UpdateBasePosXz => update_data::on_update_base_pos(world, message, false),
            UpdateBaseDir => update_data::on_update_base_dir(world, message),
            SetEntityPosAndDir => update_data::on_set_entity_pos_and_dir(world, message),
            UpdateData(variant) => update_data::on_update_data(world, message, variant),
            InitSpaceData => space_data::on_init_space_data(world, message),
            SetSpaceData => space_data::on_set_space_data(world, message),
            DelSpaceData => space_data::on_del_space_data(world, message),
            StreamDataStarted => stream_data::on_stream_data_started(world, message),
            StreamDataRecv => stream_data::on_stream_data_recv(world, message),
            StreamDataCompleted => stream_data::on_stream_data_completed(world, message),
        }
    }
}

/// Reads a variable-length payload, tagging every failure with the message name
pub(crate) struct Payload<'a> {
    name: &'a str,
    reader: ByteReader<'a>,
}

macro_rules! payload_read {
    { $($name:ident => $read:ident, $t:ty;)* } => {
        $(
            pub fn $name(&mut self) -> Result<$t, HandlerError> {
                let result = self.reader.$read();
                self.check(result)
            }
        )*
    };
}

impl<'a> Payload<'a> {
    pub fn new(message: &'a Message) -> Self {
        Self {
            name: message.name(),
            reader: message.reader(),
        }
    }

    fn check<T>(&self, result: Result<T, SerdeErr>) -> Result<T, HandlerError> {
        result.map_err(|err| HandlerError::payload(self.name, err))
    }

    payload_read! {
        u8 => read_u8, u8;
        i8 => read_i8, i8;
        u16 => read_u16, u16;
        i16 => read_i16, i16;
        u32 => read_u32, u32;
        i32 => read_i32, i32;
        u64 => read_u64, u64;
        f32 => read_f32, f32;
    }

    /// NUL-terminated string, decoded lossily
    pub fn string(&mut self) -> Result<String, HandlerError> {
        let result = self.reader.read_cstring();
        let bytes = self.check(result)?;
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }

    /// u32 length, then bytes
    pub fn blob(&mut self) -> Result<Vec<u8>, HandlerError> {
        let result = self.reader.read_blob();
        Ok(self.check(result)?.to_vec())
    }

    pub fn value(&mut self, wire_type: &WireType) -> Result<Value, HandlerError> {
        wire_type
            .decode(&mut self.reader)
            .map_err(|err| HandlerError::payload(self.name, err))
    }

    /// A property, method or class id: one byte when aliased, two otherwise
    pub fn uid(&mut self, aliased: bool) -> Result<u16, HandlerError> {
        if aliased {
            self.u8().map(u16::from)
        } else {
            self.u16()
        }
    }

    /// An entity id that may be sent as a one-byte alias. Whether it is depends on the alias
    /// table at the time this message is read.
    pub fn entity_id(&mut self, entities: &EntityManager) -> Result<EntityId, HandlerError> {
        if entities.can_use_alias_for_entity_id() {
            let alias = self.u8()?;
            Ok(entities.resolve_alias(alias)?)
        } else {
            self.i32()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.reader.is_empty()
    }
}

/// An integer field of a fixed-length message
pub(crate) fn field<T: TryFrom<i64>>(message: &Message, index: usize) -> Result<T, HandlerError> {
    message
        .field(index)
        .and_then(Value::as_i64)
        .and_then(|value| T::try_from(value).ok())
        .ok_or_else(|| HandlerError::MissingField {
            message: message.name().to_string(),
            index,
        })
}

/// Where an entity-targeted message ends up
pub(crate) enum Target<'a> {
    Live(&'a mut Entity),
    /// Queued on a placeholder
    Queued,
    /// Dropped with a warning
    Destroyed,
}

/// Routes a message to its entity, queueing it on a placeholder when the class is not known yet
pub(crate) fn target<'a>(
    entities: &'a mut EntityManager,
    entity_id: EntityId,
    message: &Message,
) -> Target<'a> {
    let entity = entities.get_entity(entity_id);
    if entity.is_placeholder() {
        entity.queue(message.clone());
        return Target::Queued;
    }
    if entity.is_destroyed() {
        warn!("dropping {} for destroyed entity {}", message.name(), entity_id);
        return Target::Destroyed;
    }
    Target::Live(entity)
}

/// Unwraps a [`Target`] inside a handler, returning early unless the entity is live
macro_rules! live_entity {
    ($target:expr, $message:expr, $entity_id:expr) => {
        match $target {
            $crate::handlers::Target::Live(entity) => entity,
            $crate::handlers::Target::Queued => {
                return Ok($crate::handlers::HandlerResult::queued($message, $entity_id))
            }
            $crate::handlers::Target::Destroyed => {
                return Ok($crate::handlers::HandlerResult::ok()
                    .with_text(format!("Entity {} is destroyed", $entity_id)))
            }
        }
    };
}
pub(crate) use live_entity;
