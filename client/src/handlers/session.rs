use std::time::Instant;

use log::{info, warn};

use kbe_shared::{Message, Value};

use crate::{
    client_config::AppAddr,
    handlers::{error::HandlerError, field, HandlerResult, Payload},
    session::Session,
};

pub(crate) fn on_hello_cb(
    session: &mut Session,
    message: &Message,
) -> Result<HandlerResult, HandlerError> {
    let mut payload = Payload::new(message);
    let server_version = payload.string()?;
    let script_version = payload.string()?;
    let protocol_digest = payload.string()?;
    let entity_def_digest = payload.string()?;
    let component_type = payload.i32()?;
    info!(
        "hello accepted by server {} (scripts {}, component type {})",
        server_version, script_version, component_type
    );
    session.server_version = Some(server_version);
    session.server_script_version = Some(script_version);
    session.protocol_digest = Some(protocol_digest);
    session.entity_def_digest = Some(entity_def_digest);
    session.component_type = Some(component_type);
    Ok(HandlerResult::ok())
}

pub(crate) fn on_version_not_match(
    session: &mut Session,
    message: &Message,
) -> Result<HandlerResult, HandlerError> {
    let server_version = Payload::new(message).string()?;
    warn!("server runs version {}, client is incompatible", server_version);
    session.server_version = Some(server_version.clone());
    Ok(HandlerResult::ok_with(Value::String(server_version)))
}

pub(crate) fn on_script_version_not_match(
    session: &mut Session,
    message: &Message,
) -> Result<HandlerResult, HandlerError> {
    let script_version = Payload::new(message).string()?;
    warn!("server runs script version {}, client is incompatible", script_version);
    session.server_script_version = Some(script_version.clone());
    Ok(HandlerResult::ok_with(Value::String(script_version)))
}

pub(crate) fn on_login_successfully(
    session: &mut Session,
    message: &Message,
) -> Result<HandlerResult, HandlerError> {
    let mut payload = Payload::new(message);
    let account = payload.string()?;
    let host = payload.string()?;
    let tcp_port = payload.u16()?;
    let udp_port = payload.u16()?;
    let server_data = payload.blob()?;
    let baseapp = AppAddr::new(host, tcp_port);
    info!("account {} logged in, base app is {}", account, baseapp);
    session.account = Some(account);
    session.baseapp = Some(baseapp);
    session.baseapp_udp_port = Some(udp_port);
    session.server_data = server_data;
    session.last_error_code = None;
    Ok(HandlerResult::ok())
}

pub(crate) fn on_login_failed(
    session: &mut Session,
    message: &Message,
) -> Result<HandlerResult, HandlerError> {
    let mut payload = Payload::new(message);
    let code = payload.u16()?;
    let server_data = payload.blob()?;
    warn!("login failed with error code {}", code);
    session.last_error_code = Some(code);
    session.server_data = server_data;
    Ok(HandlerResult::ok_with(Value::UInt16(code)))
}

/// Shared by the login and relogin failures
pub(crate) fn on_login_baseapp_failed(
    session: &mut Session,
    message: &Message,
) -> Result<HandlerResult, HandlerError> {
    let code: u16 = field(message, 0)?;
    warn!("{} with error code {}", message.name(), code);
    session.last_error_code = Some(code);
    Ok(HandlerResult::ok_with(Value::UInt16(code)))
}

pub(crate) fn on_relogin_baseapp_successfully(
    session: &mut Session,
    message: &Message,
) -> Result<HandlerResult, HandlerError> {
    let key = Payload::new(message).u64()?;
    info!("relogged in to the base app");
    session.relogin_key = Some(key);
    Ok(HandlerResult::ok())
}

pub(crate) fn on_kicked(
    session: &mut Session,
    message: &Message,
) -> Result<HandlerResult, HandlerError> {
    let code: u16 = field(message, 0)?;
    warn!("kicked by the server with error code {}", code);
    session.kicked = true;
    session.last_error_code = Some(code);
    Ok(HandlerResult::ok_with(Value::UInt16(code)))
}

pub(crate) fn on_app_active_tick_cb(session: &mut Session) -> Result<HandlerResult, HandlerError> {
    session.last_active_tick_ack = Some(Instant::now());
    Ok(HandlerResult::ok())
}

pub(crate) fn on_create_account_result(
    session: &mut Session,
    message: &Message,
) -> Result<HandlerResult, HandlerError> {
    let mut payload = Payload::new(message);
    let code = payload.u16()?;
    let data = payload.blob()?;
    info!("create account finished with code {}", code);
    session.create_account_result = Some((code, data));
    Ok(HandlerResult::ok_with(Value::UInt16(code)))
}
