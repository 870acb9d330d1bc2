use log::{debug, info};

use kbe_shared::{EntityId, Message, Value};

use crate::{
    handlers::{error::HandlerError, field, live_entity, target, HandlerResult, Payload},
    session::Session,
    world::World,
};

/// The server created the player. Replays whatever was queued on its placeholder.
pub(crate) fn on_created_proxies(
    world: &mut World,
    session: &mut Session,
    message: &Message,
) -> Result<HandlerResult, HandlerError> {
    let mut payload = Payload::new(message);
    let relogin_key = payload.u64()?;
    let entity_id = payload.i32()?;
    let class_name = payload.string()?;

    session.relogin_key = Some(relogin_key);
    let entities = &mut world.entities;
    let replayed = entities.initialize_entity(entity_id, &class_name)?;
    entities.set_player(entity_id)?;
    info!("player {} created as {}", entity_id, class_name);
    Ok(HandlerResult::ok_with(Value::Int32(entity_id))
        .with_text(format!("{} queued message(s) replayed", replayed)))
}

/// Entities other than the player are first initialized here
pub(crate) fn on_entity_enter_world(
    world: &mut World,
    message: &Message,
) -> Result<HandlerResult, HandlerError> {
    let entities = &mut world.entities;
    let settings = *entities.settings();
    let protocol = entities.protocol().clone();

    let mut payload = Payload::new(message);
    let entity_id = payload.i32()?;
    let aliased = protocol.entity_defs.uses_class_alias(settings.entity_def_alias_id);
    let class_id = payload.uid(aliased)?;
    // the server omits the trailing flag when it is not set
    let is_on_ground = if payload.is_empty() {
        false
    } else {
        payload.i8()? > 0
    };

    let class = protocol.entity_defs.class_by_id(class_id)?;
    let live_player = entities.is_player(entity_id)
        && entities
            .entity(entity_id)
            .map_or(false, |entity| entity.is_initialized());
    if !live_player {
        entities.initialize_entity(entity_id, class.name())?;
    }
    entities.enter_world(entity_id, is_on_ground);
    debug!(
        "entity {} ({}) entered world, on ground: {}",
        entity_id,
        class.name(),
        is_on_ground
    );
    Ok(HandlerResult::ok_with(Value::Int32(entity_id)))
}

pub(crate) fn on_entity_leave_world(
    world: &mut World,
    message: &Message,
    optimized: bool,
) -> Result<HandlerResult, HandlerError> {
    let entity_id: EntityId = if optimized {
        Payload::new(message).entity_id(&world.entities)?
    } else {
        field(message, 0)?
    };
    world.entities.leave_world(entity_id);
    debug!("entity {} left world", entity_id);
    Ok(HandlerResult::ok_with(Value::Int32(entity_id)))
}

pub(crate) fn on_entity_enter_space(
    world: &mut World,
    message: &Message,
) -> Result<HandlerResult, HandlerError> {
    let mut payload = Payload::new(message);
    let entity_id = payload.i32()?;
    let space_id = payload.u32()?;
    let is_on_ground = if payload.is_empty() {
        None
    } else {
        Some(payload.i8()? > 0)
    };

    let entity = live_entity!(target(&mut world.entities, entity_id, message), message, entity_id);
    entity.enter_space(space_id, is_on_ground);
    debug!("entity {} entered space {}", entity_id, space_id);
    Ok(HandlerResult::ok_with(Value::UInt32(space_id)))
}

pub(crate) fn on_entity_leave_space(
    world: &mut World,
    message: &Message,
) -> Result<HandlerResult, HandlerError> {
    let entity_id: EntityId = field(message, 0)?;
    let is_player = world.entities.is_player(entity_id);
    let entity = live_entity!(target(&mut world.entities, entity_id, message), message, entity_id);
    let space_id = entity.space_id();
    entity.leave_space();
    if let (true, Some(space_id)) = (is_player, space_id) {
        world.spaces.clear_space(space_id);
    }
    Ok(HandlerResult::ok())
}

/// Always succeeds, whatever state the entity is in
pub(crate) fn on_entity_destroyed(
    world: &mut World,
    message: &Message,
) -> Result<HandlerResult, HandlerError> {
    let entity_id: EntityId = field(message, 0)?;
    world.entities.destroy_entity(entity_id);
    Ok(HandlerResult::ok_with(Value::Int32(entity_id)))
}

pub(crate) fn on_control_entity(
    world: &mut World,
    message: &Message,
) -> Result<HandlerResult, HandlerError> {
    let entity_id: EntityId = field(message, 0)?;
    let is_controlled: i8 = field(message, 1)?;
    let entity = live_entity!(target(&mut world.entities, entity_id, message), message, entity_id);
    entity.set_controlled(is_controlled > 0);
    Ok(HandlerResult::ok())
}
