use glam::Vec3;

use kbe_shared::{DirectionFields, EntityId, Message, PositionFields, UpdateDataVariant, Value};

use crate::{
    handlers::{error::HandlerError, live_entity, target, HandlerResult, Payload},
    world::{entity::{DIRECTION, POSITION}, World},
};

/// Position of the player's base part: x, y, z, or x, z when `with_y` is false
pub(crate) fn on_update_base_pos(
    world: &mut World,
    message: &Message,
    with_y: bool,
) -> Result<HandlerResult, HandlerError> {
    let mut payload = Payload::new(message);
    let x = payload.f32()?;
    let y = if with_y { Some(payload.f32()?) } else { None };
    let z = payload.f32()?;

    let entity_id = player_id(world, message)?;
    let entity = live_entity!(target(&mut world.entities, entity_id, message), message, entity_id);
    entity.merge_position(Some(x), y, Some(z));
    Ok(HandlerResult::ok_with(Value::Vector3(entity.position())))
}

/// Direction of the player's base part: yaw, pitch, roll
pub(crate) fn on_update_base_dir(
    world: &mut World,
    message: &Message,
) -> Result<HandlerResult, HandlerError> {
    let mut payload = Payload::new(message);
    let yaw = payload.f32()?;
    let pitch = payload.f32()?;
    let roll = payload.f32()?;

    let entity_id = player_id(world, message)?;
    let entity = live_entity!(target(&mut world.entities, entity_id, message), message, entity_id);
    entity.merge_direction(Some(yaw), Some(pitch), Some(roll));
    Ok(HandlerResult::ok_with(Value::Vector3(entity.direction())))
}

/// Replaces both vectors: x, y, z, then yaw, pitch, roll
pub(crate) fn on_set_entity_pos_and_dir(
    world: &mut World,
    message: &Message,
) -> Result<HandlerResult, HandlerError> {
    let mut payload = Payload::new(message);
    let entity_id = payload.i32()?;
    let position = Vec3::new(payload.f32()?, payload.f32()?, payload.f32()?);
    let yaw = payload.f32()?;
    let pitch = payload.f32()?;
    let roll = payload.f32()?;

    let entity = live_entity!(target(&mut world.entities, entity_id, message), message, entity_id);
    entity.update_properties([
        (POSITION.to_string(), Value::Vector3(position)),
        (DIRECTION.to_string(), Value::Vector3(Vec3::new(roll, pitch, yaw))),
    ]);
    Ok(HandlerResult::ok())
}

/// One member of the `onUpdateData` family. Only the axes the variant carries change.
pub(crate) fn on_update_data(
    world: &mut World,
    message: &Message,
    variant: UpdateDataVariant,
) -> Result<HandlerResult, HandlerError> {
    let mut payload = Payload::new(message);
    let entity_id = payload.entity_id(&world.entities)?;

    let (x, y, z) = match variant.position {
        PositionFields::None => (None, None, None),
        PositionFields::Xz => {
            let x = payload.f32()?;
            let z = payload.f32()?;
            (Some(x), None, Some(z))
        }
        PositionFields::Xyz => {
            let x = payload.f32()?;
            let z = payload.f32()?;
            let y = payload.f32()?;
            (Some(x), Some(y), Some(z))
        }
    };
    let (yaw, pitch, roll) = read_direction(&mut payload, variant.direction)?;

    let entity = live_entity!(target(&mut world.entities, entity_id, message), message, entity_id);
    if variant.position != PositionFields::None {
        entity.merge_position(x, y, z);
    }
    if variant.direction.count() > 0 {
        entity.merge_direction(yaw, pitch, roll);
    }
    Ok(HandlerResult::ok())
}

fn read_direction(
    payload: &mut Payload,
    fields: DirectionFields,
) -> Result<(Option<f32>, Option<f32>, Option<f32>), HandlerError> {
    let yaw = if fields.yaw { Some(payload.f32()?) } else { None };
    let pitch = if fields.pitch { Some(payload.f32()?) } else { None };
    let roll = if fields.roll { Some(payload.f32()?) } else { None };
    Ok((yaw, pitch, roll))
}

fn player_id(world: &World, message: &Message) -> Result<EntityId, HandlerError> {
    world
        .entities
        .player_id()
        .ok_or_else(|| HandlerError::NoPlayer {
            message: message.name().to_string(),
        })
}
