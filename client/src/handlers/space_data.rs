use log::debug;

use kbe_shared::{Message, Value};

use crate::{
    handlers::{error::HandlerError, HandlerResult, Payload},
    world::World,
};

/// Space id, then (key, value) string pairs until the payload runs out
pub(crate) fn on_init_space_data(
    world: &mut World,
    message: &Message,
) -> Result<HandlerResult, HandlerError> {
    let mut payload = Payload::new(message);
    let space_id = payload.u32()?;
    let mut pairs = Vec::new();
    while !payload.is_empty() {
        let key = payload.string()?;
        let value = payload.string()?;
        pairs.push((key, value));
    }
    debug!("space {} initialized with {} entries", space_id, pairs.len());
    let count = pairs.len();
    world.spaces.init(space_id, pairs);
    Ok(HandlerResult::ok_with(Value::UInt32(space_id)).with_text(format!("{} entries", count)))
}

pub(crate) fn on_set_space_data(
    world: &mut World,
    message: &Message,
) -> Result<HandlerResult, HandlerError> {
    let mut payload = Payload::new(message);
    let space_id = payload.u32()?;
    let key = payload.string()?;
    let value = payload.string()?;
    debug!("space {} {} = {}", space_id, key, value);
    world.spaces.set(space_id, key, value);
    Ok(HandlerResult::ok_with(Value::UInt32(space_id)))
}

pub(crate) fn on_del_space_data(
    world: &mut World,
    message: &Message,
) -> Result<HandlerResult, HandlerError> {
    let mut payload = Payload::new(message);
    let space_id = payload.u32()?;
    let key = payload.string()?;
    world.spaces.del(space_id, &key);
    Ok(HandlerResult::ok_with(Value::UInt32(space_id)))
}
