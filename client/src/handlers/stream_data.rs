use log::debug;

use kbe_shared::{Message, StreamId, Value};

use crate::{
    handlers::{error::HandlerError, field, HandlerResult, Payload},
    world::{stream_data::StreamType, World},
};

/// Stream id, total size, description, stream type
pub(crate) fn on_stream_data_started(
    world: &mut World,
    message: &Message,
) -> Result<HandlerResult, HandlerError> {
    let mut payload = Payload::new(message);
    let stream_id = payload.i16()?;
    let size = payload.u32()?;
    let description = payload.string()?;
    let stream_type = StreamType::from(payload.i8()?);
    debug!(
        "stream {} started: {} bytes of {:?} ({})",
        stream_id, size, stream_type, description
    );
    world
        .streams
        .start(stream_id, size as usize, description, stream_type);
    Ok(HandlerResult::ok())
}

/// Stream id, then one length-prefixed chunk
pub(crate) fn on_stream_data_recv(
    world: &mut World,
    message: &Message,
) -> Result<HandlerResult, HandlerError> {
    let mut payload = Payload::new(message);
    let stream_id = payload.i16()?;
    let chunk = payload.blob()?;
    if !world.streams.append(stream_id, &chunk) {
        return Err(HandlerError::UnknownStream { stream_id });
    }
    Ok(HandlerResult::ok())
}

pub(crate) fn on_stream_data_completed(
    world: &mut World,
    message: &Message,
) -> Result<HandlerResult, HandlerError> {
    let stream_id: StreamId = field(message, 0)?;
    let completed = world
        .streams
        .complete(stream_id)
        .ok_or(HandlerError::UnknownStream { stream_id })?;
    debug!("stream {} completed, {} bytes", stream_id, completed.data.len());
    Ok(HandlerResult::ok_with(Value::Blob(completed.data.clone())))
}
