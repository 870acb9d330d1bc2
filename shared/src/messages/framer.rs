use log::{trace, warn};

use kbe_serde::ByteReader;

use crate::messages::{
    error::FrameError,
    message::{Message, EXTENDED_LENGTH_MARKER},
    message_specs::MessageSpecs,
};

/// The result of framing one buffer
#[derive(Debug, Default)]
pub struct DecodedFrames {
    pub messages: Vec<Message>,
    /// Set when framing stopped on an error; everything after the last good frame was discarded
    pub error: Option<FrameError>,
    /// Bytes the caller may drop from the front of its buffer
    pub consumed: usize,
}

/// Decodes the frame at the front of `bytes`.
///
/// Returns `Ok(None)` when `bytes` holds only part of a frame.
pub fn decode_frame(
    specs: &MessageSpecs,
    bytes: &[u8],
) -> Result<Option<(Message, usize)>, FrameError> {
    let mut reader = ByteReader::new(bytes);
    let Ok(id) = reader.read_u16() else {
        return Ok(None);
    };
    let spec = specs.get(id).ok_or(FrameError::UnknownMessageId {
        id,
        discarded: bytes.len(),
    })?;

    if spec.is_variable() {
        let Ok(short_length) = reader.read_u16() else {
            return Ok(None);
        };
        let length = if short_length == EXTENDED_LENGTH_MARKER {
            let Ok(extended) = reader.read_u32() else {
                return Ok(None);
            };
            extended as usize
        } else {
            usize::from(short_length)
        };
        let Ok(payload) = reader.read_bytes(length) else {
            return Ok(None);
        };
        let message = Message::from_payload(spec.clone(), payload.to_vec())?;
        return Ok(Some((message, reader.position())));
    }

    if let Some(size) = spec.fixed_size() {
        if reader.remaining() < size {
            return Ok(None);
        }
    }
    let mut fields = Vec::with_capacity(spec.fields().len());
    for (index, wire_type) in spec.fields().iter().enumerate() {
        match wire_type.decode(&mut reader) {
            Ok(value) => fields.push(value),
            Err(err) if err.is_incomplete() => return Ok(None),
            Err(source) => {
                return Err(FrameError::FieldDecode {
                    id,
                    name: spec.name().to_string(),
                    index,
                    source,
                })
            }
        }
    }
    let message = Message::new(spec.clone(), fields)?;
    Ok(Some((message, reader.position())))
}

/// Decodes every complete frame in `bytes`. A trailing partial frame is left unconsumed.
/// On an error, the rest of the buffer is consumed and discarded, since the next frame
/// boundary is unknown.
pub fn decode_frames(specs: &MessageSpecs, bytes: &[u8]) -> DecodedFrames {
    let mut decoded = DecodedFrames::default();
    while decoded.consumed < bytes.len() {
        match decode_frame(specs, &bytes[decoded.consumed..]) {
            Ok(Some((message, length))) => {
                trace!("framed {} ({} bytes)", message.name(), length);
                decoded.consumed += length;
                decoded.messages.push(message);
            }
            Ok(None) => break,
            Err(err) => {
                warn!("{}", err);
                decoded.consumed = bytes.len();
                decoded.error = Some(err);
                break;
            }
        }
    }
    decoded
}

/// Buffers a byte stream across reads and yields complete messages
#[derive(Debug, Default)]
pub struct Framer {
    buffer: Vec<u8>,
}

impl Framer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, specs: &MessageSpecs, chunk: &[u8]) -> DecodedFrames {
        self.buffer.extend_from_slice(chunk);
        let decoded = decode_frames(specs, &self.buffer);
        self.buffer.drain(..decoded.consumed);
        decoded
    }

    /// Bytes held back as the start of an incomplete frame
    pub fn pending_len(&self) -> usize {
        self.buffer.len()
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}
