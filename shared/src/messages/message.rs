use std::sync::Arc;

use kbe_serde::{ByteReader, ByteWriter};

use crate::{
    messages::{error::FrameError, message_spec::MessageSpec},
    wire::{Value, WireError},
};

/// Largest payload a frame can carry with the extended length
pub const MAX_PAYLOAD_LENGTH: usize = u32::MAX as usize;
/// A u16 length of this value announces a u32 extended length
pub const EXTENDED_LENGTH_MARKER: u16 = u16::MAX;

/// A decoded message: its spec and one value per framed field
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    spec: Arc<MessageSpec>,
    fields: Vec<Value>,
}

impl Message {
    pub fn new(spec: Arc<MessageSpec>, fields: Vec<Value>) -> Result<Self, FrameError> {
        if fields.len() != spec.fields().len() {
            return Err(FrameError::ArityMismatch {
                id: spec.id(),
                name: spec.name().to_string(),
                expected: spec.fields().len(),
                found: fields.len(),
            });
        }
        Ok(Self { spec, fields })
    }

    /// A variable-length message carrying `payload` as-is
    pub fn from_payload(spec: Arc<MessageSpec>, payload: Vec<u8>) -> Result<Self, FrameError> {
        if !spec.is_variable() {
            return Err(FrameError::NotVariable {
                id: spec.id(),
                name: spec.name().to_string(),
            });
        }
        Ok(Self {
            spec,
            fields: vec![Value::Blob(payload)],
        })
    }

    /// Builds a message from its logical arguments, encoding them into the payload of a
    /// variable-length message
    pub fn from_args(spec: Arc<MessageSpec>, args: &[Value]) -> Result<Self, FrameError> {
        if args.len() != spec.args().len() {
            return Err(FrameError::ArityMismatch {
                id: spec.id(),
                name: spec.name().to_string(),
                expected: spec.args().len(),
                found: args.len(),
            });
        }
        if !spec.is_variable() {
            return Self::new(spec, args.to_vec());
        }
        let mut writer = ByteWriter::new();
        for (value, wire_type) in args.iter().zip(spec.args()) {
            wire_type
                .encode(value, &mut writer)
                .map_err(|source| FrameError::Encode {
                    id: spec.id(),
                    name: spec.name().to_string(),
                    source,
                })?;
        }
        Self::from_payload(spec, writer.to_bytes())
    }

    pub fn id(&self) -> u16 {
        self.spec.id()
    }

    pub fn name(&self) -> &str {
        self.spec.name()
    }

    pub fn spec(&self) -> &Arc<MessageSpec> {
        &self.spec
    }

    pub fn fields(&self) -> &[Value] {
        &self.fields
    }

    pub fn field(&self, index: usize) -> Option<&Value> {
        self.fields.get(index)
    }

    /// The raw payload of a variable-length message; empty for fixed-length messages
    pub fn payload(&self) -> &[u8] {
        if !self.spec.is_variable() {
            return &[];
        }
        self.fields
            .first()
            .and_then(Value::as_bytes)
            .unwrap_or(&[])
    }

    pub fn reader(&self) -> ByteReader<'_> {
        ByteReader::new(self.payload())
    }

    /// Decodes the payload against the message spec's argument types. Fixed-length messages return
    /// their fields.
    pub fn args(&self) -> Result<Vec<Value>, WireError> {
        if !self.spec.is_variable() {
            return Ok(self.fields.clone());
        }
        let mut reader = self.reader();
        self.spec
            .args()
            .iter()
            .map(|wire_type| wire_type.decode(&mut reader))
            .collect()
    }

    /// Each field paired with the type that re-encodes it
    pub fn typed_fields(&self) -> impl Iterator<Item = (&Value, &crate::wire::WireType)> {
        self.fields.iter().zip(self.spec.fields())
    }

    /// Encodes the whole frame: id, length when variable, then the body
    pub fn encode(&self) -> Result<Vec<u8>, FrameError> {
        let mut writer = ByteWriter::new();
        writer.write_u16(self.id());
        if self.spec.is_variable() {
            let payload = self.payload();
            write_length(&mut writer, payload.len())?;
            writer.write_bytes(payload);
        } else {
            for (value, wire_type) in self.typed_fields() {
                wire_type
                    .encode(value, &mut writer)
                    .map_err(|source| FrameError::Encode {
                        id: self.id(),
                        name: self.name().to_string(),
                        source,
                    })?;
            }
        }
        Ok(writer.to_bytes())
    }
}

fn write_length(writer: &mut ByteWriter, length: usize) -> Result<(), FrameError> {
    if length < usize::from(EXTENDED_LENGTH_MARKER) {
        writer.write_u16(length as u16);
        return Ok(());
    }
    let extended =
        u32::try_from(length).map_err(|_| FrameError::PayloadTooLarge { length })?;
    writer.write_u16(EXTENDED_LENGTH_MARKER);
    writer.write_u32(extended);
    Ok(())
}
