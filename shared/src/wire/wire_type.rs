use std::{fmt, sync::Arc};

use once_cell::sync::Lazy;

use kbe_serde::{ByteReader, ByteWriter, ConstByteLength, Serde, SerdeErr};

use crate::wire::{
    entity_component::EntityComponentHeader,
    error::WireError,
    fixed_dict::{FixedDict, FixedDictSpec},
    primitive::PrimitiveKind,
    value::Value,
};

/// How a [`WireType`] turns bytes into a [`Value`] and back
#[derive(Debug, PartialEq)]
pub enum Codec {
    Primitive(PrimitiveKind),
    FixedDict(FixedDictSpec),
    /// u32 element count, then that many elements
    Array(WireType),
    /// Header only; the properties that follow are decoded by the caller against
    /// the component's own class
    EntityComponent,
}

/// A named codec. Cloning is cheap, and aliases share the codec of the type they name.
#[derive(Clone)]
pub struct WireType {
    name: Arc<str>,
    codec: Arc<Codec>,
}

static PRIMITIVES: Lazy<Vec<WireType>> = Lazy::new(|| {
    PrimitiveKind::ALL
        .iter()
        .map(|kind| WireType {
            name: Arc::from(kind.name()),
            codec: Arc::new(Codec::Primitive(*kind)),
        })
        .collect()
});

static ENTITY_COMPONENT: Lazy<WireType> = Lazy::new(|| WireType {
    name: Arc::from("ENTITY_COMPONENT"),
    codec: Arc::new(Codec::EntityComponent),
});

impl WireType {
    /// The process-wide instance of a primitive type
    pub fn primitive(kind: PrimitiveKind) -> WireType {
        PRIMITIVES
            .iter()
            .find(|wire_type| matches!(*wire_type.codec, Codec::Primitive(k) if k == kind))
            .cloned()
            .unwrap_or_else(|| WireType {
                name: Arc::from(kind.name()),
                codec: Arc::new(Codec::Primitive(kind)),
            })
    }

    pub fn primitive_by_name(name: &str) -> Option<WireType> {
        PrimitiveKind::from_name(name).map(WireType::primitive)
    }

    pub fn fixed_dict(name: impl Into<Arc<str>>, spec: FixedDictSpec) -> WireType {
        WireType {
            name: name.into(),
            codec: Arc::new(Codec::FixedDict(spec)),
        }
    }

    pub fn array(name: impl Into<Arc<str>>, element: WireType) -> WireType {
        WireType {
            name: name.into(),
            codec: Arc::new(Codec::Array(element)),
        }
    }

    pub fn entity_component() -> WireType {
        ENTITY_COMPONENT.clone()
    }

    /// A new name over the same codec
    pub fn alias(&self, name: impl Into<Arc<str>>) -> WireType {
        WireType {
            name: name.into(),
            codec: self.codec.clone(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn codec(&self) -> &Codec {
        &self.codec
    }

    pub fn is_entity_component(&self) -> bool {
        matches!(*self.codec, Codec::EntityComponent)
    }

    pub fn is_alias_of(&self, other: &WireType) -> bool {
        Arc::ptr_eq(&self.codec, &other.codec)
    }

    /// Encoded size, when every value of the type has the same size
    pub fn fixed_size(&self) -> Option<usize> {
        match &*self.codec {
            Codec::Primitive(kind) => kind.fixed_size(),
            Codec::FixedDict(spec) => spec
                .fields()
                .iter()
                .map(|(_, field)| field.fixed_size())
                .sum(),
            Codec::Array(_) => None,
            Codec::EntityComponent => Some(EntityComponentHeader::BYTE_LENGTH),
        }
    }

    /// Decodes one value. On failure the reader is left where it was.
    pub fn decode(&self, reader: &mut ByteReader) -> Result<Value, WireError> {
        let mut lookahead = reader.clone();
        let value = self.decode_inner(&mut lookahead)?;
        *reader = lookahead;
        Ok(value)
    }

    /// Decodes one value from the front of `bytes`, returning it with the bytes consumed
    pub fn decode_bytes(&self, bytes: &[u8]) -> Result<(Value, usize), WireError> {
        let mut reader = ByteReader::new(bytes);
        let value = self.decode(&mut reader)?;
        Ok((value, reader.position()))
    }

    fn decode_inner(&self, reader: &mut ByteReader) -> Result<Value, WireError> {
        match &*self.codec {
            Codec::Primitive(kind) => kind.decode(&self.name, reader),
            Codec::FixedDict(spec) => {
                let mut dict = FixedDict::new();
                for (field, field_type) in spec.fields() {
                    let value = field_type.decode_inner(reader)?;
                    dict.insert(field.clone(), value);
                }
                Ok(Value::FixedDict(dict))
            }
            Codec::Array(element) => {
                let count = reader.read_u32()? as usize;
                // every element takes at least one byte, except on a truncated buffer
                let mut items = Vec::with_capacity(count.min(reader.remaining()));
                for _ in 0..count {
                    items.push(element.decode_inner(reader)?);
                }
                Ok(Value::Array(items))
            }
            Codec::EntityComponent => Ok(Value::EntityComponent(EntityComponentHeader::de(
                reader,
            )?)),
        }
    }

    pub fn encode(&self, value: &Value, writer: &mut ByteWriter) -> Result<(), WireError> {
        match &*self.codec {
            Codec::Primitive(kind) => kind.encode(&self.name, value, writer),
            Codec::FixedDict(spec) => {
                let Value::FixedDict(dict) = value else {
                    return Err(self.mismatch(value));
                };
                for (field, field_type) in spec.fields() {
                    let field_value = dict.get(field).ok_or_else(|| WireError::FieldMissing {
                        type_name: self.name.to_string(),
                        field: field.clone(),
                    })?;
                    field_type.encode(field_value, writer)?;
                }
                Ok(())
            }
            Codec::Array(element) => {
                let Value::Array(items) = value else {
                    return Err(self.mismatch(value));
                };
                let count = u32::try_from(items.len()).map_err(|_| SerdeErr::LengthOverflow {
                    length: items.len(),
                    max: u32::MAX as usize,
                })?;
                writer.write_u32(count);
                for item in items {
                    element.encode(item, writer)?;
                }
                Ok(())
            }
            Codec::EntityComponent => {
                let Value::EntityComponent(header) = value else {
                    return Err(self.mismatch(value));
                };
                header.ser(writer);
                Ok(())
            }
        }
    }

    /// Encodes into a fresh buffer; nothing is returned on failure
    pub fn encode_to_vec(&self, value: &Value) -> Result<Vec<u8>, WireError> {
        let mut writer = ByteWriter::new();
        self.encode(value, &mut writer)?;
        Ok(writer.to_bytes())
    }

    pub fn default_value(&self) -> Value {
        match &*self.codec {
            Codec::Primitive(kind) => kind.default_value(),
            Codec::FixedDict(spec) => {
                let mut dict = FixedDict::new();
                for (field, field_type) in spec.fields() {
                    dict.insert(field.clone(), field_type.default_value());
                }
                Value::FixedDict(dict)
            }
            Codec::Array(_) => Value::Array(Vec::new()),
            Codec::EntityComponent => Value::EntityComponent(EntityComponentHeader::default()),
        }
    }

    fn mismatch(&self, value: &Value) -> WireError {
        WireError::ValueMismatch {
            type_name: self.name.to_string(),
            found: value.kind_name(),
        }
    }
}

impl fmt::Debug for WireType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &*self.codec {
            Codec::Primitive(kind) if kind.name() == &*self.name => write!(f, "{}", self.name),
            Codec::Primitive(kind) => write!(f, "{}({})", self.name, kind.name()),
            Codec::FixedDict(_) => write!(f, "{}(FIXED_DICT)", self.name),
            Codec::Array(element) => write!(f, "{}(ARRAY<{:?}>)", self.name, element),
            Codec::EntityComponent => write!(f, "{}", self.name),
        }
    }
}

impl PartialEq for WireType {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && (Arc::ptr_eq(&self.codec, &other.codec) || self.codec == other.codec)
    }
}
