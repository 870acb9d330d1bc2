use glam::{Vec2, Vec3, Vec4};
use log::warn;

use kbe_serde::{ByteReader, ByteWriter, Serde};

use crate::wire::{entity_call::EntityCallRef, error::WireError, value::Value};

/// The fixed catalog of primitive wire types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float,
    Double,
    Bool,
    String,
    Unicode,
    Blob,
    Python,
    PyDict,
    PyTuple,
    PyList,
    Vector2,
    Vector3,
    Vector4,
    EntityCall,
    /// Raw bytes whose length is known from context; consumes the rest of its input
    Uint8Array,
}

impl PrimitiveKind {
    pub const ALL: [PrimitiveKind; 23] = [
        PrimitiveKind::Int8,
        PrimitiveKind::Int16,
        PrimitiveKind::Int32,
        PrimitiveKind::Int64,
        PrimitiveKind::UInt8,
        PrimitiveKind::UInt16,
        PrimitiveKind::UInt32,
        PrimitiveKind::UInt64,
        PrimitiveKind::Float,
        PrimitiveKind::Double,
        PrimitiveKind::Bool,
        PrimitiveKind::String,
        PrimitiveKind::Unicode,
        PrimitiveKind::Blob,
        PrimitiveKind::Python,
        PrimitiveKind::PyDict,
        PrimitiveKind::PyTuple,
        PrimitiveKind::PyList,
        PrimitiveKind::Vector2,
        PrimitiveKind::Vector3,
        PrimitiveKind::Vector4,
        PrimitiveKind::EntityCall,
        PrimitiveKind::Uint8Array,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            PrimitiveKind::Int8 => "INT8",
            PrimitiveKind::Int16 => "INT16",
            PrimitiveKind::Int32 => "INT32",
            PrimitiveKind::Int64 => "INT64",
            PrimitiveKind::UInt8 => "UINT8",
            PrimitiveKind::UInt16 => "UINT16",
            PrimitiveKind::UInt32 => "UINT32",
            PrimitiveKind::UInt64 => "UINT64",
            PrimitiveKind::Float => "FLOAT",
            PrimitiveKind::Double => "DOUBLE",
            PrimitiveKind::Bool => "BOOL",
            PrimitiveKind::String => "STRING",
            PrimitiveKind::Unicode => "UNICODE",
            PrimitiveKind::Blob => "BLOB",
            PrimitiveKind::Python => "PYTHON",
            PrimitiveKind::PyDict => "PY_DICT",
            PrimitiveKind::PyTuple => "PY_TUPLE",
            PrimitiveKind::PyList => "PY_LIST",
            PrimitiveKind::Vector2 => "VECTOR2",
            PrimitiveKind::Vector3 => "VECTOR3",
            PrimitiveKind::Vector4 => "VECTOR4",
            PrimitiveKind::EntityCall => "ENTITYCALL",
            PrimitiveKind::Uint8Array => "UINT8_ARRAY",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|kind| kind.name() == name)
    }

    /// Encoded size when it does not depend on the value
    pub fn fixed_size(&self) -> Option<usize> {
        match self {
            PrimitiveKind::Int8 | PrimitiveKind::UInt8 | PrimitiveKind::Bool => Some(1),
            PrimitiveKind::Int16 | PrimitiveKind::UInt16 => Some(2),
            PrimitiveKind::Int32 | PrimitiveKind::UInt32 | PrimitiveKind::Float => Some(4),
            PrimitiveKind::Int64 | PrimitiveKind::UInt64 | PrimitiveKind::Double => Some(8),
            PrimitiveKind::Vector2 => Some(8),
            PrimitiveKind::Vector3 => Some(12),
            PrimitiveKind::Vector4 | PrimitiveKind::EntityCall => Some(16),
            PrimitiveKind::String
            | PrimitiveKind::Unicode
            | PrimitiveKind::Blob
            | PrimitiveKind::Python
            | PrimitiveKind::PyDict
            | PrimitiveKind::PyTuple
            | PrimitiveKind::PyList
            | PrimitiveKind::Uint8Array => None,
        }
    }

    pub fn default_value(&self) -> Value {
        match self {
            PrimitiveKind::Int8 => Value::Int8(0),
            PrimitiveKind::Int16 => Value::Int16(0),
            PrimitiveKind::Int32 => Value::Int32(0),
            PrimitiveKind::Int64 => Value::Int64(0),
            PrimitiveKind::UInt8 => Value::UInt8(0),
            PrimitiveKind::UInt16 => Value::UInt16(0),
            PrimitiveKind::UInt32 => Value::UInt32(0),
            PrimitiveKind::UInt64 => Value::UInt64(0),
            PrimitiveKind::Float => Value::Float(0.0),
            PrimitiveKind::Double => Value::Double(0.0),
            PrimitiveKind::Bool => Value::Bool(false),
            PrimitiveKind::String => Value::String(String::new()),
            PrimitiveKind::Unicode => Value::Unicode(String::new()),
            PrimitiveKind::Blob | PrimitiveKind::Uint8Array => Value::Blob(Vec::new()),
            PrimitiveKind::Python
            | PrimitiveKind::PyDict
            | PrimitiveKind::PyTuple
            | PrimitiveKind::PyList => Value::Python(Vec::new()),
            PrimitiveKind::Vector2 => Value::Vector2(Vec2::ZERO),
            PrimitiveKind::Vector3 => Value::Vector3(Vec3::ZERO),
            PrimitiveKind::Vector4 => Value::Vector4(Vec4::ZERO),
            PrimitiveKind::EntityCall => Value::EntityCall(EntityCallRef::default()),
        }
    }

    pub(crate) fn decode(
        &self,
        type_name: &str,
        reader: &mut ByteReader,
    ) -> Result<Value, WireError> {
        let value = match self {
            PrimitiveKind::Int8 => Value::Int8(reader.read_i8()?),
            PrimitiveKind::Int16 => Value::Int16(reader.read_i16()?),
            PrimitiveKind::Int32 => Value::Int32(reader.read_i32()?),
            PrimitiveKind::Int64 => Value::Int64(reader.read_i64()?),
            PrimitiveKind::UInt8 => Value::UInt8(reader.read_u8()?),
            PrimitiveKind::UInt16 => Value::UInt16(reader.read_u16()?),
            PrimitiveKind::UInt32 => Value::UInt32(reader.read_u32()?),
            PrimitiveKind::UInt64 => Value::UInt64(reader.read_u64()?),
            PrimitiveKind::Float => Value::Float(reader.read_f32()?),
            PrimitiveKind::Double => Value::Double(reader.read_f64()?),
            PrimitiveKind::Bool => Value::Bool(bool::de(reader)?),
            PrimitiveKind::String => {
                let bytes = reader.read_cstring()?;
                Value::String(String::from_utf8_lossy(bytes).into_owned())
            }
            PrimitiveKind::Unicode => {
                let bytes = reader.read_blob()?;
                let text = std::str::from_utf8(bytes).map_err(|_| WireError::InvalidUtf8 {
                    type_name: type_name.to_string(),
                    length: bytes.len(),
                })?;
                Value::Unicode(text.to_string())
            }
            PrimitiveKind::Blob => Value::Blob(reader.read_blob()?.to_vec()),
            PrimitiveKind::Python
            | PrimitiveKind::PyDict
            | PrimitiveKind::PyTuple
            | PrimitiveKind::PyList => Value::Python(reader.read_blob()?.to_vec()),
            PrimitiveKind::Vector2 => {
                let x = reader.read_f32()?;
                let y = reader.read_f32()?;
                Value::Vector2(Vec2::new(x, y))
            }
            PrimitiveKind::Vector3 => {
                let x = reader.read_f32()?;
                let y = reader.read_f32()?;
                let z = reader.read_f32()?;
                Value::Vector3(Vec3::new(x, y, z))
            }
            PrimitiveKind::Vector4 => {
                let x = reader.read_f32()?;
                let y = reader.read_f32()?;
                let z = reader.read_f32()?;
                let w = reader.read_f32()?;
                Value::Vector4(Vec4::new(x, y, z, w))
            }
            PrimitiveKind::EntityCall => Value::EntityCall(EntityCallRef::de(reader)?),
            PrimitiveKind::Uint8Array => Value::Blob(reader.read_rest().to_vec()),
        };
        Ok(value)
    }

    pub(crate) fn encode(
        &self,
        type_name: &str,
        value: &Value,
        writer: &mut ByteWriter,
    ) -> Result<(), WireError> {
        match self {
            PrimitiveKind::Int8 => writer.write_i8(integer(type_name, value)?),
            PrimitiveKind::Int16 => writer.write_i16(integer(type_name, value)?),
            PrimitiveKind::Int32 => writer.write_i32(integer(type_name, value)?),
            PrimitiveKind::Int64 => writer.write_i64(integer(type_name, value)?),
            PrimitiveKind::UInt8 => writer.write_u8(integer(type_name, value)?),
            PrimitiveKind::UInt16 => writer.write_u16(integer(type_name, value)?),
            PrimitiveKind::UInt32 => writer.write_u32(integer(type_name, value)?),
            PrimitiveKind::UInt64 => writer.write_u64(integer(type_name, value)?),
            PrimitiveKind::Float => writer.write_f32(float(type_name, value)?),
            PrimitiveKind::Double => {
                let wide = value.as_f64().ok_or_else(|| mismatch(type_name, value))?;
                writer.write_f64(wide);
            }
            PrimitiveKind::Bool => {
                let flag = value.as_bool().ok_or_else(|| mismatch(type_name, value))?;
                flag.ser(writer);
            }
            PrimitiveKind::String => {
                let text = value.as_str().ok_or_else(|| mismatch(type_name, value))?;
                if let Some(position) = text.bytes().position(|byte| byte == 0) {
                    return Err(WireError::InteriorNul {
                        type_name: type_name.to_string(),
                        position,
                    });
                }
                writer.write_cstring(text.as_bytes());
            }
            PrimitiveKind::Unicode => {
                let text = value.as_str().ok_or_else(|| mismatch(type_name, value))?;
                writer.write_blob(text.as_bytes())?;
            }
            PrimitiveKind::Blob
            | PrimitiveKind::Python
            | PrimitiveKind::PyDict
            | PrimitiveKind::PyTuple
            | PrimitiveKind::PyList => {
                let bytes = value.as_bytes().ok_or_else(|| mismatch(type_name, value))?;
                writer.write_blob(bytes)?;
            }
            PrimitiveKind::Vector2 => {
                let Value::Vector2(vector) = value else {
                    return Err(mismatch(type_name, value));
                };
                writer.write_f32(vector.x);
                writer.write_f32(vector.y);
            }
            PrimitiveKind::Vector3 => {
                let Value::Vector3(vector) = value else {
                    return Err(mismatch(type_name, value));
                };
                writer.write_f32(vector.x);
                writer.write_f32(vector.y);
                writer.write_f32(vector.z);
            }
            PrimitiveKind::Vector4 => {
                let Value::Vector4(vector) = value else {
                    return Err(mismatch(type_name, value));
                };
                writer.write_f32(vector.x);
                writer.write_f32(vector.y);
                writer.write_f32(vector.z);
                writer.write_f32(vector.w);
            }
            PrimitiveKind::EntityCall => {
                let Value::EntityCall(call) = value else {
                    return Err(mismatch(type_name, value));
                };
                call.ser(writer);
            }
            PrimitiveKind::Uint8Array => {
                let bytes = value.as_bytes().ok_or_else(|| mismatch(type_name, value))?;
                writer.write_bytes(bytes);
            }
        }
        Ok(())
    }
}

fn mismatch(type_name: &str, value: &Value) -> WireError {
    WireError::ValueMismatch {
        type_name: type_name.to_string(),
        found: value.kind_name(),
    }
}

fn integer<T: TryFrom<i128>>(type_name: &str, value: &Value) -> Result<T, WireError> {
    let wide = match value {
        Value::Bool(flag) => i128::from(*flag),
        other => other.as_i128().ok_or_else(|| mismatch(type_name, other))?,
    };
    T::try_from(wide).map_err(|_| WireError::OutOfRange {
        type_name: type_name.to_string(),
        value: wide.to_string(),
    })
}

// Out-of-range doubles become 0.0 instead of failing, so upstream values beyond f32 range
// do not abort the whole message.
fn float(type_name: &str, value: &Value) -> Result<f32, WireError> {
    let wide = value.as_f64().ok_or_else(|| mismatch(type_name, value))?;
    if wide.is_finite() && wide.abs() > f64::from(f32::MAX) {
        warn!(
            "value {} exceeds the range of {}, encoding 0.0 instead",
            wide, type_name
        );
        return Ok(0.0);
    }
    Ok(wide as f32)
}
