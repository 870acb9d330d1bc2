use glam::{Vec2, Vec3, Vec4};

use crate::wire::{
    entity_call::EntityCallRef, entity_component::EntityComponentHeader, fixed_dict::FixedDict,
};

/// A decoded wire value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    UInt8(u8),
    UInt16(u16),
    UInt32(u32),
    UInt64(u64),
    Float(f32),
    Double(f64),
    Bool(bool),
    String(String),
    Unicode(String),
    Blob(Vec<u8>),
    /// Opaque pickled object, carried as raw bytes
    Python(Vec<u8>),
    Vector2(Vec2),
    Vector3(Vec3),
    Vector4(Vec4),
    EntityCall(EntityCallRef),
    FixedDict(FixedDict),
    Array(Vec<Value>),
    EntityComponent(EntityComponentHeader),
}

impl Value {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Int8(_) => "Int8",
            Value::Int16(_) => "Int16",
            Value::Int32(_) => "Int32",
            Value::Int64(_) => "Int64",
            Value::UInt8(_) => "UInt8",
            Value::UInt16(_) => "UInt16",
            Value::UInt32(_) => "UInt32",
            Value::UInt64(_) => "UInt64",
            Value::Float(_) => "Float",
            Value::Double(_) => "Double",
            Value::Bool(_) => "Bool",
            Value::String(_) => "String",
            Value::Unicode(_) => "Unicode",
            Value::Blob(_) => "Blob",
            Value::Python(_) => "Python",
            Value::Vector2(_) => "Vector2",
            Value::Vector3(_) => "Vector3",
            Value::Vector4(_) => "Vector4",
            Value::EntityCall(_) => "EntityCall",
            Value::FixedDict(_) => "FixedDict",
            Value::Array(_) => "Array",
            Value::EntityComponent(_) => "EntityComponent",
        }
    }

    /// Any integer variant widened to i128
    pub fn as_i128(&self) -> Option<i128> {
        match self {
            Value::Int8(v) => Some(i128::from(*v)),
            Value::Int16(v) => Some(i128::from(*v)),
            Value::Int32(v) => Some(i128::from(*v)),
            Value::Int64(v) => Some(i128::from(*v)),
            Value::UInt8(v) => Some(i128::from(*v)),
            Value::UInt16(v) => Some(i128::from(*v)),
            Value::UInt32(v) => Some(i128::from(*v)),
            Value::UInt64(v) => Some(i128::from(*v)),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        self.as_i128().and_then(|v| i64::try_from(v).ok())
    }

    pub fn as_u64(&self) -> Option<u64> {
        self.as_i128().and_then(|v| u64::try_from(v).ok())
    }

    /// Floats as-is, integers converted
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(f64::from(*v)),
            Value::Double(v) => Some(*v),
            other => other.as_i64().map(|v| v as f64),
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            other => other.as_i128().map(|v| v > 0),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(v) | Value::Unicode(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Blob(v) | Value::Python(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_vector3(&self) -> Option<Vec3> {
        match self {
            Value::Vector3(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_fixed_dict(&self) -> Option<&FixedDict> {
        match self {
            Value::FixedDict(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(v) => Some(v),
            _ => None,
        }
    }
}

macro_rules! impl_from_value {
    { $($t:ty => $variant:ident;)* } => {
        $(
            impl From<$t> for Value {
                fn from(value: $t) -> Self {
                    Value::$variant(value)
                }
            }
        )*
    };
}

impl_from_value! {
    i8 => Int8;
    i16 => Int16;
    i32 => Int32;
    i64 => Int64;
    u8 => UInt8;
    u16 => UInt16;
    u32 => UInt32;
    u64 => UInt64;
    f32 => Float;
    f64 => Double;
    bool => Bool;
    String => String;
    Vec<u8> => Blob;
    Vec2 => Vector2;
    Vec3 => Vector3;
    Vec4 => Vector4;
    EntityCallRef => EntityCall;
    FixedDict => FixedDict;
    Vec<Value> => Array;
    EntityComponentHeader => EntityComponent;
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}
