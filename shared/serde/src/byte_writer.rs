use byteorder::{ByteOrder, LittleEndian};

use crate::error::SerdeErr;

/// Growable little-endian output buffer
#[derive(Debug, Default, Clone)]
pub struct ByteWriter {
    buffer: Vec<u8>,
}

macro_rules! write_le {
    { $($name:ident => $t:ty, $len:literal, $conv:path;)* } => {
        $(
            pub fn $name(&mut self, value: $t) {
                let mut bytes = [0u8; $len];
                $conv(&mut bytes, value);
                self.buffer.extend_from_slice(&bytes);
            }
        )*
    };
}

impl ByteWriter {
    pub fn new() -> Self {
        Self {
            buffer: Vec::with_capacity(64),
        }
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buffer
    }

    pub fn to_bytes(self) -> Vec<u8> {
        self.buffer
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    pub fn write_u8(&mut self, value: u8) {
        self.buffer.push(value);
    }

    pub fn write_i8(&mut self, value: i8) {
        self.buffer.push(value as u8);
    }

    write_le! {
        write_u16 => u16, 2, LittleEndian::write_u16;
        write_i16 => i16, 2, LittleEndian::write_i16;
        write_u32 => u32, 4, LittleEndian::write_u32;
        write_i32 => i32, 4, LittleEndian::write_i32;
        write_u64 => u64, 8, LittleEndian::write_u64;
        write_i64 => i64, 8, LittleEndian::write_i64;
        write_f32 => f32, 4, LittleEndian::write_f32;
        write_f64 => f64, 8, LittleEndian::write_f64;
    }

    /// Writes the bytes followed by a NUL terminator
    pub fn write_cstring(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
        self.buffer.push(0);
    }

    /// Writes a u32 length prefix followed by the bytes
    pub fn write_blob(&mut self, bytes: &[u8]) -> Result<(), SerdeErr> {
        let length = u32::try_from(bytes.len()).map_err(|_| SerdeErr::LengthOverflow {
            length: bytes.len(),
            max: u32::MAX as usize,
        })?;
        self.write_u32(length);
        self.buffer.extend_from_slice(bytes);
        Ok(())
    }
}
