use byteorder::{ByteOrder, LittleEndian};

use crate::error::SerdeErr;

/// Cursor over a borrowed byte slice. Every read either consumes exactly the bytes of the value
/// or fails without moving the cursor.
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    buffer: &'a [u8],
    cursor: usize,
}

macro_rules! read_le {
    { $($name:ident => $t:ty, $len:literal, $conv:path;)* } => {
        $(
            pub fn $name(&mut self) -> Result<$t, SerdeErr> {
                let bytes = self.read_bytes($len)?;
                Ok($conv(bytes))
            }
        )*
    };
}

impl<'a> ByteReader<'a> {
    pub fn new(buffer: &'a [u8]) -> Self {
        Self { buffer, cursor: 0 }
    }

    /// Bytes consumed so far
    pub fn position(&self) -> usize {
        self.cursor
    }

    pub fn remaining(&self) -> usize {
        self.buffer.len() - self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Unread bytes, without consuming them
    pub fn peek_rest(&self) -> &'a [u8] {
        &self.buffer[self.cursor..]
    }

    pub fn read_bytes(&mut self, count: usize) -> Result<&'a [u8], SerdeErr> {
        if count > self.remaining() {
            return Err(SerdeErr::UnexpectedEof {
                needed: count,
                remaining: self.remaining(),
            });
        }
        let bytes = &self.buffer[self.cursor..self.cursor + count];
        self.cursor += count;
        Ok(bytes)
    }

    /// Consumes every unread byte
    pub fn read_rest(&mut self) -> &'a [u8] {
        let bytes = &self.buffer[self.cursor..];
        self.cursor = self.buffer.len();
        bytes
    }

    /// Splits off the next `count` bytes as an independent reader
    pub fn sub_reader(&mut self, count: usize) -> Result<ByteReader<'a>, SerdeErr> {
        self.read_bytes(count).map(ByteReader::new)
    }

    pub fn read_u8(&mut self) -> Result<u8, SerdeErr> {
        Ok(self.read_bytes(1)?[0])
    }

    pub fn read_i8(&mut self) -> Result<i8, SerdeErr> {
        Ok(self.read_u8()? as i8)
    }

    read_le! {
        read_u16 => u16, 2, LittleEndian::read_u16;
        read_i16 => i16, 2, LittleEndian::read_i16;
        read_u32 => u32, 4, LittleEndian::read_u32;
        read_i32 => i32, 4, LittleEndian::read_i32;
        read_u64 => u64, 8, LittleEndian::read_u64;
        read_i64 => i64, 8, LittleEndian::read_i64;
        read_f32 => f32, 4, LittleEndian::read_f32;
        read_f64 => f64, 8, LittleEndian::read_f64;
    }

    /// Reads bytes up to a NUL terminator. The terminator is consumed but not returned.
    pub fn read_cstring(&mut self) -> Result<&'a [u8], SerdeErr> {
        let rest = self.peek_rest();
        let Some(end) = rest.iter().position(|byte| *byte == 0) else {
            return Err(SerdeErr::MissingTerminator {
                offset: self.cursor,
            });
        };
        let bytes = &rest[..end];
        self.cursor += end + 1;
        Ok(bytes)
    }

    /// Reads a u32 length prefix followed by that many bytes
    pub fn read_blob(&mut self) -> Result<&'a [u8], SerdeErr> {
        let start = self.cursor;
        let length = self.read_u32()? as usize;
        match self.read_bytes(length) {
            Ok(bytes) => Ok(bytes),
            Err(err) => {
                self.cursor = start;
                Err(err)
            }
        }
    }
}
