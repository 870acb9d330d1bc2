use crate::{ByteReader, ByteWriter, SerdeErr};

/// A type with a fixed little-endian wire representation
pub trait Serde: Sized {
    fn ser(&self, writer: &mut ByteWriter);

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr>;

    fn byte_length(&self) -> usize;
}

/// Implemented by types whose encoded size never depends on the value
pub trait ConstByteLength {
    const BYTE_LENGTH: usize;
}

macro_rules! impl_serde_number {
    { $($t:ty => $write:ident, $read:ident;)* } => {
        $(
            impl Serde for $t {
                fn ser(&self, writer: &mut ByteWriter) {
                    writer.$write(*self);
                }

                fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
                    reader.$read()
                }

                fn byte_length(&self) -> usize {
                    core::mem::size_of::<$t>()
                }
            }

            impl ConstByteLength for $t {
                const BYTE_LENGTH: usize = core::mem::size_of::<$t>();
            }
        )*
    };
}

impl_serde_number! {
    u8 => write_u8, read_u8;
    i8 => write_i8, read_i8;
    u16 => write_u16, read_u16;
    i16 => write_i16, read_i16;
    u32 => write_u32, read_u32;
    i32 => write_i32, read_i32;
    u64 => write_u64, read_u64;
    i64 => write_i64, read_i64;
    f32 => write_f32, read_f32;
    f64 => write_f64, read_f64;
}

// bool travels as a signed byte, anything above zero is true
impl Serde for bool {
    fn ser(&self, writer: &mut ByteWriter) {
        writer.write_i8(i8::from(*self));
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        Ok(reader.read_i8()? > 0)
    }

    fn byte_length(&self) -> usize {
        1
    }
}

impl ConstByteLength for bool {
    const BYTE_LENGTH: usize = 1;
}
