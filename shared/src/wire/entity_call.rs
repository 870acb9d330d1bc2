use kbe_serde::{ByteReader, ByteWriter, ConstByteLength, Serde, SerdeErr};

/// Reference to a remote entity part (base, cell or client) as carried by ENTITYCALL values
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct EntityCallRef {
    pub entity_id: i32,
    pub component_id: u64,
    pub entity_type: u16,
    pub call_type: u16,
}

impl Serde for EntityCallRef {
    fn ser(&self, writer: &mut ByteWriter) {
        writer.write_i32(self.entity_id);
        writer.write_u64(self.component_id);
        writer.write_u16(self.entity_type);
        writer.write_u16(self.call_type);
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        let mut lookahead = reader.clone();
        let call = Self {
            entity_id: lookahead.read_i32()?,
            component_id: lookahead.read_u64()?,
            entity_type: lookahead.read_u16()?,
            call_type: lookahead.read_u16()?,
        };
        *reader = lookahead;
        Ok(call)
    }

    fn byte_length(&self) -> usize {
        Self::BYTE_LENGTH
    }
}

impl ConstByteLength for EntityCallRef {
    const BYTE_LENGTH: usize = 16;
}
