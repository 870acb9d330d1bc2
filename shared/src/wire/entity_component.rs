use kbe_serde::{ByteReader, ByteWriter, ConstByteLength, Serde, SerdeErr};

/// Fixed header that precedes the properties of an embedded entity component.
///
/// The header does not describe the layout of the component's properties; the caller decodes
/// `property_count` properties against the component's own class descriptor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EntityComponentHeader {
    pub component_type: u32,
    pub owner_id: i32,
    pub component_entity_class_id: u16,
    pub property_count: u16,
}

impl Serde for EntityComponentHeader {
    fn ser(&self, writer: &mut ByteWriter) {
        writer.write_u32(self.component_type);
        writer.write_i32(self.owner_id);
        writer.write_u16(self.component_entity_class_id);
        writer.write_u16(self.property_count);
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        let mut lookahead = reader.clone();
        let header = Self {
            component_type: lookahead.read_u32()?,
            owner_id: lookahead.read_i32()?,
            component_entity_class_id: lookahead.read_u16()?,
            property_count: lookahead.read_u16()?,
        };
        *reader = lookahead;
        Ok(header)
    }

    fn byte_length(&self) -> usize {
        Self::BYTE_LENGTH
    }
}

impl ConstByteLength for EntityComponentHeader {
    const BYTE_LENGTH: usize = 12;
}
