pub type EntityId = i32;
pub type EntityClassId = u16;
pub type SpaceId = u32;
pub type StreamId = i16;
pub type MessageId = u16;
