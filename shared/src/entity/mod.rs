pub mod entity_def;
pub mod entity_defs;
pub mod error;
