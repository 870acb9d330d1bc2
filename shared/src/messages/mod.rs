pub mod catalog;
pub mod error;
pub mod framer;
pub mod message;
pub mod message_ids;
pub mod message_spec;
pub mod message_specs;
