use std::fmt;

use crate::wire::{PrimitiveKind, WireType};

/// How a frame's length is known
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageArity {
    /// Fields follow the id back to back; the length is the sum of their sizes
    Fixed,
    /// A u16 length (u32 when extended) follows the id, then that many payload bytes
    Variable,
}

/// The static description of one message
#[derive(Clone, PartialEq)]
pub struct MessageSpec {
    id: u16,
    name: String,
    arity: MessageArity,
    fields: Vec<WireType>,
    args: Vec<WireType>,
    description: String,
}

impl MessageSpec {
    pub fn fixed(id: u16, name: impl Into<String>, fields: Vec<WireType>) -> Self {
        Self {
            id,
            name: name.into(),
            arity: MessageArity::Fixed,
            args: fields.clone(),
            fields,
            description: String::new(),
        }
    }

    /// A length-prefixed message. `args` describes the payload layout, which the framer never
    /// looks at.
    pub fn variable(id: u16, name: impl Into<String>, args: Vec<WireType>) -> Self {
        Self {
            id,
            name: name.into(),
            arity: MessageArity::Variable,
            fields: vec![WireType::primitive(PrimitiveKind::Uint8Array)],
            args,
            description: String::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn id(&self) -> u16 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arity(&self) -> MessageArity {
        self.arity
    }

    pub fn is_variable(&self) -> bool {
        self.arity == MessageArity::Variable
    }

    /// Field types as framed. A variable message has a single UINT8_ARRAY field.
    pub fn fields(&self) -> &[WireType] {
        &self.fields
    }

    /// Logical argument types, in payload order for variable messages
    pub fn args(&self) -> &[WireType] {
        &self.args
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Size of a fixed-length message body, excluding the id
    pub fn fixed_size(&self) -> Option<usize> {
        match self.arity {
            MessageArity::Fixed => self.fields.iter().map(WireType::fixed_size).sum(),
            MessageArity::Variable => None,
        }
    }
}

impl fmt::Debug for MessageSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({}, {:?})", self.name, self.id, self.arity)
    }
}
