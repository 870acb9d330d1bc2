use thiserror::Error;

/// Errors raised while reading primitives out of a byte buffer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SerdeErr {
    /// The buffer ended before the value was complete
    #[error("Unexpected end of buffer: needed {needed} bytes but only {remaining} remain")]
    UnexpectedEof { needed: usize, remaining: usize },

    /// A NUL-terminated string ran to the end of the buffer without a terminator
    #[error("String starting at offset {offset} has no NUL terminator")]
    MissingTerminator { offset: usize },

    /// Bytes that must be UTF-8 were not
    #[error("Invalid UTF-8 in {length} byte string")]
    InvalidUtf8 { length: usize },

    /// A length prefix describes more data than can be represented
    #[error("Length {length} exceeds the maximum of {max} for this encoding")]
    LengthOverflow { length: usize, max: usize },
}

impl SerdeErr {
    /// True when the error only means "more bytes are needed", as opposed to malformed data
    pub fn is_incomplete(&self) -> bool {
        matches!(self, SerdeErr::UnexpectedEof { .. } | SerdeErr::MissingTerminator { .. })
    }
}
