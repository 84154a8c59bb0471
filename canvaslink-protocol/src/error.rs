//! Codec errors

/// Errors that can occur while encoding or decoding a command stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CodecError {
    /// Requested buffer is below the minimum size
    BufferTooSmall { requested: usize, minimum: usize },
    /// Frame header carries an unsupported version
    VersionMismatch { expected: u8, found: u8 },
    /// Frame header announces zero content length
    EmptyContent,
    /// Read past the end of the frame content
    Truncated,
    /// Context was invalidated by an earlier error
    ContextInvalid,
    /// Frame is too long for the 16-bit length field
    FrameTooLong(usize),
    /// Array or string has more elements than a u16 count can carry
    ArrayTooLong(usize),
    /// String flag byte is neither UTF-16 nor UTF-8
    InvalidStringFlag(u8),
    /// String terminator missing after the payload
    MissingTerminator,
    /// String payload is not valid UTF-8
    InvalidUtf8,
    /// String payload is not valid UTF-16
    InvalidUtf16,
    /// Opcode byte outside the closed set
    UnknownOpcode(u8),
    /// Enumerated field holds a value with no variant
    InvalidDiscriminant(u16),
    /// Response tag differs from the one requested
    UnexpectedResponse { expected: u8, found: u8 },
    /// Underlying stream failed
    Io(embedded_io::ErrorKind),
}

impl CodecError {
    /// Framing errors leave the stream position unknown
    pub fn is_framing(&self) -> bool {
        matches!(
            self,
            CodecError::VersionMismatch { .. }
                | CodecError::EmptyContent
                | CodecError::Truncated
                | CodecError::ContextInvalid
        )
    }

    pub(crate) fn io<E: embedded_io::Error>(err: E) -> Self {
        CodecError::Io(err.kind())
    }
}
