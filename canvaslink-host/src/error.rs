//! Transport errors

use canvaslink_protocol::CodecError;

use crate::config::ConfigError;

/// Errors raised while talking to a display module
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransportError<E> {
    /// The link failed; never retried
    Link(E),
    /// Encoding the frame or decoding the response failed
    Codec(CodecError),
    /// Finalized frame is at or above the configured maximum
    FrameTooLarge { len: usize, max: usize },
    /// Module never announced itself
    HandshakeTimeout { attempts: u32 },
    Config(ConfigError),
}

impl<E> From<CodecError> for TransportError<E> {
    fn from(err: CodecError) -> Self {
        TransportError::Codec(err)
    }
}

impl<E> From<ConfigError> for TransportError<E> {
    fn from(err: ConfigError) -> Self {
        TransportError::Config(err)
    }
}
